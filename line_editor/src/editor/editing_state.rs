// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CompletionOverlay, HistoryCursor, InlineVec, KeyPress, Mode,
            NavigationOverlay, Overlay, Token};
use std::{collections::HashSet, ops::Range};
use unicode_segmentation::UnicodeSegmentation;

pub const NO_BINDING_TIP: &str = "No binding for current mode";
pub const NO_MATCHING_HISTORY_TIP: &str = "no matching history item";
pub const NO_COMPLETION_TIP: &str = "no completion candidates";
pub const COMPILER_ERROR_TIP: &str = "compiler error highlighted";

/// Everything about the line being read. Reset at the start of every read, and by an
/// interrupt.
///
/// `dot` is a byte offset into `line`. It is kept on a char boundary and never goes past
/// the end of `line`; the editing methods below maintain that.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditingState {
    pub mode: Mode,
    pub line: String,
    pub dot: usize,
    pub prompt: String,
    pub rprompt: String,
    /// Shown below the line for one iteration of the event loop.
    pub tips: InlineVec<String>,
    pub tokens: Vec<Token>,
    pub overlay: Option<Overlay>,
    pub history: HistoryCursor,
    /// Names of executables on the search path. Filled in by the background lookup.
    pub is_external: HashSet<String>,
    pub last_key: Option<KeyPress>,
}

impl EditingState {
    /// Start over, keeping only what an interrupt must not lose.
    pub fn reset_keeping_external(&mut self) {
        let is_external = std::mem::take(&mut self.is_external);
        *self = Self {
            is_external,
            ..Self::default()
        };
    }

    pub fn push_tip(&mut self, tip: impl Into<String>) { self.tips.push(tip.into()); }

    pub fn clear_tips(&mut self) { self.tips.clear(); }

    /// Switch mode. Leaving [`Mode::Completion`] or [`Mode::Navigation`] drops the
    /// overlay.
    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            tracing::debug!(message = "mode change", from = %self.mode, to = %mode);
        }
        self.mode = mode;
        let keep_overlay = matches!(
            (mode, &self.overlay),
            (Mode::Completion, Some(Overlay::Completion(_)))
                | (Mode::Navigation, Some(Overlay::Navigation(_)))
        );
        if !keep_overlay {
            self.overlay = None;
        }
    }

    pub fn completion_mut(&mut self) -> Option<&mut CompletionOverlay> {
        match &mut self.overlay {
            Some(Overlay::Completion(it)) => Some(it),
            _ => None,
        }
    }

    pub fn navigation_mut(&mut self) -> Option<&mut NavigationOverlay> {
        match &mut self.overlay {
            Some(Overlay::Navigation(it)) => Some(it),
            _ => None,
        }
    }

    pub fn insert_at_dot(&mut self, text: &str) {
        self.clamp_dot();
        self.line.insert_str(self.dot, text);
        self.dot += text.len();
    }

    /// Replace the buffer, dot goes to the end.
    pub fn set_line(&mut self, line: String) {
        self.dot = line.len();
        self.line = line;
    }

    /// Remove `range` from the buffer and move dot to where the range started if it was
    /// inside or after it.
    pub fn kill(&mut self, range: Range<usize>) {
        let Range { start, end } = range;
        if start >= end || end > self.line.len() {
            return;
        }
        if !self.line.is_char_boundary(start) || !self.line.is_char_boundary(end) {
            return;
        }
        self.line.drain(start..end);
        if self.dot >= end {
            self.dot -= end - start;
        } else if self.dot > start {
            self.dot = start;
        }
    }

    /// Start of the grapheme cluster right before dot.
    #[must_use]
    pub fn prev_grapheme_start(&self) -> Option<usize> {
        self.line
            .get(..self.dot)?
            .grapheme_indices(true)
            .last()
            .map(|(index, _)| index)
    }

    /// End of the grapheme cluster right after dot.
    #[must_use]
    pub fn next_grapheme_end(&self) -> Option<usize> {
        self.line
            .get(self.dot..)?
            .graphemes(true)
            .next()
            .map(|it| self.dot + it.len())
    }

    /// Start of the current line of a multi line buffer.
    #[must_use]
    pub fn sol(&self) -> usize {
        self.line
            .get(..self.dot)
            .and_then(|it| it.rfind('\n'))
            .map_or(0, |index| index + 1)
    }

    /// End of the current line of a multi line buffer.
    #[must_use]
    pub fn eol(&self) -> usize {
        self.line
            .get(self.dot..)
            .and_then(|it| it.find('\n'))
            .map_or(self.line.len(), |index| self.dot + index)
    }

    /// Start of the word that ends at (or before the whitespace before) dot.
    #[must_use]
    pub fn prev_word_start(&self) -> usize {
        let before = self.line.get(..self.dot).unwrap_or_default();
        let trimmed = before.trim_end();
        trimmed
            .char_indices()
            .rev()
            .find(|(_, ch)| ch.is_whitespace())
            .map_or(0, |(index, ch)| index + ch.len_utf8())
    }

    /// Put the state in the shape the final frame of a read is drawn in.
    pub fn prepare_for_teardown(&mut self) {
        self.set_mode(Mode::Insert);
        self.clear_tips();
        self.overlay = None;
        self.history = HistoryCursor::default();
        self.dot = self.line.len();
        self.rprompt.clear();
    }

    fn clamp_dot(&mut self) {
        self.dot = self.dot.min(self.line.len());
        while !self.line.is_char_boundary(self.dot) {
            self.dot -= 1;
        }
    }
}
