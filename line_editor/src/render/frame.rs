// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::style::{ContentStyle, StyledContent};
use std::fmt::Write as _;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width of `text`, ignoring any ANSI escape sequences in it.
#[must_use]
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(strip_ansi_escapes::strip_str(text).as_str())
}

/// Rows of styled text, wrapped at `width` columns. The terminal's autowrap is off while
/// a line is being edited, so wrapping happens here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: usize,
    pub rows: Vec<String>,
    pub col: usize,
}

impl Frame {
    #[must_use]
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(1),
            rows: vec![String::new()],
            col: 0,
        }
    }

    #[must_use]
    pub fn row(&self) -> usize { self.rows.len() - 1 }

    pub fn newline(&mut self) {
        self.rows.push(String::new());
        self.col = 0;
    }

    /// Start a new row if the current one is full.
    pub fn wrap_if_full(&mut self) {
        if self.col >= self.width {
            self.newline();
        }
    }

    #[must_use]
    pub fn remaining(&self) -> usize { self.width.saturating_sub(self.col) }

    /// Write text that may contain escape sequences without splitting it. Only for short
    /// text like prompts.
    pub fn push_raw(&mut self, text: &str) {
        self.wrap_if_full();
        if let Some(row) = self.rows.last_mut() {
            row.push_str(text);
        }
        self.col = (self.col + display_width(text)).min(self.width);
    }

    /// Write `text` in `style`, wrapping between grapheme clusters.
    pub fn push_styled(&mut self, text: &str, style: ContentStyle) {
        let mut run = String::new();
        for grapheme in text.graphemes(true) {
            let grapheme_width = UnicodeWidthStr::width(grapheme);
            if self.col > 0 && self.col + grapheme_width > self.width {
                self.flush_run(&mut run, style);
                self.newline();
            }
            run.push_str(grapheme);
            self.col += grapheme_width;
        }
        self.flush_run(&mut run, style);
    }

    pub fn push_plain(&mut self, text: &str) { self.push_styled(text, ContentStyle::new()); }

    fn flush_run(&mut self, run: &mut String, style: ContentStyle) {
        if run.is_empty() {
            return;
        }
        if let Some(row) = self.rows.last_mut() {
            if style == ContentStyle::new() {
                row.push_str(run);
            } else {
                let _ = write!(row, "{}", StyledContent::new(style, run.as_str()));
            }
        }
        run.clear();
    }
}
