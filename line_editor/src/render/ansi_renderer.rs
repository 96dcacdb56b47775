// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{EditingState, Frame, Mode, Overlay, Renderer, StyleHint, Token, TokenKind,
            display_width};
use crossterm::{QueueableCommand,
                cursor::{MoveRight, MoveUp},
                style::{Attribute, Color, ContentStyle, Stylize},
                terminal::{Clear, ClearType}};
use std::io::{self, Write};

/// Rows of the navigation listing shown at once.
pub const DEFAULT_MAX_NAVIGATION_ROWS: usize = 10;

/// Redraws everything below the first row of the previous frame on every call. No
/// diffing: the lines this editor deals with are short.
///
/// Layout, top to bottom:
/// 1. Prompt, buffer (styled per [`Token`]) and the right prompt when it fits.
/// 2. A mode banner in [`Mode::Command`] and [`Mode::History`].
/// 3. Tips, one per row.
/// 4. The overlay, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsiRenderer {
    /// Row the cursor was left on by the previous frame, relative to its first row.
    cursor_row: usize,
    pub max_navigation_rows: usize,
}

impl Default for AnsiRenderer {
    fn default() -> Self {
        Self {
            cursor_row: 0,
            max_navigation_rows: DEFAULT_MAX_NAVIGATION_ROWS,
        }
    }
}

impl AnsiRenderer {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Lay out `state` without writing anything. Returns the frame and the position of
    /// the cursor (row, col) in it.
    #[must_use]
    pub fn layout(&self, state: &EditingState, width: u16) -> (Frame, (usize, usize)) {
        let mut frame = Frame::new(usize::from(width));

        frame.push_raw(&state.prompt);
        let cursor = if state.mode == Mode::History {
            // The line being browsed replaces the buffer until it is accepted.
            frame.push_plain(&state.history.line);
            frame.wrap_if_full();
            (frame.row(), frame.col)
        } else {
            push_buffer(&mut frame, &state.line, state.dot, &state.tokens)
        };

        let rprompt_width = display_width(&state.rprompt);
        if rprompt_width > 0 && frame.remaining() > rprompt_width {
            let padding = frame.remaining() - rprompt_width;
            frame.push_plain(&" ".repeat(padding));
            frame.push_raw(&state.rprompt);
        }

        match state.mode {
            Mode::Command => {
                frame.newline();
                frame.push_styled(" COMMAND ", ContentStyle::new().reverse());
            }
            Mode::History => {
                frame.newline();
                let banner = format!(" HISTORY #{} ", state.history.current);
                frame.push_styled(&banner, ContentStyle::new().reverse());
            }
            _ => {}
        }

        for tip in &state.tips {
            frame.newline();
            frame.push_plain(tip);
        }

        match &state.overlay {
            Some(Overlay::Completion(completion)) => {
                frame.newline();
                frame.push_styled(" COMPLETING ", ContentStyle::new().reverse());
                frame.newline();
                for (index, candidate) in completion.candidates.iter().enumerate() {
                    if index > 0 {
                        frame.push_plain("  ");
                    }
                    let style = if index == completion.current {
                        ContentStyle::new().reverse()
                    } else {
                        ContentStyle::new()
                    };
                    frame.push_styled(&candidate.display, style);
                }
            }
            Some(Overlay::Navigation(navigation)) => {
                frame.newline();
                let banner = format!(" NAVIGATING {} ", navigation.dir.display());
                frame.push_styled(&banner, ContentStyle::new().reverse());
                let rows = self.max_navigation_rows.max(1);
                let first = (navigation.current + 1).saturating_sub(rows);
                for (index, entry) in
                    navigation.entries.iter().enumerate().skip(first).take(rows)
                {
                    frame.newline();
                    let mut style = ContentStyle::new();
                    if entry.is_dir {
                        style = style.blue();
                    }
                    if index == navigation.current {
                        style = style.reverse();
                    }
                    let name = if entry.is_dir {
                        format!("{}/", entry.name)
                    } else {
                        entry.name.clone()
                    };
                    frame.push_styled(&name, style);
                }
            }
            None => {}
        }

        (frame, cursor)
    }
}

impl Renderer for AnsiRenderer {
    fn render(
        &mut self,
        state: &EditingState,
        width: u16,
        out: &mut dyn Write,
    ) -> io::Result<()> {
        let (frame, (cursor_row, cursor_col)) = self.layout(state, width);

        // Back to the top left corner of the previous frame.
        if self.cursor_row > 0 {
            out.queue(MoveUp(to_u16(self.cursor_row)))?;
        }
        out.write_all(b"\r")?;
        out.queue(Clear(ClearType::FromCursorDown))?;

        for (index, row) in frame.rows.iter().enumerate() {
            if index > 0 {
                out.write_all(b"\r\n")?;
            }
            out.write_all(row.as_bytes())?;
        }

        let rows_below_cursor = frame.row() - cursor_row;
        if rows_below_cursor > 0 {
            out.queue(MoveUp(to_u16(rows_below_cursor)))?;
        }
        out.write_all(b"\r")?;
        if cursor_col > 0 {
            out.queue(MoveRight(to_u16(cursor_col)))?;
        }
        out.flush()?;

        self.cursor_row = cursor_row;
        Ok(())
    }

    fn reset(&mut self) { self.cursor_row = 0; }
}

fn to_u16(n: usize) -> u16 { u16::try_from(n).unwrap_or(u16::MAX) }

/// Write `line` styled by `tokens`, return where `dot` lands.
fn push_buffer(
    frame: &mut Frame,
    line: &str,
    dot: usize,
    tokens: &[Token],
) -> (usize, usize) {
    let mut writer = BufferWriter {
        line,
        dot,
        pos: 0,
        cursor: None,
    };
    for token in tokens {
        if token.range.start > writer.pos {
            writer.push_until(frame, token.range.start, ContentStyle::new());
        }
        writer.push_until(frame, token.range.end, style_for_token(token));
    }
    writer.push_until(frame, line.len(), ContentStyle::new());

    writer.cursor.unwrap_or_else(|| {
        frame.wrap_if_full();
        (frame.row(), frame.col)
    })
}

struct BufferWriter<'a> {
    line: &'a str,
    dot: usize,
    /// Byte offset written so far.
    pos: usize,
    cursor: Option<(usize, usize)>,
}

impl BufferWriter<'_> {
    fn push_until(&mut self, frame: &mut Frame, end: usize, style: ContentStyle) {
        let end = end.min(self.line.len());
        if self.pos >= end {
            return;
        }
        let dot = self.dot;
        if (self.pos..end).contains(&dot)
            && let (Some(before), Some(after)) =
                (self.line.get(self.pos..dot), self.line.get(dot..end))
        {
            frame.push_styled(before, style);
            frame.wrap_if_full();
            self.cursor = Some((frame.row(), frame.col));
            frame.push_styled(after, style);
        } else if let Some(text) = self.line.get(self.pos..end) {
            frame.push_styled(text, style);
        }
        self.pos = end;
    }
}

#[must_use]
pub fn style_for_token(token: &Token) -> ContentStyle {
    let mut style = match token.kind {
        TokenKind::CommandHead | TokenKind::Argument => ContentStyle::new(),
        TokenKind::Separator => ContentStyle::new().attribute(Attribute::Bold),
        TokenKind::ParserError => ContentStyle::new().with(Color::Red),
    };
    for hint in &token.more_style {
        style = match hint {
            StyleHint::GoodCommand => style.with(Color::Green),
            StyleHint::BadCommand => style.with(Color::Red),
            StyleHint::CompilerError => style
                .attribute(Attribute::Underlined)
                .on(Color::DarkRed),
        };
    }
    style
}
