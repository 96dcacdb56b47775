// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{RestoreError, TerminalSetupError};
use std::io;
use thiserror::Error;

/// The outcome of [`crate::Editor::read_line()`].
#[derive(Debug)]
pub enum LineRead {
    /// The accepted line, without a trailing newline. May be empty.
    Line(String),
    /// The input stream ended, or `Ctrl+D` on an empty line.
    Eof,
    Err(ReadLineError),
}

impl LineRead {
    #[must_use]
    pub fn as_line(&self) -> Option<&str> {
        match self {
            LineRead::Line(line) => Some(line),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_eof(&self) -> bool { matches!(self, LineRead::Eof) }
}

#[derive(Debug, Error, miette::Diagnostic)]
pub enum ReadLineError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    TerminalSetup(#[from] TerminalSetupError),

    #[error("can't render: {0}")]
    #[diagnostic(code(line_editor::editor::render))]
    Render(io::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Restore(#[from] RestoreError),

    #[error("{} errors while reading a line", .errors.len())]
    #[diagnostic(code(line_editor::editor::multiple))]
    Multiple {
        #[related]
        errors: Vec<ReadLineError>,
    },
}

impl ReadLineError {
    /// `None` for no errors, the error itself for one, [`ReadLineError::Multiple`]
    /// otherwise.
    #[must_use]
    pub fn from_many(mut errors: Vec<ReadLineError>) -> Option<ReadLineError> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(ReadLineError::Multiple { errors }),
        }
    }
}
