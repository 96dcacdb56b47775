// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::InlineVec;
use std::ops::Range;
use thiserror::Error;

/// Name given to the buffer when it is handed to [`LanguageFrontend::compile()`].
pub const INTERACTIVE_SOURCE_NAME: &str = "[interactive]";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// First word of a command, ie: the thing that gets run.
    CommandHead,
    Argument,
    /// `|` or `;`.
    Separator,
    /// The whole buffer, when it does not parse.
    ParserError,
}

/// Extra styling on top of what the [`TokenKind`] implies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleHint {
    /// A command head that resolves to something runnable.
    GoodCommand,
    /// A command head that does not resolve.
    BadCommand,
    /// The token a compile diagnostic points into.
    CompilerError,
}

/// A lexical annotation of a byte range of the buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub range: Range<usize>,
    pub more_style: InlineVec<StyleHint>,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, text: &str, range: Range<usize>) -> Self {
        Self {
            kind,
            text: text.to_string(),
            range,
            more_style: InlineVec::new(),
        }
    }

    #[must_use]
    pub fn contains(&self, pos: usize) -> bool { self.range.contains(&pos) }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyntaxTree {
    pub tokens: Vec<Token>,
}

impl SyntaxTree {
    pub fn command_heads(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|it| it.kind == TokenKind::CommandHead)
    }
}

#[derive(Clone, Debug, Error, miette::Diagnostic, PartialEq, Eq)]
#[error("parse error at {position}: {message}")]
#[diagnostic(code(line_editor::frontend::parse))]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

/// A diagnostic that points at a byte position of the buffer. Only used to highlight,
/// nothing is run.
#[derive(Clone, Debug, Error, miette::Diagnostic, PartialEq, Eq)]
#[error("compile error at {position}: {message}")]
#[diagnostic(code(line_editor::frontend::compile))]
pub struct CompileError {
    pub message: String,
    pub position: usize,
}

/// The shell language, as far as the editor needs it.
pub trait LanguageFrontend: Send {
    /// # Errors
    ///
    /// Returns [`ParseError`] if `text` is not well formed.
    fn parse(&self, text: &str) -> Result<SyntaxTree, ParseError>;

    /// Check a parsed buffer for semantic errors. `name` identifies the source.
    fn compile(&self, name: &str, text: &str, tree: &SyntaxTree) -> Option<CompileError>;

    /// Whether `name` is a command the shell implements itself.
    fn is_builtin(&self, name: &str) -> bool;
}
