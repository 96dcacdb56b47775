// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! A small POSIX-ish word lexer.
//!
//! - Words are separated by whitespace.
//! - `'...'` quotes literally, `"..."` quotes with `\` escapes, `\` escapes outside of
//!   quotes too. Quotes can be glued to other word characters (`a"b c"d` is one word).
//! - Unquoted `|` and `;` end a command, even without whitespace around them.
//! - The first word of every command is its head.

use crate::{CompileError, LanguageFrontend, ParseError, SyntaxTree, Token, TokenKind};
use std::collections::HashSet;

pub const DEFAULT_BUILTINS: &[&str] = &[
    "alias", "cd", "echo", "exit", "export", "false", "history", "pwd", "source", "true",
    "unset",
];

#[derive(Debug, Clone)]
pub struct ShellWordsFrontend {
    builtins: HashSet<String>,
}

impl Default for ShellWordsFrontend {
    fn default() -> Self { Self::with_builtins(DEFAULT_BUILTINS.iter().copied()) }
}

impl ShellWordsFrontend {
    #[must_use]
    pub fn with_builtins<S: Into<String>>(builtins: impl IntoIterator<Item = S>) -> Self {
        Self {
            builtins: builtins.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Quote {
    None,
    Single(usize),
    Double(usize),
}

impl LanguageFrontend for ShellWordsFrontend {
    fn parse(&self, text: &str) -> Result<SyntaxTree, ParseError> {
        let mut tokens = vec![];
        let mut word_start: Option<usize> = None;
        let mut quote = Quote::None;
        let mut at_command_start = true;
        let mut chars = text.char_indices();

        let end_word = |start: Option<usize>,
                        end: usize,
                        tokens: &mut Vec<Token>,
                        at_command_start: &mut bool| {
            if let Some(start) = start {
                let kind = if *at_command_start {
                    TokenKind::CommandHead
                } else {
                    TokenKind::Argument
                };
                tokens.push(Token::new(kind, &text[start..end], start..end));
                *at_command_start = false;
            }
        };

        while let Some((index, ch)) = chars.next() {
            match quote {
                Quote::Single(_) => {
                    if ch == '\'' {
                        quote = Quote::None;
                    }
                }
                Quote::Double(_) => match ch {
                    '"' => quote = Quote::None,
                    '\\' => {
                        chars.next();
                    }
                    _ => {}
                },
                Quote::None => match ch {
                    '\'' => {
                        word_start.get_or_insert(index);
                        quote = Quote::Single(index);
                    }
                    '"' => {
                        word_start.get_or_insert(index);
                        quote = Quote::Double(index);
                    }
                    '\\' => {
                        word_start.get_or_insert(index);
                        if chars.next().is_none() {
                            return Err(ParseError {
                                message: "dangling escape".into(),
                                position: index,
                            });
                        }
                    }
                    '|' | ';' => {
                        end_word(word_start.take(), index, &mut tokens, &mut at_command_start);
                        tokens.push(Token::new(
                            TokenKind::Separator,
                            &text[index..index + 1],
                            index..index + 1,
                        ));
                        at_command_start = true;
                    }
                    ch if ch.is_whitespace() => {
                        end_word(word_start.take(), index, &mut tokens, &mut at_command_start);
                    }
                    _ => {
                        word_start.get_or_insert(index);
                    }
                },
            }
        }

        match quote {
            Quote::Single(position) | Quote::Double(position) => Err(ParseError {
                message: "unterminated quote".into(),
                position,
            }),
            Quote::None => {
                end_word(word_start.take(), text.len(), &mut tokens, &mut at_command_start);
                Ok(SyntaxTree { tokens })
            }
        }
    }

    /// Reports a pipeline stage with no command in it: a `|` with nothing before it, or
    /// a `|` followed by another separator or by the end of the buffer.
    fn compile(&self, _name: &str, _text: &str, tree: &SyntaxTree) -> Option<CompileError> {
        let mut previous: Option<&Token> = None;
        for token in &tree.tokens {
            if token.kind == TokenKind::Separator {
                let after_separator = previous.is_none_or(|it| it.kind == TokenKind::Separator);
                let after_pipe = previous.is_some_and(|it| it.text == "|");
                if (token.text == "|" && after_separator) || after_pipe {
                    return Some(CompileError {
                        message: "empty pipeline stage".into(),
                        position: token.range.start,
                    });
                }
            }
            previous = Some(token);
        }

        match previous {
            Some(last) if last.kind == TokenKind::Separator && last.text == "|" => {
                Some(CompileError {
                    message: "pipeline ends with `|`".into(),
                    position: last.range.start,
                })
            }
            _ => None,
        }
    }

    fn is_builtin(&self, name: &str) -> bool { self.builtins.contains(name) }
}
