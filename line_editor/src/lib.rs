// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # Interactive line editor for a command shell
//!
//! This crate reads one line of input from a terminal at a time, with in place editing
//! and five interaction modes:
//!
//! | Mode         | What it does                                                      |
//! |--------------|-------------------------------------------------------------------|
//! | `Insert`     | Plain text entry, the initial mode of every read.                 |
//! | `Command`    | vi-like cursor motion and single character deletion.              |
//! | `Completion` | Candidate list from a [`CompletionProvider`], inserted at dot.    |
//! | `Navigation` | File system browser from a [`NavigationProvider`].                |
//! | `History`    | Prefix search over session and persistent history.               |
//!
//! The heart of the crate is [`Editor::read_line()`]. It puts the terminal into a
//! non-canonical, no-echo mode, then runs a single task event loop that waits on three
//! producers at once with [`tokio::select!`]:
//!
//! 1. The [`EventSource`], which decodes terminal input in its own task.
//! 2. The OS signal channel, see [`spawn_signal_listener()`].
//! 3. A one shot background lookup of executable names, see [`ExecutableLookup`].
//!
//! Every exit out of a read that got past terminal setup restores the terminal mode
//! that was saved on entry, see [`terminal_session`].
//!
//! # Collaborators
//!
//! Rendering, lexing, completion, navigation and durable history storage are behind
//! traits ([`Renderer`], [`LanguageFrontend`], [`CompletionProvider`],
//! [`NavigationProvider`], [`HistoryStore`]). Simple default implementations ship with
//! the crate so that [`EditorBuilder`] produces a working editor out of the box.

// Enforce strict error handling in production library code only. Tests are allowed to
// use .unwrap() (workspace `Cargo.toml` config allows it).
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach.
pub mod config;
pub mod editor;
pub mod frontend;
pub mod history;
pub mod keymap;
pub mod log;
pub mod lookup;
pub mod modes;
pub mod render;
pub mod terminal;

#[cfg(test)]
pub mod test_fixtures;

// Re-export.
pub use config::*;
pub use editor::*;
pub use frontend::*;
pub use history::*;
pub use keymap::*;
pub use log::*;
pub use lookup::*;
pub use modes::*;
pub use render::*;
pub use terminal::*;

// Type aliases.
use futures_core::Stream;
use smallvec::SmallVec;
use std::{pin::Pin, sync::Arc};

/// Disambiguate the type of `StdMutex` from stdlib and tokio to avoid conflicts.
pub type StdMutex<T> = std::sync::Mutex<T>;

/// Type alias for a `Send`-able output device (raw terminal, mock, etc).
pub type SendRawTerminal = dyn std::io::Write + Send;
/// Type alias for a `Send`-able raw terminal wrapped in an `Arc<StdMutex>`.
pub type SafeRawTerminal = Arc<StdMutex<SendRawTerminal>>;

/// Type alias for a pinned stream that can be moved into a spawned task.
pub type PinnedInputStream<T> = Pin<Box<dyn Stream<Item = T> + Send>>;

/// Stack allocated vector for the small collections used on every keystroke.
pub type InlineVec<T> = SmallVec<[T; INLINE_VEC_SIZE]>;

// Constants.
pub const INLINE_VEC_SIZE: usize = 8;
