// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::StdMutex;
use std::sync::Arc;
use thiserror::Error;

/// Sequence id of a persisted command. Ids only ever grow.
pub type CommandId = i64;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: CommandId,
    pub line: String,
}

#[derive(Debug, Error, miette::Diagnostic, PartialEq, Eq)]
pub enum HistoryStoreError {
    #[error("no matching command line")]
    #[diagnostic(code(line_editor::history::no_match))]
    NoMatch,

    #[error("history store failed: {0}")]
    #[diagnostic(code(line_editor::history::backend))]
    Backend(String),
}

/// Durable, cross session command history, keyed by increasing sequence ids.
///
/// Implementations must be safe to share, the same store may be appended to from
/// elsewhere in the process while the editor is reading a line.
pub trait HistoryStore: Send + Sync {
    /// The id the next [`Self::append()`] will get.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryStoreError::Backend`] if the store can't be read.
    fn next_sequence_id(&self) -> Result<CommandId, HistoryStoreError>;

    /// Persist `line` and return its id.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryStoreError::Backend`] if the store can't be written.
    fn append(&self, line: &str) -> Result<CommandId, HistoryStoreError>;

    /// The latest entry with an id strictly less than `before_id` that starts with
    /// `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryStoreError::NoMatch`] when nothing matches.
    fn find_last_matching(
        &self,
        before_id: CommandId,
        prefix: &str,
    ) -> Result<HistoryEntry, HistoryStoreError>;

    /// The earliest entry with an id greater than or equal to `from_id` that starts with
    /// `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryStoreError::NoMatch`] when nothing matches.
    fn find_first_matching(
        &self,
        from_id: CommandId,
        prefix: &str,
    ) -> Result<HistoryEntry, HistoryStoreError>;
}

/// Lets the caller keep a handle on a store that it gave to an [`crate::Editor`].
impl<T: HistoryStore + ?Sized> HistoryStore for Arc<T> {
    fn next_sequence_id(&self) -> Result<CommandId, HistoryStoreError> {
        (**self).next_sequence_id()
    }

    fn append(&self, line: &str) -> Result<CommandId, HistoryStoreError> {
        (**self).append(line)
    }

    fn find_last_matching(
        &self,
        before_id: CommandId,
        prefix: &str,
    ) -> Result<HistoryEntry, HistoryStoreError> {
        (**self).find_last_matching(before_id, prefix)
    }

    fn find_first_matching(
        &self,
        from_id: CommandId,
        prefix: &str,
    ) -> Result<HistoryEntry, HistoryStoreError> {
        (**self).find_first_matching(from_id, prefix)
    }
}

/// Shared lookup over `(id, line)` pairs sorted by id.
pub(crate) fn find_last_in<'a>(
    entries: impl DoubleEndedIterator<Item = (CommandId, &'a str)>,
    before_id: CommandId,
    prefix: &str,
) -> Result<HistoryEntry, HistoryStoreError> {
    entries
        .rev()
        .find(|(id, line)| *id < before_id && line.starts_with(prefix))
        .map(|(id, line)| HistoryEntry {
            id,
            line: line.to_string(),
        })
        .ok_or(HistoryStoreError::NoMatch)
}

pub(crate) fn find_first_in<'a>(
    mut entries: impl Iterator<Item = (CommandId, &'a str)>,
    from_id: CommandId,
    prefix: &str,
) -> Result<HistoryEntry, HistoryStoreError> {
    entries
        .find(|(id, line)| *id >= from_id && line.starts_with(prefix))
        .map(|(id, line)| HistoryEntry {
            id,
            line: line.to_string(),
        })
        .ok_or(HistoryStoreError::NoMatch)
}

/// [`HistoryStore`] that lives as long as the process. The id of an entry is its index.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    entries: StdMutex<Vec<String>>,
}

impl MemoryHistoryStore {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn with_entries<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        Self {
            entries: StdMutex::new(lines.into_iter().map(Into::into).collect()),
        }
    }

    /// # Panics
    ///
    /// This method will panic if the lock is poisoned.
    #[must_use]
    pub fn entries(&self) -> Vec<String> { self.entries.lock().unwrap().clone() }

    fn lock_entries(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, Vec<String>>, HistoryStoreError> {
        self.entries
            .lock()
            .map_err(|_| HistoryStoreError::Backend("history lock poisoned".into()))
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn next_sequence_id(&self) -> Result<CommandId, HistoryStoreError> {
        let len = self.lock_entries()?.len();
        Ok(len as CommandId)
    }

    fn append(&self, line: &str) -> Result<CommandId, HistoryStoreError> {
        let mut entries = self.lock_entries()?;
        entries.push(line.to_string());
        Ok((entries.len() - 1) as CommandId)
    }

    fn find_last_matching(
        &self,
        before_id: CommandId,
        prefix: &str,
    ) -> Result<HistoryEntry, HistoryStoreError> {
        let entries = self.lock_entries()?;
        find_last_in(
            entries
                .iter()
                .enumerate()
                .map(|(id, line)| (id as CommandId, line.as_str())),
            before_id,
            prefix,
        )
    }

    fn find_first_matching(
        &self,
        from_id: CommandId,
        prefix: &str,
    ) -> Result<HistoryEntry, HistoryStoreError> {
        let entries = self.lock_entries()?;
        find_first_in(
            entries
                .iter()
                .enumerate()
                .map(|(id, line)| (id as CommandId, line.as_str())),
            from_id,
            prefix,
        )
    }
}
