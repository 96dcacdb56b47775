// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Prefix search over two tiers of history behind one cursor.
//!
//! 1. The session tier: lines accepted by this process, held in memory.
//! 2. The persistent tier: a [`HistoryStore`], which also holds every line of older
//!    sessions.
//!
//! The `current` field of a [`HistoryCursor`] is relative to the `cmd_seq` baseline,
//! which is the store's next sequence id when the session started:
//!
//! ```text
//!   persisted (older sessions)      session (this process)     live
//!   ... -3  -2  -1 │ 0  1  2 ... len-1 │ len
//!                  ╰ cmd_seq
//! ```
//!
//! - `current < 0`: persisted entry with absolute id `cmd_seq + current`.
//! - `0 <= current < len`: index into the session lines.
//! - `current == len`: the line being edited when the search started. It always matches
//!   the prefix, since the prefix is cut from it, so [`SessionHistory::next()`] can
//!   always walk back to it.
//!
//! Lines appended by this session also go to the store, with ids at or above `cmd_seq`.
//! Store lookups never reach those, so nothing is visited twice.

use crate::{CommandId, HistoryStore, HistoryStoreError};

/// The value of `cmd_seq` when there is no store, or its next id could not be read.
pub const NO_STORE_SEQUENCE: CommandId = -1;

/// Position of a history search. [`Self::jump()`] is the only way `current` and `line`
/// change once a search has started.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HistoryCursor {
    pub current: CommandId,
    pub prefix: String,
    pub line: String,
    /// The buffer the search started from, shown again at the live position.
    pub live: String,
}

impl HistoryCursor {
    pub fn jump(&mut self, current: CommandId, line: String) {
        tracing::debug!(message = "history jump", current = current, line = %line);
        self.current = current;
        self.line = line;
    }
}

/// Session lines, the optional store and the `cmd_seq` baseline. Lives as long as the
/// [`crate::Editor`].
#[allow(missing_debug_implementations)]
pub struct SessionHistory {
    lines: Vec<String>,
    store: Option<Box<dyn HistoryStore>>,
    cmd_seq: CommandId,
}

impl Default for SessionHistory {
    fn default() -> Self { Self::new(None) }
}

impl SessionHistory {
    /// Captures the `cmd_seq` baseline from `store`. When that fails the store is still
    /// appended to, but never searched, since its ids can't be related to the session.
    #[must_use]
    pub fn new(store: Option<Box<dyn HistoryStore>>) -> Self {
        let cmd_seq = match store.as_deref().map(HistoryStore::next_sequence_id) {
            Some(Ok(id)) => id,
            Some(Err(err)) => {
                tracing::warn!(message = "can't read next history sequence id", error = %err);
                NO_STORE_SEQUENCE
            }
            None => NO_STORE_SEQUENCE,
        };
        Self {
            lines: vec![],
            store,
            cmd_seq,
        }
    }

    #[must_use]
    pub fn lines(&self) -> &[String] { &self.lines }

    #[must_use]
    pub fn cmd_seq(&self) -> CommandId { self.cmd_seq }

    #[must_use]
    pub fn store(&self) -> Option<&dyn HistoryStore> { self.store.as_deref() }

    fn searchable_store(&self) -> Option<&dyn HistoryStore> {
        if self.cmd_seq == NO_STORE_SEQUENCE {
            None
        } else {
            self.store()
        }
    }

    /// Record an accepted line in the session and in the store. A store failure is
    /// logged, the session still gets the line.
    pub fn append(&mut self, line: &str) {
        self.lines.push(line.to_string());
        if let Some(store) = self.store()
            && let Err(err) = store.append(line)
        {
            tracing::warn!(message = "can't append to history store", error = %err);
        }
    }

    /// Begin a search. The prefix is `live[..dot]` and the cursor sits on the live
    /// position.
    pub fn start(&self, cursor: &mut HistoryCursor, live: &str, dot: usize) {
        let dot = dot.min(live.len());
        *cursor = HistoryCursor {
            current: 0,
            prefix: live.get(..dot).unwrap_or(live).to_string(),
            line: String::new(),
            live: live.to_string(),
        };
        cursor.jump(self.live_position(), live.to_string());
    }

    fn live_position(&self) -> CommandId { self.lines.len() as CommandId }

    /// Move to the closest older line that starts with the prefix. Returns `false` and
    /// leaves the cursor alone when there is none.
    pub fn prev(&self, cursor: &mut HistoryCursor) -> bool {
        if cursor.current > 0 {
            let upto = usize::try_from(cursor.current)
                .unwrap_or(0)
                .min(self.lines.len());
            let found = self.lines[..upto]
                .iter()
                .rposition(|it| it.starts_with(&cursor.prefix));
            if let Some(index) = found {
                cursor.jump(index as CommandId, self.lines[index].clone());
                return true;
            }
        }

        let Some(store) = self.searchable_store() else {
            return false;
        };
        let before_id = self.cmd_seq + cursor.current.min(0);
        match store.find_last_matching(before_id, &cursor.prefix) {
            Ok(entry) => {
                cursor.jump(entry.id - self.cmd_seq, entry.line);
                true
            }
            Err(HistoryStoreError::NoMatch) => false,
            Err(err) => {
                tracing::warn!(message = "history lookup failed", error = %err);
                false
            }
        }
    }

    /// Move to the closest newer line that starts with the prefix, the live position
    /// included. Returns `false` and leaves the cursor alone when there is none.
    pub fn next(&self, cursor: &mut HistoryCursor) -> bool {
        if cursor.current < -1
            && let Some(store) = self.searchable_store()
        {
            let from_id = self.cmd_seq + cursor.current + 1;
            match store.find_first_matching(from_id, &cursor.prefix) {
                Ok(entry) => {
                    cursor.jump(entry.id - self.cmd_seq, entry.line);
                    return true;
                }
                Err(HistoryStoreError::NoMatch) => {}
                Err(err) => {
                    tracing::warn!(message = "history lookup failed", error = %err);
                }
            }
        }

        let from = usize::try_from((cursor.current + 1).max(0)).unwrap_or(0);
        let found = self
            .lines
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, it)| it.starts_with(&cursor.prefix));
        if let Some((index, line)) = found {
            cursor.jump(index as CommandId, line.clone());
            return true;
        }

        if cursor.current < self.live_position() {
            let live = cursor.live.clone();
            cursor.jump(self.live_position(), live);
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HistoryEntry, MemoryHistoryStore};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn session_with(lines: &[&str], store: Option<Box<dyn HistoryStore>>) -> SessionHistory {
        let mut history = SessionHistory::new(store);
        for line in lines {
            history.append(line);
        }
        history
    }

    #[test]
    fn test_prefix_search_in_session() {
        let history = session_with(&["ls", "cd /tmp", "ls -la"], None);
        let mut cursor = HistoryCursor::default();
        history.start(&mut cursor, "ls", 2);

        assert!(history.prev(&mut cursor));
        assert_eq!(cursor.line, "ls -la");
        assert!(history.prev(&mut cursor));
        assert_eq!(cursor.line, "ls");

        let before = cursor.clone();
        assert!(!history.prev(&mut cursor));
        assert_eq!(cursor, before);
    }

    #[test]
    fn test_prev_then_next_restores_live_buffer() {
        let history = session_with(&["echo a", "git status"], None);
        let mut cursor = HistoryCursor::default();
        history.start(&mut cursor, "git st", 3);

        assert!(history.prev(&mut cursor));
        assert_eq!(cursor.line, "git status");
        assert!(history.next(&mut cursor));
        assert_eq!(cursor.line, "git st");
        assert_eq!(cursor.current, 2);

        assert!(!history.next(&mut cursor));
    }

    #[test]
    fn test_prefix_is_cut_at_dot() {
        let history = session_with(&["cargo build", "cat x"], None);
        let mut cursor = HistoryCursor::default();
        history.start(&mut cursor, "carrot", 3);

        assert_eq!(cursor.prefix, "car");
        assert!(history.prev(&mut cursor));
        assert_eq!(cursor.line, "cargo build");
    }

    #[test]
    fn test_prev_crosses_into_store_then_next_comes_back() {
        let store = Arc::new(MemoryHistoryStore::with_entries(["make", "vim", "make test"]));
        let history = session_with(&["make run"], Some(Box::new(store.clone())));
        assert_eq!(history.cmd_seq(), 3);

        let mut cursor = HistoryCursor::default();
        history.start(&mut cursor, "make", 4);

        assert!(history.prev(&mut cursor));
        assert_eq!((cursor.current, cursor.line.as_str()), (0, "make run"));
        assert!(history.prev(&mut cursor));
        assert_eq!((cursor.current, cursor.line.as_str()), (-1, "make test"));
        assert!(history.prev(&mut cursor));
        assert_eq!((cursor.current, cursor.line.as_str()), (-3, "make"));
        assert!(!history.prev(&mut cursor));

        assert!(history.next(&mut cursor));
        assert_eq!((cursor.current, cursor.line.as_str()), (-1, "make test"));
        assert!(history.next(&mut cursor));
        assert_eq!((cursor.current, cursor.line.as_str()), (0, "make run"));
        assert!(history.next(&mut cursor));
        assert_eq!((cursor.current, cursor.line.as_str()), (1, "make"));
    }

    #[test]
    fn test_session_appends_reach_store_but_are_not_found_twice() {
        let store = Arc::new(MemoryHistoryStore::with_entries(["old"]));
        let history = session_with(&["new"], Some(Box::new(store.clone())));
        assert_eq!(store.entries(), vec!["old".to_string(), "new".to_string()]);

        let mut cursor = HistoryCursor::default();
        history.start(&mut cursor, "", 0);
        assert!(history.prev(&mut cursor));
        assert_eq!(cursor.line, "new");
        assert!(history.prev(&mut cursor));
        assert_eq!(cursor.line, "old");
        assert!(!history.prev(&mut cursor));
    }

    struct BrokenStore;

    impl HistoryStore for BrokenStore {
        fn next_sequence_id(&self) -> Result<CommandId, HistoryStoreError> { Ok(10) }

        fn append(&self, _line: &str) -> Result<CommandId, HistoryStoreError> {
            Err(HistoryStoreError::Backend("disk full".into()))
        }

        fn find_last_matching(
            &self,
            _before_id: CommandId,
            _prefix: &str,
        ) -> Result<HistoryEntry, HistoryStoreError> {
            Err(HistoryStoreError::Backend("io error".into()))
        }

        fn find_first_matching(
            &self,
            _from_id: CommandId,
            _prefix: &str,
        ) -> Result<HistoryEntry, HistoryStoreError> {
            Err(HistoryStoreError::Backend("io error".into()))
        }
    }

    #[test]
    fn test_store_errors_are_a_failed_step() {
        let history = session_with(&["ls"], Some(Box::new(BrokenStore)));
        assert_eq!(history.lines(), ["ls".to_string()]);

        let mut cursor = HistoryCursor::default();
        history.start(&mut cursor, "", 0);
        assert!(history.prev(&mut cursor));
        let before = cursor.clone();
        assert!(!history.prev(&mut cursor));
        assert_eq!(cursor, before);
    }

    #[test]
    fn test_store_without_baseline_is_not_searched() {
        struct NoBaseline;
        impl HistoryStore for NoBaseline {
            fn next_sequence_id(&self) -> Result<CommandId, HistoryStoreError> {
                Err(HistoryStoreError::Backend("locked".into()))
            }
            fn append(&self, _line: &str) -> Result<CommandId, HistoryStoreError> { Ok(0) }
            fn find_last_matching(
                &self,
                _before_id: CommandId,
                _prefix: &str,
            ) -> Result<HistoryEntry, HistoryStoreError> {
                panic!("must not be searched")
            }
            fn find_first_matching(
                &self,
                _from_id: CommandId,
                _prefix: &str,
            ) -> Result<HistoryEntry, HistoryStoreError> {
                panic!("must not be searched")
            }
        }

        let history = SessionHistory::new(Some(Box::new(NoBaseline)));
        assert_eq!(history.cmd_seq(), NO_STORE_SEQUENCE);
        let mut cursor = HistoryCursor::default();
        history.start(&mut cursor, "x", 1);
        assert!(!history.prev(&mut cursor));
    }
}
