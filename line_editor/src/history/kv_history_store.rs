// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Persistent [`HistoryStore`] on top of the [kv] crate (which wraps
//! [sled](https://github.com/spacejam/sled)).
//!
//! Every command line is one key/value pair in a single bucket:
//! - The key is the sequence id, zero padded to [`KEY_WIDTH`] digits, so that the
//!   lexical order of the keys (which is the order [`kv::Bucket::iter`] uses) is the
//!   numeric order of the ids.
//! - The value is the line, serialized with [`kv::Json`].
//!
//! Lookups walk a key range of the bucket and stop at the first match, so a history
//! step does not decode the whole history.

use crate::{CommandId, HistoryEntry, HistoryStore, HistoryStoreError, StdMutex};
use kv::{Config, Json, Store};
use miette::{Context, IntoDiagnostic};
use std::path::Path;

pub const KEY_WIDTH: usize = 20;
pub const DEFAULT_BUCKET_NAME: &str = "command_history";

pub type HistoryBucket = kv::Bucket<'static, String, Json<String>>;

#[derive(thiserror::Error, Debug, miette::Diagnostic)]
pub enum KvHistoryErrorCouldNot {
    #[error("📑 Could not create history db folder: '{db_folder_path}' on disk")]
    #[diagnostic(
        code(line_editor::history::create_db_folder),
        help("is another shell holding the lock on this folder?")
    )]
    CreateDbFolder { db_folder_path: String },

    #[error("📦 Could not create bucket from store: '{bucket_name}'")]
    #[diagnostic(code(line_editor::history::create_bucket))]
    CreateBucketFromStore { bucket_name: String },
}

#[allow(missing_debug_implementations)]
pub struct KvHistoryStore {
    /// Keeps the db open for as long as the bucket is in use.
    _store: Store,
    bucket: HistoryBucket,
    /// Serializes appends, so that two appends never get the same id.
    append_lock: StdMutex<()>,
}

impl KvHistoryStore {
    /// Create the db folder if it doesn't exist. Otherwise load it from the folder on
    /// disk.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The database folder cannot be created
    /// - The store cannot be opened due to I/O errors or permission issues
    /// - The database is corrupted or locked by another process
    #[tracing::instrument(skip_all, fields(db_folder_path = %db_folder_path.as_ref().display()))]
    pub fn open(db_folder_path: impl AsRef<Path>) -> miette::Result<Self> {
        let db_folder_path = db_folder_path.as_ref();
        let store = Store::new(Config::new(db_folder_path))
            .into_diagnostic()
            .wrap_err(KvHistoryErrorCouldNot::CreateDbFolder {
                db_folder_path: db_folder_path.display().to_string(),
            })?;

        let bucket: HistoryBucket = store
            .bucket(Some(DEFAULT_BUCKET_NAME))
            .into_diagnostic()
            .wrap_err(KvHistoryErrorCouldNot::CreateBucketFromStore {
                bucket_name: DEFAULT_BUCKET_NAME.to_string(),
            })?;

        // % is Display, ? is Debug.
        tracing::debug!(
            message = "📑 load or create history store",
            db_folder_path = %db_folder_path.display()
        );

        Ok(Self {
            _store: store,
            bucket,
            append_lock: StdMutex::new(()),
        })
    }

    /// The newest entry, or `None` for an empty bucket.
    fn last_entry(&self) -> Result<Option<(CommandId, String)>, HistoryStoreError> {
        for item in self.bucket.iter().rev() {
            if let Some(it) = decode_item(&item.map_err(backend_error)?) {
                return Ok(Some(it));
            }
        }
        Ok(None)
    }

    /// Entries with ids in `from_id..until_id`, in id order.
    fn entries_in_range(
        &self,
        from_id: CommandId,
        until_id: CommandId,
    ) -> Result<kv::Iter<String, Json<String>>, HistoryStoreError> {
        self.bucket
            .iter_range(&history_key(from_id.max(0)), &history_key(until_id.max(0)))
            .map_err(backend_error)
    }
}

/// Items whose key or value fails to decode are skipped.
fn decode_item(item: &kv::Item<String, Json<String>>) -> Option<(CommandId, String)> {
    let key = item.key::<String>().ok()?;
    let id = key.parse::<CommandId>().ok()?;
    let Json(line) = item.value::<Json<String>>().ok()?;
    Some((id, line))
}

/// Walk `items` and stop at the first decodable entry that starts with `prefix`.
fn first_with_prefix(
    items: impl Iterator<Item = Result<kv::Item<String, Json<String>>, kv::Error>>,
    prefix: &str,
) -> Result<HistoryEntry, HistoryStoreError> {
    for item in items {
        if let Some((id, line)) = decode_item(&item.map_err(backend_error)?)
            && line.starts_with(prefix)
        {
            return Ok(HistoryEntry { id, line });
        }
    }
    Err(HistoryStoreError::NoMatch)
}

fn backend_error(err: kv::Error) -> HistoryStoreError {
    HistoryStoreError::Backend(err.to_string())
}

#[must_use]
pub fn history_key(id: CommandId) -> String { format!("{id:0width$}", width = KEY_WIDTH) }

impl HistoryStore for KvHistoryStore {
    #[tracing::instrument(skip(self))]
    fn next_sequence_id(&self) -> Result<CommandId, HistoryStoreError> {
        Ok(self.last_entry()?.map_or(0, |(id, _)| id + 1))
    }

    #[tracing::instrument(skip(self))]
    fn append(&self, line: &str) -> Result<CommandId, HistoryStoreError> {
        let _guard = self
            .append_lock
            .lock()
            .map_err(|_| HistoryStoreError::Backend("append lock poisoned".into()))?;
        let id = self.next_sequence_id()?;
        self.bucket
            .set(&history_key(id), &Json(line.to_string()))
            .map_err(backend_error)?;
        self.bucket.flush().map_err(backend_error)?;

        // % is Display, ? is Debug.
        tracing::debug!(message = "🔽 append command to history", id = %id);
        Ok(id)
    }

    #[tracing::instrument(skip(self))]
    fn find_last_matching(
        &self,
        before_id: CommandId,
        prefix: &str,
    ) -> Result<HistoryEntry, HistoryStoreError> {
        if before_id <= 0 {
            return Err(HistoryStoreError::NoMatch);
        }
        first_with_prefix(self.entries_in_range(0, before_id)?.rev(), prefix)
    }

    #[tracing::instrument(skip(self))]
    fn find_first_matching(
        &self,
        from_id: CommandId,
        prefix: &str,
    ) -> Result<HistoryEntry, HistoryStoreError> {
        first_with_prefix(self.entries_in_range(from_id, CommandId::MAX)?, prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    #[test]
    fn test_history_key_sorts_numerically() {
        assert_eq!(history_key(7), "00000000000000000007");
        assert!(history_key(10) > history_key(9));
    }

    #[test]
    #[serial]
    fn test_kv_store_append_and_lookup() -> miette::Result<()> {
        let root_temp_dir = tempfile::tempdir().into_diagnostic()?;
        let store = KvHistoryStore::open(root_temp_dir.path().join("history_db"))?;

        assert_eq!(store.next_sequence_id(), Ok(0));
        for line in ["ls", "cd /tmp", "ls -la"] {
            store.append(line).into_diagnostic()?;
        }
        assert_eq!(store.next_sequence_id(), Ok(3));

        assert_eq!(
            store.find_last_matching(3, "ls"),
            Ok(HistoryEntry {
                id: 2,
                line: "ls -la".into()
            })
        );
        assert_eq!(
            store.find_first_matching(1, "cd"),
            Ok(HistoryEntry {
                id: 1,
                line: "cd /tmp".into()
            })
        );
        assert_eq!(
            store.find_last_matching(0, ""),
            Err(HistoryStoreError::NoMatch)
        );
        Ok(())
    }

    #[test]
    #[serial]
    fn test_kv_store_lookups_respect_range_bounds() -> miette::Result<()> {
        let root_temp_dir = tempfile::tempdir().into_diagnostic()?;
        let store = KvHistoryStore::open(root_temp_dir.path().join("history_db"))?;
        for line in ["git status", "ls", "git log", "ls -la", "git diff"] {
            store.append(line).into_diagnostic()?;
        }

        // Newest match before the bound, skipping newer non matching lines.
        assert_eq!(
            store.find_last_matching(4, "git"),
            Ok(HistoryEntry {
                id: 2,
                line: "git log".into()
            })
        );
        assert_eq!(
            store.find_last_matching(2, "git"),
            Ok(HistoryEntry {
                id: 0,
                line: "git status".into()
            })
        );
        assert_eq!(
            store.find_last_matching(-3, ""),
            Err(HistoryStoreError::NoMatch)
        );

        // Oldest match at or after the bound.
        assert_eq!(
            store.find_first_matching(2, "git"),
            Ok(HistoryEntry {
                id: 2,
                line: "git log".into()
            })
        );
        assert_eq!(
            store.find_first_matching(3, "git"),
            Ok(HistoryEntry {
                id: 4,
                line: "git diff".into()
            })
        );
        assert_eq!(
            store.find_first_matching(5, ""),
            Err(HistoryStoreError::NoMatch)
        );
        Ok(())
    }

    #[test]
    #[serial]
    fn test_kv_store_append_reports_poisoned_lock() -> miette::Result<()> {
        let root_temp_dir = tempfile::tempdir().into_diagnostic()?;
        let store = KvHistoryStore::open(root_temp_dir.path().join("history_db"))?;

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = store.append_lock.lock().unwrap();
            panic!("poison the append lock");
        }));
        assert!(result.is_err());

        assert!(matches!(
            store.append("ls"),
            Err(HistoryStoreError::Backend(_))
        ));
        assert_eq!(store.next_sequence_id(), Ok(0));
        Ok(())
    }

    #[test]
    #[serial]
    fn test_kv_store_survives_reopen() -> miette::Result<()> {
        let root_temp_dir = tempfile::tempdir().into_diagnostic()?;
        let path = root_temp_dir.path().join("history_db");

        {
            let store = KvHistoryStore::open(&path)?;
            store.append("make test").into_diagnostic()?;
        }

        let store = KvHistoryStore::open(&path)?;
        assert_eq!(store.next_sequence_id(), Ok(1));
        assert_eq!(
            store.find_first_matching(0, "make"),
            Ok(HistoryEntry {
                id: 0,
                line: "make test".into()
            })
        );
        Ok(())
    }
}
