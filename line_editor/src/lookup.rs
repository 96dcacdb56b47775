// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Resolving command names to executables, for command head colouring.

use std::{collections::HashSet,
          ffi::OsString,
          fs,
          path::Path};

/// Finds the names of the commands that can be run from the search path. Runs once per
/// read on a blocking thread, see [`crate::Editor::read_line()`].
pub trait ExecutableLookup: Send + Sync + 'static {
    fn executable_names(&self) -> HashSet<String>;
}

/// Scans every folder of a `PATH`-style search path.
#[derive(Debug, Clone, Default)]
pub struct PathLookup {
    /// `None` reads `$PATH` at lookup time.
    search_path: Option<OsString>,
}

impl PathLookup {
    #[must_use]
    pub fn from_env() -> Self { Self::default() }

    #[must_use]
    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }
}

impl ExecutableLookup for PathLookup {
    fn executable_names(&self) -> HashSet<String> {
        let Some(search_path) = self
            .search_path
            .clone()
            .or_else(|| std::env::var_os("PATH"))
        else {
            return HashSet::new();
        };

        let mut acc = HashSet::new();
        for dir in std::env::split_paths(&search_path) {
            let Ok(read_dir) = fs::read_dir(&dir) else {
                continue;
            };
            for entry in read_dir.flatten() {
                let path = entry.path();
                if path.is_file() && is_executable_path(&path) {
                    acc.insert(entry.file_name().to_string_lossy().to_string());
                }
            }
        }
        tracing::debug!(message = "executable lookup done", count = acc.len());
        acc
    }
}

/// Whether `path` is a folder, or a file that the current user could run.
#[must_use]
pub fn is_executable_path(path: &Path) -> bool {
    let Ok(metadata) = fs::metadata(path) else {
        return false;
    };
    if metadata.is_dir() {
        return true;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.is_file() && metadata.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        metadata.is_file()
    }
}
