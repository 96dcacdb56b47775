// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{Candidate, CompletionProvider, ExecutableLookup, NavEntry, NavigationProvider};
use std::{collections::{HashMap, HashSet},
          io,
          path::{Path, PathBuf}};

/// Offers the same candidates wherever dot is.
#[derive(Debug, Clone, Default)]
pub struct FixedCompleter {
    pub candidates: Vec<Candidate>,
}

impl CompletionProvider for FixedCompleter {
    fn complete(&self, _line: &str, _dot: usize) -> Vec<Candidate> {
        self.candidates.clone()
    }
}

/// A folder tree held in memory.
#[derive(Debug, Clone)]
pub struct MemoryNavigator {
    pub start: PathBuf,
    pub folders: HashMap<PathBuf, Vec<NavEntry>>,
}

impl MemoryNavigator {
    /// ```text
    /// /
    /// └── project/      (start)
    ///     ├── src/
    ///     │   └── main.rs
    ///     └── README.md
    /// ```
    #[must_use]
    pub fn new_project() -> Self {
        let folders = HashMap::from([
            (PathBuf::from("/"), vec![NavEntry::dir("project")]),
            (
                PathBuf::from("/project"),
                vec![NavEntry::dir("src"), NavEntry::file("README.md")],
            ),
            (PathBuf::from("/project/src"), vec![NavEntry::file("main.rs")]),
        ]);
        Self {
            start: PathBuf::from("/project"),
            folders,
        }
    }
}

impl NavigationProvider for MemoryNavigator {
    fn list(&self, dir: &Path) -> io::Result<Vec<NavEntry>> {
        self.folders.get(dir).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{}", dir.display()))
        })
    }

    fn start_dir(&self) -> io::Result<PathBuf> { Ok(self.start.clone()) }
}

#[derive(Debug, Clone, Default)]
pub struct FixedLookup {
    pub names: HashSet<String>,
}

impl FixedLookup {
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl ExecutableLookup for FixedLookup {
    fn executable_names(&self) -> HashSet<String> { self.names.clone() }
}
