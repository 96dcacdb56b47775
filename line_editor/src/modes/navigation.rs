// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fs, io,
          path::{Path, PathBuf}};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavEntry {
    pub name: String,
    pub is_dir: bool,
}

impl NavEntry {
    #[must_use]
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }

    #[must_use]
    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }
}

/// Lists folders for [`crate::Mode::Navigation`].
pub trait NavigationProvider: Send {
    /// Entries of `dir`, in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` can't be read.
    fn list(&self, dir: &Path) -> io::Result<Vec<NavEntry>>;

    /// The folder navigation starts from.
    ///
    /// # Errors
    ///
    /// Returns an error if the current working directory is not accessible.
    fn start_dir(&self) -> io::Result<PathBuf> { std::env::current_dir() }
}

/// The file system browser shown while in [`crate::Mode::Navigation`]. Moving around
/// never changes the process's working directory: `dir` is tracked here, and accepting
/// an entry inserts its path relative to `start_dir`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationOverlay {
    pub start_dir: PathBuf,
    pub dir: PathBuf,
    pub entries: Vec<NavEntry>,
    pub current: usize,
}

impl NavigationOverlay {
    /// # Errors
    ///
    /// Returns an error if the start folder can't be listed.
    pub fn new(provider: &dyn NavigationProvider) -> io::Result<Self> {
        let start_dir = provider.start_dir()?;
        let entries = provider.list(&start_dir)?;
        Ok(Self {
            dir: start_dir.clone(),
            start_dir,
            entries,
            current: 0,
        })
    }

    #[must_use]
    pub fn selected(&self) -> Option<&NavEntry> { self.entries.get(self.current) }

    pub fn select_prev(&mut self) { self.current = self.current.saturating_sub(1); }

    pub fn select_next(&mut self) {
        if self.current + 1 < self.entries.len() {
            self.current += 1;
        }
    }

    /// Go into the selected folder. Returns `Ok(false)` if the selection is not a
    /// folder.
    ///
    /// # Errors
    ///
    /// Returns an error if the folder can't be listed, in which case nothing changes.
    pub fn descend(&mut self, provider: &dyn NavigationProvider) -> io::Result<bool> {
        let Some(entry) = self.selected().filter(|it| it.is_dir) else {
            return Ok(false);
        };
        let dir = self.dir.join(&entry.name);
        self.entries = provider.list(&dir)?;
        self.dir = dir;
        self.current = 0;
        Ok(true)
    }

    /// Go to the parent folder, with the folder we came from selected. Returns
    /// `Ok(false)` at the root.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent can't be listed, in which case nothing changes.
    pub fn ascend(&mut self, provider: &dyn NavigationProvider) -> io::Result<bool> {
        let Some(parent) = self.dir.parent().map(Path::to_path_buf) else {
            return Ok(false);
        };
        let came_from = self
            .dir
            .file_name()
            .map(|it| it.to_string_lossy().to_string());
        self.entries = provider.list(&parent)?;
        self.current = came_from
            .and_then(|name| self.entries.iter().position(|it| it.name == name))
            .unwrap_or(0);
        self.dir = parent;
        Ok(true)
    }

    /// Path of the selected entry, relative to `start_dir` when it is inside it.
    /// Folders get a trailing `/`.
    #[must_use]
    pub fn selected_path(&self) -> Option<String> {
        let entry = self.selected()?;
        let full = self.dir.join(&entry.name);
        let path = full.strip_prefix(&self.start_dir).unwrap_or(&full);
        let suffix = if entry.is_dir { "/" } else { "" };
        Some(format!("{}{suffix}", path.display()))
    }
}

/// Lists folders on disk: folders first, then files, each sorted by name. Hidden
/// entries are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsNavigationProvider;

impl NavigationProvider for FsNavigationProvider {
    fn list(&self, dir: &Path) -> io::Result<Vec<NavEntry>> {
        let mut acc = vec![];
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }
            acc.push(NavEntry {
                name,
                is_dir: entry.path().is_dir(),
            });
        }
        acc.sort_by(|a, b| b.is_dir.cmp(&a.is_dir).then_with(|| a.name.cmp(&b.name)));
        Ok(acc)
    }
}
