// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fs, path::Path};

/// A completion candidate. `text` is inserted at dot when the candidate is accepted,
/// `display` is what the list shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub text: String,
    pub display: String,
}

impl Candidate {
    #[must_use]
    pub fn new(text: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            display: display.into(),
        }
    }
}

/// Produces completion candidates for the word that ends at `dot`.
pub trait CompletionProvider: Send {
    fn complete(&self, line: &str, dot: usize) -> Vec<Candidate>;
}

/// The candidate list shown while in [`crate::Mode::Completion`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionOverlay {
    pub candidates: Vec<Candidate>,
    pub current: usize,
}

impl CompletionOverlay {
    /// `None` when there is nothing to choose from.
    #[must_use]
    pub fn new(candidates: Vec<Candidate>) -> Option<Self> {
        if candidates.is_empty() {
            None
        } else {
            Some(Self {
                candidates,
                current: 0,
            })
        }
    }

    #[must_use]
    pub fn selected(&self) -> Option<&Candidate> { self.candidates.get(self.current) }

    pub fn select_next(&mut self) {
        self.current = (self.current + 1) % self.candidates.len().max(1);
    }

    pub fn select_prev(&mut self) {
        let len = self.candidates.len().max(1);
        self.current = (self.current + len - 1) % len;
    }
}

/// Completes the last word before dot as a path, relative to the current working
/// directory (or absolute). Hidden entries only show up once the word starts with a
/// `.`. Folders get a trailing `/`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilenameCompleter;

impl CompletionProvider for FilenameCompleter {
    fn complete(&self, line: &str, dot: usize) -> Vec<Candidate> {
        let head = line.get(..dot).unwrap_or(line);
        let word = head
            .rsplit(|ch: char| ch.is_whitespace() || ch == '|' || ch == ';')
            .next()
            .unwrap_or("");

        let (dir_part, name_prefix) = match word.rfind('/') {
            Some(index) => (&word[..=index], &word[index + 1..]),
            None => ("", word),
        };
        let dir = if dir_part.is_empty() {
            Path::new(".")
        } else {
            Path::new(dir_part)
        };

        let Ok(read_dir) = fs::read_dir(dir) else {
            return vec![];
        };

        let mut acc: Vec<Candidate> = read_dir
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                if !name.starts_with(name_prefix)
                    || (name.starts_with('.') && !name_prefix.starts_with('.'))
                {
                    return None;
                }
                let is_dir = entry.path().is_dir();
                let suffix = if is_dir { "/" } else { "" };
                Some(Candidate::new(
                    format!("{}{suffix}", &name[name_prefix.len()..]),
                    format!("{name}{suffix}"),
                ))
            })
            .collect();
        acc.sort_by(|a, b| a.display.cmp(&b.display));
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_overlay_selection_wraps() {
        let mut overlay = CompletionOverlay::new(vec![
            Candidate::new("a", "a"),
            Candidate::new("b", "b"),
        ])
        .unwrap();

        overlay.select_prev();
        assert_eq!(overlay.selected().unwrap().text, "b");
        overlay.select_next();
        assert_eq!(overlay.selected().unwrap().text, "a");
    }

    #[test]
    fn test_empty_overlay_is_none() {
        assert_eq!(CompletionOverlay::new(vec![]), None);
    }

    #[test]
    fn test_filename_completer_in_folder() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("foo.txt"), "").unwrap();
        fs::write(dir.path().join("food.txt"), "").unwrap();
        fs::write(dir.path().join(".hidden"), "").unwrap();
        fs::create_dir(dir.path().join("folder")).unwrap();

        let line = format!("cat {}/fo", dir.path().display());
        let candidates = FilenameCompleter.complete(&line, line.len());

        assert_eq!(
            candidates,
            vec![
                Candidate::new("lder/", "folder/"),
                Candidate::new("o.txt", "foo.txt"),
                Candidate::new("od.txt", "food.txt"),
            ]
        );
    }

    #[test]
    fn test_filename_completer_hidden_needs_dot() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".hidden"), "").unwrap();

        let line = format!("ls {}/", dir.path().display());
        assert!(FilenameCompleter.complete(&line, line.len()).is_empty());

        let line = format!("ls {}/.", dir.path().display());
        assert_eq!(
            FilenameCompleter.complete(&line, line.len()),
            vec![Candidate::new("hidden", ".hidden")]
        );
    }
}
