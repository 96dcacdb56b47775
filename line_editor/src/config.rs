// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Editor settings read from a JSON file.
//!
//! ```json
//! {
//!   "history_store_path": "/home/me/.local/share/line_editor/history",
//!   "log_file": "/tmp/line_editor_log.txt",
//!   "log_level": "debug",
//!   "bindings": {
//!     "insert": { "ctrl+b": "move-dot-left", "ctrl+f": "move-dot-right" },
//!     "command": { "default": "start-insert" }
//!   }
//! }
//! ```
//!
//! Every field is optional. In `bindings`, the chord `default` sets the binding used
//! for keys that are not bound in that mode.

use crate::{Builtin, KeyParseError, KeyPress, Keymaps, Mode, parse_level_filter};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::{Path, PathBuf}};
use thiserror::Error;
use tracing_core::LevelFilter;

/// Chord that names a mode's default binding in [`EditorConfig::bindings`].
pub const DEFAULT_BINDING_CHORD: &str = "default";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Folder of the persistent history store. No store when absent.
    pub history_store_path: Option<PathBuf>,
    pub log_file: Option<String>,
    pub log_level: Option<String>,
    /// Mode → chord → builtin name.
    pub bindings: HashMap<Mode, HashMap<String, String>>,
}

#[derive(Debug, Error, miette::Diagnostic)]
pub enum ConfigError {
    #[error("can't read config file '{path}'")]
    #[diagnostic(code(line_editor::config::read))]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("can't parse config file '{path}'")]
    #[diagnostic(code(line_editor::config::parse), help("the file must be a JSON object"))]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("bad key chord '{chord}' in {mode} mode bindings")]
    #[diagnostic(
        code(line_editor::config::chord),
        help("chords look like `ctrl+r`, `alt+b`, `up`, `f5` or `default`")
    )]
    BadChord {
        mode: Mode,
        chord: String,
        #[source]
        source: KeyParseError,
    },

    #[error("unknown builtin '{name}' bound to '{chord}' in {mode} mode")]
    #[diagnostic(code(line_editor::config::builtin))]
    UnknownBuiltin {
        mode: Mode,
        chord: String,
        name: String,
    },

    #[error("bad log level '{0}'")]
    #[diagnostic(
        code(line_editor::config::log_level),
        help("use one of off, error, warn, info, debug, trace")
    )]
    BadLogLevel(String),
}

impl EditorConfig {
    /// # Errors
    ///
    /// Returns an error if the file can't be read or is not valid JSON for this type.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!(message = "config loaded", path = %path.display());
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error if `text` is not valid JSON for this type.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Add the configured bindings to `keymaps`, replacing existing ones for the same
    /// chord. Nothing is changed if any binding is invalid.
    ///
    /// # Errors
    ///
    /// Returns an error for the first chord that doesn't parse, or builtin name that
    /// doesn't exist.
    pub fn apply_bindings(&self, keymaps: &mut Keymaps) -> Result<(), ConfigError> {
        let mut resolved = vec![];
        for (mode, table) in &self.bindings {
            for (chord, name) in table {
                let builtin =
                    Builtin::by_name(name).ok_or_else(|| ConfigError::UnknownBuiltin {
                        mode: *mode,
                        chord: chord.clone(),
                        name: name.clone(),
                    })?;
                let key = if chord.trim() == DEFAULT_BINDING_CHORD {
                    None
                } else {
                    let key = chord.parse::<KeyPress>().map_err(|source| {
                        ConfigError::BadChord {
                            mode: *mode,
                            chord: chord.clone(),
                            source,
                        }
                    })?;
                    Some(key)
                };
                resolved.push((*mode, key, builtin));
            }
        }

        for (mode, key, builtin) in resolved {
            match key {
                Some(key) => keymaps.bind(mode, key, builtin),
                None => keymaps.set_default(mode, builtin),
            }
        }
        Ok(())
    }

    /// The configured log level, or `fallback` when there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured level is not a level name.
    pub fn level_filter_or(&self, fallback: LevelFilter) -> Result<LevelFilter, ConfigError> {
        match &self.log_level {
            Some(level) => parse_level_filter(level).map_err(ConfigError::BadLogLevel),
            None => Ok(fallback),
        }
    }
}
