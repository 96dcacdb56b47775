// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CompletionOverlay, NavigationOverlay};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// The interaction modes. Every read starts in [`Mode::Insert`]. Transitions only happen
/// inside dispatched builtins, see [`crate::Builtin`].
///
/// ```text
///            Esc               Tab / Ctrl+N / Up
///  Command ◀──────── Insert ─────────────────────▶ Completion | Navigation | History
///          ─────────▶       ◀─────────────────────
///           i, a, Enter          accept / cancel
/// ```
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Insert,
    Command,
    Completion,
    Navigation,
    History,
}

/// Transient sub-state of [`Mode::Completion`] or [`Mode::Navigation`]. Keeping both in
/// one [`Option`] means the two can never be present together.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Overlay {
    Completion(CompletionOverlay),
    Navigation(NavigationOverlay),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_mode_names_round_trip() {
        for mode in Mode::iter() {
            assert_eq!(Mode::from_str(&mode.to_string()), Ok(mode));
        }
        assert_eq!(Mode::from_str("NAVIGATION"), Ok(Mode::Navigation));
    }

    #[test]
    fn test_mode_serde_names() {
        let json = serde_json::to_string(&Mode::History).unwrap();
        assert_eq!(json, "\"history\"");
    }
}
