// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::{fmt, str::FromStr};
use strum_macros::{Display, EnumString};
use thiserror::Error;

/// Equivalent of [`crossterm::event::KeyEvent`] with the impossible states removed. It
/// is what key bindings are keyed by, so it is [`Hash`] and parses from the chords used
/// in the config file (eg: `ctrl+r`, `alt+b`, `up`, `f5`), see [`FromStr`].
///
/// Shift is folded into the character for [`Key::Character`] keys, so `A` is a plain
/// key press and `shift+a` parses to the same value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyPress {
    pub key: Key,
    pub mask: ModifierKeysMask,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Character(char),
    SpecialKey(SpecialKey),
    /// `F1` .. `F24`.
    FunctionKey(u8),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SpecialKey {
    Backspace,
    Enter,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Tab,
    BackTab,
    Delete,
    Insert,
    #[strum(to_string = "esc", serialize = "escape")]
    Esc,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ModifierKeysMask {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl ModifierKeysMask {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    #[must_use]
    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    #[must_use]
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool { !self.ctrl && !self.alt && !self.shift }
}

impl KeyPress {
    #[must_use]
    pub fn new(key: Key, mask: ModifierKeysMask) -> Self {
        let mask = match key {
            Key::Character(_) => ModifierKeysMask {
                shift: false,
                ..mask
            },
            _ => mask,
        };
        Self { key, mask }
    }

    #[must_use]
    pub fn from_char(ch: char) -> Self {
        Self::new(Key::Character(ch), ModifierKeysMask::new())
    }

    #[must_use]
    pub fn from_special(special_key: SpecialKey) -> Self {
        Self::new(Key::SpecialKey(special_key), ModifierKeysMask::new())
    }

    #[must_use]
    pub fn ctrl(ch: char) -> Self {
        Self::new(Key::Character(ch), ModifierKeysMask::new().with_ctrl())
    }

    #[must_use]
    pub fn alt(ch: char) -> Self {
        Self::new(Key::Character(ch), ModifierKeysMask::new().with_alt())
    }

    /// The character to insert into the buffer, if this key press is plain text.
    #[must_use]
    pub fn printable_char(&self) -> Option<char> {
        match self.key {
            Key::Character(ch) if !self.mask.ctrl && !self.mask.alt && !ch.is_control() => {
                Some(ch)
            }
            _ => None,
        }
    }
}

impl fmt::Display for KeyPress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mask.ctrl {
            write!(f, "ctrl+")?;
        }
        if self.mask.alt {
            write!(f, "alt+")?;
        }
        if self.mask.shift {
            write!(f, "shift+")?;
        }
        match self.key {
            Key::Character(' ') => write!(f, "space"),
            Key::Character(ch) => write!(f, "{ch}"),
            Key::SpecialKey(special_key) => write!(f, "{special_key}"),
            Key::FunctionKey(n) => write!(f, "f{n}"),
        }
    }
}

#[derive(Debug, Error, miette::Diagnostic, PartialEq, Eq)]
pub enum KeyParseError {
    #[error("empty key chord")]
    #[diagnostic(code(line_editor::keymap::empty_chord))]
    Empty,

    #[error("key chord `{0}` names more than one key")]
    #[diagnostic(code(line_editor::keymap::multiple_keys))]
    MultipleKeys(String),

    #[error("key chord `{0}` has modifiers but no key")]
    #[diagnostic(code(line_editor::keymap::missing_key))]
    MissingKey(String),

    #[error("unknown key `{0}`")]
    #[diagnostic(
        code(line_editor::keymap::unknown_key),
        help("use a single character, f1..f24, space, or a key name like `up`, `esc`, `backtab`")
    )]
    UnknownKey(String),
}

impl FromStr for KeyPress {
    type Err = KeyParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(KeyParseError::Empty);
        }

        // `+` on its own (or as the last part, eg: `ctrl++`) is the plus key.
        let (modifiers, key_part) = match trimmed.strip_suffix("++") {
            Some(rest) => (rest, "+"),
            None if trimmed == "+" => ("", "+"),
            None => match trimmed.rsplit_once('+') {
                Some((modifiers, key)) => (modifiers, key),
                None => ("", trimmed),
            },
        };

        let mut mask = ModifierKeysMask::new();
        for part in modifiers.split('+').map(str::trim).filter(|it| !it.is_empty()) {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => mask.ctrl = true,
                "alt" | "meta" | "option" => mask.alt = true,
                "shift" => mask.shift = true,
                _ => return Err(KeyParseError::MultipleKeys(trimmed.to_string())),
            }
        }

        let key_part = key_part.trim();
        if key_part.is_empty() {
            return Err(KeyParseError::MissingKey(trimmed.to_string()));
        }

        Ok(KeyPress::new(parse_key(key_part)?, mask))
    }
}

fn parse_key(input: &str) -> Result<Key, KeyParseError> {
    let mut chars = input.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        return Ok(Key::Character(ch));
    }

    let lower = input.to_lowercase();
    if lower == "space" {
        return Ok(Key::Character(' '));
    }
    if let Some(Ok(n)) = lower.strip_prefix('f').map(str::parse::<u8>)
        && (1..=24).contains(&n)
    {
        return Ok(Key::FunctionKey(n));
    }

    SpecialKey::from_str(&lower)
        .map(Key::SpecialKey)
        .map_err(|_| KeyParseError::UnknownKey(input.to_string()))
}

/// Only key presses are converted, releases and repeats are dropped.
impl TryFrom<KeyEvent> for KeyPress {
    type Error = ();

    fn try_from(key_event: KeyEvent) -> Result<Self, Self::Error> {
        if key_event.kind != KeyEventKind::Press {
            return Err(());
        }

        let mask = ModifierKeysMask {
            ctrl: key_event.modifiers.contains(KeyModifiers::CONTROL),
            alt: key_event.modifiers.contains(KeyModifiers::ALT),
            shift: key_event.modifiers.contains(KeyModifiers::SHIFT),
        };

        let key = match key_event.code {
            KeyCode::Char(ch) => Key::Character(ch),
            KeyCode::F(n) => Key::FunctionKey(n),
            KeyCode::Backspace => Key::SpecialKey(SpecialKey::Backspace),
            KeyCode::Enter => Key::SpecialKey(SpecialKey::Enter),
            KeyCode::Left => Key::SpecialKey(SpecialKey::Left),
            KeyCode::Right => Key::SpecialKey(SpecialKey::Right),
            KeyCode::Up => Key::SpecialKey(SpecialKey::Up),
            KeyCode::Down => Key::SpecialKey(SpecialKey::Down),
            KeyCode::Home => Key::SpecialKey(SpecialKey::Home),
            KeyCode::End => Key::SpecialKey(SpecialKey::End),
            KeyCode::PageUp => Key::SpecialKey(SpecialKey::PageUp),
            KeyCode::PageDown => Key::SpecialKey(SpecialKey::PageDown),
            KeyCode::Tab => Key::SpecialKey(SpecialKey::Tab),
            // Crossterm reports shift+tab as BackTab with the shift modifier set.
            KeyCode::BackTab => {
                return Ok(KeyPress::new(
                    Key::SpecialKey(SpecialKey::BackTab),
                    ModifierKeysMask { shift: false, ..mask },
                ));
            }
            KeyCode::Delete => Key::SpecialKey(SpecialKey::Delete),
            KeyCode::Insert => Key::SpecialKey(SpecialKey::Insert),
            KeyCode::Esc => Key::SpecialKey(SpecialKey::Esc),
            _ => return Err(()),
        };

        Ok(KeyPress::new(key, mask))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("ctrl+r", KeyPress::ctrl('r'); "ctrl char")]
    #[test_case("Alt+b", KeyPress::alt('b'); "alt char mixed case")]
    #[test_case("up", KeyPress::from_special(SpecialKey::Up); "special")]
    #[test_case("ESCAPE", KeyPress::from_special(SpecialKey::Esc); "escape alias")]
    #[test_case("backtab", KeyPress::from_special(SpecialKey::BackTab); "backtab")]
    #[test_case("pageup", KeyPress::from_special(SpecialKey::PageUp); "page up")]
    #[test_case("shift+A", KeyPress::from_char('A'); "shift folded into char")]
    #[test_case("space", KeyPress::from_char(' '); "space")]
    #[test_case("$", KeyPress::from_char('$'); "symbol")]
    #[test_case("+", KeyPress::from_char('+'); "plus")]
    #[test_case("ctrl++", KeyPress::ctrl('+'); "ctrl plus")]
    #[test_case(
        "f5",
        KeyPress::new(Key::FunctionKey(5), ModifierKeysMask::new());
        "function key"
    )]
    fn test_parse_key_chord(input: &str, expected: KeyPress) {
        assert_eq!(input.parse::<KeyPress>(), Ok(expected));
    }

    #[test_case("", KeyParseError::Empty; "empty")]
    #[test_case("ctrl+", KeyParseError::MissingKey("ctrl+".into()); "missing key")]
    #[test_case("a+b", KeyParseError::MultipleKeys("a+b".into()); "two keys")]
    #[test_case("hyper", KeyParseError::UnknownKey("hyper".into()); "unknown name")]
    #[test_case("f25", KeyParseError::UnknownKey("f25".into()); "function key out of range")]
    fn test_parse_key_chord_errors(input: &str, expected: KeyParseError) {
        assert_eq!(input.parse::<KeyPress>(), Err(expected));
    }

    #[test]
    fn test_display_parses_back() {
        for key_press in [
            KeyPress::ctrl('a'),
            KeyPress::alt(' '),
            KeyPress::from_special(SpecialKey::Esc),
            KeyPress::new(
                Key::SpecialKey(SpecialKey::Left),
                ModifierKeysMask::new().with_shift(),
            ),
        ] {
            assert_eq!(key_press.to_string().parse::<KeyPress>(), Ok(key_press));
        }
    }

    #[test]
    fn test_convert_crossterm_key_event() {
        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(KeyPress::try_from(event), Ok(KeyPress::ctrl('c')));

        let event = KeyEvent::new(KeyCode::Char('Q'), KeyModifiers::SHIFT);
        assert_eq!(KeyPress::try_from(event), Ok(KeyPress::from_char('Q')));

        let event = KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT);
        assert_eq!(
            KeyPress::try_from(event),
            Ok(KeyPress::from_special(SpecialKey::BackTab))
        );

        let mut release = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(KeyPress::try_from(release), Err(()));
    }

    #[test]
    fn test_printable_char() {
        assert_eq!(KeyPress::from_char('x').printable_char(), Some('x'));
        assert_eq!(KeyPress::ctrl('x').printable_char(), None);
        assert_eq!(KeyPress::from_special(SpecialKey::Tab).printable_char(), None);
    }
}
