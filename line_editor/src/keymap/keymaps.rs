// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{BUILTINS, Editor, KeyPress, LineRead, Mode, SpecialKey};
use std::{collections::HashMap, fmt};

/// What the event loop does once a [`Builtin`] returns.
#[derive(Debug)]
pub enum NextAction {
    /// Wait for the next event.
    NoAction,
    /// Refresh, then dispatch the same key again against the (possibly new) mode.
    ReprocessKey,
    /// End the read with this result.
    ExitReadLine(LineRead),
}

/// A named editing action. The name is what configuration files refer to.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: fn(&mut Editor) -> NextAction,
}

impl Builtin {
    #[must_use]
    pub fn by_name(name: &str) -> Option<Builtin> {
        BUILTINS.iter().find(|it| it.name == name).copied()
    }

    pub fn call(&self, editor: &mut Editor) -> NextAction { (self.func)(editor) }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool { self.name == other.name }
}

impl Eq for Builtin {}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModeKeymap {
    pub bindings: HashMap<KeyPress, Builtin>,
    /// Runs for any key without an entry in `bindings`.
    pub default: Option<Builtin>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyLookup {
    /// The mode has no table at all.
    NoTable,
    /// The mode has a table, but neither the key nor a default is bound.
    Unbound,
    Found(Builtin),
}

/// Mode → key → [`Builtin`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Keymaps {
    pub modes: HashMap<Mode, ModeKeymap>,
}

impl Default for Keymaps {
    fn default() -> Self { Self::with_defaults() }
}

impl Keymaps {
    /// No tables for any mode.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            modes: HashMap::new(),
        }
    }

    /// Emacs style bindings in [`Mode::Insert`], vi style motions in
    /// [`Mode::Command`], arrows / `Enter` / `Esc` in the other modes.
    #[must_use]
    pub fn with_defaults() -> Self {
        use SpecialKey::{BackTab, Backspace, Delete, Down, End, Enter, Esc, Home, Left,
                         Right, Tab, Up};

        let mut it = Self::empty();
        let special = KeyPress::from_special;

        // Insert.
        for (key, name) in [
            (special(Backspace), "kill-rune-left"),
            (special(Delete), "kill-rune-right"),
            (KeyPress::ctrl('u'), "kill-line-left"),
            (KeyPress::ctrl('k'), "kill-line-right"),
            (KeyPress::ctrl('w'), "kill-word-left"),
            (special(Left), "move-dot-left"),
            (special(Right), "move-dot-right"),
            (special(Home), "move-dot-sol"),
            (KeyPress::ctrl('a'), "move-dot-sol"),
            (special(End), "move-dot-eol"),
            (KeyPress::ctrl('e'), "move-dot-eol"),
            (special(Enter), "return-line"),
            (KeyPress::ctrl('d'), "return-eof"),
            (special(Esc), "start-command"),
            (special(Tab), "start-completion"),
            (KeyPress::ctrl('n'), "start-navigation"),
            (special(Up), "start-history"),
        ] {
            it.bind_by_name(Mode::Insert, key, name);
        }
        it.set_default_by_name(Mode::Insert, "insert-default");

        // Command.
        for (key, name) in [
            (KeyPress::from_char('h'), "move-dot-left"),
            (special(Left), "move-dot-left"),
            (KeyPress::from_char('l'), "move-dot-right"),
            (special(Right), "move-dot-right"),
            (KeyPress::from_char('0'), "move-dot-sol"),
            (KeyPress::from_char('$'), "move-dot-eol"),
            (KeyPress::from_char('x'), "kill-rune-right"),
            (KeyPress::from_char('i'), "start-insert"),
            (KeyPress::from_char('a'), "start-insert-after"),
            (special(Enter), "return-line"),
            (KeyPress::ctrl('d'), "return-eof"),
        ] {
            it.bind_by_name(Mode::Command, key, name);
        }
        it.set_default_by_name(Mode::Command, "default-command");

        // Completion.
        for (key, name) in [
            (special(Tab), "select-cand-next"),
            (special(Down), "select-cand-next"),
            (special(BackTab), "select-cand-prev"),
            (special(Up), "select-cand-prev"),
            (special(Enter), "accept-completion"),
            (special(Esc), "cancel-completion"),
        ] {
            it.bind_by_name(Mode::Completion, key, name);
        }
        it.set_default_by_name(Mode::Completion, "default-completion");

        // Navigation.
        for (key, name) in [
            (special(Up), "select-nav-prev"),
            (special(Down), "select-nav-next"),
            (special(Left), "ascend-nav"),
            (special(Right), "descend-nav"),
            (special(Enter), "accept-navigation"),
            (special(Esc), "cancel-navigation"),
        ] {
            it.bind_by_name(Mode::Navigation, key, name);
        }
        it.set_default_by_name(Mode::Navigation, "default-navigation");

        // History.
        for (key, name) in [
            (special(Up), "history-prev"),
            (special(Down), "history-next"),
            (special(Esc), "cancel-history"),
        ] {
            it.bind_by_name(Mode::History, key, name);
        }
        it.set_default_by_name(Mode::History, "default-history");

        it
    }

    pub fn bind(&mut self, mode: Mode, key: KeyPress, builtin: Builtin) {
        self.modes
            .entry(mode)
            .or_default()
            .bindings
            .insert(key, builtin);
    }

    pub fn set_default(&mut self, mode: Mode, builtin: Builtin) {
        self.modes.entry(mode).or_default().default = Some(builtin);
    }

    pub fn remove_mode(&mut self, mode: Mode) -> Option<ModeKeymap> {
        self.modes.remove(&mode)
    }

    #[must_use]
    pub fn get(&self, mode: Mode) -> Option<&ModeKeymap> { self.modes.get(&mode) }

    /// The exact binding for `key` in `mode`, else the mode's default.
    #[must_use]
    pub fn lookup(&self, mode: Mode, key: &KeyPress) -> KeyLookup {
        let Some(table) = self.modes.get(&mode) else {
            return KeyLookup::NoTable;
        };
        match table.bindings.get(key).or(table.default.as_ref()) {
            Some(builtin) => KeyLookup::Found(*builtin),
            None => KeyLookup::Unbound,
        }
    }

    // The default tables only name builtins from BUILTINS.
    fn bind_by_name(&mut self, mode: Mode, key: KeyPress, name: &str) {
        if let Some(builtin) = Builtin::by_name(name) {
            self.bind(mode, key, builtin);
        }
    }

    fn set_default_by_name(&mut self, mode: Mode, name: &str) {
        if let Some(builtin) = Builtin::by_name(name) {
            self.set_default(mode, builtin);
        }
    }
}
