// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The editing actions that key presses are bound to. Each one is a plain function of
//! the [`Editor`], registered by name in [`BUILTINS`].

use crate::{Builtin, CompletionOverlay, Editor, HistoryCursor, LineRead, Mode,
            NO_COMPLETION_TIP, NO_MATCHING_HISTORY_TIP, NavigationOverlay, NextAction,
            Overlay};

macro_rules! builtin {
    ($name:literal, $func:ident) => {
        Builtin {
            name: $name,
            func: $func,
        }
    };
}

pub static BUILTINS: &[Builtin] = &[
    // Insert.
    builtin!("insert-default", insert_default),
    builtin!("kill-rune-left", kill_rune_left),
    builtin!("kill-rune-right", kill_rune_right),
    builtin!("kill-line-left", kill_line_left),
    builtin!("kill-line-right", kill_line_right),
    builtin!("kill-word-left", kill_word_left),
    builtin!("move-dot-left", move_dot_left),
    builtin!("move-dot-right", move_dot_right),
    builtin!("move-dot-sol", move_dot_sol),
    builtin!("move-dot-eol", move_dot_eol),
    builtin!("return-line", return_line),
    builtin!("return-eof", return_eof),
    builtin!("start-command", start_command),
    builtin!("start-completion", start_completion),
    builtin!("start-navigation", start_navigation),
    builtin!("start-history", start_history),
    // Command.
    builtin!("start-insert", start_insert),
    builtin!("start-insert-after", start_insert_after),
    builtin!("default-command", default_command),
    // Completion.
    builtin!("select-cand-next", select_cand_next),
    builtin!("select-cand-prev", select_cand_prev),
    builtin!("accept-completion", accept_completion),
    builtin!("cancel-completion", cancel_completion),
    builtin!("default-completion", default_completion),
    // Navigation.
    builtin!("select-nav-prev", select_nav_prev),
    builtin!("select-nav-next", select_nav_next),
    builtin!("ascend-nav", ascend_nav),
    builtin!("descend-nav", descend_nav),
    builtin!("accept-navigation", accept_navigation),
    builtin!("cancel-navigation", cancel_navigation),
    builtin!("default-navigation", default_navigation),
    // History.
    builtin!("history-prev", history_prev),
    builtin!("history-next", history_next),
    builtin!("accept-history", accept_history),
    builtin!("cancel-history", cancel_history),
    builtin!("default-history", default_history),
];

fn push_unbound_tip(ed: &mut Editor) {
    if let Some(key) = ed.state.last_key {
        ed.state.push_tip(format!("unbound key {key}"));
    }
}

// Insert mode.

fn insert_default(ed: &mut Editor) -> NextAction {
    match ed.state.last_key.and_then(|it| it.printable_char()) {
        Some(ch) => {
            let mut buf = [0; 4];
            ed.state.insert_at_dot(ch.encode_utf8(&mut buf));
        }
        None => push_unbound_tip(ed),
    }
    NextAction::NoAction
}

fn kill_rune_left(ed: &mut Editor) -> NextAction {
    if let Some(start) = ed.state.prev_grapheme_start() {
        ed.state.kill(start..ed.state.dot);
    }
    NextAction::NoAction
}

fn kill_rune_right(ed: &mut Editor) -> NextAction {
    if let Some(end) = ed.state.next_grapheme_end() {
        ed.state.kill(ed.state.dot..end);
    }
    NextAction::NoAction
}

fn kill_line_left(ed: &mut Editor) -> NextAction {
    let start = ed.state.sol();
    ed.state.kill(start..ed.state.dot);
    NextAction::NoAction
}

fn kill_line_right(ed: &mut Editor) -> NextAction {
    let end = ed.state.eol();
    ed.state.kill(ed.state.dot..end);
    NextAction::NoAction
}

fn kill_word_left(ed: &mut Editor) -> NextAction {
    let start = ed.state.prev_word_start();
    ed.state.kill(start..ed.state.dot);
    NextAction::NoAction
}

fn move_dot_left(ed: &mut Editor) -> NextAction {
    if let Some(start) = ed.state.prev_grapheme_start() {
        ed.state.dot = start;
    }
    NextAction::NoAction
}

fn move_dot_right(ed: &mut Editor) -> NextAction {
    if let Some(end) = ed.state.next_grapheme_end() {
        ed.state.dot = end;
    }
    NextAction::NoAction
}

fn move_dot_sol(ed: &mut Editor) -> NextAction {
    ed.state.dot = ed.state.sol();
    NextAction::NoAction
}

fn move_dot_eol(ed: &mut Editor) -> NextAction {
    ed.state.dot = ed.state.eol();
    NextAction::NoAction
}

fn return_line(ed: &mut Editor) -> NextAction {
    NextAction::ExitReadLine(LineRead::Line(ed.state.line.clone()))
}

/// End of input on an empty line, delete forward otherwise.
fn return_eof(ed: &mut Editor) -> NextAction {
    if ed.state.line.is_empty() {
        NextAction::ExitReadLine(LineRead::Eof)
    } else {
        kill_rune_right(ed)
    }
}

fn start_command(ed: &mut Editor) -> NextAction {
    ed.state.set_mode(Mode::Command);
    NextAction::NoAction
}

fn start_completion(ed: &mut Editor) -> NextAction {
    let candidates = ed.completer.complete(&ed.state.line, ed.state.dot);
    match CompletionOverlay::new(candidates) {
        Some(overlay) => {
            ed.state.overlay = Some(Overlay::Completion(overlay));
            ed.state.set_mode(Mode::Completion);
        }
        None => ed.state.push_tip(NO_COMPLETION_TIP),
    }
    NextAction::NoAction
}

fn start_navigation(ed: &mut Editor) -> NextAction {
    match NavigationOverlay::new(ed.navigator.as_ref()) {
        Ok(overlay) => {
            ed.state.overlay = Some(Overlay::Navigation(overlay));
            ed.state.set_mode(Mode::Navigation);
        }
        Err(err) => {
            tracing::warn!(message = "can't start navigation", error = %err);
            ed.state.push_tip(format!("can't start navigation: {err}"));
        }
    }
    NextAction::NoAction
}

fn start_history(ed: &mut Editor) -> NextAction {
    ed.history
        .start(&mut ed.state.history, &ed.state.line, ed.state.dot);
    if ed.history.prev(&mut ed.state.history) {
        ed.state.set_mode(Mode::History);
    } else {
        ed.state.history = HistoryCursor::default();
        ed.state.push_tip(NO_MATCHING_HISTORY_TIP);
    }
    NextAction::NoAction
}

// Command mode.

fn start_insert(ed: &mut Editor) -> NextAction {
    ed.state.set_mode(Mode::Insert);
    NextAction::NoAction
}

fn start_insert_after(ed: &mut Editor) -> NextAction {
    move_dot_right(ed);
    start_insert(ed)
}

fn default_command(ed: &mut Editor) -> NextAction {
    push_unbound_tip(ed);
    NextAction::NoAction
}

// Completion mode.

fn select_cand_next(ed: &mut Editor) -> NextAction {
    if let Some(completion) = ed.state.completion_mut() {
        completion.select_next();
    }
    NextAction::NoAction
}

fn select_cand_prev(ed: &mut Editor) -> NextAction {
    if let Some(completion) = ed.state.completion_mut() {
        completion.select_prev();
    }
    NextAction::NoAction
}

fn accept_completion(ed: &mut Editor) -> NextAction {
    let text = ed
        .state
        .completion_mut()
        .and_then(|it| it.selected())
        .map(|it| it.text.clone());
    if let Some(text) = text {
        ed.state.insert_at_dot(&text);
    }
    ed.state.set_mode(Mode::Insert);
    NextAction::NoAction
}

fn cancel_completion(ed: &mut Editor) -> NextAction {
    ed.state.set_mode(Mode::Insert);
    NextAction::NoAction
}

/// Accept, then let Insert mode handle the key.
fn default_completion(ed: &mut Editor) -> NextAction {
    accept_completion(ed);
    NextAction::ReprocessKey
}

// Navigation mode.

fn select_nav_prev(ed: &mut Editor) -> NextAction {
    if let Some(navigation) = ed.state.navigation_mut() {
        navigation.select_prev();
    }
    NextAction::NoAction
}

fn select_nav_next(ed: &mut Editor) -> NextAction {
    if let Some(navigation) = ed.state.navigation_mut() {
        navigation.select_next();
    }
    NextAction::NoAction
}

fn ascend_nav(ed: &mut Editor) -> NextAction {
    let result = match &mut ed.state.overlay {
        Some(Overlay::Navigation(navigation)) => navigation.ascend(ed.navigator.as_ref()),
        _ => Ok(false),
    };
    if let Err(err) = result {
        ed.state.push_tip(format!("can't list folder: {err}"));
    }
    NextAction::NoAction
}

fn descend_nav(ed: &mut Editor) -> NextAction {
    let result = match &mut ed.state.overlay {
        Some(Overlay::Navigation(navigation)) => navigation.descend(ed.navigator.as_ref()),
        _ => Ok(false),
    };
    if let Err(err) = result {
        ed.state.push_tip(format!("can't list folder: {err}"));
    }
    NextAction::NoAction
}

fn accept_navigation(ed: &mut Editor) -> NextAction {
    let path = ed
        .state
        .navigation_mut()
        .and_then(|it| it.selected_path());
    if let Some(path) = path {
        ed.state.insert_at_dot(&path);
    }
    ed.state.set_mode(Mode::Insert);
    NextAction::NoAction
}

fn cancel_navigation(ed: &mut Editor) -> NextAction {
    ed.state.set_mode(Mode::Insert);
    NextAction::NoAction
}

fn default_navigation(ed: &mut Editor) -> NextAction {
    accept_navigation(ed);
    NextAction::ReprocessKey
}

// History mode.

fn history_prev(ed: &mut Editor) -> NextAction {
    if !ed.history.prev(&mut ed.state.history) {
        ed.state.push_tip(NO_MATCHING_HISTORY_TIP);
    }
    NextAction::NoAction
}

fn history_next(ed: &mut Editor) -> NextAction {
    ed.history.next(&mut ed.state.history);
    NextAction::NoAction
}

fn accept_history(ed: &mut Editor) -> NextAction {
    let line = std::mem::take(&mut ed.state.history).line;
    ed.state.set_line(line);
    ed.state.set_mode(Mode::Insert);
    NextAction::NoAction
}

/// Back to the buffer as it was before browsing.
fn cancel_history(ed: &mut Editor) -> NextAction {
    ed.state.history = HistoryCursor::default();
    ed.state.set_mode(Mode::Insert);
    NextAction::NoAction
}

fn default_history(ed: &mut Editor) -> NextAction {
    accept_history(ed);
    NextAction::ReprocessKey
}
