// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Terminal mode save / apply / restore for the duration of one read.
//!
//! [`enter()`] saves the current mode of the [`TerminalDevice`] and switches it to what
//! the editor needs:
//! - non-canonical (no line buffering by the kernel's line discipline),
//! - no echo,
//! - blocking reads that return as soon as 1 byte is available (`VMIN=1`, `VTIME=0`).
//!
//! Signal generation (`ISIG`) is left alone, so `Ctrl+C` still arrives as `SIGINT` and
//! is handled by the editor's signal branch. This is different from the `make_raw()`
//! approach used by full screen apps.
//!
//! [`enter()`] either succeeds completely or leaves the terminal untouched. Once it has
//! succeeded, [`restore()`] must run exactly once on the way out of the read, whatever
//! happened in between. The editor guarantees this, see
//! [`crate::Editor::read_line()`].

use crossterm::{QueueableCommand,
                terminal::{DisableLineWrap, EnableLineWrap}};
use std::io::{self, Write};
use thiserror::Error;
use unicode_width::UnicodeWidthChar;

/// Marks output that did not end with a newline (`⏎`).
pub const LACK_EOL_RUNE: char = '\u{23ce}';

/// [`LACK_EOL_RUNE`] in reverse video.
pub const LACK_EOL: &str = "\x1b[7m\u{23ce}\x1b[m";

/// A snapshot of the line discipline settings of a [`TerminalDevice`].
#[derive(Clone, Debug)]
pub enum TerminalMode {
    /// Settings read from a tty with `tcgetattr`.
    #[cfg(unix)]
    Termios(rustix::termios::Termios),
    /// Settings of a device without a kernel line discipline (recorded or headless
    /// sessions).
    Virtual(VirtualMode),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VirtualMode {
    pub canonical: bool,
    pub echo: bool,
    pub min_bytes: u8,
    pub timeout_deciseconds: u8,
}

impl Default for VirtualMode {
    fn default() -> Self {
        Self {
            canonical: true,
            echo: true,
            min_bytes: 1,
            timeout_deciseconds: 0,
        }
    }
}

impl TerminalMode {
    /// The mode used while a line is being edited, derived from the saved mode: only
    /// `ICANON`, `ECHO`, `VMIN` and `VTIME` change.
    #[must_use]
    pub fn for_editing(&self) -> Self {
        match self {
            #[cfg(unix)]
            TerminalMode::Termios(termios) => {
                use rustix::termios::{LocalModes, SpecialCodeIndex};
                let mut it = termios.clone();
                it.local_modes.remove(LocalModes::ICANON | LocalModes::ECHO);
                it.special_codes[SpecialCodeIndex::VMIN] = 1;
                it.special_codes[SpecialCodeIndex::VTIME] = 0;
                TerminalMode::Termios(it)
            }
            TerminalMode::Virtual(_) => TerminalMode::Virtual(VirtualMode {
                canonical: false,
                echo: false,
                min_bytes: 1,
                timeout_deciseconds: 0,
            }),
        }
    }
}

/// The controlling terminal, as far as mode switching and geometry go. Output goes
/// through [`crate::OutputDevice`] instead.
pub trait TerminalDevice: Send {
    /// # Errors
    ///
    /// Returns an error if the settings can't be read (eg: not a tty).
    fn get_mode(&mut self) -> io::Result<TerminalMode>;

    /// # Errors
    ///
    /// Returns an error if the settings can't be applied.
    fn set_mode(&mut self, mode: &TerminalMode) -> io::Result<()>;

    /// Number of columns, or a sensible fallback when it is unknown.
    fn width(&self) -> u16;
}

#[derive(Debug, Error, miette::Diagnostic)]
pub enum TerminalSetupError {
    #[error("can't get terminal attribute: {0}")]
    #[diagnostic(code(line_editor::terminal::get_mode))]
    GetMode(io::Error),

    #[error("can't set up terminal attribute: {0}")]
    #[diagnostic(
        code(line_editor::terminal::set_mode),
        help("is stdin connected to a terminal?")
    )]
    SetMode(io::Error),
}

#[derive(Debug, Error, miette::Diagnostic)]
pub enum RestoreError {
    #[error("can't turn on autowrap: {0}")]
    #[diagnostic(code(line_editor::terminal::autowrap))]
    AutoWrap(io::Error),

    #[error("can't restore terminal attribute: {0}")]
    #[diagnostic(code(line_editor::terminal::restore_mode))]
    Mode(io::Error),
}

/// Save the terminal mode, switch to the editing mode and return the saved mode. If this
/// fails nothing has been changed and there is nothing to restore.
///
/// On success the missing newline probe is written as well, see
/// [`write_lack_eol_probe()`].
///
/// # Errors
///
/// Returns [`TerminalSetupError`] if the mode can't be read or applied.
pub fn enter(
    device: &mut dyn TerminalDevice,
    term: &mut dyn Write,
) -> Result<TerminalMode, TerminalSetupError> {
    let saved = device.get_mode().map_err(TerminalSetupError::GetMode)?;
    device
        .set_mode(&saved.for_editing())
        .map_err(TerminalSetupError::SetMode)?;

    // A broken output device shows up as a render error right after this.
    if let Err(err) = write_lack_eol_probe(term, device.width()) {
        tracing::warn!(message = "can't write missing newline probe", error = %err);
    }

    tracing::debug!(message = "terminal entered editing mode");
    Ok(saved)
}

/// Turn on autowrap, write [`LACK_EOL`] followed by enough padding to fill the whole
/// line. If the cursor was in the first column, it ends up in the same line (just off
/// the line boundary); otherwise it is now in the next line. Rewind to the first column
/// and erase anything there. The net effect is that the marker remains visible if and
/// only if the cursor was not in the first column, ie: the previous output lacked a
/// trailing newline.
///
/// Autowrap is then turned off, the editor wraps lines on its own.
///
/// # Errors
///
/// Returns an error if writing to the terminal fails.
pub fn write_lack_eol_probe(term: &mut dyn Write, width: u16) -> io::Result<()> {
    let rune_width = LACK_EOL_RUNE.width().unwrap_or(1);
    let padding = usize::from(width).saturating_sub(rune_width);
    term.queue(EnableLineWrap)?;
    write!(term, "{LACK_EOL}{:pad$}\r \r", "", pad = padding)?;
    term.queue(DisableLineWrap)?;
    term.flush()
}

/// Turn autowrap back on and re-apply the saved mode. Both steps always run, errors are
/// collected and returned.
pub fn restore(
    device: &mut dyn TerminalDevice,
    term: &mut dyn Write,
    saved: &TerminalMode,
) -> Vec<RestoreError> {
    let mut errors = vec![];

    if let Err(err) = term.queue(EnableLineWrap).and_then(Write::flush) {
        errors.push(RestoreError::AutoWrap(err));
    }

    if let Err(err) = device.set_mode(saved) {
        errors.push(RestoreError::Mode(err));
    }

    tracing::debug!(
        message = "terminal restored",
        error_count = errors.len()
    );
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{StdoutMock, VirtualTerminal};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_for_editing_turns_off_canonical_and_echo() {
        let saved = TerminalMode::Virtual(VirtualMode::default());
        let TerminalMode::Virtual(editing) = saved.for_editing() else {
            panic!("virtual mode must stay virtual");
        };
        assert_eq!(
            editing,
            VirtualMode {
                canonical: false,
                echo: false,
                min_bytes: 1,
                timeout_deciseconds: 0,
            }
        );
    }

    #[test]
    fn test_enter_applies_editing_mode_and_returns_saved() {
        let (mut device, log) = VirtualTerminal::new(40);
        let mut term = StdoutMock::default();

        let saved = enter(&mut device, &mut term).unwrap();

        assert!(matches!(
            saved,
            TerminalMode::Virtual(VirtualMode { canonical: true, echo: true, .. })
        ));
        let log = log.lock().unwrap();
        assert_eq!(log.applied.len(), 1);
        assert!(!log.applied[0].canonical);
        assert!(!log.applied[0].echo);
    }

    #[test]
    fn test_enter_writes_probe_padded_to_width() {
        let (mut device, _log) = VirtualTerminal::new(10);
        let mut term = StdoutMock::default();

        enter(&mut device, &mut term).unwrap();

        let raw = term.get_copy_of_buffer_as_string();
        assert!(raw.starts_with("\x1b[?7h"));
        assert!(raw.ends_with("\r \r\x1b[?7l"));
        // Marker (1 column) plus 9 columns of padding.
        assert!(raw.contains(&format!("{LACK_EOL}{}\r \r", " ".repeat(9))));
    }

    #[test]
    fn test_enter_get_mode_failure_mutates_nothing() {
        let (mut device, log) = VirtualTerminal::new(80);
        log.lock().unwrap().fail_get_mode = true;
        let mut term = StdoutMock::default();

        let result = enter(&mut device, &mut term);

        assert!(matches!(result, Err(TerminalSetupError::GetMode(_))));
        assert!(log.lock().unwrap().applied.is_empty());
        assert_eq!(term.get_copy_of_buffer_as_string(), "");
    }

    #[test]
    fn test_enter_set_mode_failure_writes_nothing() {
        let (mut device, log) = VirtualTerminal::new(80);
        log.lock().unwrap().fail_set_mode = true;
        let mut term = StdoutMock::default();

        let result = enter(&mut device, &mut term);

        assert!(matches!(result, Err(TerminalSetupError::SetMode(_))));
        assert_eq!(term.get_copy_of_buffer_as_string(), "");
    }

    #[test]
    fn test_restore_runs_every_step_and_collects_errors() {
        let (mut device, log) = VirtualTerminal::new(80);
        let mut term = StdoutMock::default();
        let saved = enter(&mut device, &mut term).unwrap();
        log.lock().unwrap().fail_set_mode = true;

        let errors = restore(&mut device, &mut term, &saved);

        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], RestoreError::Mode(_)));
        // Autowrap was still turned back on.
        assert!(term.get_copy_of_buffer_as_string().ends_with("\x1b[?7h"));
    }

    #[test]
    fn test_restore_reapplies_saved_mode() {
        let (mut device, log) = VirtualTerminal::new(80);
        let mut term = StdoutMock::default();
        let saved = enter(&mut device, &mut term).unwrap();

        let errors = restore(&mut device, &mut term, &saved);

        assert!(errors.is_empty());
        let log = log.lock().unwrap();
        assert_eq!(log.applied.len(), 2);
        assert_eq!(log.applied[1], VirtualMode::default());
        assert_eq!(log.current, VirtualMode::default());
    }
}
