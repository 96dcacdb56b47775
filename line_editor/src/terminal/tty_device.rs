// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The controlling terminal on Unix/Linux/macOS, using rustix's safe termios API.

use crate::{TerminalDevice, TerminalMode, VirtualMode};
use rustix::{fd::{AsFd, BorrowedFd},
             termios::{self, OptionalActions}};
use std::{fs::File, io};

/// Used when the window size can't be queried.
pub const DEFAULT_TERMINAL_WIDTH: u16 = 80;

/// Represents either stdin or `/dev/tty`.
///
/// Stdin is used when it is a tty. When it is redirected (eg: piped input), `/dev/tty`
/// is opened instead, so the mode of the real terminal is still the one changed.
#[derive(Debug)]
enum TerminalFd {
    Stdin(io::Stdin),
    DevTty(File),
}

impl AsFd for TerminalFd {
    fn as_fd(&self) -> BorrowedFd<'_> {
        match self {
            TerminalFd::Stdin(stdin) => stdin.as_fd(),
            TerminalFd::DevTty(file) => file.as_fd(),
        }
    }
}

/// [`TerminalDevice`] backed by the controlling terminal.
#[derive(Debug)]
pub struct TtyDevice {
    fd: TerminalFd,
}

impl TtyDevice {
    /// # Errors
    ///
    /// Returns an error if stdin is not a tty and `/dev/tty` can't be opened.
    pub fn open() -> io::Result<Self> {
        let stdin = io::stdin();
        let fd = if termios::isatty(&stdin) {
            TerminalFd::Stdin(stdin)
        } else {
            TerminalFd::DevTty(File::options().read(true).write(true).open("/dev/tty")?)
        };
        Ok(Self { fd })
    }
}

impl TerminalDevice for TtyDevice {
    fn get_mode(&mut self) -> io::Result<TerminalMode> {
        let it = termios::tcgetattr(&self.fd)?;
        Ok(TerminalMode::Termios(it))
    }

    fn set_mode(&mut self, mode: &TerminalMode) -> io::Result<()> {
        match mode {
            TerminalMode::Termios(it) => {
                termios::tcsetattr(&self.fd, OptionalActions::Now, it)?;
                Ok(())
            }
            TerminalMode::Virtual(VirtualMode { .. }) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "virtual mode can't be applied to a tty",
            )),
        }
    }

    fn width(&self) -> u16 {
        match termios::tcgetwinsize(&self.fd) {
            Ok(size) if size.ws_col > 0 => size.ws_col,
            _ => DEFAULT_TERMINAL_WIDTH,
        }
    }
}
