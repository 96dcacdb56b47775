// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{StdMutex, TerminalDevice, TerminalMode, VirtualMode};
use std::{io, sync::Arc};

/// Everything a [`VirtualTerminal`] has been asked to do, plus switches that make the
/// next calls fail.
#[derive(Debug, Default)]
pub struct VirtualTerminalLog {
    pub current: VirtualMode,
    pub applied: Vec<VirtualMode>,
    pub get_mode_calls: usize,
    pub fail_get_mode: bool,
    pub fail_set_mode: bool,
}

/// A [`TerminalDevice`] with no kernel behind it. Mode changes are recorded in a
/// [`VirtualTerminalLog`] shared with the test.
#[derive(Debug)]
pub struct VirtualTerminal {
    pub width: u16,
    pub log: Arc<StdMutex<VirtualTerminalLog>>,
}

impl VirtualTerminal {
    pub fn new(width: u16) -> (Self, Arc<StdMutex<VirtualTerminalLog>>) {
        let log = Arc::new(StdMutex::new(VirtualTerminalLog::default()));
        (
            Self {
                width,
                log: log.clone(),
            },
            log,
        )
    }
}

impl TerminalDevice for VirtualTerminal {
    fn get_mode(&mut self) -> io::Result<TerminalMode> {
        let mut log = self.log.lock().unwrap();
        log.get_mode_calls += 1;
        if log.fail_get_mode {
            return Err(io::Error::new(io::ErrorKind::Unsupported, "not a tty"));
        }
        Ok(TerminalMode::Virtual(log.current))
    }

    fn set_mode(&mut self, mode: &TerminalMode) -> io::Result<()> {
        let mut log = self.log.lock().unwrap();
        if log.fail_set_mode {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "tcsetattr"));
        }
        match mode {
            TerminalMode::Virtual(it) => {
                log.current = *it;
                log.applied.push(*it);
                Ok(())
            }
            #[cfg(unix)]
            TerminalMode::Termios(_) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "termios mode on a virtual terminal",
            )),
        }
    }

    fn width(&self) -> u16 { self.width }
}
