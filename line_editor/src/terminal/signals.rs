// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::fmt;
use tokio::sync::mpsc;

/// The OS signals the editor reacts to while a line is being read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShellSignal {
    /// `SIGINT`, abandons the current line.
    Interrupt,
    /// `SIGWINCH`, re-render.
    WindowChange,
    /// `SIGCHLD`, ignored.
    ChildStatus,
    /// Anything else that was delivered, by name.
    Other(&'static str),
}

impl fmt::Display for ShellSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellSignal::Interrupt => write!(f, "SIGINT"),
            ShellSignal::WindowChange => write!(f, "SIGWINCH"),
            ShellSignal::ChildStatus => write!(f, "SIGCHLD"),
            ShellSignal::Other(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(unix)]
impl ShellSignal {
    #[must_use]
    pub fn from_raw(signal: i32) -> Self {
        use signal_hook::consts::signal::{SIGCHLD, SIGINT, SIGQUIT, SIGUSR1, SIGUSR2,
                                          SIGWINCH};
        match signal {
            SIGINT => ShellSignal::Interrupt,
            SIGWINCH => ShellSignal::WindowChange,
            SIGCHLD => ShellSignal::ChildStatus,
            SIGQUIT => ShellSignal::Other("SIGQUIT"),
            SIGUSR1 => ShellSignal::Other("SIGUSR1"),
            SIGUSR2 => ShellSignal::Other("SIGUSR2"),
            _ => ShellSignal::Other("unknown"),
        }
    }
}

/// Receiving end of the signal channel. Closing it (or dropping it) stops the thread
/// that forwards signals, see [`spawn_signal_listener()`].
#[allow(missing_debug_implementations)]
pub struct SignalListener {
    receiver: mpsc::UnboundedReceiver<ShellSignal>,
    #[cfg(unix)]
    handle: Option<signal_hook::iterator::Handle>,
}

impl SignalListener {
    /// A listener fed by hand instead of by the OS. Used for embedding the editor where
    /// signal delivery is handled elsewhere, and in tests.
    #[must_use]
    pub fn from_channel() -> (Self, mpsc::UnboundedSender<ShellSignal>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                receiver,
                #[cfg(unix)]
                handle: None,
            },
            sender,
        )
    }

    /// Wait for the next signal. Returns `None` once every sender is gone. Cancel safe.
    pub async fn recv(&mut self) -> Option<ShellSignal> { self.receiver.recv().await }

    pub fn close(&mut self) {
        #[cfg(unix)]
        {
            if let Some(handle) = self.handle.take() {
                handle.close();
            }
        }
        self.receiver.close();
    }
}

impl Drop for SignalListener {
    fn drop(&mut self) { self.close(); }
}

/// Register for `SIGINT`, `SIGWINCH`, `SIGCHLD`, `SIGQUIT`, `SIGUSR1` and `SIGUSR2` and
/// forward them from a dedicated thread (a `signal-hook` iterator) into a tokio channel.
/// Hangup keeps its default disposition.
///
/// # Errors
///
/// Returns an error if the handlers can't be registered or the thread can't be spawned.
#[cfg(unix)]
pub fn spawn_signal_listener() -> std::io::Result<SignalListener> {
    use signal_hook::{consts::signal::{SIGCHLD, SIGINT, SIGQUIT, SIGUSR1, SIGUSR2,
                                       SIGWINCH},
                      iterator::Signals};

    let mut signals = Signals::new([SIGINT, SIGWINCH, SIGCHLD, SIGQUIT, SIGUSR1, SIGUSR2])?;
    let handle = signals.handle();
    let (sender, receiver) = mpsc::unbounded_channel();

    std::thread::Builder::new()
        .name("line_editor_signals".into())
        .spawn(move || {
            for signal in signals.forever() {
                if sender.send(ShellSignal::from_raw(signal)).is_err() {
                    break;
                }
            }
            tracing::debug!(message = "signal forwarding thread exiting");
        })?;

    Ok(SignalListener {
        receiver,
        handle: Some(handle),
    })
}
