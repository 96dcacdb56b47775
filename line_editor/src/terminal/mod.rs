// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Everything that touches the terminal device or the process boundary: terminal mode
//! save / apply / restore, the output device the renderer draws on, the decoded input
//! event source, and OS signal forwarding.

// Attach.
pub mod event_source;
pub mod output_device;
pub mod signals;
pub mod terminal_session;
#[cfg(unix)]
pub mod tty_device;

// Re-export.
pub use event_source::*;
pub use output_device::*;
pub use signals::*;
pub use terminal_session::*;
#[cfg(unix)]
pub use tty_device::*;
