// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod ansi_renderer;
pub mod frame;

// Re-export.
pub use ansi_renderer::*;
pub use frame::*;

use crate::EditingState;
use std::io::{self, Write};

/// Draws the [`EditingState`]. Called once per event loop iteration and once more
/// during teardown of every read.
pub trait Renderer: Send {
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails. This ends the read.
    fn render(
        &mut self,
        state: &EditingState,
        width: u16,
        out: &mut dyn Write,
    ) -> io::Result<()>;

    /// Forget the previous frame. Called at the start of every read, the cursor is
    /// assumed to be at the start of a fresh line.
    fn reset(&mut self);
}
