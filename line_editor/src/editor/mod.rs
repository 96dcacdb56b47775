// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod editing_state;
pub mod editor_builder;
pub mod editor_impl;
pub mod line_read;

// Re-export.
pub use editing_state::*;
pub use editor_builder::*;
pub use editor_impl::*;
pub use line_read::*;
