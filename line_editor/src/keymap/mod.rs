// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod builtins;
pub mod key_press;
pub mod keymaps;

// Re-export.
pub use builtins::*;
pub use key_press::*;
pub use keymaps::*;
