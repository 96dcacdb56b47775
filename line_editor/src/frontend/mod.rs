// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod shell_words;
pub mod syntax;

// Re-export.
pub use shell_words::*;
pub use syntax::*;
