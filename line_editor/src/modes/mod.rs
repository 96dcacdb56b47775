// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod completion;
pub mod mode;
pub mod navigation;

// Re-export.
pub use completion::*;
pub use mode::*;
pub use navigation::*;
