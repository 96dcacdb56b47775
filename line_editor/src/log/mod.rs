// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Tracing setup. The editor owns the terminal while a line is being read, so
//! logging to stdout would corrupt the display. Log to a file instead (see
//! [`WriterConfig::File`]), or to stderr when it is redirected.

// Attach sources.
pub mod tracing_config;
pub mod tracing_init;

// Re-export.
pub use tracing_config::*;
pub use tracing_init::*;
