// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod editor_fixture;
pub mod input_stream_mock;
pub mod output_device_ext;
pub mod providers_mock;
pub mod stdout_mock;
pub mod virtual_terminal;

// Re-export.
pub use editor_fixture::*;
pub use input_stream_mock::*;
pub use output_device_ext::*;
pub use providers_mock::*;
pub use stdout_mock::*;
pub use virtual_terminal::*;
