// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{BrokenWriter, StdoutMock};
use crate::{OutputDevice, StdMutex};
use std::sync::Arc;

pub trait OutputDeviceExt {
    fn new_mock() -> (OutputDevice, StdoutMock);

    fn new_broken() -> OutputDevice;
}

impl OutputDeviceExt for OutputDevice {
    fn new_mock() -> (OutputDevice, StdoutMock) {
        let stdout_mock = StdoutMock::default();
        let this = OutputDevice {
            resource: Arc::new(StdMutex::new(stdout_mock.clone())),
            is_mock: true,
        };
        (this, stdout_mock)
    }

    fn new_broken() -> OutputDevice {
        OutputDevice {
            resource: Arc::new(StdMutex::new(BrokenWriter)),
            is_mock: true,
        }
    }
}
