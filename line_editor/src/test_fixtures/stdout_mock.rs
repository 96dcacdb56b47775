// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{InlineVec, StdMutex};
use smallvec::smallvec;
use std::{io::{Result, Write},
          sync::Arc};
use strip_ansi_escapes::strip;

/// You can safely clone this struct, since it only contains an `Arc<StdMutex<..>>`. The
/// inner `buffer` is shared between clones, so a clone handed to an
/// [`crate::OutputDevice`] can be inspected from the test.
///
/// The main constructors are:
/// - [`StdoutMock::default`]
/// - [`super::OutputDeviceExt::new_mock()`]
#[derive(Clone)]
pub struct StdoutMock {
    pub buffer: Arc<StdMutex<InlineVec<u8>>>,
}

impl Default for StdoutMock {
    fn default() -> Self {
        Self {
            buffer: Arc::new(StdMutex::new(smallvec![])),
        }
    }
}

impl StdoutMock {
    pub fn get_copy_of_buffer_as_string(&self) -> String {
        let buffer_data = self.buffer.lock().unwrap();
        String::from_utf8(buffer_data.to_vec()).expect("utf8")
    }

    pub fn get_copy_of_buffer_as_string_strip_ansi(&self) -> String {
        let buffer_data = self.buffer.lock().unwrap();
        let buffer_data = strip(buffer_data.to_vec());
        String::from_utf8(buffer_data).expect("utf8")
    }

    pub fn clear(&self) { self.buffer.lock().unwrap().clear(); }
}

impl Write for StdoutMock {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<()> { Ok(()) }
}

/// An output device that refuses every write, used to exercise render failures.
#[derive(Clone, Copy, Default)]
pub struct BrokenWriter;

impl Write for BrokenWriter {
    fn write(&mut self, _buf: &[u8]) -> Result<usize> {
        Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "output closed"))
    }

    fn flush(&mut self) -> Result<()> {
        Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "output closed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stdout_mock_clones_share_buffer() {
        let mut stdout_mock = StdoutMock::default();
        let stdout_mock_clone = stdout_mock.clone();

        stdout_mock.write_all(b"ls -la").unwrap();

        assert_eq!(stdout_mock_clone.get_copy_of_buffer_as_string(), "ls -la");
    }

    #[test]
    fn test_stdout_mock_strip_ansi() {
        let mut stdout_mock = StdoutMock::default();
        stdout_mock.write_all(b"\x1b[31mcat\x1b[0m foo").unwrap();

        assert_eq!(stdout_mock.get_copy_of_buffer_as_string_strip_ansi(), "cat foo");

        stdout_mock.clear();
        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "");
    }
}
