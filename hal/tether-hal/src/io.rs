//! Adapter for `embedded-io` serial peripherals
//!
//! Chip HALs commonly expose their buffered UARTs through the
//! `embedded-io` traits. Those reads and writes block until at least one
//! byte moves, so the adapter only calls them after the matching
//! readiness check reports the peripheral can make progress immediately.

use embedded_io::{Error as _, ErrorKind, Read, ReadReady, Write, WriteReady};

use crate::serial::{SerialError, SerialRead, SerialWrite};

/// Non-blocking wrapper around an `embedded-io` UART
#[derive(Debug)]
pub struct IoSerial<T> {
    inner: T,
}

impl<T> IoSerial<T> {
    /// Wrap a peripheral
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Get access to the underlying peripheral
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Release the underlying peripheral
    pub fn into_inner(self) -> T {
        self.inner
    }
}

fn map_error<E: embedded_io::Error>(e: E) -> SerialError {
    match e.kind() {
        ErrorKind::InvalidData => SerialError::Framing,
        ErrorKind::OutOfMemory => SerialError::Overrun,
        _ => SerialError::Other,
    }
}

impl<T: Read + ReadReady> SerialRead for IoSerial<T> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, SerialError> {
        if buf.is_empty() || !self.inner.read_ready().map_err(map_error)? {
            return Ok(0);
        }
        self.inner.read(buf).map_err(map_error)
    }
}

impl<T: Write + WriteReady> SerialWrite for IoSerial<T> {
    fn write(&mut self, data: &[u8]) -> Result<usize, SerialError> {
        if data.is_empty() || !self.inner.write_ready().map_err(map_error)? {
            return Ok(0);
        }
        self.inner.write(data).map_err(map_error)
    }
}
