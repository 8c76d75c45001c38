//! Transport module - byte-level access to the receiver.
//!
//! The engine only needs three primitives, provided by [`Transport`]:
//! - how many bytes are waiting
//! - read the next byte
//! - write a complete frame
//!
//! Adapters:
//! - [`StreamTransport`] - any `Read + Write` stream (serial port, TCP bridge)
//! - [`MockTransport`] - scripted in-memory receiver for tests and demos

mod mock;
mod stream;

pub use mock::MockTransport;
pub use stream::StreamTransport;

use std::fmt;

use crate::error::{Result, Status};

/// Physical bus kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusKind {
    /// Inter-chip bus.
    I2c,
    /// UART / USB serial link.
    Serial,
    /// Synchronous serial peripheral.
    Spi,
}

impl BusKind {
    /// Outcome code for a hardware failure on this bus.
    pub fn failure_status(self) -> Status {
        match self {
            BusKind::I2c => Status::I2cCommFailure,
            BusKind::Spi => Status::SpiCommFailure,
            BusKind::Serial => Status::HwErr,
        }
    }
}

impl fmt::Display for BusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BusKind::I2c => "i2c",
            BusKind::Serial => "serial",
            BusKind::Spi => "spi",
        })
    }
}

/// Byte transport to the receiver.
///
/// Implementations must not block indefinitely; the engine supplies all
/// timeout logic and polls `bytes_available` in a loop.
pub trait Transport {
    /// Bus this transport talks over.
    fn bus(&self) -> BusKind;

    /// Number of bytes that can be read without blocking.
    fn bytes_available(&mut self) -> Result<usize>;

    /// Read the next byte. Only called after `bytes_available` reported data.
    fn read_byte(&mut self) -> Result<u8>;

    /// Write a complete frame.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn bus(&self) -> BusKind {
        (**self).bus()
    }

    fn bytes_available(&mut self) -> Result<usize> {
        (**self).bytes_available()
    }

    fn read_byte(&mut self) -> Result<u8> {
        (**self).read_byte()
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write_bytes(bytes)
    }
}
