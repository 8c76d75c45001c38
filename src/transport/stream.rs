//! Transport over any `Read + Write` stream.
//!
//! Suitable for a serial port or a TCP serial bridge. The stream must be
//! non-blocking or have a short read timeout; `WouldBlock` and `TimedOut`
//! are reported as no bytes available.
//!
//! # Example
//!
//! ```ignore
//! use std::net::TcpStream;
//! use std::time::Duration;
//! use ubxwire::transport::StreamTransport;
//!
//! let stream = TcpStream::connect("192.168.1.50:2101")?;
//! stream.set_read_timeout(Some(Duration::from_millis(1)))?;
//! let transport = StreamTransport::new(stream);
//! ```

use std::io::{ErrorKind, Read, Write};

use bytes::{Buf, BytesMut};

use super::{BusKind, Transport};
use crate::error::{Result, UbxError};

/// Read chunk size.
const READ_CHUNK: usize = 512;

/// Buffered transport over a `Read + Write` stream.
pub struct StreamTransport<S> {
    stream: S,
    rx: BytesMut,
    bus: BusKind,
}

impl<S: Read + Write> StreamTransport<S> {
    /// Wrap `stream` as a serial transport.
    pub fn new(stream: S) -> Self {
        Self::with_bus(stream, BusKind::Serial)
    }

    /// Wrap `stream`, reporting it as `bus`.
    pub fn with_bus(stream: S, bus: BusKind) -> Self {
        Self {
            stream,
            rx: BytesMut::with_capacity(READ_CHUNK),
            bus,
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Unwrap into the underlying stream, dropping buffered bytes.
    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Pull whatever the stream has into the receive buffer.
    fn fill(&mut self) -> Result<()> {
        let mut chunk = [0u8; READ_CHUNK];
        match self.stream.read(&mut chunk) {
            Ok(0) => Err(UbxError::Transport {
                bus: self.bus,
                message: "stream closed".to_string(),
            }),
            Ok(n) => {
                self.rx.extend_from_slice(&chunk[..n]);
                Ok(())
            }
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => Ok(()),
            Err(e) if e.kind() == ErrorKind::Interrupted => Ok(()),
            Err(e) => Err(UbxError::Io(e)),
        }
    }
}

impl<S: Read + Write> Transport for StreamTransport<S> {
    fn bus(&self) -> BusKind {
        self.bus
    }

    fn bytes_available(&mut self) -> Result<usize> {
        if self.rx.is_empty() {
            self.fill()?;
        }
        Ok(self.rx.len())
    }

    fn read_byte(&mut self) -> Result<u8> {
        if self.rx.is_empty() {
            self.fill()?;
        }
        if self.rx.has_remaining() {
            Ok(self.rx.get_u8())
        } else {
            Err(UbxError::Transport {
                bus: self.bus,
                message: "read with no bytes available".to_string(),
            })
        }
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.stream.write_all(bytes)?;
        self.stream.flush()?;
        Ok(())
    }
}
