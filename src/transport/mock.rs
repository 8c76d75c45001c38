//! Scripted in-memory transport.
//!
//! Plays the receiver's side of a conversation: bytes queued with
//! [`MockTransport::push_incoming`] are readable immediately, replies queued
//! with [`MockTransport::reply_with`] become readable one per frame written.
//!
//! # Example
//!
//! ```
//! use ubxwire::protocol::{build_frame, MessageId};
//! use ubxwire::transport::{MockTransport, Transport};
//!
//! let mut mock = MockTransport::new();
//! mock.reply_with(build_frame(MessageId::CFG_RATE, &[0xE8, 0x03, 1, 0, 1, 0]));
//!
//! assert_eq!(mock.bytes_available().unwrap(), 0);
//! mock.write_bytes(&build_frame(MessageId::CFG_RATE, &[])).unwrap();
//! assert_eq!(mock.bytes_available().unwrap(), 14);
//! assert_eq!(mock.writes().len(), 1);
//! ```

use std::collections::VecDeque;

use bytes::{Buf, Bytes, BytesMut};

use super::{BusKind, Transport};
use crate::error::{Result, UbxError};

/// In-memory transport with scripted replies.
#[derive(Debug)]
pub struct MockTransport {
    bus: BusKind,
    rx: BytesMut,
    replies: VecDeque<Bytes>,
    writes: Vec<Bytes>,
    chunk_size: usize,
    fail_writes: bool,
}

impl MockTransport {
    /// Create a serial mock with no scripted data.
    pub fn new() -> Self {
        Self::with_bus(BusKind::Serial)
    }

    /// Create a mock reporting `bus`.
    pub fn with_bus(bus: BusKind) -> Self {
        Self {
            bus,
            rx: BytesMut::new(),
            replies: VecDeque::new(),
            writes: Vec::new(),
            chunk_size: usize::MAX,
            fail_writes: false,
        }
    }

    /// Make `bytes` readable now.
    pub fn push_incoming(&mut self, bytes: &[u8]) {
        self.rx.extend_from_slice(bytes);
    }

    /// Release `bytes` after the next unanswered write.
    pub fn reply_with(&mut self, bytes: impl Into<Bytes>) {
        self.replies.push_back(bytes.into());
    }

    /// Write without releasing a reply (simulates a silent receiver for one command).
    pub fn reply_nothing(&mut self) {
        self.replies.push_back(Bytes::new());
    }

    /// Report at most `chunk_size` bytes available per poll.
    pub fn set_chunk_size(&mut self, chunk_size: usize) {
        self.chunk_size = chunk_size.max(1);
    }

    /// Make subsequent writes fail.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Frames written so far.
    pub fn writes(&self) -> &[Bytes] {
        &self.writes
    }

    /// Bytes queued but not yet read.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MockTransport {
    fn bus(&self) -> BusKind {
        self.bus
    }

    fn bytes_available(&mut self) -> Result<usize> {
        Ok(self.rx.len().min(self.chunk_size))
    }

    fn read_byte(&mut self) -> Result<u8> {
        if self.rx.has_remaining() {
            Ok(self.rx.get_u8())
        } else {
            Err(UbxError::Transport {
                bus: self.bus,
                message: "mock receive buffer empty".to_string(),
            })
        }
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if self.fail_writes {
            return Err(UbxError::Transport {
                bus: self.bus,
                message: "mock write failure".to_string(),
            });
        }
        self.writes.push(Bytes::copy_from_slice(bytes));
        if let Some(reply) = self.replies.pop_front() {
            self.rx.extend_from_slice(&reply);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replies_released_per_write() {
        let mut mock = MockTransport::new();
        mock.reply_nothing();
        mock.reply_with(vec![1, 2, 3]);

        mock.write_bytes(&[0xAA]).unwrap();
        assert_eq!(mock.bytes_available().unwrap(), 0);

        mock.write_bytes(&[0xBB]).unwrap();
        assert_eq!(mock.bytes_available().unwrap(), 3);
        assert_eq!(mock.read_byte().unwrap(), 1);
        assert_eq!(mock.pending(), 2);
    }

    #[test]
    fn test_chunk_size_limits_availability() {
        let mut mock = MockTransport::new();
        mock.push_incoming(&[0; 10]);
        mock.set_chunk_size(4);
        assert_eq!(mock.bytes_available().unwrap(), 4);
    }

    #[test]
    fn test_write_failure() {
        let mut mock = MockTransport::with_bus(BusKind::Spi);
        mock.set_fail_writes(true);
        let err = mock.write_bytes(&[1]).unwrap_err();
        assert_eq!(err.status(mock.bus()), crate::Status::SpiCommFailure);
        assert!(mock.writes().is_empty());
    }

    #[test]
    fn test_read_empty_is_error() {
        let mut mock = MockTransport::new();
        assert!(mock.read_byte().is_err());
    }
}
