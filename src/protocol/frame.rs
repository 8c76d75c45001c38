//! Packet struct and frame encoder.
//!
//! A [`Packet`] is both the outgoing request description and the
//! destination the decoder writes incoming frames into. Its payload buffer
//! is owned exclusively by the packet and grows only when a declared length
//! exceeds the current capacity.
//!
//! # Example
//!
//! ```
//! use ubxwire::protocol::{build_frame, MessageId};
//!
//! let bytes = build_frame(MessageId::CFG_RATE, &[]);
//! assert_eq!(&bytes[..], &[0xB5, 0x62, 0x06, 0x08, 0x00, 0x00, 0x0E, 0x30]);
//! ```

use bytes::{BufMut, Bytes, BytesMut};

use super::wire_format::{Checksum, MessageId, CHECKSUM_SIZE, HEADER_SIZE, SYNC_CHAR_1, SYNC_CHAR_2};
use crate::error::Status;

/// Validity of a packet, or of its class/id match against a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Validity {
    /// Not yet determined.
    #[default]
    NotDefined,
    /// Checksum matched / class and id matched.
    Valid,
    /// Checksum mismatch / class or id differ.
    NotValid,
    /// ACK-NAK received for the requested message.
    NotAcknowledged,
}

impl Validity {
    /// Check if still undetermined.
    #[inline]
    pub fn is_defined(self) -> bool {
        self != Validity::NotDefined
    }
}

/// One protocol frame: header fields, owned payload, checksum and state.
#[derive(Debug, Clone, Default)]
pub struct Packet {
    /// Message class.
    pub cls: u8,
    /// Message id.
    pub id: u8,
    /// Declared payload length (excludes header and checksum).
    pub len: u16,
    /// Frame bytes consumed so far, counted from the class byte.
    pub counter: u16,
    /// Payload offset at which recording into `payload` begins.
    pub starting_spot: u16,
    payload: Vec<u8>,
    /// Checksum A received from the wire (or computed on encode).
    pub checksum_a: u8,
    /// Checksum B received from the wire (or computed on encode).
    pub checksum_b: u8,
    valid: Validity,
    class_and_id_match: Validity,
}

impl Packet {
    /// Create an empty packet for `msg`.
    pub fn new(msg: MessageId) -> Self {
        Self {
            cls: msg.class,
            id: msg.id,
            ..Self::default()
        }
    }

    /// Create a request packet carrying `payload`.
    ///
    /// Fails with `InvalidArg` when the payload cannot be described by a
    /// 16-bit length field.
    pub fn with_payload(msg: MessageId, payload: &[u8]) -> Result<Self, Status> {
        let len = u16::try_from(payload.len()).map_err(|_| Status::InvalidArg)?;
        let mut packet = Self::new(msg);
        packet.len = len;
        packet.payload = payload.to_vec();
        Ok(packet)
    }

    /// Class/id of this packet.
    #[inline]
    pub fn message_id(&self) -> MessageId {
        MessageId::new(self.cls, self.id)
    }

    /// Recorded payload bytes (declared length minus `starting_spot`).
    #[inline]
    pub fn payload(&self) -> &[u8] {
        let recorded = self.recorded_len();
        &self.payload[..recorded.min(self.payload.len())]
    }

    /// Allocated payload capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.payload.capacity()
    }

    /// Checksum validity.
    #[inline]
    pub fn valid(&self) -> Validity {
        self.valid
    }

    /// Class/id match state against the outstanding request.
    #[inline]
    pub fn class_and_id_match(&self) -> Validity {
        self.class_and_id_match
    }

    /// Check if both the checksum and the class/id match are positive.
    ///
    /// Typed accessors must check this before trusting payload contents.
    #[inline]
    pub fn is_trusted(&self) -> bool {
        self.valid == Validity::Valid && self.class_and_id_match == Validity::Valid
    }

    /// Number of payload bytes that will be recorded for the declared length.
    #[inline]
    pub(crate) fn recorded_len(&self) -> usize {
        usize::from(self.len.saturating_sub(self.starting_spot))
    }

    /// Reset both state flags to undetermined, keeping the buffer.
    pub fn reset_validity(&mut self) {
        self.valid = Validity::NotDefined;
        self.class_and_id_match = Validity::NotDefined;
    }

    /// Record the checksum outcome. Ignored unless still undetermined.
    pub(crate) fn set_valid(&mut self, validity: Validity) {
        if self.valid == Validity::NotDefined {
            self.valid = validity;
        }
    }

    /// Record the class/id outcome. Ignored unless still undetermined.
    pub(crate) fn set_class_and_id_match(&mut self, validity: Validity) {
        if self.class_and_id_match == Validity::NotDefined {
            self.class_and_id_match = validity;
        }
    }

    /// Prepare the packet to receive a frame of `len` declared bytes.
    ///
    /// Grows the buffer only when the recorded length exceeds the current
    /// capacity. On allocation failure nothing is modified and `MemErr` is
    /// returned.
    pub(crate) fn prepare(&mut self, msg: MessageId, len: u16) -> Result<(), Status> {
        let recorded = usize::from(len.saturating_sub(self.starting_spot));
        if recorded > self.payload.capacity() {
            let additional = recorded - self.payload.len();
            self.payload
                .try_reserve_exact(additional)
                .map_err(|_| Status::MemErr)?;
        }
        self.payload.clear();
        self.payload.resize(recorded, 0);
        self.cls = msg.class;
        self.id = msg.id;
        self.len = len;
        self.counter = 4;
        self.checksum_a = 0;
        self.checksum_b = 0;
        self.reset_validity();
        Ok(())
    }

    /// Write one payload byte at payload offset `index`, honouring `starting_spot`.
    #[inline]
    pub(crate) fn record(&mut self, index: usize, byte: u8) {
        let spot = usize::from(self.starting_spot);
        if index >= spot {
            if let Some(slot) = self.payload.get_mut(index - spot) {
                *slot = byte;
            }
        }
    }

    /// Encode this packet as a complete wire frame.
    ///
    /// Also stores the computed checksum in `checksum_a` / `checksum_b`.
    pub fn encode(&mut self) -> Bytes {
        let payload_len = usize::from(self.len).min(self.payload.len());
        let bytes = build_frame(self.message_id(), &self.payload[..payload_len]);
        let ck = bytes.len() - CHECKSUM_SIZE;
        self.checksum_a = bytes[ck];
        self.checksum_b = bytes[ck + 1];
        bytes
    }
}

/// Build a complete frame as a single contiguous buffer.
///
/// Payloads longer than `u16::MAX` are truncated to what the length field
/// can describe; use [`Packet::with_payload`] to reject them instead.
pub fn build_frame(msg: MessageId, payload: &[u8]) -> Bytes {
    debug_assert!(
        payload.len() <= usize::from(u16::MAX),
        "payload of {} bytes does not fit the length field",
        payload.len()
    );
    let payload = &payload[..payload.len().min(usize::from(u16::MAX))];
    let mut buf = BytesMut::with_capacity(HEADER_SIZE + payload.len() + CHECKSUM_SIZE);
    buf.put_u8(SYNC_CHAR_1);
    buf.put_u8(SYNC_CHAR_2);
    buf.put_u8(msg.class);
    buf.put_u8(msg.id);
    buf.put_u16_le(payload.len() as u16);
    buf.put_slice(payload);

    let (ck_a, ck_b) = Checksum::of(&buf[2..]);
    buf.put_u8(ck_a);
    buf.put_u8(ck_b);
    buf.freeze()
}
