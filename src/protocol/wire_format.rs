//! Wire format constants and checksum.
//!
//! Implements the UBX frame layout:
//! ```text
//! ┌────────┬────────┬───────┬───────┬──────────┬─────────┬──────┬──────┐
//! │ Sync 1 │ Sync 2 │ Class │  ID   │ Length   │ Payload │ CK_A │ CK_B │
//! │  0xB5  │  0x62  │ 1 byte│ 1 byte│ u16 LE   │ N bytes │      │      │
//! └────────┴────────┴───────┴───────┴──────────┴─────────┴──────┴──────┘
//! ```
//!
//! The checksum covers class through the last payload byte.

/// First frame-start byte.
pub const SYNC_CHAR_1: u8 = 0xB5;

/// Second frame-start byte.
pub const SYNC_CHAR_2: u8 = 0x62;

/// Bytes before the payload: sync (2) + class + id + length (2).
pub const HEADER_SIZE: usize = 6;

/// Trailing checksum bytes.
pub const CHECKSUM_SIZE: usize = 2;

/// Default ceiling for a declared payload length accepted by the decoder.
pub const DEFAULT_MAX_PAYLOAD_SIZE: u16 = 1024;

/// ACK-ACK / ACK-NAK payload length; the smallest usable payload ceiling.
pub const ACK_PAYLOAD_SIZE: u16 = 2;

/// Message class constants.
pub mod class {
    /// Navigation results.
    pub const NAV: u8 = 0x01;
    /// Acknowledge / reject of input messages.
    pub const ACK: u8 = 0x05;
    /// Configuration input messages.
    pub const CFG: u8 = 0x06;
}

/// Message id constants, grouped by class.
pub mod id {
    /// ACK-NAK: message not acknowledged.
    pub const ACK_NAK: u8 = 0x00;
    /// ACK-ACK: message acknowledged.
    pub const ACK_ACK: u8 = 0x01;

    /// CFG-RATE: navigation/measurement rate.
    pub const CFG_RATE: u8 = 0x08;
    /// CFG-VALSET: set configuration values.
    pub const CFG_VALSET: u8 = 0x8A;
    /// CFG-VALGET: get configuration values.
    pub const CFG_VALGET: u8 = 0x8B;

    /// NAV-PVT: position, velocity, time solution.
    pub const NAV_PVT: u8 = 0x07;
}

/// Class/id pair identifying a message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId {
    /// Message family.
    pub class: u8,
    /// Message within the family.
    pub id: u8,
}

impl MessageId {
    /// UBX-ACK-ACK.
    pub const ACK_ACK: MessageId = MessageId::new(class::ACK, id::ACK_ACK);
    /// UBX-ACK-NAK.
    pub const ACK_NAK: MessageId = MessageId::new(class::ACK, id::ACK_NAK);
    /// UBX-CFG-RATE.
    pub const CFG_RATE: MessageId = MessageId::new(class::CFG, id::CFG_RATE);
    /// UBX-CFG-VALSET.
    pub const CFG_VALSET: MessageId = MessageId::new(class::CFG, id::CFG_VALSET);
    /// UBX-CFG-VALGET.
    pub const CFG_VALGET: MessageId = MessageId::new(class::CFG, id::CFG_VALGET);
    /// UBX-NAV-PVT.
    pub const NAV_PVT: MessageId = MessageId::new(class::NAV, id::NAV_PVT);

    /// Create a message id.
    pub const fn new(class: u8, id: u8) -> Self {
        Self { class, id }
    }

    /// Check if this is an ACK-class message.
    #[inline]
    pub fn is_ack_class(&self) -> bool {
        self.class == class::ACK
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:02X}/0x{:02X}", self.class, self.id)
    }
}

/// Running two-accumulator checksum.
///
/// `a` accumulates each byte, `b` accumulates `a` after every byte, both
/// modulo 256. Order of updates is significant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Checksum {
    a: u8,
    b: u8,
}

impl Checksum {
    /// Create a zeroed accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one byte in.
    #[inline]
    pub fn update(&mut self, byte: u8) {
        self.a = self.a.wrapping_add(byte);
        self.b = self.b.wrapping_add(self.a);
    }

    /// Fold a slice in, in order.
    pub fn update_slice(&mut self, data: &[u8]) {
        for &byte in data {
            self.update(byte);
        }
    }

    /// Reset both accumulators to zero.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Current `(ck_a, ck_b)`.
    #[inline]
    pub fn result(&self) -> (u8, u8) {
        (self.a, self.b)
    }

    /// Checksum of a complete class..payload slice.
    ///
    /// # Example
    ///
    /// ```
    /// use ubxwire::protocol::Checksum;
    ///
    /// // CFG-RATE poll: class 0x06, id 0x08, length 0
    /// assert_eq!(Checksum::of(&[0x06, 0x08, 0x00, 0x00]), (0x0E, 0x30));
    /// ```
    pub fn of(data: &[u8]) -> (u8, u8) {
        let mut checksum = Self::new();
        checksum.update_slice(data);
        checksum.result()
    }
}
