//! Protocol module - wire format, framing, and incremental decoding.
//!
//! This module implements the UBX binary framing:
//! - start marker, class/id, little-endian length, two-byte checksum
//! - [`Packet`] buffers with validity and class/id match state
//! - [`FrameParser`] for reconstructing frames one byte at a time

mod frame;
mod parser;
mod wire_format;

pub use frame::{build_frame, Packet, Validity};
pub use parser::{ack_outcome, data_outcome, Decoded, FrameParser, RequestFlags, Slot};
pub use wire_format::{
    class, id, Checksum, MessageId, ACK_PAYLOAD_SIZE, CHECKSUM_SIZE, DEFAULT_MAX_PAYLOAD_SIZE,
    HEADER_SIZE, SYNC_CHAR_1, SYNC_CHAR_2,
};
