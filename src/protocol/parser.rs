//! Incremental frame decoder.
//!
//! Consumes one transport byte at a time. The position within the current
//! frame is tracked by a counter (sync 1 = 0):
//! - `0`, `1`: start marker, anything else resets to scanning
//! - `2`: class, `3`: id (the frame is routed here)
//! - `4`, `5`: little-endian length (the destination buffer is sized here)
//! - `6..6+len`: payload
//! - `6+len`, `7+len`: checksum A and B
//!
//! # Routing
//!
//! Each frame lands in one of three buffers:
//! - **ack**: every ACK-class frame
//! - **automatic**: frames registered with [`FrameParser::register_auto`],
//!   unless they are the outstanding request
//! - **response**: the outstanding request's answer and any other frame.
//!   This buffer is shared scratch space, so a frame arriving after the
//!   answer was captured marks the response as overwritten.
//!
//! # Example
//!
//! ```
//! use ubxwire::protocol::{build_frame, FrameParser, MessageId, Validity};
//!
//! let mut parser = FrameParser::new();
//! parser.begin_request(MessageId::CFG_RATE, 0);
//!
//! let bytes = build_frame(MessageId::CFG_RATE, &[0xE8, 0x03, 0x01, 0x00, 0x01, 0x00]);
//! let mut decoded = None;
//! for byte in bytes.iter() {
//!     decoded = parser.feed(*byte).or(decoded);
//! }
//!
//! assert_eq!(decoded.unwrap().valid, Validity::Valid);
//! assert!(parser.response().is_trusted());
//! assert_eq!(parser.response().payload()[0], 0xE8);
//! ```

use std::collections::HashMap;

use super::frame::{Packet, Validity};
use super::wire_format::{
    id, Checksum, MessageId, DEFAULT_MAX_PAYLOAD_SIZE, HEADER_SIZE, SYNC_CHAR_1, SYNC_CHAR_2,
};
use crate::error::Status;

/// Buffer a frame was routed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Outstanding-command / scratch buffer.
    Response,
    /// ACK-class buffer.
    Ack,
    /// Automatic (unsolicited, registered) message buffer.
    Auto,
}

/// Summary of one completed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    /// Destination buffer.
    pub slot: Slot,
    /// Class and id of the frame.
    pub msg: MessageId,
    /// Checksum outcome.
    pub valid: Validity,
}

/// Per-request outcome flags, latched until the next [`FrameParser::begin_request`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestFlags {
    /// A valid frame matching the request was captured in the response buffer.
    pub captured: bool,
    /// The captured response was clobbered by a later frame.
    pub overwritten: bool,
    /// A frame matching the request failed its checksum.
    pub crc_fail: bool,
    /// An ACK-class frame failed its checksum while the request was outstanding.
    pub ack_crc_fail: bool,
    /// The response buffer could not be sized for a frame matching the request.
    pub mem_err: bool,
    /// `Valid` for ACK-ACK, `NotAcknowledged` for ACK-NAK naming the request.
    pub ack: Validity,
}

#[derive(Debug, Default)]
struct AutoSlot {
    packet: Packet,
    fresh: bool,
}

/// Byte-at-a-time UBX decoder owning the response, ack and automatic buffers.
#[derive(Debug)]
pub struct FrameParser {
    /// Position within the current frame; 0 while scanning for the marker.
    counter: usize,
    /// Class, id, length lo, length hi of the current frame.
    header: [u8; 4],
    /// Declared payload length of the current frame.
    len: usize,
    /// Destination of the current frame; `None` skips its payload.
    target: Option<Slot>,
    checksum: Checksum,
    received_a: u8,
    response: Packet,
    ack: Packet,
    auto: HashMap<MessageId, AutoSlot>,
    requested: Option<MessageId>,
    request_spot: u16,
    flags: RequestFlags,
    max_payload_size: u16,
}

impl FrameParser {
    /// Create a parser with the default payload ceiling.
    pub fn new() -> Self {
        Self::with_max_payload(DEFAULT_MAX_PAYLOAD_SIZE)
    }

    /// Create a parser accepting declared lengths up to `max_payload_size`.
    pub fn with_max_payload(max_payload_size: u16) -> Self {
        Self {
            counter: 0,
            header: [0; 4],
            len: 0,
            target: None,
            checksum: Checksum::new(),
            received_a: 0,
            response: Packet::default(),
            ack: Packet::default(),
            auto: HashMap::new(),
            requested: None,
            request_spot: 0,
            flags: RequestFlags::default(),
            max_payload_size,
        }
    }

    /// Start tracking `msg` as the outstanding request.
    ///
    /// `starting_spot` is the payload offset from which the answer is recorded.
    /// A frame already part-way received predates the request and is dropped.
    pub fn begin_request(&mut self, msg: MessageId, starting_spot: u16) {
        if self.in_frame() {
            tracing::debug!("Dropping partial {} frame before request", self.current_msg());
            self.reset();
        }
        self.requested = Some(msg);
        self.request_spot = starting_spot;
        self.flags = RequestFlags::default();
        self.response.reset_validity();
        self.ack.reset_validity();
    }

    /// Stop tracking the outstanding request.
    pub fn end_request(&mut self) {
        self.requested = None;
        self.request_spot = 0;
    }

    /// Outstanding request, if any.
    #[inline]
    pub fn requested(&self) -> Option<MessageId> {
        self.requested
    }

    /// Latched outcome flags for the outstanding request.
    #[inline]
    pub fn flags(&self) -> RequestFlags {
        self.flags
    }

    /// Response / scratch buffer.
    #[inline]
    pub fn response(&self) -> &Packet {
        &self.response
    }

    /// Last ACK-class frame.
    #[inline]
    pub fn ack(&self) -> &Packet {
        &self.ack
    }

    /// Route future `msg` frames into an automatic buffer.
    pub fn register_auto(&mut self, msg: MessageId) {
        self.auto.entry(msg).or_default();
    }

    /// Stop routing `msg` into an automatic buffer and free it.
    pub fn unregister_auto(&mut self, msg: MessageId) {
        self.auto.remove(&msg);
    }

    /// Check if `msg` has an automatic buffer.
    #[inline]
    pub fn is_auto(&self, msg: MessageId) -> bool {
        self.auto.contains_key(&msg)
    }

    /// Latest automatic `msg` frame if it has not been taken yet.
    pub fn take_auto(&mut self, msg: MessageId) -> Option<&Packet> {
        let slot = self.auto.get_mut(&msg)?;
        if !slot.fresh {
            return None;
        }
        slot.fresh = false;
        Some(&slot.packet)
    }

    /// Latest automatic `msg` frame, fresh or not.
    pub fn auto_packet(&self, msg: MessageId) -> Option<&Packet> {
        self.auto
            .get(&msg)
            .map(|slot| &slot.packet)
            .filter(|packet| packet.valid() == Validity::Valid)
    }

    /// Check if a frame is partially received.
    #[inline]
    pub fn in_frame(&self) -> bool {
        self.counter != 0
    }

    /// Drop any partially received frame and return to scanning.
    pub fn reset(&mut self) {
        self.counter = 0;
        self.target = None;
    }

    /// Consume one byte. Returns a summary when it completes a routed frame.
    pub fn feed(&mut self, byte: u8) -> Option<Decoded> {
        match self.counter {
            0 => {
                // Stray bytes between frames are discarded.
                if byte == SYNC_CHAR_1 {
                    self.counter = 1;
                }
                None
            }
            1 => {
                if byte == SYNC_CHAR_2 {
                    self.counter = 2;
                    self.checksum.reset();
                } else if byte != SYNC_CHAR_1 {
                    self.counter = 0;
                }
                None
            }
            2 | 4 => {
                self.header[self.counter - 2] = byte;
                self.checksum.update(byte);
                self.counter += 1;
                None
            }
            3 => {
                self.header[1] = byte;
                self.checksum.update(byte);
                self.target = Some(self.route(self.current_msg()));
                self.counter += 1;
                None
            }
            5 => {
                self.header[3] = byte;
                self.checksum.update(byte);
                self.len = usize::from(u16::from_le_bytes([self.header[2], self.header[3]]));
                self.begin_payload();
                self.counter += 1;
                None
            }
            n if n < HEADER_SIZE + self.len => {
                self.checksum.update(byte);
                let index = n - HEADER_SIZE;
                if let Some(packet) = self.target_packet() {
                    packet.record(index, byte);
                    packet.counter = packet.counter.wrapping_add(1);
                }
                self.counter += 1;
                None
            }
            n if n == HEADER_SIZE + self.len => {
                self.received_a = byte;
                self.counter += 1;
                None
            }
            _ => {
                let decoded = self.finish(byte);
                self.counter = 0;
                self.target = None;
                decoded
            }
        }
    }

    fn current_msg(&self) -> MessageId {
        MessageId::new(self.header[0], self.header[1])
    }

    fn route(&self, msg: MessageId) -> Slot {
        if msg.is_ack_class() {
            Slot::Ack
        } else if self.requested != Some(msg) && self.auto.contains_key(&msg) {
            Slot::Auto
        } else {
            Slot::Response
        }
    }

    fn target_packet(&mut self) -> Option<&mut Packet> {
        match self.target? {
            Slot::Response => Some(&mut self.response),
            Slot::Ack => Some(&mut self.ack),
            Slot::Auto => {
                let msg = self.current_msg();
                self.auto.get_mut(&msg).map(|slot| &mut slot.packet)
            }
        }
    }

    /// Size the destination buffer once the length is known.
    fn begin_payload(&mut self) {
        let Some(slot) = self.target else {
            return;
        };
        let msg = self.current_msg();
        let matches_request = self.requested == Some(msg);

        if self.len > usize::from(self.max_payload_size) {
            tracing::warn!(
                "Dropping {} frame: length {} exceeds maximum {}",
                msg,
                self.len,
                self.max_payload_size
            );
            if matches_request {
                self.flags.mem_err = true;
            }
            self.target = None;
            return;
        }

        if slot == Slot::Response && self.flags.captured {
            tracing::warn!(
                "Response for {:?} overwritten by {} before it was consumed",
                self.requested,
                msg
            );
            self.flags.overwritten = true;
        }

        let spot = if slot == Slot::Response && matches_request {
            self.request_spot
        } else {
            0
        };
        let requested = self.requested;
        let len = self.len as u16;
        let Some(packet) = self.target_packet() else {
            return;
        };
        packet.starting_spot = spot;
        if let Err(status) = packet.prepare(msg, len) {
            tracing::warn!("Could not size payload buffer for {}: {}", msg, status);
            if matches_request {
                self.flags.mem_err = true;
            }
            self.target = None;
            return;
        }
        if slot == Slot::Response {
            if let Some(requested) = requested {
                packet.set_class_and_id_match(if requested == msg {
                    Validity::Valid
                } else {
                    Validity::NotValid
                });
            }
        }
    }

    /// Compare checksums and update buffer state.
    fn finish(&mut self, received_b: u8) -> Option<Decoded> {
        let slot = self.target?;
        let msg = self.current_msg();
        let received_a = self.received_a;
        let ok = self.checksum.result() == (received_a, received_b);
        let valid = if ok { Validity::Valid } else { Validity::NotValid };
        let requested = self.requested;

        let packet = self.target_packet()?;
        packet.checksum_a = received_a;
        packet.checksum_b = received_b;
        packet.counter = packet.counter.wrapping_add(2);
        packet.set_valid(valid);

        match slot {
            Slot::Response => {
                if requested == Some(msg) {
                    if ok {
                        self.flags.captured = true;
                    } else {
                        self.flags.crc_fail = true;
                    }
                }
            }
            Slot::Ack => self.finish_ack(msg, ok, requested),
            Slot::Auto => {
                if let Some(auto) = self.auto.get_mut(&msg) {
                    auto.fresh = ok;
                }
            }
        }

        if ok {
            tracing::trace!("Decoded {} frame ({} bytes) into {:?}", msg, self.len, slot);
        } else {
            tracing::warn!("Checksum mismatch on {} frame", msg);
        }
        Some(Decoded { slot, msg, valid })
    }

    fn finish_ack(&mut self, msg: MessageId, ok: bool, requested: Option<MessageId>) {
        let Some(requested) = requested else {
            return;
        };
        if !ok {
            self.flags.ack_crc_fail = true;
            self.ack.set_class_and_id_match(Validity::NotValid);
            return;
        }
        let names_request = self.ack.payload() == [requested.class, requested.id];
        let outcome = match (names_request, msg.id) {
            (true, id::ACK_ACK) => Validity::Valid,
            (true, id::ACK_NAK) => Validity::NotAcknowledged,
            _ => Validity::NotValid,
        };
        self.ack.set_class_and_id_match(outcome);
        let names_outcome = matches!(outcome, Validity::Valid | Validity::NotAcknowledged);
        if names_outcome && !self.flags.ack.is_defined() {
            self.flags.ack = outcome;
        }
    }
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Status a data-returning request should resolve to, given its flags.
///
/// Returns `None` while the request is still unanswered.
pub fn data_outcome(flags: &RequestFlags) -> Option<Status> {
    if flags.overwritten {
        Some(Status::DataOverwritten)
    } else if flags.captured {
        Some(Status::DataReceived)
    } else if flags.mem_err {
        Some(Status::MemErr)
    } else if flags.crc_fail {
        Some(Status::CrcFail)
    } else if flags.ack == Validity::NotAcknowledged {
        Some(Status::CommandNack)
    } else {
        None
    }
}

/// Status an ack-only request should resolve to, given its flags.
///
/// Returns `None` while the request is still unanswered.
pub fn ack_outcome(flags: &RequestFlags) -> Option<Status> {
    match flags.ack {
        Validity::Valid => Some(Status::DataSent),
        Validity::NotAcknowledged => Some(Status::CommandNack),
        _ if flags.ack_crc_fail => Some(Status::CrcFail),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::build_frame;

    fn feed_all(parser: &mut FrameParser, bytes: &[u8]) -> Vec<Decoded> {
        bytes.iter().filter_map(|&b| parser.feed(b)).collect()
    }

    fn ack_frame(ack_id: u8, acked: MessageId) -> bytes::Bytes {
        build_frame(MessageId::new(0x05, ack_id), &[acked.class, acked.id])
    }

    #[test]
    fn test_single_matching_frame() {
        let mut parser = FrameParser::new();
        parser.begin_request(MessageId::NAV_PVT, 0);

        let payload: Vec<u8> = (0..92).collect();
        let decoded = feed_all(&mut parser, &build_frame(MessageId::NAV_PVT, &payload));

        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].slot, Slot::Response);
        assert_eq!(decoded[0].valid, Validity::Valid);
        assert!(parser.response().is_trusted());
        assert_eq!(parser.response().payload(), &payload[..]);
        assert_eq!(parser.response().counter, 4 + 92 + 2);
        assert!(parser.flags().captured);
        assert!(!parser.in_frame());
    }

    #[test]
    fn test_zero_length_frame_is_valid() {
        let mut parser = FrameParser::new();
        parser.begin_request(MessageId::CFG_RATE, 0);

        let decoded = feed_all(&mut parser, &build_frame(MessageId::CFG_RATE, &[]));

        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].valid, Validity::Valid);
        assert!(parser.response().payload().is_empty());
        assert!(parser.flags().captured);
    }

    #[test]
    fn test_stray_bytes_are_discarded() {
        let mut parser = FrameParser::new();
        parser.begin_request(MessageId::CFG_RATE, 0);

        let mut stream = vec![0x00, 0x24, 0xB5, 0x00, 0x62, 0xFF];
        stream.extend_from_slice(&build_frame(MessageId::CFG_RATE, &[1, 2]));
        stream.extend_from_slice(b"$GNGGA");

        let decoded = feed_all(&mut parser, &stream);
        assert_eq!(decoded.len(), 1);
        assert_eq!(parser.response().payload(), &[1, 2]);
    }

    #[test]
    fn test_repeated_first_sync_byte() {
        let mut parser = FrameParser::new();
        let mut stream = vec![0xB5, 0xB5];
        stream.extend_from_slice(&build_frame(MessageId::CFG_RATE, &[7])[1..]);

        let decoded = feed_all(&mut parser, &stream);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].valid, Validity::Valid);
    }

    #[test]
    fn test_corrupted_payload_is_invalid() {
        let mut parser = FrameParser::new();
        parser.begin_request(MessageId::CFG_RATE, 0);

        let mut bytes = build_frame(MessageId::CFG_RATE, &[1, 2, 3, 4]).to_vec();
        bytes[HEADER_SIZE + 2] ^= 0x01;

        let decoded = feed_all(&mut parser, &bytes);
        assert_eq!(decoded[0].valid, Validity::NotValid);
        assert_eq!(parser.response().valid(), Validity::NotValid);
        // Class and id still matched: answered but corrupt.
        assert_eq!(parser.response().class_and_id_match(), Validity::Valid);
        assert!(parser.flags().crc_fail);
        assert!(!parser.flags().captured);
        assert_eq!(data_outcome(&parser.flags()), Some(Status::CrcFail));
    }

    #[test]
    fn test_well_formed_frame_for_other_message() {
        let mut parser = FrameParser::new();
        parser.begin_request(MessageId::CFG_RATE, 0);

        feed_all(&mut parser, &build_frame(MessageId::new(0x0A, 0x04), &[9; 40]));

        assert_eq!(parser.response().valid(), Validity::Valid);
        assert_eq!(parser.response().class_and_id_match(), Validity::NotValid);
        assert_eq!(data_outcome(&parser.flags()), None);
    }

    #[test]
    fn test_ack_and_nak_for_request() {
        let mut parser = FrameParser::new();
        parser.begin_request(MessageId::CFG_VALSET, 0);
        feed_all(&mut parser, &ack_frame(0x01, MessageId::CFG_VALSET));
        assert_eq!(parser.flags().ack, Validity::Valid);
        assert_eq!(ack_outcome(&parser.flags()), Some(Status::DataSent));

        parser.begin_request(MessageId::CFG_VALSET, 0);
        feed_all(&mut parser, &ack_frame(0x00, MessageId::CFG_VALSET));
        assert_eq!(parser.flags().ack, Validity::NotAcknowledged);
        assert_eq!(ack_outcome(&parser.flags()), Some(Status::CommandNack));
    }

    #[test]
    fn test_ack_for_other_message_is_ignored() {
        let mut parser = FrameParser::new();
        parser.begin_request(MessageId::CFG_VALSET, 0);
        feed_all(&mut parser, &ack_frame(0x01, MessageId::CFG_RATE));

        assert_eq!(parser.ack().class_and_id_match(), Validity::NotValid);
        assert_eq!(ack_outcome(&parser.flags()), None);

        // A later ACK for the request still counts.
        feed_all(&mut parser, &ack_frame(0x01, MessageId::CFG_VALSET));
        assert_eq!(ack_outcome(&parser.flags()), Some(Status::DataSent));
    }

    #[test]
    fn test_corrupted_ack_reports_crc_fail() {
        let mut parser = FrameParser::new();
        parser.begin_request(MessageId::CFG_VALSET, 0);
        let mut bytes = ack_frame(0x01, MessageId::CFG_VALSET).to_vec();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;

        feed_all(&mut parser, &bytes);
        assert_eq!(ack_outcome(&parser.flags()), Some(Status::CrcFail));
    }

    #[test]
    fn test_auto_frames_do_not_touch_response() {
        let mut parser = FrameParser::new();
        parser.register_auto(MessageId::NAV_PVT);
        parser.begin_request(MessageId::CFG_RATE, 0);

        feed_all(&mut parser, &build_frame(MessageId::CFG_RATE, &[1, 0]));
        feed_all(&mut parser, &build_frame(MessageId::NAV_PVT, &[5; 92]));

        assert!(!parser.flags().overwritten);
        assert_eq!(parser.response().payload(), &[1, 0]);
        assert_eq!(parser.take_auto(MessageId::NAV_PVT).unwrap().payload(), &[5; 92][..]);
        assert!(parser.take_auto(MessageId::NAV_PVT).is_none());
        assert!(parser.auto_packet(MessageId::NAV_PVT).is_some());
    }

    #[test]
    fn test_requested_auto_message_goes_to_response() {
        let mut parser = FrameParser::new();
        parser.register_auto(MessageId::NAV_PVT);
        parser.begin_request(MessageId::NAV_PVT, 0);

        let decoded = feed_all(&mut parser, &build_frame(MessageId::NAV_PVT, &[1; 92]));
        assert_eq!(decoded[0].slot, Slot::Response);
        assert!(parser.flags().captured);
    }

    #[test]
    fn test_captured_response_overwritten_by_unsolicited_frame() {
        let mut parser = FrameParser::new();
        parser.begin_request(MessageId::CFG_RATE, 0);

        let mut stream = build_frame(MessageId::CFG_RATE, &[0xE8, 0x03]).to_vec();
        stream.extend_from_slice(&build_frame(MessageId::new(0x0A, 0x09), &[0xAA; 8]));
        feed_all(&mut parser, &stream);

        let flags = parser.flags();
        assert!(flags.captured);
        assert!(flags.overwritten);
        assert_eq!(data_outcome(&flags), Some(Status::DataOverwritten));
        // The scratch buffer now holds the unsolicited frame, correctly labelled.
        assert_eq!(parser.response().message_id(), MessageId::new(0x0A, 0x09));
        assert!(!parser.response().is_trusted());
    }

    #[test]
    fn test_unsolicited_then_answer_yields_answer() {
        let mut parser = FrameParser::new();
        parser.begin_request(MessageId::CFG_RATE, 0);

        let mut stream = build_frame(MessageId::new(0x0A, 0x09), &[0xAA; 8]).to_vec();
        stream.extend_from_slice(&build_frame(MessageId::CFG_RATE, &[0xE8, 0x03]));
        feed_all(&mut parser, &stream);

        assert_eq!(data_outcome(&parser.flags()), Some(Status::DataReceived));
        assert_eq!(parser.response().payload(), &[0xE8, 0x03]);
        assert!(parser.response().is_trusted());
    }

    #[test]
    fn test_oversize_frame_is_skipped_and_stays_in_sync() {
        let mut parser = FrameParser::with_max_payload(16);
        parser.begin_request(MessageId::NAV_PVT, 0);

        let mut stream = build_frame(MessageId::NAV_PVT, &[0xB5; 92]).to_vec();
        stream.extend_from_slice(&build_frame(MessageId::CFG_RATE, &[3]));
        let decoded = feed_all(&mut parser, &stream);

        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].msg, MessageId::CFG_RATE);
        assert!(parser.flags().mem_err);
        assert_eq!(data_outcome(&parser.flags()), Some(Status::MemErr));
    }

    #[test]
    fn test_oversize_frame_keeps_previous_payload() {
        let mut parser = FrameParser::with_max_payload(16);
        feed_all(&mut parser, &build_frame(MessageId::CFG_RATE, &[1, 2, 3]));
        feed_all(&mut parser, &build_frame(MessageId::NAV_PVT, &[0; 92]));

        assert_eq!(parser.response().message_id(), MessageId::CFG_RATE);
        assert_eq!(parser.response().payload(), &[1, 2, 3]);
        assert_eq!(parser.response().valid(), Validity::Valid);
    }

    #[test]
    fn test_starting_spot_for_request() {
        let mut parser = FrameParser::new();
        parser.begin_request(MessageId::CFG_VALGET, 4);

        let payload = [0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x21, 0x30, 0xE8, 0x03];
        feed_all(&mut parser, &build_frame(MessageId::CFG_VALGET, &payload));

        assert!(parser.response().is_trusted());
        assert_eq!(parser.response().payload(), &payload[4..]);
    }

    #[test]
    fn test_byte_at_a_time_across_two_frames() {
        let mut parser = FrameParser::new();
        let mut stream = build_frame(MessageId::CFG_RATE, b"first").to_vec();
        stream.extend_from_slice(&build_frame(MessageId::CFG_RATE, b"second"));

        let decoded = feed_all(&mut parser, &stream);
        assert_eq!(decoded.len(), 2);
        assert_eq!(parser.response().payload(), b"second");
    }

    #[test]
    fn test_reset_drops_partial_frame() {
        let mut parser = FrameParser::new();
        let bytes = build_frame(MessageId::CFG_RATE, &[1, 2, 3]);
        feed_all(&mut parser, &bytes[..5]);
        assert!(parser.in_frame());

        parser.reset();
        assert!(!parser.in_frame());
        let decoded = feed_all(&mut parser, &bytes);
        assert_eq!(decoded.len(), 1);
    }

    #[test]
    fn test_partial_frame_before_request_is_not_captured() {
        let mut parser = FrameParser::new();
        let frame = build_frame(MessageId::CFG_RATE, &[0xE8, 0x03, 0x01, 0x00, 0x01, 0x00]);
        feed_all(&mut parser, &frame[..8]);
        assert!(parser.in_frame());

        parser.begin_request(MessageId::CFG_RATE, 0);
        assert!(!parser.in_frame());
        let decoded = feed_all(&mut parser, &frame[8..]);
        assert!(decoded.is_empty());
        assert!(!parser.flags().captured);

        // A complete answer after the request is captured and trusted.
        let decoded = feed_all(&mut parser, &frame);
        assert_eq!(decoded.len(), 1);
        assert!(parser.flags().captured);
        assert!(parser.response().is_trusted());
    }
}
