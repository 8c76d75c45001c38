//! Key-value configuration operations.

use std::time::Duration;

use super::Ublox;
use crate::config::{
    valget_payload, valget_value, valset_payload, ConfigKey, Layer, CFG_RATE_MEAS,
    VALGET_ANSWER_KEY_OFFSET,
};
use crate::error::Status;
use crate::protocol::{MessageId, Packet};
use crate::transport::Transport;

impl<T: Transport> Ublox<T> {
    /// Write `value` to `key` in `layer`, returning the outcome code.
    ///
    /// The value width is checked against the key before anything is sent.
    pub fn set_val_status(
        &mut self,
        key: ConfigKey,
        value: &[u8],
        layer: Layer,
        max_wait: Duration,
    ) -> Status {
        let payload = match valset_payload(key, value, layer) {
            Ok(payload) => payload,
            Err(status) => return status,
        };
        let mut packet = match Packet::with_payload(MessageId::CFG_VALSET, &payload) {
            Ok(packet) => packet,
            Err(status) => return status,
        };
        self.send_command(&mut packet, max_wait, true)
    }

    /// Write an N-byte `value` to `key`. True only if the receiver acknowledged.
    pub fn set_val_n(&mut self, key: ConfigKey, value: &[u8], layer: Layer, max_wait: Duration) -> bool {
        self.set_val_status(key, value, layer, max_wait) == Status::DataSent
    }

    /// Write a 1-byte value.
    pub fn set_val8(&mut self, key: ConfigKey, value: u8, layer: Layer, max_wait: Duration) -> bool {
        self.set_val_n(key, &[value], layer, max_wait)
    }

    /// Write a 2-byte value. Keys whose width is not two bytes are refused.
    pub fn set_val16(&mut self, key: ConfigKey, value: u16, layer: Layer, max_wait: Duration) -> bool {
        if key.value_width() != Some(2) {
            tracing::debug!("Key {} is not a 16-bit item", key);
            return false;
        }
        self.set_val_n(key, &value.to_le_bytes(), layer, max_wait)
    }

    /// Write a 4-byte value.
    pub fn set_val32(&mut self, key: ConfigKey, value: u32, layer: Layer, max_wait: Duration) -> bool {
        self.set_val_n(key, &value.to_le_bytes(), layer, max_wait)
    }

    /// Read the raw value bytes of `key` from `layer`.
    pub fn get_val_n(&mut self, key: ConfigKey, layer: Layer, max_wait: Duration) -> Result<Vec<u8>, Status> {
        let payload = valget_payload(key, layer)?;
        let mut packet = Packet::with_payload(MessageId::CFG_VALGET, &payload)?;
        packet.starting_spot = VALGET_ANSWER_KEY_OFFSET;

        let status = self.send_command(&mut packet, max_wait, false);
        if status != Status::DataReceived {
            return Err(status);
        }
        let response = self.response();
        if !response.is_trusted() {
            return Err(Status::Fail);
        }
        valget_value(key, response.payload()).map(<[u8]>::to_vec)
    }

    /// Read a 1-byte value.
    pub fn get_val8(&mut self, key: ConfigKey, layer: Layer, max_wait: Duration) -> Result<u8, Status> {
        if key.value_width() != Some(1) {
            return Err(Status::InvalidArg);
        }
        let value = self.get_val_n(key, layer, max_wait)?;
        Ok(value[0])
    }

    /// Read a 2-byte value.
    pub fn get_val16(&mut self, key: ConfigKey, layer: Layer, max_wait: Duration) -> Result<u16, Status> {
        if key.value_width() != Some(2) {
            return Err(Status::InvalidArg);
        }
        let value = self.get_val_n(key, layer, max_wait)?;
        Ok(u16::from_le_bytes([value[0], value[1]]))
    }

    /// Set the time between measurements in milliseconds.
    ///
    /// On success, idle polling is retuned to a quarter of the period.
    pub fn set_measurement_rate(&mut self, rate_ms: u16, layer: Layer, max_wait: Duration) -> bool {
        if rate_ms == 0 {
            return false;
        }
        let ok = self.set_val16(CFG_RATE_MEAS, rate_ms, layer, max_wait);
        if ok {
            self.retune_polling(Duration::from_millis(u64::from(rate_ms)));
        }
        ok
    }

    /// Check that the receiver answers a CFG-RATE poll.
    pub fn is_connected(&mut self, max_wait: Duration) -> bool {
        let mut poll = Packet::new(MessageId::CFG_RATE);
        self.send_command(&mut poll, max_wait, false) == Status::DataReceived
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{UBX_CFG_U2, CFG_RATE_TIMEREF};
    use crate::protocol::{build_frame, HEADER_SIZE};
    use crate::transport::MockTransport;

    const WAIT: Duration = Duration::from_millis(50);

    fn ack(acked: MessageId) -> bytes::Bytes {
        build_frame(MessageId::ACK_ACK, &[acked.class, acked.id])
    }

    fn nak(acked: MessageId) -> bytes::Bytes {
        build_frame(MessageId::ACK_NAK, &[acked.class, acked.id])
    }

    fn engine(mock: MockTransport) -> Ublox<MockTransport> {
        Ublox::builder()
            .poll_interval(Duration::from_micros(100))
            .build(mock)
    }

    #[test]
    fn test_set_val16_acknowledged() {
        let mut mock = MockTransport::new();
        mock.reply_with(ack(MessageId::CFG_VALSET));
        let mut gnss = engine(mock);

        assert!(gnss.set_val16(CFG_RATE_MEAS, 1000, Layer::RAM_BBR, WAIT));

        let frame = &gnss.transport().writes()[0];
        assert_eq!(frame[2], 0x06);
        assert_eq!(frame[3], 0x8A);
        let payload = &frame[HEADER_SIZE..frame.len() - 2];
        assert_eq!(payload, &[0x00, 0x03, 0x00, 0x00, 0x01, 0x00, 0x21, 0x30, 0xE8, 0x03]);
    }

    #[test]
    fn test_set_val_nacked() {
        let mut mock = MockTransport::new();
        mock.reply_with(nak(MessageId::CFG_VALSET));
        let mut gnss = engine(mock);

        let key = ConfigKey::new(UBX_CFG_U2 | 0x3021_0001);
        assert_eq!(
            gnss.set_val_status(key, &[0xE8, 0x03], Layer::RAM, WAIT),
            Status::CommandNack
        );
    }

    #[test]
    fn test_width_mismatch_sends_nothing() {
        let mut gnss = engine(MockTransport::new());

        assert_eq!(
            gnss.set_val_status(CFG_RATE_MEAS, &[0x01], Layer::RAM, WAIT),
            Status::InvalidArg
        );
        assert!(!gnss.set_val8(CFG_RATE_MEAS, 1, Layer::RAM, WAIT));
        assert!(!gnss.set_val16(CFG_RATE_TIMEREF, 1, Layer::RAM, WAIT));
        assert!(!gnss.set_val32(CFG_RATE_MEAS, 1, Layer::RAM, WAIT));
        assert!(gnss.transport().writes().is_empty());
    }

    #[test]
    fn test_empty_layer_sends_nothing() {
        let mut gnss = engine(MockTransport::new());
        assert_eq!(
            gnss.set_val_status(CFG_RATE_MEAS, &[0xE8, 0x03], Layer::from_bits(0), WAIT),
            Status::InvalidArg
        );
        assert!(gnss.transport().writes().is_empty());
    }

    #[test]
    fn test_get_val16() {
        let mut mock = MockTransport::new();
        let answer = [0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x21, 0x30, 0xC8, 0x00];
        mock.reply_with(build_frame(MessageId::CFG_VALGET, &answer));
        let mut gnss = engine(mock);

        assert_eq!(gnss.get_val16(CFG_RATE_MEAS, Layer::RAM, WAIT), Ok(200));

        let frame = &gnss.transport().writes()[0];
        let payload = &frame[HEADER_SIZE..frame.len() - 2];
        assert_eq!(payload, &[0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x21, 0x30]);
    }

    #[test]
    fn test_get_val_wrong_key_echo() {
        let mut mock = MockTransport::new();
        let answer = [0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x21, 0x30, 0x01, 0x00];
        mock.reply_with(build_frame(MessageId::CFG_VALGET, &answer));
        let mut gnss = engine(mock);

        assert_eq!(
            gnss.get_val16(CFG_RATE_MEAS, Layer::RAM, WAIT),
            Err(Status::InvalidOperation)
        );
    }

    #[test]
    fn test_get_val_nacked() {
        let mut mock = MockTransport::new();
        mock.reply_with(nak(MessageId::CFG_VALGET));
        let mut gnss = engine(mock);

        assert_eq!(gnss.get_val8(CFG_RATE_TIMEREF, Layer::FLASH, WAIT), Err(Status::CommandNack));
    }

    #[test]
    fn test_set_measurement_rate_retunes_polling() {
        let mut mock = MockTransport::new();
        mock.reply_with(ack(MessageId::CFG_VALSET));
        let mut gnss = engine(mock);

        assert!(gnss.set_measurement_rate(200, Layer::RAM_BBR, WAIT));
        assert_eq!(gnss.polling_wait(), Duration::from_millis(50));
        assert!(!gnss.set_measurement_rate(0, Layer::RAM_BBR, WAIT));
    }

    #[test]
    fn test_is_connected() {
        let mut mock = MockTransport::new();
        mock.reply_with(build_frame(MessageId::CFG_RATE, &[0xE8, 0x03, 0x01, 0x00, 0x00, 0x00]));
        let mut gnss = engine(mock);
        assert!(gnss.is_connected(WAIT));
        assert!(!gnss.is_connected(Duration::from_millis(5)));
    }
}
