//! CFG-VALSET / CFG-VALGET payload builders.
//!
//! ```text
//! VALSET: [version 0][layer mask][0x00][0x00][key u32 LE][value N bytes]
//! VALGET: [version 0][layer index][0x00][0x00][key u32 LE]
//! answer: [version 1][layer][position u16][key u32 LE][value]
//! ```
//!
//! Builders validate locally and fail with `InvalidArg` before anything
//! is transmitted.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use super::key::ConfigKey;
use super::layer::Layer;
use crate::error::Status;

/// Bytes before the first key in VALSET / VALGET payloads.
pub const VAL_HEADER_SIZE: usize = 4;

/// Offset of the key echoed in a VALGET answer.
pub const VALGET_ANSWER_KEY_OFFSET: u16 = VAL_HEADER_SIZE as u16;

/// Build a CFG-VALSET payload setting `key` to `value` in `layer`.
///
/// # Example
///
/// ```
/// use ubxwire::config::{valset_payload, Layer, CFG_RATE_MEAS};
///
/// let payload = valset_payload(CFG_RATE_MEAS, &1000u16.to_le_bytes(), Layer::RAM_BBR).unwrap();
/// assert_eq!(&payload[..], &[0x00, 0x03, 0x00, 0x00, 0x01, 0x00, 0x21, 0x30, 0xE8, 0x03]);
/// ```
pub fn valset_payload(key: ConfigKey, value: &[u8], layer: Layer) -> Result<Bytes, Status> {
    if !key.accepts_width(value.len()) {
        tracing::debug!(
            "Rejecting VALSET for key {}: value width {} does not fit width {:?}",
            key,
            value.len(),
            key.value_width()
        );
        return Err(Status::InvalidArg);
    }
    if !layer.is_writable() {
        tracing::debug!("Rejecting VALSET for key {}: layer 0x{:02X}", key, layer.bits());
        return Err(Status::InvalidArg);
    }

    let mut buf = BytesMut::with_capacity(VAL_HEADER_SIZE + 4 + value.len());
    buf.put_u8(0x00);
    buf.put_u8(layer.bits());
    buf.put_u16(0);
    buf.put_u32_le(key.wire_id());
    buf.put_slice(value);
    Ok(buf.freeze())
}

/// Build a CFG-VALGET poll for `key` from `layer`.
pub fn valget_payload(key: ConfigKey, layer: Layer) -> Result<Bytes, Status> {
    let index = layer.read_index().ok_or(Status::InvalidArg)?;
    if key.value_width().is_none() {
        return Err(Status::InvalidArg);
    }

    let mut buf = BytesMut::with_capacity(VAL_HEADER_SIZE + 4);
    buf.put_u8(0x00);
    buf.put_u8(index);
    buf.put_u16(0);
    buf.put_u32_le(key.wire_id());
    Ok(buf.freeze())
}

/// Extract the value for `key` from a VALGET answer recorded from
/// [`VALGET_ANSWER_KEY_OFFSET`] onward (key followed by value).
///
/// Fails with `InvalidOperation` if the echoed key differs and with
/// `OutOfRange` if the answer is shorter than the key's width.
pub fn valget_value(key: ConfigKey, mut answer: &[u8]) -> Result<&[u8], Status> {
    let width = key.value_width().ok_or(Status::InvalidArg)?;
    if answer.remaining() < 4 + width {
        return Err(Status::OutOfRange);
    }
    if answer.get_u32_le() != key.wire_id() {
        return Err(Status::InvalidOperation);
    }
    Ok(&answer[..width])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::key::{CFG_RATE_MEAS, CFG_RATE_TIMEREF, UBX_CFG_U2};

    #[test]
    fn test_valset_rate_meas_scenario() {
        let key = ConfigKey::new(UBX_CFG_U2 | 0x3021_0001);
        let payload = valset_payload(key, &0x03E8u16.to_le_bytes(), Layer::RAM_BBR).unwrap();

        assert_eq!(payload.len(), 10);
        assert_eq!(payload[0], 0x00); // message version
        assert_eq!(payload[1], Layer::RAM_BBR.bits());
        assert_eq!(&payload[2..4], &[0x00, 0x00]);
        assert_eq!(&payload[4..8], &key.wire_id().to_le_bytes());
        assert_eq!(&payload[8..], &[0xE8, 0x03]);
    }

    #[test]
    fn test_valset_width_mismatch() {
        assert_eq!(
            valset_payload(CFG_RATE_MEAS, &[0x01], Layer::RAM).unwrap_err(),
            Status::InvalidArg
        );
        assert_eq!(
            valset_payload(CFG_RATE_TIMEREF, &[0x01, 0x00], Layer::RAM).unwrap_err(),
            Status::InvalidArg
        );
    }

    #[test]
    fn test_valset_empty_layer() {
        assert_eq!(
            valset_payload(CFG_RATE_MEAS, &[0xE8, 0x03], Layer::from_bits(0)).unwrap_err(),
            Status::InvalidArg
        );
    }

    #[test]
    fn test_valget_payload() {
        let payload = valget_payload(CFG_RATE_MEAS, Layer::BBR).unwrap();
        assert_eq!(&payload[..], &[0x00, 0x01, 0x00, 0x00, 0x01, 0x00, 0x21, 0x30]);

        assert_eq!(
            valget_payload(CFG_RATE_MEAS, Layer::RAM_BBR).unwrap_err(),
            Status::InvalidArg
        );
    }

    #[test]
    fn test_valget_value() {
        let answer = [0x01, 0x00, 0x21, 0x30, 0xE8, 0x03];
        assert_eq!(valget_value(CFG_RATE_MEAS, &answer).unwrap(), &[0xE8, 0x03]);

        let wrong_key = [0x02, 0x00, 0x21, 0x30, 0xE8, 0x03];
        assert_eq!(
            valget_value(CFG_RATE_MEAS, &wrong_key).unwrap_err(),
            Status::InvalidOperation
        );

        assert_eq!(
            valget_value(CFG_RATE_MEAS, &answer[..5]).unwrap_err(),
            Status::OutOfRange
        );
    }
}
