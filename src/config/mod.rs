//! Key-value configuration protocol.
//!
//! - [`ConfigKey`] - self-describing 32-bit keys and their value widths
//! - [`Layer`] - persistence layer selector
//! - VALSET / VALGET payload builders
//!
//! # Example
//!
//! ```
//! use ubxwire::config::{valset_payload, Layer, CFG_RATE_MEAS};
//! use ubxwire::Status;
//!
//! // Width is checked against the key before anything is built.
//! assert_eq!(valset_payload(CFG_RATE_MEAS, &[0x01], Layer::RAM), Err(Status::InvalidArg));
//! ```

mod key;
mod layer;
mod message;

pub use key::{
    ConfigKey, WidthClass, CFG_MSGOUT_UBX_NAV_PVT_I2C, CFG_MSGOUT_UBX_NAV_PVT_SPI,
    CFG_MSGOUT_UBX_NAV_PVT_UART1, CFG_RATE_MEAS, CFG_RATE_NAV, CFG_RATE_NAV_PRIO,
    CFG_RATE_TIMEREF, UBX_CFG_E1, UBX_CFG_SIZE_MASK, UBX_CFG_U1, UBX_CFG_U2,
};
pub use layer::Layer;
pub use message::{
    valget_payload, valget_value, valset_payload, VALGET_ANSWER_KEY_OFFSET, VAL_HEADER_SIZE,
};
