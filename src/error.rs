//! Error and outcome types for ubxwire.
//!
//! Two layers:
//! - [`Status`] is the closed set of outcomes every engine operation resolves to.
//! - [`UbxError`] carries failures from transport adapters and configuration
//!   loading, and maps onto a [`Status`] when it crosses the engine boundary.

use std::fmt;

use thiserror::Error;

use crate::transport::BusKind;

/// Outcome code of an engine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Operation completed.
    Success,
    /// Generic failure (e.g. the bus lock could not be taken).
    Fail,
    /// A frame for the request arrived but its checksum did not match.
    CrcFail,
    /// Nothing matching arrived within the wait window.
    Timeout,
    /// The receiver answered with ACK-NAK.
    CommandNack,
    /// A value fell outside its permitted range.
    OutOfRange,
    /// Argument rejected locally (e.g. value width does not fit the key).
    InvalidArg,
    /// Operation not valid in the current state.
    InvalidOperation,
    /// Payload buffer could not be sized.
    MemErr,
    /// Transport hardware failure (serial or unspecified bus).
    HwErr,
    /// A set command was acknowledged.
    DataSent,
    /// A poll command was answered with data.
    DataReceived,
    /// I2C transfer failed.
    I2cCommFailure,
    /// SPI transfer failed.
    SpiCommFailure,
    /// The captured response was clobbered by another frame before it was consumed.
    DataOverwritten,
}

impl Status {
    /// True for `Success`, `DataSent` and `DataReceived`.
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success | Status::DataSent | Status::DataReceived)
    }

    /// Short, stable name used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Fail => "fail",
            Status::CrcFail => "crc fail",
            Status::Timeout => "timeout",
            Status::CommandNack => "command nack",
            Status::OutOfRange => "out of range",
            Status::InvalidArg => "invalid argument",
            Status::InvalidOperation => "invalid operation",
            Status::MemErr => "memory error",
            Status::HwErr => "hardware error",
            Status::DataSent => "data sent",
            Status::DataReceived => "data received",
            Status::I2cCommFailure => "i2c comm failure",
            Status::SpiCommFailure => "spi comm failure",
            Status::DataOverwritten => "data overwritten",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failures raised by transport adapters and configuration loading.
#[derive(Debug, Error)]
pub enum UbxError {
    /// I/O error from an underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error while loading engine configuration.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Bus-level failure reported by a transport adapter.
    #[error("Transport error on {bus}: {message}")]
    Transport {
        /// Bus the failure happened on.
        bus: BusKind,
        /// Adapter-specific detail.
        message: String,
    },

    /// Engine configuration rejected.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl UbxError {
    /// Map this error onto the outcome code for a transport of kind `bus`.
    pub fn status(&self, bus: BusKind) -> Status {
        match self {
            UbxError::Transport { bus, .. } => bus.failure_status(),
            UbxError::Io(_) => bus.failure_status(),
            UbxError::Json(_) | UbxError::Config(_) => Status::InvalidArg,
        }
    }
}

/// Result type alias using UbxError.
pub type Result<T> = std::result::Result<T, UbxError>;
