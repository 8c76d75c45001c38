//! # ubxwire
//!
//! UBX protocol engine for u-blox GNSS receivers.
//!
//! The crate frames and checksums UBX messages, reconstructs incoming frames
//! byte by byte, correlates answers with the outstanding command and reads
//! and writes configuration items through CFG-VALSET / CFG-VALGET.
//!
//! ## Architecture
//!
//! - **Protocol** ([`protocol`]): wire constants, checksum, packet buffers
//!   and the incremental decoder
//! - **Config** ([`config`]): self-describing keys, layers and VALSET /
//!   VALGET payloads
//! - **Engine** ([`Ublox`]): request/response correlation over a
//!   [`transport::Transport`]
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use ubxwire::config::{Layer, CFG_RATE_MEAS};
//! use ubxwire::protocol::{build_frame, MessageId};
//! use ubxwire::transport::MockTransport;
//! use ubxwire::Ublox;
//!
//! let mut mock = MockTransport::new();
//! mock.reply_with(build_frame(MessageId::ACK_ACK, &[0x06, 0x8A]));
//!
//! let mut gnss = Ublox::builder().build(mock);
//! assert!(gnss.set_val16(CFG_RATE_MEAS, 1000, Layer::RAM_BBR, Duration::from_millis(100)));
//! ```

pub mod config;
pub mod error;
pub mod lock;
pub mod nav;
pub mod protocol;
pub mod transport;

mod device;
mod settings;

pub use device::{Ublox, UbloxBuilder};
pub use error::{Result, Status, UbxError};
pub use settings::{
    EngineConfig, DEFAULT_MAX_BYTES_PER_POLL, DEFAULT_MAX_WAIT_MS, DEFAULT_POLLING_WAIT_MS,
    DEFAULT_POLL_INTERVAL_US,
};
