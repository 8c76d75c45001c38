//! Set Rate - configure the measurement rate against a scripted receiver.
//!
//! This example demonstrates:
//! - Building an engine with the builder pattern
//! - Writing and reading back a configuration item
//! - Checking the outcome codes
//!
//! # Running
//!
//! ```text
//! RUST_LOG=ubxwire=debug cargo run --example set_rate
//! ```

use std::time::Duration;

use tracing_subscriber::EnvFilter;
use ubxwire::config::{Layer, CFG_RATE_MEAS};
use ubxwire::protocol::{build_frame, MessageId};
use ubxwire::transport::MockTransport;
use ubxwire::Ublox;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // The scripted receiver acknowledges the write, then answers the read.
    let mut receiver = MockTransport::new();
    receiver.reply_with(build_frame(MessageId::ACK_ACK, &[0x06, 0x8A]));
    receiver.reply_with(build_frame(
        MessageId::CFG_VALGET,
        &[0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x21, 0x30, 0xC8, 0x00],
    ));

    let mut gnss = Ublox::builder()
        .max_wait(Duration::from_millis(250))
        .build(receiver);
    let wait = gnss.default_max_wait();

    if gnss.set_measurement_rate(200, Layer::RAM_BBR, wait) {
        println!("Measurement rate set, idle polling every {:?}", gnss.polling_wait());
    } else {
        println!("Receiver refused the new rate");
    }

    match gnss.get_val16(CFG_RATE_MEAS, Layer::RAM, wait) {
        Ok(rate) => println!("Receiver reports {} ms between measurements", rate),
        Err(status) => println!("Read back failed: {}", status),
    }

    for frame in gnss.transport().writes() {
        println!("sent {:02X?}", &frame[..]);
    }
}
