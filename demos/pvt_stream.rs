//! PVT Stream - print navigation solutions from a receiver behind a TCP bridge.
//!
//! This example demonstrates:
//! - Wrapping a `TcpStream` in a [`StreamTransport`]
//! - Enabling automatic NAV-PVT output
//! - Non-blocking polling with `get_pvt`
//!
//! # Running
//!
//! ```text
//! RUST_LOG=info cargo run --example pvt_stream -- 192.168.1.50:2101 [config.json]
//! ```
//!
//! Each solution is printed as one JSON line.

use std::net::TcpStream;
use std::thread;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use ubxwire::config::Layer;
use ubxwire::transport::StreamTransport;
use ubxwire::{EngineConfig, Ublox};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let addr = args.next().unwrap_or_else(|| "127.0.0.1:2101".to_string());
    let config = match args.next() {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    let stream = TcpStream::connect(&addr)?;
    stream.set_read_timeout(Some(Duration::from_millis(1)))?;
    tracing::info!("Connected to {}", addr);

    let mut gnss = Ublox::builder()
        .config(config)
        .build(StreamTransport::new(stream));
    let wait = gnss.default_max_wait();

    if !gnss.is_connected(wait) {
        return Err("receiver did not answer CFG-RATE".into());
    }
    if !gnss.set_auto_pvt(true, Layer::RAM, wait) {
        return Err("receiver refused automatic NAV-PVT".into());
    }

    loop {
        if gnss.get_pvt(wait) {
            if let Some(pvt) = gnss.pvt() {
                println!("{}", serde_json::to_string(pvt)?);
            }
        }
        thread::sleep(gnss.polling_wait());
    }
}
