//! Decode - run a hex dump of captured receiver output through the decoder.
//!
//! This example demonstrates:
//! - Feeding bytes one at a time into a [`FrameParser`]
//! - Inspecting routing and checksum results
//! - Decoding NAV-PVT payloads
//!
//! # Running
//!
//! ```text
//! cargo run --example decode -- b5 62 06 08 00 00 0e 30
//! xxd -p capture.ubx | cargo run --example decode
//! ```

use std::io::Read;

use tracing_subscriber::EnvFilter;
use ubxwire::nav::NavPvt;
use ubxwire::protocol::{FrameParser, MessageId, Validity};

fn parse_hex(text: &str) -> Result<Vec<u8>, std::num::ParseIntError> {
    let digits: String = text.chars().filter(|c| c.is_ascii_hexdigit()).collect();
    digits
        .as_bytes()
        .chunks(2)
        .map(|pair| u8::from_str_radix(&String::from_utf8_lossy(pair), 16))
        .collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let text = if args.is_empty() {
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        input
    } else {
        args.join(" ")
    };
    let bytes = parse_hex(&text)?;

    let mut parser = FrameParser::new();
    parser.register_auto(MessageId::NAV_PVT);

    let mut frames = 0;
    for byte in bytes {
        let Some(decoded) = parser.feed(byte) else {
            continue;
        };
        frames += 1;
        let ok = decoded.valid == Validity::Valid;
        println!("{} -> {:?} (checksum ok: {})", decoded.msg, decoded.slot, ok);

        if ok && decoded.msg == MessageId::NAV_PVT {
            let pvt = parser
                .take_auto(MessageId::NAV_PVT)
                .and_then(|packet| NavPvt::from_payload(packet.payload()));
            if let Some(pvt) = pvt {
                println!("{}", serde_json::to_string_pretty(&pvt)?);
            }
        }
    }
    println!("{} frames", frames);
    if parser.in_frame() {
        println!("input ended inside a frame");
    }
    Ok(())
}
