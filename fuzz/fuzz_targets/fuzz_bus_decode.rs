//! Fuzz target: `BusCommand::decode`
//!
//! The first four bytes pick the identifier (folded onto the three known
//! ids half the time), the rest is the payload. Decoding must never panic
//! and a decoded power must come from the first payload byte.
//!
//! cargo fuzz run fuzz_bus_decode

#![no_main]

use libfuzzer_sys::fuzz_target;
use trafoctl::app::commands::{BusCommand, BusFrame, MAX_PAYLOAD};
use trafoctl::config::BusConfig;

fuzz_target!(|data: &[u8]| {
    let Some((head, payload)) = data.split_first_chunk::<4>() else {
        return;
    };
    let raw_id = u32::from_le_bytes(*head);
    let id = if raw_id & 1 == 0 { 0x1000 + (raw_id >> 1) % 3 } else { raw_id >> 1 };

    let frame = BusFrame::new(id, payload);
    assert!(frame.data.len() <= MAX_PAYLOAD);

    if let Some(BusCommand::SetPower(p)) = BusCommand::decode(&frame, &BusConfig::default()) {
        assert!(frame.data.len() >= 2);
        assert_eq!(p.unsigned_abs(), u32::from(frame.data[0]));
    }
});
