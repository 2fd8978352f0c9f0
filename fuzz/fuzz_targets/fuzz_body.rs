//! Fuzzes body decoders directly, bypassing header validation.
//!
//! The first input byte selects the packet kind; the rest is the body.
//!
//! Run with:
//!   cargo fuzz run fuzz_body

#![no_main]

use f1_telemetry_protocol::fixtures::fixture_header;
use f1_telemetry_protocol::{PacketKind, standard_decoder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((selector, body)) = data.split_first() else {
        return;
    };
    let Some(kind) = PacketKind::from_id(selector % 16) else {
        return;
    };
    if let Ok(record) = standard_decoder(kind)(fixture_header(kind, 0), body) {
        assert_eq!(record.kind(), kind);
        let _ = record.summary();
    }
});
