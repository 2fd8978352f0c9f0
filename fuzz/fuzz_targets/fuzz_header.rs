//! Fuzzes the F1 25 packet header parser.
//!
//! Run with:
//!   cargo fuzz run fuzz_header

#![no_main]

use f1_telemetry_protocol::PacketHeader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(header) = PacketHeader::decode(data) {
        let _ = header.is_valid();
        assert_eq!(PacketHeader::decode(&header.to_bytes()).ok(), Some(header));
    }
});
