//! Fuzzes the full datagram path: header, routing and every body decoder.
//!
//! Run with:
//!   cargo fuzz run fuzz_dispatch

#![no_main]

use f1_telemetry_protocol::{DispatchOutcome, Dispatcher, DropReason};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let dispatcher = Dispatcher::default();
    let outcome = dispatcher.classify(data);
    // a contained panic is still a bug
    assert!(!matches!(
        outcome,
        DispatchOutcome::Dropped(DropReason::Panicked(_))
    ));
});
