//! Decoded frames as they leave the listener.

use std::time::Instant;

use f1_telemetry_protocol::{PacketKind, PacketRecord};
use serde::Serialize;
use tokio::sync::mpsc;

/// Monotonic nanoseconds since the first call in this process.
pub fn telemetry_now_ns() -> u64 {
    static EPOCH: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = Instant::now()
        .checked_duration_since(*epoch)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    u64::try_from(nanos).unwrap_or(u64::MAX)
}

/// One decoded record plus intake metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedFrame {
    pub record: PacketRecord,
    /// [`telemetry_now_ns`] at the moment the datagram was received.
    pub received_at_ns: u64,
    /// Position among decoded frames from this listener, starting at 0.
    pub sequence: u64,
    pub datagram_len: usize,
}

impl DecodedFrame {
    pub fn new(record: PacketRecord, received_at_ns: u64, sequence: u64, datagram_len: usize) -> Self {
        Self {
            record,
            received_at_ns,
            sequence,
            datagram_len,
        }
    }

    pub fn kind(&self) -> PacketKind {
        self.record.kind()
    }
}

pub type FrameReceiver = mpsc::Receiver<DecodedFrame>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_monotonic() {
        let a = telemetry_now_ns();
        let b = telemetry_now_ns();
        assert!(b >= a);
    }
}
