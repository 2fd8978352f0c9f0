//! Decode error taxonomy.
//!
//! Every variant is recoverable: the dispatcher turns each one into a dropped
//! datagram and keeps listening.

use core::fmt;

use crate::kind::PacketKind;

/// Errors produced while decoding a datagram.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Fewer bytes were available than a read at `offset` required.
    #[error("truncated input: need {needed} bytes at offset {offset}, have {available}")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A packet body was shorter than its fixed layout.
    #[error("truncated {kind} payload: {actual} bytes (need {expected})")]
    TruncatedPayload {
        kind: PacketKind,
        expected: usize,
        actual: usize,
    },

    /// The header was well-formed but does not belong to this protocol.
    #[error("invalid header: {0}")]
    InvalidHeader(HeaderRejection),

    /// The packet kind has no registered decoder.
    #[error("unknown packet kind {0}")]
    UnknownPacketKind(u8),

    /// A single field could not be interpreted.
    #[error("cannot decode field `{field}`: {reason}")]
    FieldDecode {
        field: &'static str,
        reason: String,
    },

    /// A decoder panicked; the panic was contained at the dispatcher.
    #[error("decoder for {kind} panicked")]
    DecoderPanic { kind: PacketKind },
}

impl DecodeError {
    pub(crate) fn truncated_input(offset: usize, needed: usize, available: usize) -> Self {
        DecodeError::TruncatedInput {
            offset,
            needed,
            available,
        }
    }

    /// True for errors caused by a short buffer, at any level.
    pub fn is_truncation(&self) -> bool {
        matches!(
            self,
            DecodeError::TruncatedInput { .. } | DecodeError::TruncatedPayload { .. }
        )
    }
}

/// Why a header was refused by [`PacketHeader::validate`](crate::PacketHeader::validate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum HeaderRejection {
    /// The packet format field is not the supported protocol year.
    PacketFormat { found: u16, expected: u16 },
    /// The packet id is outside 0..=15.
    PacketKind { found: u8 },
    /// The player car index does not address one of the 22 slots.
    PlayerCarIndex { found: u8 },
}

impl fmt::Display for HeaderRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderRejection::PacketFormat { found, expected } => {
                write!(f, "packet format {found} (expected {expected})")
            }
            HeaderRejection::PacketKind { found } => write!(f, "packet id {found} out of range"),
            HeaderRejection::PlayerCarIndex { found } => {
                write!(f, "player car index {found} out of range")
            }
        }
    }
}
