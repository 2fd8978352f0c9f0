//! Decoder for the F1 25 UDP telemetry broadcast (packet format 2025).
//!
//! Every datagram carries one packet: a 29-byte [`PacketHeader`] followed by a
//! fixed-size body whose layout is selected by the header's packet id.
//! Decoding is pure: bytes in, a typed [`PacketRecord`] or a [`DecodeError`]
//! out, with no I/O and no shared mutable state.
//!
//! ## Modules
//! - `header` - header parsing and validation
//! - `packets` - one body decoder per packet kind
//! - `dispatcher` - header-first routing with drop counters
//! - `slots` - fixed-capacity arrays with a declared valid prefix
//! - `names`, `timing` - display helpers
//! - `fixtures` - wire-format builders for tests and benches (`test-helpers`
//!   feature)

#![deny(static_mut_refs)]

pub mod dispatcher;
pub mod enums;
pub mod error;
#[cfg(any(test, feature = "test-helpers"))]
pub mod fixtures;
pub mod header;
pub mod kind;
pub mod names;
pub mod packets;
pub mod reader;
pub mod record;
pub mod slots;
pub mod timing;

pub use dispatcher::{DecoderTable, DispatchOutcome, DispatchStats, Dispatcher, DropReason};
pub use error::{DecodeError, HeaderRejection};
pub use header::PacketHeader;
pub use kind::PacketKind;
pub use reader::ByteReader;
pub use record::{BodyDecoder, PacketRecord, standard_decoder};
pub use slots::FixedSlots;

/// Size of [`PacketHeader`] on the wire.
pub const HEADER_SIZE: usize = 29;
/// `packet_format` value for F1 25.
pub const PACKET_FORMAT_2025: u16 = 2025;
/// Car slots in every per-car array.
pub const MAX_CARS: usize = 22;
/// Car index meaning "no car".
pub const NO_CAR: u8 = 255;
/// The game's default UDP telemetry port.
pub const DEFAULT_PORT: u16 = 20777;

pub type Result<T> = core::result::Result<T, DecodeError>;

/// Decode one datagram with the built-in decoders, returning the error
/// instead of counting a drop.
pub fn decode_datagram(datagram: &[u8]) -> Result<PacketRecord> {
    let header = PacketHeader::decode(datagram)?;
    header.validate().map_err(DecodeError::InvalidHeader)?;
    let kind = header
        .kind()
        .ok_or(DecodeError::UnknownPacketKind(header.packet_id))?;
    let body = datagram.get(HEADER_SIZE..).unwrap_or_default();
    standard_decoder(kind)(header, body)
}
