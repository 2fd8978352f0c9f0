//! Body decoders, one module per packet kind.
//!
//! Each decoder takes the already-parsed header plus the bytes after it,
//! checks the body against the kind's fixed size, then reads fields in wire
//! order. Bytes past the fixed size are ignored.

use serde::Serialize;

use crate::error::DecodeError;
use crate::kind::PacketKind;
use crate::reader::{ByteReader, read_strided};
use crate::{MAX_CARS, NO_CAR, Result};

pub mod car_damage;
pub mod car_setups;
pub mod car_status;
pub mod car_telemetry;
pub mod event;
pub mod final_classification;
pub mod lap_data;
pub mod lap_positions;
pub mod lobby_info;
pub mod motion;
pub mod motion_ex;
pub mod participants;
pub mod session;
pub mod session_history;
pub mod time_trial;
pub mod tyre_sets;

/// One entry per car slot, in car-index order.
pub type CarArray<T> = [T; MAX_CARS];

/// Fail with `TruncatedPayload` unless `body` holds the whole layout.
pub(crate) fn body_reader(kind: PacketKind, body: &[u8]) -> Result<ByteReader<'_>> {
    let expected = kind.body_size();
    if body.len() < expected {
        return Err(DecodeError::TruncatedPayload {
            kind,
            expected,
            actual: body.len(),
        });
    }
    Ok(ByteReader::new(body))
}

/// Read the 22 per-car entries at a fixed stride.
pub(crate) fn read_cars<T>(
    r: &mut ByteReader<'_>,
    stride: usize,
    decode_one: impl FnMut(&mut ByteReader<'_>) -> Result<T>,
) -> Result<CarArray<T>> {
    read_strided::<T, MAX_CARS>(r, stride, decode_one)
}

/// A car index where 255 means "no car".
pub(crate) fn optional_car(raw: u8) -> Option<u8> {
    (raw != NO_CAR).then_some(raw)
}

/// A duration sent as a minutes part plus a millisecond part.
///
/// The millisecond part stays below 60 000; whole minutes go in the other
/// byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SplitTime {
    pub ms_part: u16,
    pub minutes_part: u8,
}

impl SplitTime {
    pub(crate) fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            ms_part: r.u16_le()?,
            minutes_part: r.u8()?,
        })
    }

    pub fn total_ms(self) -> u32 {
        u32::from(self.minutes_part) * 60_000 + u32::from(self.ms_part)
    }
}

/// Decode a fixed-width, NUL-terminated UTF-8 name.
///
/// Fails with `FieldDecode` on invalid UTF-8; callers substitute an empty
/// string and keep decoding.
pub(crate) fn decode_name(field: &'static str, raw: &[u8]) -> Result<String> {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    let bytes = raw.get(..end).unwrap_or_default();
    core::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|err| DecodeError::FieldDecode {
            field,
            reason: err.to_string(),
        })
}

/// [`decode_name`], falling back to an empty string.
pub(crate) fn name_or_empty(field: &'static str, raw: &[u8]) -> String {
    decode_name(field, raw).unwrap_or_else(|err| {
        tracing::debug!(error = %err, "substituting empty name");
        String::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_time_total_adds_minutes() {
        let t = SplitTime {
            ms_part: 23_456,
            minutes_part: 1,
        };
        assert_eq!(t.total_ms(), 83_456);
    }

    #[test]
    fn name_stops_at_first_nul() {
        let mut raw = [0u8; 32];
        raw[..8].copy_from_slice(b"HAMILTON");
        raw[9] = b'X';
        assert_eq!(decode_name("name", &raw).ok().as_deref(), Some("HAMILTON"));
    }

    #[test]
    fn name_without_terminator_uses_whole_field() {
        let raw = [b'A'; 32];
        assert_eq!(decode_name("name", &raw).map(|s| s.len()).ok(), Some(32));
    }

    #[test]
    fn invalid_utf8_name_is_a_field_error_and_falls_back_to_empty() {
        let raw = [0xFF, 0xFE, 0x00];
        assert!(matches!(
            decode_name("name", &raw),
            Err(DecodeError::FieldDecode { field: "name", .. })
        ));
        assert_eq!(name_or_empty("name", &raw), "");
    }

    #[test]
    fn body_reader_reports_kind_and_sizes() {
        let err = body_reader(PacketKind::Event, &[0u8; 15]).err();
        assert_eq!(
            err,
            Some(DecodeError::TruncatedPayload {
                kind: PacketKind::Event,
                expected: 16,
                actual: 15
            })
        );
    }
}
