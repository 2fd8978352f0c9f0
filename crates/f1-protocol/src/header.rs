//! The 29-byte header carried by every packet.

use core::fmt;

use serde::Serialize;

use crate::error::{DecodeError, HeaderRejection};
use crate::kind::PacketKind;
use crate::reader::ByteReader;
use crate::{HEADER_SIZE, MAX_CARS, NO_CAR, PACKET_FORMAT_2025, Result};

/// Parsed 29-byte `PacketHeader`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PacketHeader {
    /// Protocol year, `2025` for F1 25.
    pub packet_format: u16,
    /// Last two digits of the game year.
    pub game_year: u8,
    pub game_major_version: u8,
    pub game_minor_version: u8,
    /// Layout version of this particular packet kind.
    pub packet_version: u8,
    /// Raw packet id; see [`PacketHeader::kind`].
    pub packet_id: u8,
    pub session_uid: u64,
    /// Session timestamp in seconds.
    pub session_time: f32,
    /// Frame the data was retrieved on; goes back after a flashback.
    pub frame_identifier: u32,
    /// Monotonic frame counter; never goes back.
    pub overall_frame_identifier: u32,
    pub player_car_index: u8,
    /// 255 when there is no second player.
    pub secondary_player_car_index: u8,
}

impl PacketHeader {
    /// Parse the header from the first 29 bytes of `raw`.
    ///
    /// Only the length is checked here; call [`is_valid`](Self::is_valid)
    /// before dispatching on the result.
    pub fn decode(raw: &[u8]) -> Result<Self> {
        if raw.len() < HEADER_SIZE {
            return Err(DecodeError::truncated_input(0, HEADER_SIZE, raw.len()));
        }
        let mut r = ByteReader::new(raw);
        Ok(Self {
            packet_format: r.u16_le()?,            // 0-1
            game_year: r.u8()?,                    // 2
            game_major_version: r.u8()?,           // 3
            game_minor_version: r.u8()?,           // 4
            packet_version: r.u8()?,               // 5
            packet_id: r.u8()?,                    // 6
            session_uid: r.u64_le()?,              // 7-14
            session_time: r.f32_le()?,             // 15-18
            frame_identifier: r.u32_le()?,         // 19-22
            overall_frame_identifier: r.u32_le()?, // 23-26
            player_car_index: r.u8()?,             // 27
            secondary_player_car_index: r.u8()?,   // 28
        })
    }

    /// Check the protocol family, packet id range and player index.
    pub fn validate(&self) -> core::result::Result<(), HeaderRejection> {
        if self.packet_format != PACKET_FORMAT_2025 {
            return Err(HeaderRejection::PacketFormat {
                found: self.packet_format,
                expected: PACKET_FORMAT_2025,
            });
        }
        if self.kind().is_none() {
            return Err(HeaderRejection::PacketKind {
                found: self.packet_id,
            });
        }
        if usize::from(self.player_car_index) >= MAX_CARS {
            return Err(HeaderRejection::PlayerCarIndex {
                found: self.player_car_index,
            });
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn kind(&self) -> Option<PacketKind> {
        PacketKind::from_id(self.packet_id)
    }

    pub fn player_index(&self) -> usize {
        usize::from(self.player_car_index)
    }

    /// Second split-screen player, if any.
    pub fn secondary_player(&self) -> Option<u8> {
        (self.secondary_player_car_index != NO_CAR).then_some(self.secondary_player_car_index)
    }

    /// Encode back to wire form.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = Vec::with_capacity(HEADER_SIZE);
        buf.extend_from_slice(&self.packet_format.to_le_bytes());
        buf.extend_from_slice(&[
            self.game_year,
            self.game_major_version,
            self.game_minor_version,
            self.packet_version,
            self.packet_id,
        ]);
        buf.extend_from_slice(&self.session_uid.to_le_bytes());
        buf.extend_from_slice(&self.session_time.to_le_bytes());
        buf.extend_from_slice(&self.frame_identifier.to_le_bytes());
        buf.extend_from_slice(&self.overall_frame_identifier.to_le_bytes());
        buf.push(self.player_car_index);
        buf.push(self.secondary_player_car_index);

        let mut out = [0u8; HEADER_SIZE];
        out.copy_from_slice(&buf);
        out
    }
}

impl fmt::Display for PacketHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            Some(kind) => write!(f, "{kind}")?,
            None => write!(f, "Unknown({})", self.packet_id)?,
        }
        write!(
            f,
            " v{} session={:#018x} t={:.3}s frame={} player={}",
            self.packet_version,
            self.session_uid,
            self.session_time,
            self.frame_identifier,
            self.player_car_index
        )
    }
}
