//! Packet kinds and the per-kind size table.

use core::fmt;

use serde::Serialize;

use crate::HEADER_SIZE;

/// The sixteen packet kinds, keyed by the header's packet id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(u8)]
pub enum PacketKind {
    Motion = 0,
    Session = 1,
    LapData = 2,
    Event = 3,
    Participants = 4,
    CarSetups = 5,
    CarTelemetry = 6,
    CarStatus = 7,
    FinalClassification = 8,
    LobbyInfo = 9,
    CarDamage = 10,
    SessionHistory = 11,
    TyreSets = 12,
    MotionEx = 13,
    TimeTrial = 14,
    LapPositions = 15,
}

impl PacketKind {
    pub const COUNT: usize = 16;

    pub const ALL: [PacketKind; Self::COUNT] = [
        PacketKind::Motion,
        PacketKind::Session,
        PacketKind::LapData,
        PacketKind::Event,
        PacketKind::Participants,
        PacketKind::CarSetups,
        PacketKind::CarTelemetry,
        PacketKind::CarStatus,
        PacketKind::FinalClassification,
        PacketKind::LobbyInfo,
        PacketKind::CarDamage,
        PacketKind::SessionHistory,
        PacketKind::TyreSets,
        PacketKind::MotionEx,
        PacketKind::TimeTrial,
        PacketKind::LapPositions,
    ];

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(usize::from(id)).copied()
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    /// Table slot for this kind; always below [`Self::COUNT`].
    pub(crate) fn index(self) -> usize {
        usize::from(self.id())
    }

    pub fn name(self) -> &'static str {
        match self {
            PacketKind::Motion => "Motion",
            PacketKind::Session => "Session",
            PacketKind::LapData => "LapData",
            PacketKind::Event => "Event",
            PacketKind::Participants => "Participants",
            PacketKind::CarSetups => "CarSetups",
            PacketKind::CarTelemetry => "CarTelemetry",
            PacketKind::CarStatus => "CarStatus",
            PacketKind::FinalClassification => "FinalClassification",
            PacketKind::LobbyInfo => "LobbyInfo",
            PacketKind::CarDamage => "CarDamage",
            PacketKind::SessionHistory => "SessionHistory",
            PacketKind::TyreSets => "TyreSets",
            PacketKind::MotionEx => "MotionEx",
            PacketKind::TimeTrial => "TimeTrial",
            PacketKind::LapPositions => "LapPositions",
        }
    }

    /// Body size in bytes (everything after the 29-byte header).
    pub fn body_size(self) -> usize {
        match self {
            PacketKind::Motion => 1320,
            PacketKind::Session => 724,
            PacketKind::LapData => 1256,
            PacketKind::Event => 16,
            PacketKind::Participants => 1255,
            PacketKind::CarSetups => 1104,
            PacketKind::CarTelemetry => 1323,
            PacketKind::CarStatus => 1210,
            PacketKind::FinalClassification => 1013,
            PacketKind::LobbyInfo => 925,
            PacketKind::CarDamage => 1012,
            PacketKind::SessionHistory => 1431,
            PacketKind::TyreSets => 202,
            PacketKind::MotionEx => 244,
            PacketKind::TimeTrial => 72,
            PacketKind::LapPositions => 1102,
        }
    }

    /// Full datagram size, header included.
    pub fn packet_size(self) -> usize {
        HEADER_SIZE + self.body_size()
    }

    /// The largest datagram any kind produces.
    pub fn max_packet_size() -> usize {
        Self::ALL
            .iter()
            .map(|kind| kind.packet_size())
            .max()
            .unwrap_or(HEADER_SIZE)
    }
}

impl TryFrom<u8> for PacketKind {
    type Error = u8;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::from_id(id).ok_or(id)
    }
}

/// Accepts the numeric id or the kind name, ignoring case, `-` and `_`
/// (`6`, `CarTelemetry`, `car_telemetry`).
impl core::str::FromStr for PacketKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(id) = s.parse::<u8>() {
            return Self::from_id(id).ok_or_else(|| format!("packet id {id} out of range"));
        }
        let wanted: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().to_ascii_lowercase() == wanted)
            .ok_or_else(|| format!("unknown packet kind `{s}`"))
    }
}

impl fmt::Display for PacketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_from_id() {
        for (id, kind) in PacketKind::ALL.iter().enumerate() {
            assert_eq!(usize::from(kind.id()), id);
            assert_eq!(PacketKind::from_id(kind.id()), Some(*kind));
        }
        assert_eq!(PacketKind::from_id(16), None);
        assert_eq!(PacketKind::try_from(200), Err(200));
    }

    #[test]
    fn published_packet_sizes() {
        let expected = [
            (PacketKind::Motion, 1349),
            (PacketKind::Session, 753),
            (PacketKind::LapData, 1285),
            (PacketKind::Event, 45),
            (PacketKind::Participants, 1284),
            (PacketKind::CarSetups, 1133),
            (PacketKind::CarTelemetry, 1352),
            (PacketKind::CarStatus, 1239),
            (PacketKind::FinalClassification, 1042),
            (PacketKind::LobbyInfo, 954),
            (PacketKind::CarDamage, 1041),
            (PacketKind::SessionHistory, 1460),
            (PacketKind::TyreSets, 231),
            (PacketKind::MotionEx, 273),
            (PacketKind::TimeTrial, 101),
            (PacketKind::LapPositions, 1131),
        ];
        for (kind, size) in expected {
            assert_eq!(kind.packet_size(), size, "{kind}");
        }
    }

    #[test]
    fn session_history_is_the_largest_packet() {
        assert_eq!(PacketKind::max_packet_size(), 1460);
    }

    #[test]
    fn parses_names_and_ids() {
        assert_eq!("6".parse(), Ok(PacketKind::CarTelemetry));
        assert_eq!("car_telemetry".parse(), Ok(PacketKind::CarTelemetry));
        assert_eq!("LAP-POSITIONS".parse(), Ok(PacketKind::LapPositions));
        assert!("16".parse::<PacketKind>().is_err());
        assert!("tyres".parse::<PacketKind>().is_err());
    }
}
