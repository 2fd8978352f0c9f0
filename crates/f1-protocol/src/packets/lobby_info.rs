//! Lobby info packet (id 9): players waiting in a multiplayer lobby.

use serde::Serialize;

use super::participants::NAME_FIELD_SIZE;
use super::{CarArray, body_reader, name_or_empty, read_cars};
use crate::enums::ReadyStatus;
use crate::header::PacketHeader;
use crate::kind::PacketKind;
use crate::reader::ByteReader;
use crate::{MAX_CARS, Result};

/// Size of one `LobbyInfoData` entry.
pub const LOBBY_ENTRY_SIZE: usize = 42;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct LobbyInfoData {
    pub ai_controlled: bool,
    /// 255 when no team is selected yet.
    pub team_id: u8,
    pub nationality: u8,
    pub platform: u8,
    pub name: String,
    pub car_number: u8,
    pub your_telemetry: bool,
    pub show_online_names: bool,
    pub tech_level: u16,
    pub ready_status: ReadyStatus,
}

impl LobbyInfoData {
    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            ai_controlled: r.flag()?,
            team_id: r.u8()?,
            nationality: r.u8()?,
            platform: r.u8()?,
            name: name_or_empty("lobby.name", &r.u8_array::<NAME_FIELD_SIZE>()?),
            car_number: r.u8()?,
            your_telemetry: r.flag()?,
            show_online_names: r.flag()?,
            tech_level: r.u16_le()?,
            ready_status: ReadyStatus::from_raw(r.u8()?),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LobbyInfoPacket {
    pub header: PacketHeader,
    pub num_players: u8,
    pub players: CarArray<LobbyInfoData>,
}

impl LobbyInfoPacket {
    pub fn active(&self) -> &[LobbyInfoData] {
        let n = usize::from(self.num_players).min(MAX_CARS);
        self.players.get(..n).unwrap_or_default()
    }

    pub fn name_of(&self, slot: usize) -> Option<&str> {
        self.players.get(slot).map(|p| p.name.as_str())
    }

    /// Number of listed players who are ready.
    pub fn ready_count(&self) -> usize {
        self.active()
            .iter()
            .filter(|p| p.ready_status == ReadyStatus::Ready)
            .count()
    }
}

pub fn decode(header: PacketHeader, body: &[u8]) -> Result<LobbyInfoPacket> {
    let mut r = body_reader(PacketKind::LobbyInfo, body)?;
    let num_players = r.u8()?;
    let players = read_cars(&mut r, LOBBY_ENTRY_SIZE, LobbyInfoData::read)?;
    Ok(LobbyInfoPacket {
        header,
        num_players,
        players,
    })
}
