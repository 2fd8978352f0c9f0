//! Participants packet (id 4): who is in each car slot.

use serde::Serialize;

use super::{CarArray, body_reader, name_or_empty, read_cars};
use crate::header::PacketHeader;
use crate::kind::PacketKind;
use crate::reader::ByteReader;
use crate::{MAX_CARS, Result};

/// Size of one `ParticipantData` entry.
pub const PARTICIPANT_ENTRY_SIZE: usize = 57;
/// Width of the NUL-padded name field.
pub const NAME_FIELD_SIZE: usize = 32;
pub const MAX_LIVERY_COLOURS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LiveryColour {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ParticipantData {
    pub ai_controlled: bool,
    pub driver_id: u8,
    pub network_id: u8,
    pub team_id: u8,
    pub my_team: bool,
    pub race_number: u8,
    pub nationality: u8,
    /// Empty when the name field was not valid UTF-8.
    pub name: String,
    /// False when the player restricts telemetry to public.
    pub your_telemetry: bool,
    pub show_online_names: bool,
    pub tech_level: u16,
    pub platform: u8,
    pub num_colours: u8,
    pub livery_colours: [LiveryColour; MAX_LIVERY_COLOURS],
}

impl ParticipantData {
    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        let ai_controlled = r.flag()?;
        let driver_id = r.u8()?;
        let network_id = r.u8()?;
        let team_id = r.u8()?;
        let my_team = r.flag()?;
        let race_number = r.u8()?;
        let nationality = r.u8()?;
        let name = name_or_empty("participant.name", &r.u8_array::<NAME_FIELD_SIZE>()?);
        let your_telemetry = r.flag()?;
        let show_online_names = r.flag()?;
        let tech_level = r.u16_le()?;
        let platform = r.u8()?;
        let num_colours = r.u8()?;
        let mut livery_colours = [LiveryColour::default(); MAX_LIVERY_COLOURS];
        for colour in &mut livery_colours {
            let [red, green, blue] = r.u8_array()?;
            *colour = LiveryColour { red, green, blue };
        }
        Ok(Self {
            ai_controlled,
            driver_id,
            network_id,
            team_id,
            my_team,
            race_number,
            nationality,
            name,
            your_telemetry,
            show_online_names,
            tech_level,
            platform,
            num_colours,
            livery_colours,
        })
    }

    /// Livery colours actually in use.
    pub fn colours(&self) -> &[LiveryColour] {
        let n = usize::from(self.num_colours).min(MAX_LIVERY_COLOURS);
        self.livery_colours.get(..n).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipantsPacket {
    pub header: PacketHeader,
    pub num_active_cars: u8,
    pub participants: CarArray<ParticipantData>,
}

impl ParticipantsPacket {
    /// Leading entries covered by the active car count.
    pub fn active(&self) -> &[ParticipantData] {
        let n = usize::from(self.num_active_cars).min(MAX_CARS);
        self.participants.get(..n).unwrap_or_default()
    }

    pub fn name_of(&self, car_index: usize) -> Option<&str> {
        self.participants.get(car_index).map(|p| p.name.as_str())
    }

    pub fn player(&self) -> Option<&ParticipantData> {
        self.participants.get(self.header.player_index())
    }
}

pub fn decode(header: PacketHeader, body: &[u8]) -> Result<ParticipantsPacket> {
    let mut r = body_reader(PacketKind::Participants, body)?;
    let num_active_cars = r.u8()?;
    let participants = read_cars(&mut r, PARTICIPANT_ENTRY_SIZE, ParticipantData::read)?;
    Ok(ParticipantsPacket {
        header,
        num_active_cars,
        participants,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn names_and_active_prefix() -> TestResult {
        let mut body = vec![0u8; PacketKind::Participants.body_size()];
        body[0] = 2;
        let second = 1 + PARTICIPANT_ENTRY_SIZE;
        body[second + 3] = 1; // team
        body[second + 7..second + 15].copy_from_slice(b"VERSTAPP");
        body[second + 44] = 2; // colour count
        body[second + 45..second + 48].copy_from_slice(&[10, 20, 30]);

        let packet = decode(PacketHeader::default(), &body)?;
        assert_eq!(packet.active().len(), 2);
        assert_eq!(packet.name_of(1), Some("VERSTAPP"));
        assert_eq!(packet.name_of(0), Some(""));
        assert_eq!(packet.name_of(22), None);
        let driver = &packet.participants[1];
        assert_eq!(driver.team_id, 1);
        assert_eq!(driver.colours().len(), 2);
        assert_eq!(
            driver.colours()[0],
            LiveryColour {
                red: 10,
                green: 20,
                blue: 30
            }
        );
        Ok(())
    }

    #[test]
    fn bad_utf8_name_does_not_fail_the_packet() -> TestResult {
        let mut body = vec![0u8; PacketKind::Participants.body_size()];
        body[1 + 7] = 0xFF;
        body[1 + 8] = 0xFE;
        let packet = decode(PacketHeader::default(), &body)?;
        assert_eq!(packet.participants[0].name, "");
        Ok(())
    }
}
