//! Final classification packet (id 8), sent once at the end of a race.

use serde::Serialize;

use super::{CarArray, body_reader, read_cars};
use crate::enums::ResultStatus;
use crate::header::PacketHeader;
use crate::kind::PacketKind;
use crate::reader::ByteReader;
use crate::{MAX_CARS, Result};

/// Size of one `FinalClassificationData` entry.
pub const CLASSIFICATION_ENTRY_SIZE: usize = 46;
pub const MAX_TYRE_STINTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FinalClassificationData {
    pub position: u8,
    pub num_laps: u8,
    pub grid_position: u8,
    pub points: u8,
    pub num_pit_stops: u8,
    pub result_status: ResultStatus,
    pub result_reason: u8,
    pub best_lap_time_ms: u32,
    /// Seconds, without penalties.
    pub total_race_time: f64,
    /// Seconds.
    pub penalties_time: u8,
    pub num_penalties: u8,
    pub num_tyre_stints: u8,
    pub tyre_stints_actual: [u8; MAX_TYRE_STINTS],
    pub tyre_stints_visual: [u8; MAX_TYRE_STINTS],
    pub tyre_stints_end_laps: [u8; MAX_TYRE_STINTS],
}

impl FinalClassificationData {
    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            position: r.u8()?,
            num_laps: r.u8()?,
            grid_position: r.u8()?,
            points: r.u8()?,
            num_pit_stops: r.u8()?,
            result_status: ResultStatus::from_raw(r.u8()?),
            result_reason: r.u8()?,
            best_lap_time_ms: r.u32_le()?,
            total_race_time: r.f64_le()?,
            penalties_time: r.u8()?,
            num_penalties: r.u8()?,
            num_tyre_stints: r.u8()?,
            tyre_stints_actual: r.u8_array()?,
            tyre_stints_visual: r.u8_array()?,
            tyre_stints_end_laps: r.u8_array()?,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.result_status == ResultStatus::Finished
    }

    /// Race time with penalties applied, in seconds.
    pub fn total_time_with_penalties(&self) -> f64 {
        self.total_race_time + f64::from(self.penalties_time)
    }

    /// Visual compound of each stint actually run.
    pub fn stints(&self) -> &[u8] {
        let n = usize::from(self.num_tyre_stints).min(MAX_TYRE_STINTS);
        self.tyre_stints_visual.get(..n).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalClassificationPacket {
    pub header: PacketHeader,
    pub num_cars: u8,
    pub classification: CarArray<FinalClassificationData>,
}

impl FinalClassificationPacket {
    pub fn active(&self) -> &[FinalClassificationData] {
        let n = usize::from(self.num_cars).min(MAX_CARS);
        self.classification.get(..n).unwrap_or_default()
    }

    /// Finishers in positions 1 to 3, ordered by position, with car index.
    pub fn podium(&self) -> Vec<(usize, &FinalClassificationData)> {
        let mut podium: Vec<_> = self
            .active()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_finished() && (1..=3).contains(&c.position))
            .collect();
        podium.sort_by_key(|(_, c)| c.position);
        podium
    }

    /// Cars that scored, with car index, ordered by position.
    pub fn points_scorers(&self) -> Vec<(usize, &FinalClassificationData)> {
        let mut scorers: Vec<_> = self
            .active()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.points > 0)
            .collect();
        scorers.sort_by_key(|(_, c)| c.position);
        scorers
    }
}

pub fn decode(header: PacketHeader, body: &[u8]) -> Result<FinalClassificationPacket> {
    let mut r = body_reader(PacketKind::FinalClassification, body)?;
    let num_cars = r.u8()?;
    let classification = read_cars(&mut r, CLASSIFICATION_ENTRY_SIZE, FinalClassificationData::read)?;
    Ok(FinalClassificationPacket {
        header,
        num_cars,
        classification,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    fn entry(body: &mut [u8], car: usize, position: u8, points: u8, status: u8) {
        let at = 1 + car * CLASSIFICATION_ENTRY_SIZE;
        body[at] = position;
        body[at + 3] = points;
        body[at + 5] = status;
    }

    #[test]
    fn podium_is_sorted_and_skips_non_finishers() -> TestResult {
        let mut body = vec![0u8; PacketKind::FinalClassification.body_size()];
        body[0] = 5;
        entry(&mut body, 0, 3, 15, 3);
        entry(&mut body, 1, 1, 25, 3);
        entry(&mut body, 2, 2, 18, 7); // retired
        entry(&mut body, 3, 4, 12, 3);
        entry(&mut body, 4, 11, 0, 3);

        let packet = decode(PacketHeader::default(), &body)?;
        let podium: Vec<usize> = packet.podium().into_iter().map(|(car, _)| car).collect();
        assert_eq!(podium, vec![1, 0]);

        let scorers: Vec<u8> = packet
            .points_scorers()
            .into_iter()
            .map(|(_, c)| c.position)
            .collect();
        assert_eq!(scorers, vec![1, 2, 3, 4]);
        Ok(())
    }

    #[test]
    fn race_time_is_a_double() -> TestResult {
        let mut body = vec![0u8; PacketKind::FinalClassification.body_size()];
        body[1 + 11..1 + 19].copy_from_slice(&5400.125f64.to_le_bytes());
        body[1 + 19] = 5;
        let packet = decode(PacketHeader::default(), &body)?;
        let first = &packet.classification[0];
        assert!((first.total_race_time - 5400.125).abs() < 1e-9);
        assert!((first.total_time_with_penalties() - 5405.125).abs() < 1e-9);
        Ok(())
    }
}
