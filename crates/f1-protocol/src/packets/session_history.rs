//! Session history packet (id 11): lap and stint history for one car.
//!
//! The game cycles through the cars, sending one of these per car in turn.

use serde::Serialize;

use super::{SplitTime, body_reader};
use crate::header::PacketHeader;
use crate::kind::PacketKind;
use crate::reader::ByteReader;
use crate::slots::FixedSlots;
use crate::Result;

pub const MAX_LAPS_IN_HISTORY: usize = 100;
pub const MAX_STINTS_IN_HISTORY: usize = 8;
pub const LAP_HISTORY_ENTRY_SIZE: usize = 14;
pub const STINT_HISTORY_ENTRY_SIZE: usize = 3;

pub const LAP_VALID: u8 = 0x01;
pub const SECTOR1_VALID: u8 = 0x02;
pub const SECTOR2_VALID: u8 = 0x04;
pub const SECTOR3_VALID: u8 = 0x08;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LapHistoryData {
    pub lap_time_ms: u32,
    pub sector1: SplitTime,
    pub sector2: SplitTime,
    pub sector3: SplitTime,
    /// Bit 0 lap, bit 1 sector 1, bit 2 sector 2, bit 3 sector 3.
    pub lap_valid_bit_flags: u8,
}

impl LapHistoryData {
    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            lap_time_ms: r.u32_le()?,
            sector1: SplitTime::read(r)?,
            sector2: SplitTime::read(r)?,
            sector3: SplitTime::read(r)?,
            lap_valid_bit_flags: r.u8()?,
        })
    }

    fn has(&self, mask: u8) -> bool {
        self.lap_valid_bit_flags & mask != 0
    }

    pub fn is_lap_valid(&self) -> bool {
        self.has(LAP_VALID)
    }

    pub fn is_sector1_valid(&self) -> bool {
        self.has(SECTOR1_VALID)
    }

    pub fn is_sector2_valid(&self) -> bool {
        self.has(SECTOR2_VALID)
    }

    pub fn is_sector3_valid(&self) -> bool {
        self.has(SECTOR3_VALID)
    }

    /// Sector times in milliseconds, minutes folded in.
    pub fn sector_totals_ms(&self) -> [u32; 3] {
        [self.sector1, self.sector2, self.sector3].map(SplitTime::total_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TyreStintHistoryData {
    /// 255 while the stint is still running.
    pub end_lap: u8,
    pub tyre_actual_compound: u8,
    pub tyre_visual_compound: u8,
}

impl TyreStintHistoryData {
    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            end_lap: r.u8()?,
            tyre_actual_compound: r.u8()?,
            tyre_visual_compound: r.u8()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionHistoryPacket {
    pub header: PacketHeader,
    pub car_idx: u8,
    pub best_lap_time_lap_num: u8,
    pub best_sector1_lap_num: u8,
    pub best_sector2_lap_num: u8,
    pub best_sector3_lap_num: u8,
    /// Lap history; the declared count is the number of laps, including the
    /// one in progress.
    pub laps: FixedSlots<LapHistoryData, MAX_LAPS_IN_HISTORY>,
    pub tyre_stints: FixedSlots<TyreStintHistoryData, MAX_STINTS_IN_HISTORY>,
}

impl SessionHistoryPacket {
    pub fn num_laps(&self) -> usize {
        self.laps.valid_len()
    }

    /// Laps within the declared count whose lap bit is set, with 1-based lap
    /// numbers.
    pub fn valid_laps(&self) -> impl Iterator<Item = (usize, &LapHistoryData)> {
        self.laps
            .iter()
            .enumerate()
            .filter(|(_, lap)| lap.is_lap_valid())
            .map(|(i, lap)| (i + 1, lap))
    }

    /// Entry for the lap the game reports as the best, if it lies within the
    /// declared count.
    pub fn best_lap(&self) -> Option<&LapHistoryData> {
        let lap_num = usize::from(self.best_lap_time_lap_num);
        lap_num.checked_sub(1).and_then(|i| self.laps.get(i))
    }
}

pub fn decode(header: PacketHeader, body: &[u8]) -> Result<SessionHistoryPacket> {
    let mut r = body_reader(PacketKind::SessionHistory, body)?;
    let car_idx = r.u8()?;
    let num_laps = r.u8()?;
    let num_tyre_stints = r.u8()?;
    let best_lap_time_lap_num = r.u8()?;
    let best_sector1_lap_num = r.u8()?;
    let best_sector2_lap_num = r.u8()?;
    let best_sector3_lap_num = r.u8()?;
    let laps = FixedSlots::read(&mut r, LAP_HISTORY_ENTRY_SIZE, num_laps, LapHistoryData::read)?;
    let tyre_stints = FixedSlots::read(
        &mut r,
        STINT_HISTORY_ENTRY_SIZE,
        num_tyre_stints,
        TyreStintHistoryData::read,
    )?;
    Ok(SessionHistoryPacket {
        header,
        car_idx,
        best_lap_time_lap_num,
        best_sector1_lap_num,
        best_sector2_lap_num,
        best_sector3_lap_num,
        laps,
        tyre_stints,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    fn flags(bits: u8) -> LapHistoryData {
        LapHistoryData {
            lap_valid_bit_flags: bits,
            ..LapHistoryData::default()
        }
    }

    #[test]
    fn all_four_bits_set() {
        let lap = flags(0x0F);
        assert!(lap.is_lap_valid());
        assert!(lap.is_sector1_valid());
        assert!(lap.is_sector2_valid());
        assert!(lap.is_sector3_valid());
    }

    #[test]
    fn lap_and_sector1_only() {
        let lap = flags(0x03);
        assert!(lap.is_lap_valid());
        assert!(lap.is_sector1_valid());
        assert!(!lap.is_sector2_valid());
        assert!(!lap.is_sector3_valid());
    }

    #[test]
    fn valid_laps_respect_declared_count_and_lap_bit() -> TestResult {
        let mut body = vec![0u8; PacketKind::SessionHistory.body_size()];
        body[1] = 3; // laps
        body[3] = 3; // best lap number
        let lap_at = |n: usize| 7 + n * LAP_HISTORY_ENTRY_SIZE;
        body[lap_at(0) + 13] = 0x0F;
        body[lap_at(1) + 13] = 0x0E;
        body[lap_at(2)..lap_at(2) + 4].copy_from_slice(&88_500u32.to_le_bytes());
        body[lap_at(2) + 13] = 0x01;
        body[lap_at(3) + 13] = 0x0F; // past the declared count

        let packet = decode(PacketHeader::default(), &body)?;
        let numbers: Vec<usize> = packet.valid_laps().map(|(n, _)| n).collect();
        assert_eq!(numbers, vec![1, 3]);
        assert_eq!(packet.best_lap().map(|l| l.lap_time_ms), Some(88_500));
        Ok(())
    }

    #[test]
    fn best_lap_zero_means_none() -> TestResult {
        let body = vec![0u8; PacketKind::SessionHistory.body_size()];
        let packet = decode(PacketHeader::default(), &body)?;
        assert!(packet.best_lap().is_none());
        assert_eq!(packet.tyre_stints.all().len(), MAX_STINTS_IN_HISTORY);
        Ok(())
    }
}
