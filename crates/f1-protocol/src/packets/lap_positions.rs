//! Lap positions packet (id 15): race position of every car at the end of
//! each lap, for position charts.

use core::num::NonZeroU8;

use serde::Serialize;

use super::body_reader;
use crate::header::PacketHeader;
use crate::kind::PacketKind;
use crate::slots::FixedSlots;
use crate::{MAX_CARS, Result};

pub const MAX_LAPS_IN_LAP_POSITIONS: usize = 50;

/// Positions for one lap, by car index. `None` is the wire's 0, meaning no
/// data for that car.
pub type LapPositionRow = [Option<NonZeroU8>; MAX_CARS];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LapPositionsPacket {
    pub header: PacketHeader,
    /// Zero-based lap index that the first row refers to.
    pub lap_start: u8,
    pub positions: FixedSlots<LapPositionRow, MAX_LAPS_IN_LAP_POSITIONS>,
}

impl LapPositionsPacket {
    pub fn num_laps(&self) -> usize {
        self.positions.valid_len()
    }

    /// Position of `car` at the end of 1-based lap `lap_num`.
    pub fn position(&self, lap_num: usize, car: usize) -> Option<NonZeroU8> {
        let row = lap_num
            .checked_sub(1)?
            .checked_sub(usize::from(self.lap_start))?;
        self.positions.get(row)?.get(car).copied().flatten()
    }

    /// One car's positions across the valid laps.
    pub fn history_of(&self, car: usize) -> Vec<Option<NonZeroU8>> {
        self.positions
            .iter()
            .map(|row| row.get(car).copied().flatten())
            .collect()
    }
}

pub fn decode(header: PacketHeader, body: &[u8]) -> Result<LapPositionsPacket> {
    let mut r = body_reader(PacketKind::LapPositions, body)?;
    let num_laps = r.u8()?;
    let lap_start = r.u8()?;
    let positions = FixedSlots::read(&mut r, MAX_CARS, num_laps, |row| {
        Ok(row.u8_array::<MAX_CARS>()?.map(NonZeroU8::new))
    })?;
    Ok(LapPositionsPacket {
        header,
        lap_start,
        positions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn zero_cell_is_no_data() -> TestResult {
        let mut body = vec![0u8; PacketKind::LapPositions.body_size()];
        body[0] = 2;
        body[2] = 4; // lap 1, car 0
        body[2 + MAX_CARS + 1] = 1; // lap 2, car 1

        let packet = decode(PacketHeader::default(), &body)?;
        assert_eq!(packet.num_laps(), 2);
        assert_eq!(packet.position(1, 0).map(NonZeroU8::get), Some(4));
        assert_eq!(packet.position(1, 1), None);
        assert_eq!(packet.position(2, 1).map(NonZeroU8::get), Some(1));
        assert_eq!(packet.position(3, 0), None, "outside the valid laps");
        assert_eq!(packet.position(0, 0), None);
        assert_eq!(packet.history_of(0).len(), 2);
        Ok(())
    }

    #[test]
    fn lap_start_offsets_lap_numbers() -> TestResult {
        let mut body = vec![0u8; PacketKind::LapPositions.body_size()];
        body[0] = 1;
        body[1] = 50;
        body[2] = 7;
        let packet = decode(PacketHeader::default(), &body)?;
        assert_eq!(packet.position(51, 0).map(NonZeroU8::get), Some(7));
        assert_eq!(packet.position(1, 0), None);
        Ok(())
    }
}
