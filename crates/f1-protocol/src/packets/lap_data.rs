//! Lap data packet (id 2).

use serde::Serialize;

use super::{CarArray, SplitTime, body_reader, optional_car, read_cars};
use crate::enums::{DriverStatus, PitStatus, ResultStatus, Sector};
use crate::header::PacketHeader;
use crate::kind::PacketKind;
use crate::reader::ByteReader;
use crate::Result;

/// Size of one `LapData` entry.
pub const LAP_DATA_ENTRY_SIZE: usize = 57;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LapData {
    pub last_lap_time_ms: u32,
    pub current_lap_time_ms: u32,
    pub sector1: SplitTime,
    pub sector2: SplitTime,
    pub delta_to_car_in_front: SplitTime,
    pub delta_to_race_leader: SplitTime,
    /// Metres around the current lap; negative before the line is crossed.
    pub lap_distance: f32,
    /// Metres travelled in the session.
    pub total_distance: f32,
    /// Seconds.
    pub safety_car_delta: f32,
    pub car_position: u8,
    pub current_lap_num: u8,
    pub pit_status: PitStatus,
    pub num_pit_stops: u8,
    pub sector: Sector,
    pub current_lap_invalid: bool,
    /// Accumulated time penalties, seconds.
    pub penalties: u8,
    pub total_warnings: u8,
    pub corner_cutting_warnings: u8,
    pub num_unserved_drive_through_pens: u8,
    pub num_unserved_stop_go_pens: u8,
    pub grid_position: u8,
    pub driver_status: DriverStatus,
    pub result_status: ResultStatus,
    pub pit_lane_timer_active: bool,
    pub pit_lane_time_in_lane_ms: u16,
    pub pit_stop_timer_ms: u16,
    pub pit_stop_should_serve_pen: bool,
    /// km/h.
    pub speed_trap_fastest_speed: f32,
    /// 255 = not set.
    pub speed_trap_fastest_lap: u8,
}

impl LapData {
    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            last_lap_time_ms: r.u32_le()?,
            current_lap_time_ms: r.u32_le()?,
            sector1: SplitTime::read(r)?,
            sector2: SplitTime::read(r)?,
            delta_to_car_in_front: SplitTime::read(r)?,
            delta_to_race_leader: SplitTime::read(r)?,
            lap_distance: r.f32_le()?,
            total_distance: r.f32_le()?,
            safety_car_delta: r.f32_le()?,
            car_position: r.u8()?,
            current_lap_num: r.u8()?,
            pit_status: PitStatus::from_raw(r.u8()?),
            num_pit_stops: r.u8()?,
            sector: Sector::from_raw(r.u8()?),
            current_lap_invalid: r.flag()?,
            penalties: r.u8()?,
            total_warnings: r.u8()?,
            corner_cutting_warnings: r.u8()?,
            num_unserved_drive_through_pens: r.u8()?,
            num_unserved_stop_go_pens: r.u8()?,
            grid_position: r.u8()?,
            driver_status: DriverStatus::from_raw(r.u8()?),
            result_status: ResultStatus::from_raw(r.u8()?),
            pit_lane_timer_active: r.flag()?,
            pit_lane_time_in_lane_ms: r.u16_le()?,
            pit_stop_timer_ms: r.u16_le()?,
            pit_stop_should_serve_pen: r.flag()?,
            speed_trap_fastest_speed: r.f32_le()?,
            speed_trap_fastest_lap: r.u8()?,
        })
    }

    pub fn sector1_ms(&self) -> u32 {
        self.sector1.total_ms()
    }

    pub fn sector2_ms(&self) -> u32 {
        self.sector2.total_ms()
    }

    /// Sector 3 of the last lap, derived as last lap minus sectors 1 and 2.
    ///
    /// Sector splits refer to the lap in progress, so the result is only
    /// meaningful right after a lap completes. Never negative.
    pub fn sector3_ms(&self) -> u32 {
        self.last_lap_time_ms
            .saturating_sub(self.sector1_ms())
            .saturating_sub(self.sector2_ms())
    }

    pub fn is_lap_invalid(&self) -> bool {
        self.current_lap_invalid
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LapDataPacket {
    pub header: PacketHeader,
    pub cars: CarArray<LapData>,
    /// Car index of the personal best in time trial; 255 = none.
    pub time_trial_pb_car_idx: u8,
    /// Car index of the rival in time trial; 255 = none.
    pub time_trial_rival_car_idx: u8,
}

impl LapDataPacket {
    pub fn player(&self) -> Option<&LapData> {
        self.cars.get(self.header.player_index())
    }

    pub fn time_trial_pb_car(&self) -> Option<u8> {
        optional_car(self.time_trial_pb_car_idx)
    }

    pub fn time_trial_rival_car(&self) -> Option<u8> {
        optional_car(self.time_trial_rival_car_idx)
    }
}

pub fn decode(header: PacketHeader, body: &[u8]) -> Result<LapDataPacket> {
    let mut r = body_reader(PacketKind::LapData, body)?;
    let cars = read_cars(&mut r, LAP_DATA_ENTRY_SIZE, LapData::read)?;
    Ok(LapDataPacket {
        header,
        cars,
        time_trial_pb_car_idx: r.u8()?,
        time_trial_rival_car_idx: r.u8()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lap(last: u32, s1: u32, s2: u32) -> LapData {
        let split = |ms: u32| SplitTime {
            ms_part: u16::try_from(ms % 60_000).unwrap_or(0),
            minutes_part: u8::try_from(ms / 60_000).unwrap_or(0),
        };
        LapData {
            last_lap_time_ms: last,
            sector1: split(s1),
            sector2: split(s2),
            ..LapData::default()
        }
    }

    #[test]
    fn sector3_is_the_remainder() {
        assert_eq!(lap(90_000, 30_000, 30_000).sector3_ms(), 30_000);
    }

    #[test]
    fn sector3_never_goes_negative() {
        assert_eq!(lap(50_000, 30_000, 30_000).sector3_ms(), 0);
        assert_eq!(lap(0, 30_000, 30_000).sector3_ms(), 0);
    }

    #[test]
    fn sector_totals_include_minutes() {
        let l = lap(150_000, 65_000, 40_000);
        assert_eq!(l.sector1_ms(), 65_000);
        assert_eq!(l.sector3_ms(), 45_000);
    }
}
