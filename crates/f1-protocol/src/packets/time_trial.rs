//! Time trial packet (id 14): session best, personal best and rival laps.

use serde::Serialize;

use super::body_reader;
use crate::header::PacketHeader;
use crate::kind::PacketKind;
use crate::reader::ByteReader;
use crate::Result;

pub const TIME_TRIAL_DATA_SET_SIZE: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TimeTrialDataSet {
    pub car_idx: u8,
    pub team_id: u8,
    pub lap_time_ms: u32,
    pub sector1_time_ms: u32,
    pub sector2_time_ms: u32,
    pub sector3_time_ms: u32,
    pub traction_control: u8,
    pub gearbox_assist: u8,
    pub anti_lock_brakes: bool,
    pub equal_car_performance: bool,
    pub custom_setup: bool,
    pub valid: bool,
}

impl TimeTrialDataSet {
    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        let mut set = r.sub(TIME_TRIAL_DATA_SET_SIZE)?;
        Ok(Self {
            car_idx: set.u8()?,
            team_id: set.u8()?,
            lap_time_ms: set.u32_le()?,
            sector1_time_ms: set.u32_le()?,
            sector2_time_ms: set.u32_le()?,
            sector3_time_ms: set.u32_le()?,
            traction_control: set.u8()?,
            gearbox_assist: set.u8()?,
            anti_lock_brakes: set.flag()?,
            equal_car_performance: set.flag()?,
            custom_setup: set.flag()?,
            valid: set.flag()?,
        })
    }

    pub fn has_lap(&self) -> bool {
        self.lap_time_ms > 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeTrialPacket {
    pub header: PacketHeader,
    pub player_session_best: TimeTrialDataSet,
    pub personal_best: TimeTrialDataSet,
    pub rival: TimeTrialDataSet,
}

impl TimeTrialPacket {
    /// Personal best minus rival, in milliseconds. Negative means ahead of
    /// the rival; 0 when either lap is missing.
    pub fn delta_to_rival_ms(&self) -> i64 {
        if !self.personal_best.has_lap() || !self.rival.has_lap() {
            return 0;
        }
        i64::from(self.personal_best.lap_time_ms) - i64::from(self.rival.lap_time_ms)
    }
}

pub fn decode(header: PacketHeader, body: &[u8]) -> Result<TimeTrialPacket> {
    let mut r = body_reader(PacketKind::TimeTrial, body)?;
    Ok(TimeTrialPacket {
        header,
        player_session_best: TimeTrialDataSet::read(&mut r)?,
        personal_best: TimeTrialDataSet::read(&mut r)?,
        rival: TimeTrialDataSet::read(&mut r)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    fn body_with_laps(pb: u32, rival: u32) -> Vec<u8> {
        let mut body = vec![0u8; PacketKind::TimeTrial.body_size()];
        let pb_at = TIME_TRIAL_DATA_SET_SIZE + 2;
        let rival_at = 2 * TIME_TRIAL_DATA_SET_SIZE + 2;
        body[pb_at..pb_at + 4].copy_from_slice(&pb.to_le_bytes());
        body[rival_at..rival_at + 4].copy_from_slice(&rival.to_le_bytes());
        body
    }

    #[test]
    fn delta_is_signed() -> TestResult {
        let packet = decode(PacketHeader::default(), &body_with_laps(80_250, 80_500))?;
        assert_eq!(packet.delta_to_rival_ms(), -250);
        let packet = decode(PacketHeader::default(), &body_with_laps(81_000, 80_500))?;
        assert_eq!(packet.delta_to_rival_ms(), 500);
        Ok(())
    }

    #[test]
    fn missing_rival_gives_zero_delta() -> TestResult {
        let packet = decode(PacketHeader::default(), &body_with_laps(80_000, 0))?;
        assert_eq!(packet.delta_to_rival_ms(), 0);
        Ok(())
    }
}
