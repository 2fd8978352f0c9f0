//! Car status packet (id 7).

use serde::Serialize;

use super::{CarArray, body_reader, read_cars};
use crate::enums::{ErsDeployMode, FiaFlag};
use crate::header::PacketHeader;
use crate::kind::PacketKind;
use crate::reader::ByteReader;
use crate::Result;

/// Size of one `CarStatusData` entry.
pub const CAR_STATUS_ENTRY_SIZE: usize = 55;

/// The battery stores up to 4 MJ.
pub const ERS_MAX_STORE_ENERGY_J: f32 = 4_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CarStatusData {
    /// 0 = off, 1 = medium, 2 = full.
    pub traction_control: u8,
    pub anti_lock_brakes: bool,
    /// 0 = lean, 1 = standard, 2 = rich, 3 = max.
    pub fuel_mix: u8,
    /// Front brake bias in percent.
    pub front_brake_bias: u8,
    pub pit_limiter: bool,
    /// Kilograms.
    pub fuel_in_tank: f32,
    pub fuel_capacity: f32,
    /// Laps of fuel left, as shown on the MFD.
    pub fuel_remaining_laps: f32,
    pub max_rpm: u16,
    pub idle_rpm: u16,
    pub max_gears: u8,
    pub drs_allowed: bool,
    /// Metres until DRS may be used; 0 = unavailable.
    pub drs_activation_distance: u16,
    pub actual_tyre_compound: u8,
    pub visual_tyre_compound: u8,
    pub tyres_age_laps: u8,
    pub vehicle_fia_flags: FiaFlag,
    /// Watts.
    pub engine_power_ice: f32,
    /// Watts.
    pub engine_power_mguk: f32,
    /// Joules.
    pub ers_store_energy: f32,
    pub ers_deploy_mode: ErsDeployMode,
    pub ers_harvested_this_lap_mguk: f32,
    pub ers_harvested_this_lap_mguh: f32,
    pub ers_deployed_this_lap: f32,
    pub network_paused: bool,
}

impl CarStatusData {
    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            traction_control: r.u8()?,                        // 0
            anti_lock_brakes: r.flag()?,                      // 1
            fuel_mix: r.u8()?,                                // 2
            front_brake_bias: r.u8()?,                        // 3
            pit_limiter: r.flag()?,                           // 4
            fuel_in_tank: r.f32_le()?,                        // 5-8
            fuel_capacity: r.f32_le()?,                       // 9-12
            fuel_remaining_laps: r.f32_le()?,                 // 13-16
            max_rpm: r.u16_le()?,                             // 17-18
            idle_rpm: r.u16_le()?,                            // 19-20
            max_gears: r.u8()?,                               // 21
            drs_allowed: r.flag()?,                           // 22
            drs_activation_distance: r.u16_le()?,             // 23-24
            actual_tyre_compound: r.u8()?,                    // 25
            visual_tyre_compound: r.u8()?,                    // 26
            tyres_age_laps: r.u8()?,                          // 27
            vehicle_fia_flags: FiaFlag::from_raw(r.i8()?),    // 28
            engine_power_ice: r.f32_le()?,                    // 29-32
            engine_power_mguk: r.f32_le()?,                   // 33-36
            ers_store_energy: r.f32_le()?,                    // 37-40
            ers_deploy_mode: ErsDeployMode::from_raw(r.u8()?), // 41
            ers_harvested_this_lap_mguk: r.f32_le()?,         // 42-45
            ers_harvested_this_lap_mguh: r.f32_le()?,         // 46-49
            ers_deployed_this_lap: r.f32_le()?,               // 50-53
            network_paused: r.flag()?,                        // 54
        })
    }

    /// ERS store as a fraction of the 4 MJ battery, clamped to 0–1.
    pub fn ers_store_fraction(&self) -> f32 {
        (self.ers_store_energy / ERS_MAX_STORE_ENERGY_J).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarStatusPacket {
    pub header: PacketHeader,
    pub cars: CarArray<CarStatusData>,
}

impl CarStatusPacket {
    pub fn player(&self) -> Option<&CarStatusData> {
        self.cars.get(self.header.player_index())
    }
}

pub fn decode(header: PacketHeader, body: &[u8]) -> Result<CarStatusPacket> {
    let mut r = body_reader(PacketKind::CarStatus, body)?;
    let cars = read_cars(&mut r, CAR_STATUS_ENTRY_SIZE, CarStatusData::read)?;
    Ok(CarStatusPacket { header, cars })
}
