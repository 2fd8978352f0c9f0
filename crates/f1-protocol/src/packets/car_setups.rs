//! Car setups packet (id 5). In multiplayer only the player's own setup is
//! filled in.

use serde::Serialize;

use super::{CarArray, body_reader, read_cars};
use crate::header::PacketHeader;
use crate::kind::PacketKind;
use crate::reader::ByteReader;
use crate::Result;

/// Size of one `CarSetupData` entry.
pub const CAR_SETUP_ENTRY_SIZE: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CarSetupData {
    pub front_wing: u8,
    pub rear_wing: u8,
    /// Differential adjustment on throttle, percent.
    pub on_throttle: u8,
    /// Differential adjustment off throttle, percent.
    pub off_throttle: u8,
    pub front_camber: f32,
    pub rear_camber: f32,
    pub front_toe: f32,
    pub rear_toe: f32,
    pub front_suspension: u8,
    pub rear_suspension: u8,
    pub front_anti_roll_bar: u8,
    pub rear_anti_roll_bar: u8,
    pub front_suspension_height: u8,
    pub rear_suspension_height: u8,
    /// Percent.
    pub brake_pressure: u8,
    /// Percent.
    pub brake_bias: u8,
    /// Percent.
    pub engine_braking: u8,
    pub rear_left_tyre_pressure: f32,
    pub rear_right_tyre_pressure: f32,
    pub front_left_tyre_pressure: f32,
    pub front_right_tyre_pressure: f32,
    pub ballast: u8,
    /// Kilograms.
    pub fuel_load: f32,
}

impl CarSetupData {
    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            front_wing: r.u8()?,
            rear_wing: r.u8()?,
            on_throttle: r.u8()?,
            off_throttle: r.u8()?,
            front_camber: r.f32_le()?,
            rear_camber: r.f32_le()?,
            front_toe: r.f32_le()?,
            rear_toe: r.f32_le()?,
            front_suspension: r.u8()?,
            rear_suspension: r.u8()?,
            front_anti_roll_bar: r.u8()?,
            rear_anti_roll_bar: r.u8()?,
            front_suspension_height: r.u8()?,
            rear_suspension_height: r.u8()?,
            brake_pressure: r.u8()?,
            brake_bias: r.u8()?,
            engine_braking: r.u8()?,
            rear_left_tyre_pressure: r.f32_le()?,
            rear_right_tyre_pressure: r.f32_le()?,
            front_left_tyre_pressure: r.f32_le()?,
            front_right_tyre_pressure: r.f32_le()?,
            ballast: r.u8()?,
            fuel_load: r.f32_le()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarSetupsPacket {
    pub header: PacketHeader,
    pub cars: CarArray<CarSetupData>,
    /// Front wing value after the next pit stop (player only).
    pub next_front_wing_value: f32,
}

impl CarSetupsPacket {
    pub fn player(&self) -> Option<&CarSetupData> {
        self.cars.get(self.header.player_index())
    }
}

pub fn decode(header: PacketHeader, body: &[u8]) -> Result<CarSetupsPacket> {
    let mut r = body_reader(PacketKind::CarSetups, body)?;
    let cars = read_cars(&mut r, CAR_SETUP_ENTRY_SIZE, CarSetupData::read)?;
    Ok(CarSetupsPacket {
        header,
        cars,
        next_front_wing_value: r.f32_le()?,
    })
}
