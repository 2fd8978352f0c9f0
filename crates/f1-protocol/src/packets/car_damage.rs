//! Car damage packet (id 10).

use serde::Serialize;

use super::{CarArray, body_reader, read_cars};
use crate::header::PacketHeader;
use crate::kind::PacketKind;
use crate::reader::ByteReader;
use crate::Result;

/// Size of one `CarDamageData` entry: 4 × f32 wear then 30 single bytes.
pub const CAR_DAMAGE_ENTRY_SIZE: usize = 46;

/// Damage and wear values are percentages; wheel arrays are RL, RR, FL, FR.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CarDamageData {
    pub tyres_wear: [f32; 4],
    pub tyres_damage: [u8; 4],
    pub brakes_damage: [u8; 4],
    pub tyre_blisters: [u8; 4],
    pub front_left_wing_damage: u8,
    pub front_right_wing_damage: u8,
    pub rear_wing_damage: u8,
    pub floor_damage: u8,
    pub diffuser_damage: u8,
    pub sidepod_damage: u8,
    pub drs_fault: bool,
    pub ers_fault: bool,
    pub gear_box_damage: u8,
    pub engine_damage: u8,
    pub engine_mguh_wear: u8,
    pub engine_es_wear: u8,
    pub engine_ce_wear: u8,
    pub engine_ice_wear: u8,
    pub engine_mguk_wear: u8,
    pub engine_tc_wear: u8,
    pub engine_blown: bool,
    pub engine_seized: bool,
}

impl CarDamageData {
    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            tyres_wear: r.f32_le_array()?,
            tyres_damage: r.u8_array()?,
            brakes_damage: r.u8_array()?,
            tyre_blisters: r.u8_array()?,
            front_left_wing_damage: r.u8()?,
            front_right_wing_damage: r.u8()?,
            rear_wing_damage: r.u8()?,
            floor_damage: r.u8()?,
            diffuser_damage: r.u8()?,
            sidepod_damage: r.u8()?,
            drs_fault: r.flag()?,
            ers_fault: r.flag()?,
            gear_box_damage: r.u8()?,
            engine_damage: r.u8()?,
            engine_mguh_wear: r.u8()?,
            engine_es_wear: r.u8()?,
            engine_ce_wear: r.u8()?,
            engine_ice_wear: r.u8()?,
            engine_mguk_wear: r.u8()?,
            engine_tc_wear: r.u8()?,
            engine_blown: r.flag()?,
            engine_seized: r.flag()?,
        })
    }

    /// Highest wear across the four tyres.
    pub fn max_tyre_wear(&self) -> f32 {
        self.tyres_wear.iter().copied().fold(0.0, f32::max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarDamagePacket {
    pub header: PacketHeader,
    pub cars: CarArray<CarDamageData>,
}

impl CarDamagePacket {
    pub fn player(&self) -> Option<&CarDamageData> {
        self.cars.get(self.header.player_index())
    }
}

pub fn decode(header: PacketHeader, body: &[u8]) -> Result<CarDamagePacket> {
    let mut r = body_reader(PacketKind::CarDamage, body)?;
    let cars = read_cars(&mut r, CAR_DAMAGE_ENTRY_SIZE, CarDamageData::read)?;
    Ok(CarDamagePacket { header, cars })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_CARS;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn last_car_fields_land_at_their_offsets() -> TestResult {
        let mut body = vec![0u8; PacketKind::CarDamage.body_size()];
        let base = (MAX_CARS - 1) * CAR_DAMAGE_ENTRY_SIZE;
        body[base..base + 4].copy_from_slice(&0.5f32.to_le_bytes());
        body[base + 32] = 77;
        body[base + 45] = 1;
        assert_eq!(base + CAR_DAMAGE_ENTRY_SIZE, body.len());

        let packet = decode(PacketHeader::default(), &body)?;
        let car = packet.cars.get(MAX_CARS - 1).ok_or("missing car 21")?;
        assert!((car.tyres_wear[0] - 0.5).abs() < f32::EPSILON);
        assert_eq!(car.diffuser_damage, 77);
        assert_eq!(car.sidepod_damage, 0);
        assert!(car.engine_seized);
        assert!(!car.engine_blown);
        assert!((car.max_tyre_wear() - 0.5).abs() < f32::EPSILON);

        let neighbour = packet.cars.get(MAX_CARS - 2).ok_or("missing car 20")?;
        assert_eq!(*neighbour, CarDamageData::default());
        Ok(())
    }
}
