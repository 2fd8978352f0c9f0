//! Motion packet (id 0): world-space motion for every car.

use serde::Serialize;

use super::{CarArray, body_reader, read_cars};
use crate::header::PacketHeader;
use crate::kind::PacketKind;
use crate::reader::ByteReader;
use crate::Result;

/// Size of one `CarMotionData` entry.
pub const CAR_MOTION_ENTRY_SIZE: usize = 60;

/// Normalised direction vectors are sent as i16 scaled by this factor.
pub const DIRECTION_SCALE: f32 = 32767.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CarMotionData {
    /// World position `[x, y, z]` in metres.
    pub world_position: [f32; 3],
    /// Velocity `[x, y, z]` in metres per second.
    pub world_velocity: [f32; 3],
    /// Forward direction, normalised and scaled by [`DIRECTION_SCALE`].
    pub world_forward_dir: [i16; 3],
    /// Right direction, normalised and scaled by [`DIRECTION_SCALE`].
    pub world_right_dir: [i16; 3],
    pub g_force_lateral: f32,
    pub g_force_longitudinal: f32,
    pub g_force_vertical: f32,
    /// Radians.
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

impl CarMotionData {
    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            world_position: r.f32_le_array()?,    // 0-11
            world_velocity: r.f32_le_array()?,    // 12-23
            world_forward_dir: r.i16_le_array()?, // 24-29
            world_right_dir: r.i16_le_array()?,   // 30-35
            g_force_lateral: r.f32_le()?,         // 36-39
            g_force_longitudinal: r.f32_le()?,    // 40-43
            g_force_vertical: r.f32_le()?,        // 44-47
            yaw: r.f32_le()?,                     // 48-51
            pitch: r.f32_le()?,                   // 52-55
            roll: r.f32_le()?,                    // 56-59
        })
    }

    /// Forward direction as a unit vector.
    pub fn forward_unit(&self) -> [f32; 3] {
        self.world_forward_dir.map(|v| f32::from(v) / DIRECTION_SCALE)
    }

    /// Speed in metres per second from the velocity vector.
    pub fn speed_ms(&self) -> f32 {
        let [x, y, z] = self.world_velocity;
        (x * x + y * y + z * z).sqrt()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MotionPacket {
    pub header: PacketHeader,
    pub cars: CarArray<CarMotionData>,
}

impl MotionPacket {
    pub fn player(&self) -> Option<&CarMotionData> {
        self.cars.get(self.header.player_index())
    }
}

pub fn decode(header: PacketHeader, body: &[u8]) -> Result<MotionPacket> {
    let mut r = body_reader(PacketKind::Motion, body)?;
    let cars = read_cars(&mut r, CAR_MOTION_ENTRY_SIZE, CarMotionData::read)?;
    Ok(MotionPacket { header, cars })
}
