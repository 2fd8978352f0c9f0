//! Extended motion packet (id 13): player-car physics only.
//!
//! Wheel arrays are ordered RL, RR, FL, FR.

use serde::Serialize;

use super::body_reader;
use crate::header::PacketHeader;
use crate::kind::PacketKind;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MotionExPacket {
    pub header: PacketHeader,
    pub suspension_position: [f32; 4],
    pub suspension_velocity: [f32; 4],
    pub suspension_acceleration: [f32; 4],
    /// Metres per second.
    pub wheel_speed: [f32; 4],
    pub wheel_slip_ratio: [f32; 4],
    pub wheel_slip_angle: [f32; 4],
    pub wheel_lat_force: [f32; 4],
    pub wheel_long_force: [f32; 4],
    /// Metres.
    pub height_of_cog_above_ground: f32,
    /// Local space, metres per second.
    pub local_velocity: [f32; 3],
    /// Radians per second.
    pub angular_velocity: [f32; 3],
    pub angular_acceleration: [f32; 3],
    /// Radians.
    pub front_wheels_angle: f32,
    pub wheel_vert_force: [f32; 4],
    pub front_aero_height: f32,
    pub rear_aero_height: f32,
    pub front_roll_angle: f32,
    pub rear_roll_angle: f32,
    pub chassis_yaw: f32,
    pub chassis_pitch: f32,
    pub wheel_camber: [f32; 4],
    pub wheel_camber_gain: [f32; 4],
}

pub fn decode(header: PacketHeader, body: &[u8]) -> Result<MotionExPacket> {
    let mut r = body_reader(PacketKind::MotionEx, body)?;
    Ok(MotionExPacket {
        header,
        suspension_position: r.f32_le_array()?,
        suspension_velocity: r.f32_le_array()?,
        suspension_acceleration: r.f32_le_array()?,
        wheel_speed: r.f32_le_array()?,
        wheel_slip_ratio: r.f32_le_array()?,
        wheel_slip_angle: r.f32_le_array()?,
        wheel_lat_force: r.f32_le_array()?,
        wheel_long_force: r.f32_le_array()?,
        height_of_cog_above_ground: r.f32_le()?,
        local_velocity: r.f32_le_array()?,
        angular_velocity: r.f32_le_array()?,
        angular_acceleration: r.f32_le_array()?,
        front_wheels_angle: r.f32_le()?,
        wheel_vert_force: r.f32_le_array()?,
        front_aero_height: r.f32_le()?,
        rear_aero_height: r.f32_le()?,
        front_roll_angle: r.f32_le()?,
        rear_roll_angle: r.f32_le()?,
        chassis_yaw: r.f32_le()?,
        chassis_pitch: r.f32_le()?,
        wheel_camber: r.f32_le_array()?,
        wheel_camber_gain: r.f32_le_array()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn sixty_one_floats_in_order() -> TestResult {
        let body: Vec<u8> = (0..61u16)
            .flat_map(|i| f32::from(i).to_le_bytes())
            .collect();
        assert_eq!(body.len(), PacketKind::MotionEx.body_size());

        let packet = decode(PacketHeader::default(), &body)?;
        assert_eq!(packet.suspension_position, [0.0, 1.0, 2.0, 3.0]);
        assert_eq!(packet.height_of_cog_above_ground, 32.0);
        assert_eq!(packet.front_wheels_angle, 42.0);
        assert_eq!(packet.chassis_pitch, 52.0);
        assert_eq!(packet.wheel_camber_gain, [57.0, 58.0, 59.0, 60.0]);
        Ok(())
    }
}
