//! Car telemetry packet (id 6).
//!
//! Layout per car, 60 bytes:
//!
//! | Offset | Field                              |
//! |--------|------------------------------------|
//! | 0      | speed (u16, km/h)                  |
//! | 2      | throttle, steer, brake (3 × f32)   |
//! | 14     | clutch (u8), gear (i8)             |
//! | 16     | engine rpm (u16)                   |
//! | 18     | drs, rev lights % (u8)             |
//! | 20     | rev lights bit value (u16)         |
//! | 22     | brake temps (4 × u16, °C)          |
//! | 30     | tyre surface / inner temps (8 × u8)|
//! | 38     | engine temp (u16, °C)              |
//! | 40     | tyre pressures (4 × f32, PSI)      |
//! | 56     | surface types (4 × u8)             |
//!
//! Followed by a 3-byte trailer: MFD panel, secondary MFD panel, suggested
//! gear. Wheel arrays are ordered RL, RR, FL, FR.

use serde::Serialize;

use super::{CarArray, body_reader, read_cars};
use crate::enums::Surface;
use crate::header::PacketHeader;
use crate::kind::PacketKind;
use crate::reader::ByteReader;
use crate::Result;

/// Size of one `CarTelemetryData` entry.
pub const CAR_TELEMETRY_ENTRY_SIZE: usize = 60;

/// MFD panel value meaning the display is closed.
pub const MFD_PANEL_CLOSED: u8 = 255;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CarTelemetryData {
    /// Speed in km/h.
    pub speed_kmh: u16,
    /// 0.0–1.0.
    pub throttle: f32,
    /// -1.0 (full left) to 1.0 (full right).
    pub steer: f32,
    /// 0.0–1.0.
    pub brake: f32,
    /// 0–100.
    pub clutch: u8,
    /// -1 = reverse, 0 = neutral, 1–8 forward.
    pub gear: i8,
    pub engine_rpm: u16,
    pub drs: bool,
    pub rev_lights_percent: u8,
    /// Bit 0 is the leftmost LED.
    pub rev_lights_bit_value: u16,
    pub brakes_temperature: [u16; 4],
    pub tyres_surface_temperature: [u8; 4],
    pub tyres_inner_temperature: [u8; 4],
    pub engine_temperature: u16,
    pub tyres_pressure: [f32; 4],
    pub surface_type: [Surface; 4],
}

impl CarTelemetryData {
    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            speed_kmh: r.u16_le()?,
            throttle: r.f32_le()?,
            steer: r.f32_le()?,
            brake: r.f32_le()?,
            clutch: r.u8()?,
            gear: r.i8()?,
            engine_rpm: r.u16_le()?,
            drs: r.flag()?,
            rev_lights_percent: r.u8()?,
            rev_lights_bit_value: r.u16_le()?,
            brakes_temperature: r.u16_le_array()?,
            tyres_surface_temperature: r.u8_array()?,
            tyres_inner_temperature: r.u8_array()?,
            engine_temperature: r.u16_le()?,
            tyres_pressure: r.f32_le_array()?,
            surface_type: r.u8_array::<4>()?.map(Surface::from_raw),
        })
    }

    /// Speed converted to metres per second.
    pub fn speed_ms(&self) -> f32 {
        f32::from(self.speed_kmh) / 3.6
    }

    /// Throttle clamped to 0–1; NaN reads as released.
    pub fn throttle_input(&self) -> f32 {
        unit_fraction(self.throttle)
    }

    /// Brake clamped to 0–1; NaN reads as released.
    pub fn brake_input(&self) -> f32 {
        unit_fraction(self.brake)
    }

    /// Steering clamped to -1–1; NaN reads as centred.
    pub fn steer_input(&self) -> f32 {
        if self.steer.is_nan() {
            0.0
        } else {
            self.steer.clamp(-1.0, 1.0)
        }
    }
}

fn unit_fraction(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarTelemetryPacket {
    pub header: PacketHeader,
    pub cars: CarArray<CarTelemetryData>,
    /// Open MFD panel; 255 = closed.
    pub mfd_panel_index: u8,
    pub mfd_panel_index_secondary_player: u8,
    /// 0 when there is no suggestion.
    pub suggested_gear: i8,
}

impl CarTelemetryPacket {
    pub fn player(&self) -> Option<&CarTelemetryData> {
        self.cars.get(self.header.player_index())
    }

    pub fn mfd_panel(&self) -> Option<u8> {
        (self.mfd_panel_index != MFD_PANEL_CLOSED).then_some(self.mfd_panel_index)
    }
}

pub fn decode(header: PacketHeader, body: &[u8]) -> Result<CarTelemetryPacket> {
    let mut r = body_reader(PacketKind::CarTelemetry, body)?;
    let cars = read_cars(&mut r, CAR_TELEMETRY_ENTRY_SIZE, CarTelemetryData::read)?;
    Ok(CarTelemetryPacket {
        header,
        cars,
        mfd_panel_index: r.u8()?,
        mfd_panel_index_secondary_player: r.u8()?,
        suggested_gear: r.i8()?,
    })
}
