//! Session packet (id 1): track, weather and rule settings.
//!
//! Sent twice per second. All 21 marshal zone slots and all 64 forecast
//! slots are always on the wire; the preceding counts mark the valid prefix.

use serde::Serialize;

use super::body_reader;
use crate::enums::{SafetyCarStatus, Weather, ZoneFlag};
use crate::header::PacketHeader;
use crate::kind::PacketKind;
use crate::reader::ByteReader;
use crate::slots::FixedSlots;
use crate::Result;

pub const MAX_MARSHAL_ZONES: usize = 21;
pub const MAX_FORECAST_SAMPLES: usize = 64;
pub const MAX_WEEKEND_SESSIONS: usize = 12;

pub const MARSHAL_ZONE_SIZE: usize = 5;
pub const FORECAST_SAMPLE_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MarshalZone {
    /// Fraction (0..1) of the way around the lap where the zone starts.
    pub zone_start: f32,
    pub zone_flag: ZoneFlag,
}

impl MarshalZone {
    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            zone_start: r.f32_le()?,
            zone_flag: ZoneFlag::from_raw(r.i8()?),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct WeatherForecastSample {
    pub session_type: u8,
    /// Minutes from now.
    pub time_offset: u8,
    pub weather: Weather,
    /// Celsius.
    pub track_temperature: i8,
    /// 0 = up, 1 = down, 2 = no change.
    pub track_temperature_change: i8,
    pub air_temperature: i8,
    pub air_temperature_change: i8,
    /// 0–100.
    pub rain_percentage: u8,
}

impl WeatherForecastSample {
    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            session_type: r.u8()?,
            time_offset: r.u8()?,
            weather: Weather::from_raw(r.u8()?),
            track_temperature: r.i8()?,
            track_temperature_change: r.i8()?,
            air_temperature: r.i8()?,
            air_temperature_change: r.i8()?,
            rain_percentage: r.u8()?,
        })
    }
}

/// Driving assists in force for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Assists {
    pub steering: u8,
    pub braking: u8,
    pub gearbox: u8,
    pub pit: u8,
    pub pit_release: u8,
    pub ers: u8,
    pub drs: u8,
    /// 0 = off, 1 = corners only, 2 = full.
    pub dynamic_racing_line: u8,
    /// 0 = 2D, 1 = 3D.
    pub dynamic_racing_line_type: u8,
}

/// Speed and temperature unit choices for both local players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct UnitPreferences {
    /// 0 = MPH, 1 = KPH.
    pub speed_lead_player: u8,
    /// 0 = Celsius, 1 = Fahrenheit.
    pub temperature_lead_player: u8,
    pub speed_secondary_player: u8,
    pub temperature_secondary_player: u8,
}

/// Race rule settings, one byte each, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RuleSettings {
    pub equal_car_performance: u8,
    pub recovery_mode: u8,
    pub flashback_limit: u8,
    pub surface_type: u8,
    pub low_fuel_mode: u8,
    pub race_starts: u8,
    pub tyre_temperature: u8,
    pub pit_lane_tyre_sim: u8,
    pub car_damage: u8,
    pub car_damage_rate: u8,
    pub collisions: u8,
    pub collisions_off_for_first_lap_only: u8,
    pub mp_unsafe_pit_release: u8,
    pub mp_off_for_griefing: u8,
    pub corner_cutting_stringency: u8,
    pub parc_ferme_rules: u8,
    pub pit_stop_experience: u8,
    pub safety_car: u8,
    pub safety_car_experience: u8,
    pub formation_lap: u8,
    pub formation_lap_experience: u8,
    pub red_flags: u8,
    pub affects_licence_level_solo: u8,
    pub affects_licence_level_mp: u8,
}

impl RuleSettings {
    fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        Ok(Self {
            equal_car_performance: r.u8()?,
            recovery_mode: r.u8()?,
            flashback_limit: r.u8()?,
            surface_type: r.u8()?,
            low_fuel_mode: r.u8()?,
            race_starts: r.u8()?,
            tyre_temperature: r.u8()?,
            pit_lane_tyre_sim: r.u8()?,
            car_damage: r.u8()?,
            car_damage_rate: r.u8()?,
            collisions: r.u8()?,
            collisions_off_for_first_lap_only: r.u8()?,
            mp_unsafe_pit_release: r.u8()?,
            mp_off_for_griefing: r.u8()?,
            corner_cutting_stringency: r.u8()?,
            parc_ferme_rules: r.u8()?,
            pit_stop_experience: r.u8()?,
            safety_car: r.u8()?,
            safety_car_experience: r.u8()?,
            formation_lap: r.u8()?,
            formation_lap_experience: r.u8()?,
            red_flags: r.u8()?,
            affects_licence_level_solo: r.u8()?,
            affects_licence_level_mp: r.u8()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionPacket {
    pub header: PacketHeader,
    pub weather: Weather,
    /// Celsius.
    pub track_temperature: i8,
    pub air_temperature: i8,
    pub total_laps: u8,
    /// Metres.
    pub track_length: u16,
    pub session_type: u8,
    /// -1 for unknown.
    pub track_id: i8,
    pub formula: u8,
    /// Seconds.
    pub session_time_left: u16,
    /// Seconds.
    pub session_duration: u16,
    /// km/h.
    pub pit_speed_limit: u8,
    pub game_paused: bool,
    pub is_spectating: bool,
    pub spectator_car_index: u8,
    pub sli_pro_native_support: bool,
    pub marshal_zones: FixedSlots<MarshalZone, MAX_MARSHAL_ZONES>,
    pub safety_car_status: SafetyCarStatus,
    pub network_game: bool,
    pub weather_forecast_samples: FixedSlots<WeatherForecastSample, MAX_FORECAST_SAMPLES>,
    /// 0 = perfect, 1 = approximate.
    pub forecast_accuracy: u8,
    /// 0–110.
    pub ai_difficulty: u8,
    pub season_link_identifier: u32,
    pub weekend_link_identifier: u32,
    pub session_link_identifier: u32,
    pub pit_stop_window_ideal_lap: u8,
    pub pit_stop_window_latest_lap: u8,
    pub pit_stop_rejoin_position: u8,
    pub assists: Assists,
    pub game_mode: u8,
    pub rule_set: u8,
    /// Minutes since midnight, local track time.
    pub time_of_day: u32,
    pub session_length: u8,
    pub units: UnitPreferences,
    pub num_safety_car_periods: u8,
    pub num_virtual_safety_car_periods: u8,
    pub num_red_flag_periods: u8,
    pub rules: RuleSettings,
    /// Session types making up the weekend, in order.
    pub weekend_structure: FixedSlots<u8, MAX_WEEKEND_SESSIONS>,
    /// Metres.
    pub sector2_lap_distance_start: f32,
    pub sector3_lap_distance_start: f32,
}

impl SessionPacket {
    pub fn active_marshal_zones(&self) -> &[MarshalZone] {
        self.marshal_zones.valid()
    }

    pub fn forecast(&self) -> &[WeatherForecastSample] {
        self.weather_forecast_samples.valid()
    }

    /// Forecast samples for one session type only.
    pub fn forecast_for(&self, session_type: u8) -> impl Iterator<Item = &WeatherForecastSample> {
        self.forecast()
            .iter()
            .filter(move |sample| sample.session_type == session_type)
    }
}

pub fn decode(header: PacketHeader, body: &[u8]) -> Result<SessionPacket> {
    let mut r = body_reader(PacketKind::Session, body)?;

    let weather = Weather::from_raw(r.u8()?);
    let track_temperature = r.i8()?;
    let air_temperature = r.i8()?;
    let total_laps = r.u8()?;
    let track_length = r.u16_le()?;
    let session_type = r.u8()?;
    let track_id = r.i8()?;
    let formula = r.u8()?;
    let session_time_left = r.u16_le()?;
    let session_duration = r.u16_le()?;
    let pit_speed_limit = r.u8()?;
    let game_paused = r.flag()?;
    let is_spectating = r.flag()?;
    let spectator_car_index = r.u8()?;
    let sli_pro_native_support = r.flag()?;
    let num_marshal_zones = r.u8()?;
    let marshal_zones =
        FixedSlots::read(&mut r, MARSHAL_ZONE_SIZE, num_marshal_zones, MarshalZone::read)?;

    let safety_car_status = SafetyCarStatus::from_raw(r.u8()?);
    let network_game = r.flag()?;
    let num_forecast_samples = r.u8()?;
    let weather_forecast_samples = FixedSlots::read(
        &mut r,
        FORECAST_SAMPLE_SIZE,
        num_forecast_samples,
        WeatherForecastSample::read,
    )?;

    let forecast_accuracy = r.u8()?;
    let ai_difficulty = r.u8()?;
    let season_link_identifier = r.u32_le()?;
    let weekend_link_identifier = r.u32_le()?;
    let session_link_identifier = r.u32_le()?;
    let pit_stop_window_ideal_lap = r.u8()?;
    let pit_stop_window_latest_lap = r.u8()?;
    let pit_stop_rejoin_position = r.u8()?;
    let assists = Assists {
        steering: r.u8()?,
        braking: r.u8()?,
        gearbox: r.u8()?,
        pit: r.u8()?,
        pit_release: r.u8()?,
        ers: r.u8()?,
        drs: r.u8()?,
        dynamic_racing_line: r.u8()?,
        dynamic_racing_line_type: r.u8()?,
    };
    let game_mode = r.u8()?;
    let rule_set = r.u8()?;
    let time_of_day = r.u32_le()?;
    let session_length = r.u8()?;
    let units = UnitPreferences {
        speed_lead_player: r.u8()?,
        temperature_lead_player: r.u8()?,
        speed_secondary_player: r.u8()?,
        temperature_secondary_player: r.u8()?,
    };
    let num_safety_car_periods = r.u8()?;
    let num_virtual_safety_car_periods = r.u8()?;
    let num_red_flag_periods = r.u8()?;
    let rules = RuleSettings::read(&mut r)?;
    let num_sessions_in_weekend = r.u8()?;
    let weekend_structure = FixedSlots::read(&mut r, 1, num_sessions_in_weekend, |e| e.u8())?;
    let sector2_lap_distance_start = r.f32_le()?;
    let sector3_lap_distance_start = r.f32_le()?;

    Ok(SessionPacket {
        header,
        weather,
        track_temperature,
        air_temperature,
        total_laps,
        track_length,
        session_type,
        track_id,
        formula,
        session_time_left,
        session_duration,
        pit_speed_limit,
        game_paused,
        is_spectating,
        spectator_car_index,
        sli_pro_native_support,
        marshal_zones,
        safety_car_status,
        network_game,
        weather_forecast_samples,
        forecast_accuracy,
        ai_difficulty,
        season_link_identifier,
        weekend_link_identifier,
        session_link_identifier,
        pit_stop_window_ideal_lap,
        pit_stop_window_latest_lap,
        pit_stop_rejoin_position,
        assists,
        game_mode,
        rule_set,
        time_of_day,
        session_length,
        units,
        num_safety_car_periods,
        num_virtual_safety_car_periods,
        num_red_flag_periods,
        rules,
        weekend_structure,
        sector2_lap_distance_start,
        sector3_lap_distance_start,
    })
}
