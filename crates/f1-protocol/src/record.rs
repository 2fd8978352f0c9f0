//! The typed record produced for every successfully decoded datagram.

use serde::Serialize;

use crate::header::PacketHeader;
use crate::kind::PacketKind;
use crate::names::{session_type_name, track_name, tyre_compound_name, weather_name};
use crate::packets::{
    car_damage::{self, CarDamagePacket},
    car_setups::{self, CarSetupsPacket},
    car_status::{self, CarStatusPacket},
    car_telemetry::{self, CarTelemetryPacket},
    event::{self, EventPacket},
    final_classification::{self, FinalClassificationPacket},
    lap_data::{self, LapDataPacket},
    lap_positions::{self, LapPositionsPacket},
    lobby_info::{self, LobbyInfoPacket},
    motion::{self, MotionPacket},
    motion_ex::{self, MotionExPacket},
    participants::{self, ParticipantsPacket},
    session::{self, SessionPacket},
    session_history::{self, SessionHistoryPacket},
    time_trial::{self, TimeTrialPacket},
    tyre_sets::{self, TyreSetsPacket},
};
use crate::timing::{format_gap, format_lap_time};
use crate::Result;

/// Signature shared by every body decoder.
pub type BodyDecoder = fn(PacketHeader, &[u8]) -> Result<PacketRecord>;

macro_rules! packet_records {
    ($($variant:ident($packet:ty) => $module:ident),+ $(,)?) => {
        /// One decoded packet, tagged with its kind.
        #[derive(Debug, Clone, PartialEq, Serialize)]
        #[serde(tag = "kind", content = "packet")]
        pub enum PacketRecord {
            $($variant(Box<$packet>),)+
        }

        impl PacketRecord {
            pub fn kind(&self) -> PacketKind {
                match self {
                    $(PacketRecord::$variant(_) => PacketKind::$variant,)+
                }
            }

            pub fn header(&self) -> &PacketHeader {
                match self {
                    $(PacketRecord::$variant(p) => &p.header,)+
                }
            }
        }

        $(
            impl From<$packet> for PacketRecord {
                fn from(packet: $packet) -> Self {
                    PacketRecord::$variant(Box::new(packet))
                }
            }
        )+

        /// The built-in decoder for `kind`.
        pub fn standard_decoder(kind: PacketKind) -> BodyDecoder {
            match kind {
                $(PacketKind::$variant => |header: PacketHeader, body: &[u8]| {
                    $module::decode(header, body).map(PacketRecord::from)
                },)+
            }
        }
    };
}

packet_records! {
    Motion(MotionPacket) => motion,
    Session(SessionPacket) => session,
    LapData(LapDataPacket) => lap_data,
    Event(EventPacket) => event,
    Participants(ParticipantsPacket) => participants,
    CarSetups(CarSetupsPacket) => car_setups,
    CarTelemetry(CarTelemetryPacket) => car_telemetry,
    CarStatus(CarStatusPacket) => car_status,
    FinalClassification(FinalClassificationPacket) => final_classification,
    LobbyInfo(LobbyInfoPacket) => lobby_info,
    CarDamage(CarDamagePacket) => car_damage,
    SessionHistory(SessionHistoryPacket) => session_history,
    TyreSets(TyreSetsPacket) => tyre_sets,
    MotionEx(MotionExPacket) => motion_ex,
    TimeTrial(TimeTrialPacket) => time_trial,
    LapPositions(LapPositionsPacket) => lap_positions,
}

impl PacketRecord {
    pub fn session_uid(&self) -> u64 {
        self.header().session_uid
    }

    pub fn frame_identifier(&self) -> u32 {
        self.header().frame_identifier
    }

    /// One-line human-readable summary, prefixed with the kind.
    pub fn summary(&self) -> String {
        let detail = match self {
            PacketRecord::Motion(p) => match p.player() {
                Some(car) => format!(
                    "player g_lat={:.2} g_long={:.2} yaw={:.3}",
                    car.g_force_lateral, car.g_force_longitudinal, car.yaw
                ),
                None => "no player car".to_string(),
            },
            PacketRecord::Session(p) => format!(
                "track={} session={} weather={} laps={} zones={}",
                track_name(p.track_id),
                session_type_name(p.session_type),
                weather_name(p.weather.raw()),
                p.total_laps,
                p.active_marshal_zones().len()
            ),
            PacketRecord::LapData(p) => match p.player() {
                Some(lap) => format!(
                    "player P{} lap={} last={}",
                    lap.car_position,
                    lap.current_lap_num,
                    format_lap_time(lap.last_lap_time_ms)
                ),
                None => "no player car".to_string(),
            },
            PacketRecord::Event(p) => format!("{} {}", p.code, p.name()),
            PacketRecord::Participants(p) => format!("{} active", p.active().len()),
            PacketRecord::CarSetups(p) => match p.player() {
                Some(setup) => format!(
                    "player wings={}/{} fuel_load={:.1}kg",
                    setup.front_wing, setup.rear_wing, setup.fuel_load
                ),
                None => "no player car".to_string(),
            },
            PacketRecord::CarTelemetry(p) => match p.player() {
                Some(car) => format!(
                    "player speed={}km/h gear={} rpm={} throttle={:.2} brake={:.2}",
                    car.speed_kmh,
                    car.gear,
                    car.engine_rpm,
                    car.throttle_input(),
                    car.brake_input()
                ),
                None => "no player car".to_string(),
            },
            PacketRecord::CarStatus(p) => match p.player() {
                Some(car) => format!(
                    "player fuel={:.1}kg ers={:.0}% tyre={}",
                    car.fuel_in_tank,
                    car.ers_store_fraction() * 100.0,
                    tyre_compound_name(car.visual_tyre_compound)
                ),
                None => "no player car".to_string(),
            },
            PacketRecord::FinalClassification(p) => {
                format!("{} classified, podium={}", p.active().len(), p.podium().len())
            }
            PacketRecord::LobbyInfo(p) => {
                format!("{} players, {} ready", p.active().len(), p.ready_count())
            }
            PacketRecord::CarDamage(p) => match p.player() {
                Some(car) => format!("player max_tyre_wear={:.1}%", car.max_tyre_wear()),
                None => "no player car".to_string(),
            },
            PacketRecord::SessionHistory(p) => format!(
                "car={} laps={} best={}",
                p.car_idx,
                p.num_laps(),
                format_lap_time(p.best_lap().map_or(0, |lap| lap.lap_time_ms))
            ),
            PacketRecord::TyreSets(p) => format!(
                "car={} fitted={} available={}",
                p.car_idx,
                p.fitted()
                    .map_or("none", |set| tyre_compound_name(set.visual_tyre_compound)),
                p.available().count()
            ),
            PacketRecord::MotionEx(p) => format!(
                "front_wheels_angle={:.3} cog_height={:.3}",
                p.front_wheels_angle, p.height_of_cog_above_ground
            ),
            PacketRecord::TimeTrial(p) => format!(
                "pb={} rival_delta={}",
                format_lap_time(p.personal_best.lap_time_ms),
                format_gap(p.delta_to_rival_ms())
            ),
            PacketRecord::LapPositions(p) => format!(
                "laps={} from_lap={}",
                p.num_laps(),
                u16::from(p.lap_start) + 1
            ),
        };
        format!("{} {detail}", self.kind())
    }
}
