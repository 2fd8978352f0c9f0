//! Event packet (id 3): a 4-character tag plus a 12-byte payload area.
//!
//! Payload shapes are looked up in [`EVENT_SHAPES`]. Tags missing from the
//! table decode to [`EventDetails::Unknown`].

use core::fmt;

use serde::{Serialize, Serializer};

use super::{body_reader, optional_car};
use crate::header::PacketHeader;
use crate::kind::PacketKind;
use crate::reader::ByteReader;
use crate::Result;

/// Bytes reserved for the payload after the tag.
pub const EVENT_PAYLOAD_SIZE: usize = 12;

/// A four-byte ASCII event tag such as `FTLP`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct EventCode(pub [u8; 4]);

impl EventCode {
    pub const SESSION_STARTED: Self = Self(*b"SSTA");
    pub const SESSION_ENDED: Self = Self(*b"SEND");
    pub const FASTEST_LAP: Self = Self(*b"FTLP");
    pub const RETIREMENT: Self = Self(*b"RTMT");
    pub const DRS_ENABLED: Self = Self(*b"DRSE");
    pub const DRS_DISABLED: Self = Self(*b"DRSD");
    pub const TEAM_MATE_IN_PITS: Self = Self(*b"TMPT");
    pub const CHEQUERED_FLAG: Self = Self(*b"CHQF");
    pub const RACE_WINNER: Self = Self(*b"RCWN");
    pub const PENALTY: Self = Self(*b"PENA");
    pub const SPEED_TRAP: Self = Self(*b"SPTP");
    pub const START_LIGHTS: Self = Self(*b"STLG");
    pub const LIGHTS_OUT: Self = Self(*b"LGOT");
    pub const DRIVE_THROUGH_SERVED: Self = Self(*b"DTSV");
    pub const STOP_GO_SERVED: Self = Self(*b"SGSV");
    pub const FLASHBACK: Self = Self(*b"FLBK");
    pub const BUTTONS: Self = Self(*b"BUTN");
    pub const RED_FLAG: Self = Self(*b"RDFL");
    pub const OVERTAKE: Self = Self(*b"OVTK");
    pub const SAFETY_CAR: Self = Self(*b"SCAR");
    pub const COLLISION: Self = Self(*b"COLL");

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl fmt::Display for EventCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() {
                write!(f, "{}", char::from(b))?;
            } else {
                write!(f, "\\x{b:02x}")?;
            }
        }
        Ok(())
    }
}

impl Serialize for EventCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Button state bitmask carried by `BUTN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct ButtonFlags(pub u32);

impl ButtonFlags {
    pub const CROSS_OR_A: u32 = 0x0000_0001;
    pub const TRIANGLE_OR_Y: u32 = 0x0000_0002;
    pub const CIRCLE_OR_B: u32 = 0x0000_0004;
    pub const SQUARE_OR_X: u32 = 0x0000_0008;
    pub const DPAD_LEFT: u32 = 0x0000_0010;
    pub const DPAD_RIGHT: u32 = 0x0000_0020;
    pub const DPAD_UP: u32 = 0x0000_0040;
    pub const DPAD_DOWN: u32 = 0x0000_0080;
    pub const OPTIONS_OR_MENU: u32 = 0x0000_0100;
    pub const L1_OR_LB: u32 = 0x0000_0200;
    pub const R1_OR_RB: u32 = 0x0000_0400;
    pub const L2_OR_LT: u32 = 0x0000_0800;
    pub const R2_OR_RT: u32 = 0x0000_1000;
    pub const LEFT_STICK_CLICK: u32 = 0x0000_2000;
    pub const RIGHT_STICK_CLICK: u32 = 0x0000_4000;
    pub const RIGHT_STICK_LEFT: u32 = 0x0000_8000;
    pub const RIGHT_STICK_RIGHT: u32 = 0x0001_0000;
    pub const RIGHT_STICK_UP: u32 = 0x0002_0000;
    pub const RIGHT_STICK_DOWN: u32 = 0x0004_0000;
    pub const SPECIAL: u32 = 0x0008_0000;
    /// UDP actions 1 through 12 occupy bits 20..=31.
    pub const UDP_ACTION_1: u32 = 0x0010_0000;

    /// True when every bit of `mask` is pressed.
    pub fn contains(self, mask: u32) -> bool {
        self.0 & mask == mask
    }

    /// Custom UDP action `n` (1–12).
    pub fn udp_action(self, n: u8) -> bool {
        (1..=12).contains(&n) && self.contains(Self::UDP_ACTION_1 << (n - 1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Penalty {
    pub penalty_type: u8,
    pub infringement_type: u8,
    pub vehicle_idx: u8,
    /// 255 when no other car was involved.
    pub other_vehicle_idx: u8,
    /// Seconds.
    pub time: u8,
    pub lap_num: u8,
    pub places_gained: u8,
}

impl Penalty {
    pub fn other_vehicle(&self) -> Option<u8> {
        optional_car(self.other_vehicle_idx)
    }
}

/// Decoded payload of one event.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub enum EventDetails {
    SessionStarted,
    SessionEnded,
    FastestLap {
        vehicle_idx: u8,
        /// Seconds.
        lap_time: f32,
    },
    Retirement {
        vehicle_idx: u8,
        reason: u8,
    },
    DrsEnabled,
    DrsDisabled {
        reason: u8,
    },
    TeamMateInPits {
        vehicle_idx: u8,
    },
    ChequeredFlag,
    RaceWinner {
        vehicle_idx: u8,
    },
    Penalty(Penalty),
    SpeedTrap {
        vehicle_idx: u8,
        speed: f32,
        is_overall_fastest_in_session: bool,
        is_driver_fastest_in_session: bool,
        fastest_vehicle_idx_in_session: u8,
        fastest_speed_in_session: f32,
    },
    StartLights {
        num_lights: u8,
    },
    LightsOut,
    DriveThroughServed {
        vehicle_idx: u8,
    },
    StopGoServed {
        vehicle_idx: u8,
        /// Seconds spent stationary.
        stop_time: f32,
    },
    Flashback {
        frame_identifier: u32,
        session_time: f32,
    },
    Buttons(ButtonFlags),
    RedFlag,
    Overtake {
        overtaking_vehicle_idx: u8,
        being_overtaken_vehicle_idx: u8,
    },
    SafetyCar {
        safety_car_type: u8,
        event_type: u8,
    },
    Collision {
        vehicle1_idx: u8,
        vehicle2_idx: u8,
    },
    /// A tag missing from [`EVENT_SHAPES`]; the payload is not interpreted.
    #[default]
    Unknown,
}

/// How to decode the payload behind one tag.
pub struct EventShape {
    pub code: EventCode,
    pub name: &'static str,
    pub decode: fn(&mut ByteReader<'_>) -> Result<EventDetails>,
}

impl fmt::Debug for EventShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventShape")
            .field("code", &self.code)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

macro_rules! shape {
    ($code:ident, $name:literal, |$r:ident| $body:expr) => {
        EventShape {
            code: EventCode::$code,
            name: $name,
            decode: |$r| Ok($body),
        }
    };
}

/// Every known event tag and its payload layout.
pub static EVENT_SHAPES: &[EventShape] = &[
    shape!(SESSION_STARTED, "Session Started", |_r| EventDetails::SessionStarted),
    shape!(SESSION_ENDED, "Session Ended", |_r| EventDetails::SessionEnded),
    shape!(FASTEST_LAP, "Fastest Lap", |r| EventDetails::FastestLap {
        vehicle_idx: r.u8()?,
        lap_time: r.f32_le()?,
    }),
    shape!(RETIREMENT, "Retirement", |r| EventDetails::Retirement {
        vehicle_idx: r.u8()?,
        reason: r.u8()?,
    }),
    shape!(DRS_ENABLED, "DRS Enabled", |_r| EventDetails::DrsEnabled),
    shape!(DRS_DISABLED, "DRS Disabled", |r| EventDetails::DrsDisabled {
        reason: r.u8()?
    }),
    shape!(TEAM_MATE_IN_PITS, "Team Mate In Pits", |r| {
        EventDetails::TeamMateInPits {
            vehicle_idx: r.u8()?,
        }
    }),
    shape!(CHEQUERED_FLAG, "Chequered Flag", |_r| EventDetails::ChequeredFlag),
    shape!(RACE_WINNER, "Race Winner", |r| EventDetails::RaceWinner {
        vehicle_idx: r.u8()?
    }),
    shape!(PENALTY, "Penalty Issued", |r| EventDetails::Penalty(Penalty {
        penalty_type: r.u8()?,
        infringement_type: r.u8()?,
        vehicle_idx: r.u8()?,
        other_vehicle_idx: r.u8()?,
        time: r.u8()?,
        lap_num: r.u8()?,
        places_gained: r.u8()?,
    })),
    shape!(SPEED_TRAP, "Speed Trap Triggered", |r| EventDetails::SpeedTrap {
        vehicle_idx: r.u8()?,
        speed: r.f32_le()?,
        is_overall_fastest_in_session: r.flag()?,
        is_driver_fastest_in_session: r.flag()?,
        fastest_vehicle_idx_in_session: r.u8()?,
        fastest_speed_in_session: r.f32_le()?,
    }),
    shape!(START_LIGHTS, "Start Lights", |r| EventDetails::StartLights {
        num_lights: r.u8()?
    }),
    shape!(LIGHTS_OUT, "Lights Out", |_r| EventDetails::LightsOut),
    shape!(DRIVE_THROUGH_SERVED, "Drive Through Served", |r| {
        EventDetails::DriveThroughServed {
            vehicle_idx: r.u8()?,
        }
    }),
    shape!(STOP_GO_SERVED, "Stop Go Served", |r| EventDetails::StopGoServed {
        vehicle_idx: r.u8()?,
        stop_time: r.f32_le()?,
    }),
    shape!(FLASHBACK, "Flashback", |r| EventDetails::Flashback {
        frame_identifier: r.u32_le()?,
        session_time: r.f32_le()?,
    }),
    shape!(BUTTONS, "Button Status", |r| EventDetails::Buttons(ButtonFlags(
        r.u32_le()?
    ))),
    shape!(RED_FLAG, "Red Flag", |_r| EventDetails::RedFlag),
    shape!(OVERTAKE, "Overtake", |r| EventDetails::Overtake {
        overtaking_vehicle_idx: r.u8()?,
        being_overtaken_vehicle_idx: r.u8()?,
    }),
    shape!(SAFETY_CAR, "Safety Car", |r| EventDetails::SafetyCar {
        safety_car_type: r.u8()?,
        event_type: r.u8()?,
    }),
    shape!(COLLISION, "Collision", |r| EventDetails::Collision {
        vehicle1_idx: r.u8()?,
        vehicle2_idx: r.u8()?,
    }),
];

/// Table entry for `code`, if the tag is known.
pub fn shape_for(code: EventCode) -> Option<&'static EventShape> {
    EVENT_SHAPES.iter().find(|shape| shape.code == code)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventPacket {
    pub header: PacketHeader,
    pub code: EventCode,
    pub details: EventDetails,
}

impl EventPacket {
    /// Human-readable event name, or `"Unknown"`.
    pub fn name(&self) -> &'static str {
        shape_for(self.code).map_or("Unknown", |shape| shape.name)
    }

    pub fn is_known(&self) -> bool {
        !matches!(self.details, EventDetails::Unknown)
    }
}

pub fn decode(header: PacketHeader, body: &[u8]) -> Result<EventPacket> {
    let mut r = body_reader(PacketKind::Event, body)?;
    let code = EventCode(r.u8_array()?);
    let mut payload = r.sub(EVENT_PAYLOAD_SIZE)?;
    let details = match shape_for(code) {
        Some(shape) => (shape.decode)(&mut payload)?,
        None => {
            tracing::debug!(%code, "unrecognised event tag");
            EventDetails::Unknown
        }
    };
    Ok(EventPacket {
        header,
        code,
        details,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    fn body(code: &[u8; 4], payload: &[u8]) -> Vec<u8> {
        let mut out = vec![0u8; PacketKind::Event.body_size()];
        out[..4].copy_from_slice(code);
        out[4..4 + payload.len()].copy_from_slice(payload);
        out
    }

    #[test]
    fn fastest_lap_payload() -> TestResult {
        let mut payload = vec![3u8];
        payload.extend_from_slice(&83.456f32.to_le_bytes());
        let packet = decode(PacketHeader::default(), &body(b"FTLP", &payload))?;
        assert_eq!(packet.name(), "Fastest Lap");
        match packet.details {
            EventDetails::FastestLap {
                vehicle_idx,
                lap_time,
            } => {
                assert_eq!(vehicle_idx, 3);
                assert!((lap_time - 83.456).abs() < 1e-4);
            }
            other => return Err(format!("unexpected {other:?}").into()),
        }
        Ok(())
    }

    #[test]
    fn unknown_tag_has_no_payload() -> TestResult {
        let packet = decode(PacketHeader::default(), &body(b"ZZZZ", &[1, 2, 3]))?;
        assert_eq!(packet.details, EventDetails::Unknown);
        assert_eq!(packet.name(), "Unknown");
        assert!(!packet.is_known());
        assert_eq!(packet.code.to_string(), "ZZZZ");
        Ok(())
    }

    #[test]
    fn penalty_carries_all_seven_bytes() -> TestResult {
        let packet = decode(
            PacketHeader::default(),
            &body(b"PENA", &[1, 2, 3, 255, 5, 6, 7]),
        )?;
        let EventDetails::Penalty(p) = packet.details else {
            return Err("expected a penalty".into());
        };
        assert_eq!(p.vehicle_idx, 3);
        assert_eq!(p.other_vehicle(), None);
        assert_eq!(p.places_gained, 7);
        Ok(())
    }

    #[test]
    fn flashback_and_buttons() -> TestResult {
        let mut payload = 1234u32.to_le_bytes().to_vec();
        payload.extend_from_slice(&12.5f32.to_le_bytes());
        let packet = decode(PacketHeader::default(), &body(b"FLBK", &payload))?;
        assert_eq!(
            packet.details,
            EventDetails::Flashback {
                frame_identifier: 1234,
                session_time: 12.5
            }
        );

        let mask = ButtonFlags::CROSS_OR_A | (ButtonFlags::UDP_ACTION_1 << 2);
        let packet = decode(PacketHeader::default(), &body(b"BUTN", &mask.to_le_bytes()))?;
        let EventDetails::Buttons(buttons) = packet.details else {
            return Err("expected buttons".into());
        };
        assert!(buttons.contains(ButtonFlags::CROSS_OR_A));
        assert!(!buttons.contains(ButtonFlags::TRIANGLE_OR_Y));
        assert!(buttons.udp_action(3));
        assert!(!buttons.udp_action(13));
        Ok(())
    }

    #[test]
    fn every_tag_appears_once() {
        for (i, shape) in EVENT_SHAPES.iter().enumerate() {
            let dupes = EVENT_SHAPES
                .iter()
                .skip(i + 1)
                .filter(|other| other.code == shape.code)
                .count();
            assert_eq!(dupes, 0, "{} listed twice", shape.code);
        }
        assert_eq!(EVENT_SHAPES.len(), 21);
    }

    #[test]
    fn non_printable_tag_is_escaped() {
        assert_eq!(EventCode([b'A', 0, b'B', b' ']).to_string(), "A\\x00B\\x20");
    }
}
