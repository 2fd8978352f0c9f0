//! Small enumerations carried as raw bytes on the wire.
//!
//! Unlisted values are kept as `Unknown(raw)` so a newer game build never
//! fails decoding.

use serde::Serialize;

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident : $repr:ty {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
            Unknown($repr),
        }

        impl $name {
            pub fn from_raw(raw: $repr) -> Self {
                match raw {
                    $($value => $name::$variant,)+
                    other => $name::Unknown(other),
                }
            }

            pub fn raw(self) -> $repr {
                match self {
                    $($name::$variant => $value,)+
                    $name::Unknown(other) => other,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::from_raw(0)
            }
        }
    };
}

wire_enum! {
    /// Pit status in lap data.
    PitStatus: u8 {
        None = 0,
        Pitting = 1,
        InPitArea = 2,
    }
}

wire_enum! {
    /// Sector the car is currently in.
    Sector: u8 {
        Sector1 = 0,
        Sector2 = 1,
        Sector3 = 2,
    }
}

wire_enum! {
    DriverStatus: u8 {
        InGarage = 0,
        FlyingLap = 1,
        InLap = 2,
        OutLap = 3,
        OnTrack = 4,
    }
}

wire_enum! {
    ResultStatus: u8 {
        Invalid = 0,
        Inactive = 1,
        Active = 2,
        Finished = 3,
        DidNotFinish = 4,
        Disqualified = 5,
        NotClassified = 6,
        Retired = 7,
    }
}

wire_enum! {
    /// Flag shown in a marshal zone.
    ZoneFlag: i8 {
        None = 0,
        Green = 1,
        Blue = 2,
        Yellow = 3,
        Red = 4,
        Invalid = -1,
    }
}

wire_enum! {
    Weather: u8 {
        Clear = 0,
        LightCloud = 1,
        Overcast = 2,
        LightRain = 3,
        HeavyRain = 4,
        Storm = 5,
    }
}

wire_enum! {
    SafetyCarStatus: u8 {
        None = 0,
        Full = 1,
        Virtual = 2,
        FormationLap = 3,
    }
}

wire_enum! {
    /// FIA flag shown to a car in car status.
    FiaFlag: i8 {
        None = 0,
        Green = 1,
        Blue = 2,
        Yellow = 3,
        Invalid = -1,
    }
}

wire_enum! {
    ErsDeployMode: u8 {
        None = 0,
        Medium = 1,
        Hotlap = 2,
        Overtake = 3,
    }
}

wire_enum! {
    /// Surface under a wheel.
    Surface: u8 {
        Tarmac = 0,
        RumbleStrip = 1,
        Concrete = 2,
        Rock = 3,
        Gravel = 4,
        Mud = 5,
        Sand = 6,
        Grass = 7,
        Water = 8,
        Cobblestone = 9,
        Metal = 10,
        Ridged = 11,
    }
}

wire_enum! {
    /// Lobby ready state.
    ReadyStatus: u8 {
        NotReady = 0,
        Ready = 1,
        Spectating = 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values_map_to_variants() {
        assert_eq!(PitStatus::from_raw(1), PitStatus::Pitting);
        assert_eq!(ResultStatus::from_raw(3), ResultStatus::Finished);
        assert_eq!(ZoneFlag::from_raw(-1), ZoneFlag::Invalid);
    }

    #[test]
    fn unknown_values_are_preserved() {
        assert_eq!(PitStatus::from_raw(9), PitStatus::Unknown(9));
        assert_eq!(PitStatus::Unknown(9).raw(), 9);
        assert_eq!(Surface::from_raw(11).raw(), 11);
    }

    #[test]
    fn default_is_the_zero_value() {
        assert_eq!(DriverStatus::default(), DriverStatus::InGarage);
        assert_eq!(FiaFlag::default(), FiaFlag::None);
    }
}
