//! Display names for the numeric ids the game sends.
//!
//! Unknown ids map to `"Unknown"`.

/// Maps `track_id` (0-based; -1 for unknown) to a display name.
pub fn track_name(track_id: i8) -> &'static str {
    const NAMES: &[&str] = &[
        "Melbourne",         // 0
        "Paul Ricard",       // 1
        "Shanghai",          // 2
        "Sakhir (Bahrain)",  // 3
        "Catalunya",         // 4
        "Monaco",            // 5
        "Montreal",          // 6
        "Silverstone",       // 7
        "Hockenheim",        // 8
        "Hungaroring",       // 9
        "Spa",               // 10
        "Monza",             // 11
        "Singapore",         // 12
        "Suzuka",            // 13
        "Abu Dhabi",         // 14
        "Texas",             // 15
        "Brazil",            // 16
        "Austria",           // 17
        "Sochi",             // 18
        "Mexico",            // 19
        "Baku (Azerbaijan)", // 20
        "Sakhir Short",      // 21
        "Silverstone Short", // 22
        "Texas Short",       // 23
        "Suzuka Short",      // 24
        "Hanoi",             // 25
        "Zandvoort",         // 26
        "Imola",             // 27
        "Portimao",          // 28
        "Jeddah",            // 29
        "Miami",             // 30
        "Las Vegas",         // 31
        "Losail",            // 32
        "Madrid",            // 33
    ];
    usize::try_from(track_id)
        .ok()
        .and_then(|idx| NAMES.get(idx).copied())
        .unwrap_or("Unknown")
}

/// Session type ids as sent since the sprint shootout sessions were added.
pub fn session_type_name(session_type: u8) -> &'static str {
    match session_type {
        1 => "Practice 1",
        2 => "Practice 2",
        3 => "Practice 3",
        4 => "Short Practice",
        5 => "Qualifying 1",
        6 => "Qualifying 2",
        7 => "Qualifying 3",
        8 => "Short Qualifying",
        9 => "One-Shot Qualifying",
        10 => "Sprint Shootout 1",
        11 => "Sprint Shootout 2",
        12 => "Sprint Shootout 3",
        13 => "Short Sprint Shootout",
        14 => "One-Shot Sprint Shootout",
        15 => "Race",
        16 => "Race 2",
        17 => "Race 3",
        18 => "Time Trial",
        _ => "Unknown",
    }
}

pub fn weather_name(weather: u8) -> &'static str {
    match weather {
        0 => "Clear",
        1 => "Light Cloud",
        2 => "Overcast",
        3 => "Light Rain",
        4 => "Heavy Rain",
        5 => "Storm",
        _ => "Unknown",
    }
}

/// Covers both actual (16–22, 7, 8) and visual (16–18, 7, 8) compound ids.
pub fn tyre_compound_name(compound: u8) -> &'static str {
    match compound {
        7 => "Inter",
        8 => "Wet",
        9 => "Dry (classic)",
        10 => "Wet (classic)",
        11 => "Super Soft",
        12 => "Soft",
        13 => "Medium",
        14 => "Hard",
        15 => "Wet (F2)",
        16 => "C5",
        17 => "C4",
        18 => "C3",
        19 => "C2",
        20 => "C1",
        21 => "C0",
        22 => "C6",
        _ => "Unknown",
    }
}

pub fn team_name(team_id: u8) -> &'static str {
    match team_id {
        0 => "Mercedes",
        1 => "Ferrari",
        2 => "Red Bull Racing",
        3 => "Williams",
        4 => "Aston Martin",
        5 => "Alpine",
        6 => "RB",
        7 => "Haas",
        8 => "McLaren",
        9 => "Sauber",
        41 => "F1 Generic",
        104 => "F1 Custom Team",
        129 => "Konnersport",
        142 => "APXGP '24",
        154 => "APXGP '25",
        155 => "Konnersport '24",
        185..=194 => "Classic",
        255 => "None",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_name_known_values() {
        assert_eq!(track_name(0), "Melbourne");
        assert_eq!(track_name(10), "Spa");
        assert_eq!(track_name(33), "Madrid");
    }

    #[test]
    fn track_name_negative_and_out_of_range_are_unknown() {
        assert_eq!(track_name(-1), "Unknown");
        assert_eq!(track_name(34), "Unknown");
        assert_eq!(track_name(i8::MAX), "Unknown");
    }

    #[test]
    fn other_tables() {
        assert_eq!(session_type_name(15), "Race");
        assert_eq!(session_type_name(18), "Time Trial");
        assert_eq!(session_type_name(10), "Sprint Shootout 1");
        assert_eq!(session_type_name(0), "Unknown");
        assert_eq!(session_type_name(19), "Unknown");
        assert_eq!(weather_name(4), "Heavy Rain");
        assert_eq!(tyre_compound_name(17), "C4");
        assert_eq!(tyre_compound_name(7), "Inter");
        assert_eq!(team_name(8), "McLaren");
        assert_eq!(team_name(60), "Unknown");
    }
}
