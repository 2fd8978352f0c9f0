//! Lap, sector and gap formatting for log lines and the CLI.

/// Laps longer than this are treated as not set.
pub const MAX_DISPLAY_LAP_MS: u32 = 3_600_000;

/// `M:SS.mmm`, or `--:--.---` for 0 and anything over an hour.
pub fn format_lap_time(ms: u32) -> String {
    if ms == 0 || ms > MAX_DISPLAY_LAP_MS {
        return "--:--.---".to_string();
    }
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1000;
    let millis = ms % 1000;
    format!("{minutes}:{seconds:02}.{millis:03}")
}

/// `SS.mmm` below a minute, lap format otherwise, `-.---` for 0.
pub fn format_sector_time(ms: u32) -> String {
    match ms {
        0 => "-.---".to_string(),
        60_000.. => format_lap_time(ms),
        _ => format!("{}.{:03}", ms / 1000, ms % 1000),
    }
}

/// Signed seconds with millisecond precision: `+1.234`, `-0.567`, `0.000`.
pub fn format_gap(ms: i64) -> String {
    let sign = match ms {
        1.. => "+",
        0 => "",
        _ => "-",
    };
    let abs = ms.unsigned_abs();
    format!("{sign}{}.{:03}", abs / 1000, abs % 1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lap_time_formatting() {
        assert_eq!(format_lap_time(83_456), "1:23.456");
        assert_eq!(format_lap_time(59_999), "0:59.999");
        assert_eq!(format_lap_time(600_005), "10:00.005");
    }

    #[test]
    fn unset_lap_times() {
        assert_eq!(format_lap_time(0), "--:--.---");
        assert_eq!(format_lap_time(MAX_DISPLAY_LAP_MS + 1), "--:--.---");
        assert_eq!(format_lap_time(MAX_DISPLAY_LAP_MS), "60:00.000");
    }

    #[test]
    fn sector_formatting() {
        assert_eq!(format_sector_time(0), "-.---");
        assert_eq!(format_sector_time(9_876), "9.876");
        assert_eq!(format_sector_time(29_050), "29.050");
        assert_eq!(format_sector_time(61_000), "1:01.000");
    }

    #[test]
    fn gap_formatting() {
        assert_eq!(format_gap(0), "0.000");
        assert_eq!(format_gap(1_234), "+1.234");
        assert_eq!(format_gap(-567), "-0.567");
        assert_eq!(format_gap(-12_005), "-12.005");
    }
}
