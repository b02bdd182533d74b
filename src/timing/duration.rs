use chrono::{DateTime, NaiveDateTime, Utc};

/// Sentinel shown when a bound is missing.
pub const NO_DURATION: &str = "-";

/// Elapsed time as `"2u 5m"` or `"45m"`.
pub fn format_duration(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> String {
    let (Some(start), Some(end)) = (start, end) else {
        return NO_DURATION.to_string();
    };

    let minutes = floor_minutes(start, end).max(0);
    let hours = minutes / 60;
    let rest = minutes % 60;
    if hours > 0 {
        format!("{hours}u {rest}m")
    } else {
        format!("{rest}m")
    }
}

/// Whole minutes from `start` to `end`, floored; zero if a bound is missing.
pub fn minutes_between(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> i64 {
    match (start, end) {
        (Some(start), Some(end)) => floor_minutes(start, end),
        _ => 0,
    }
}

fn floor_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    (end - start).num_milliseconds().div_euclid(60_000)
}

/// Parses RFC 3339 or a local-less `YYYY-MM-DDTHH:MM[:SS]` (read as UTC).
/// Malformed input yields `None`.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Countdown text for a timer: `"mm:ss"` before the target, `"+ mm:ss"` after.
pub fn format_countdown(remaining_ms: i64) -> String {
    let overdue = remaining_ms < 0;
    let total_secs = remaining_ms.unsigned_abs() / 1000;
    let text = format!("{:02}:{:02}", total_secs / 60, total_secs % 60);
    if overdue {
        format!("+ {text}")
    } else {
        text
    }
}

/// Live elapsed text for a running phase: `"12m 5s"`.
pub fn format_elapsed(start: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - start).num_seconds().max(0);
    format!("{}m {}s", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn missing_bounds_give_sentinels() {
        assert_eq!(format_duration(None, Some(t0())), "-");
        assert_eq!(format_duration(Some(t0()), None), "-");
        assert_eq!(minutes_between(None, None), 0);
    }

    #[test]
    fn formats_hours_and_minutes() {
        let end = t0() + Duration::minutes(125) + Duration::seconds(59);
        assert_eq!(format_duration(Some(t0()), Some(end)), "2u 5m");
        assert_eq!(format_duration(Some(t0()), Some(t0() + Duration::minutes(45))), "45m");
        assert_eq!(minutes_between(Some(t0()), Some(end)), 125);
    }

    #[test]
    fn minutes_are_monotonic_in_end() {
        let mut last = 0;
        for secs in (0..4 * 3600).step_by(37) {
            let m = minutes_between(Some(t0()), Some(t0() + Duration::seconds(secs)));
            assert!(m >= last);
            assert!(m >= 0);
            last = m;
        }
    }

    #[test]
    fn parses_common_timestamp_shapes() {
        assert_eq!(parse_timestamp("2026-03-01T08:00:00Z"), Some(t0()));
        assert_eq!(parse_timestamp("2026-03-01T08:00"), Some(t0()));
        assert_eq!(parse_timestamp("gisteren"), None);
    }

    #[test]
    fn countdown_text() {
        assert_eq!(format_countdown(90_500), "01:30");
        assert_eq!(format_countdown(-61_000), "+ 01:01");
        assert_eq!(format_elapsed(t0(), t0() + Duration::seconds(125)), "2m 5s");
    }
}
