//! Time arithmetic for transit countdowns and forecast timestamps.
//!
//! Transit arrivals are expressed as seconds since local midnight of the
//! service day, so countdowns are computed against the wall clock rather
//! than against absolute instants.

use chrono::{DateTime, Local, TimeZone, Timelike};

/// Seconds elapsed since midnight of `now`, in `now`'s own timezone.
pub fn seconds_since_midnight<Tz: TimeZone>(now: &DateTime<Tz>) -> i64 {
    i64::from(now.num_seconds_from_midnight())
}

/// Seconds from `now` until an arrival given as seconds since midnight.
///
/// Not clamped: a negative value means the arrival time has already passed
/// on today's clock, and values above 86400 belong to the next day.
pub fn seconds_until_arrival<Tz: TimeZone>(realtime_arrival: i64, now: &DateTime<Tz>) -> i64 {
    realtime_arrival - seconds_since_midnight(now)
}

/// Format a countdown as `"{h}h {m}min"`, leaving the hour part empty when zero.
///
/// `3661` becomes `"1h 1min"` and `59` becomes `" 0min"`, keeping the
/// separating space. Negative input is treated as zero.
pub fn format_countdown(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = seconds / 60 - hours * 60;
    let hour_part = if hours == 0 {
        String::new()
    } else {
        format!("{}h", hours)
    };
    format!("{} {}min", hour_part, minutes)
}

/// Format a unix timestamp as `H:MM` in the given timezone.
///
/// Timestamps outside chrono's representable range format as `"-"`.
pub fn format_clock_time<Tz: TimeZone>(unix_seconds: i64, tz: &Tz) -> String {
    match tz.timestamp_opt(unix_seconds, 0).single() {
        Some(time) => format!("{}:{:02}", time.hour(), time.minute()),
        None => "-".to_string(),
    }
}

/// [`format_clock_time`] in the host's local timezone.
pub fn format_local_clock_time(unix_seconds: i64) -> String {
    format_clock_time(unix_seconds, &Local)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 3, 8, h, m, s).unwrap()
    }

    #[test]
    fn test_seconds_since_midnight() {
        assert_eq!(seconds_since_midnight(&at(0, 0, 0)), 0);
        assert_eq!(seconds_since_midnight(&at(1, 2, 3)), 3723);
        assert_eq!(seconds_since_midnight(&at(23, 59, 59)), 86399);
    }

    #[test]
    fn test_seconds_since_midnight_uses_own_timezone() {
        let helsinki = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = at(22, 30, 0).with_timezone(&helsinki);
        assert_eq!(seconds_since_midnight(&now), 30 * 60);
    }

    #[test]
    fn test_seconds_until_arrival_from_midnight() {
        assert_eq!(seconds_until_arrival(3600, &at(0, 0, 0)), 3600);
    }

    #[test]
    fn test_seconds_until_arrival_negative() {
        assert_eq!(seconds_until_arrival(3600, &at(2, 0, 0)), -3600);
    }

    #[test]
    fn test_seconds_until_arrival_next_day_service() {
        // 25:10 on the service clock is 01:10 the following morning
        assert_eq!(seconds_until_arrival(25 * 3600 + 600, &at(23, 0, 0)), 2 * 3600 + 600);
    }

    #[test]
    fn test_format_countdown_with_hours() {
        assert_eq!(format_countdown(3661), "1h 1min");
        assert_eq!(format_countdown(2 * 3600 + 15 * 60), "2h 15min");
    }

    #[test]
    fn test_format_countdown_without_hours() {
        assert_eq!(format_countdown(59), " 0min");
        assert_eq!(format_countdown(45 * 60), " 45min");
    }

    #[test]
    fn test_format_countdown_negative_clamps() {
        assert_eq!(format_countdown(-120), " 0min");
    }

    #[test]
    fn test_format_countdown_deterministic() {
        assert_eq!(format_countdown(5000), format_countdown(5000));
    }

    #[test]
    fn test_format_clock_time() {
        let utc = Utc;
        // 2021-03-08T09:05:00Z
        assert_eq!(format_clock_time(1_615_194_300, &utc), "9:05");
        // 2021-03-08T13:40:00Z
        assert_eq!(format_clock_time(1_615_210_800, &utc), "13:40");
    }

    #[test]
    fn test_format_clock_time_offset() {
        let helsinki = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(format_clock_time(1_615_194_300, &helsinki), "11:05");
    }

    #[test]
    fn test_format_clock_time_midnight() {
        assert_eq!(format_clock_time(1_615_161_600, &Utc), "0:00");
    }

    #[test]
    fn test_format_clock_time_deterministic() {
        let first = format_clock_time(1_615_194_300, &Utc);
        let second = format_clock_time(1_615_194_300, &Utc);
        assert_eq!(first, second);
    }
}
