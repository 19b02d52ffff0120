//! Output formatting helpers
//!
//! Byte values go through `humansize`; everything else (comma-grouped
//! counts, compact ages like `3d4h`, fractional days for flat mode) is
//! formatted here. Modification-time extrema use `i64::MAX` / `i64::MIN`
//! as "no data" sentinels, which render as `NA`.

use humansize::{format_size, BINARY};
use std::time::{SystemTime, UNIX_EPOCH};

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;
const SECS_PER_WEEK: u64 = 7 * SECS_PER_DAY;
const SECS_PER_YEAR: u64 = 365 * SECS_PER_DAY;

/// Seconds since the Unix epoch, negative for pre-epoch timestamps.
pub fn unix_seconds(t: SystemTime) -> i64 {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs() as i64,
        Err(e) => -(e.duration().as_secs() as i64),
    }
}

/// True when a modtime field still holds an extremum sentinel (no file seen).
pub fn is_mtime_sentinel(mtime: i64) -> bool {
    mtime == i64::MAX || mtime == i64::MIN
}

/// Format a byte count: humanized (`12.34 GiB`) or raw under flat units.
pub fn bytes_str(bytes: u64, flat: bool) -> String {
    if flat {
        bytes.to_string()
    } else {
        format_size(bytes, BINARY)
    }
}

/// Format a count: comma-grouped or raw under flat units.
pub fn count_str(n: u64, flat: bool) -> String {
    if flat {
        n.to_string()
    } else {
        comma_separated(n)
    }
}

/// Format a number with thousands separators
pub fn comma_separated(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let lead = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && i % 3 == lead % 3 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Compact duration: the `precision` largest non-zero units out of
/// y/w/d/h/m/s, e.g. `3d4h12m` at precision 3.
pub fn compact_duration(mut secs: u64, precision: usize) -> String {
    const UNITS: &[(u64, &str)] = &[
        (SECS_PER_YEAR, "y"),
        (SECS_PER_WEEK, "w"),
        (SECS_PER_DAY, "d"),
        (SECS_PER_HOUR, "h"),
        (SECS_PER_MINUTE, "m"),
        (1, "s"),
    ];

    let mut out = String::new();
    let mut remaining = precision;
    for &(unit, label) in UNITS {
        if remaining == 0 {
            break;
        }
        let value = secs / unit;
        if value > 0 {
            out.push_str(&value.to_string());
            out.push_str(label);
            secs -= value * unit;
            remaining -= 1;
        }
    }

    if out.is_empty() {
        out.push_str("0s");
    }
    out
}

/// Age of a modtime relative to `now` as a compact duration, or `NA` for
/// sentinels and timestamps in the future.
pub fn age_str(mtime: i64, now: i64) -> String {
    match age_seconds(mtime, now) {
        Some(secs) => compact_duration(secs, 3),
        None => "NA".to_string(),
    }
}

/// Age of a modtime relative to `now` in fractional days (flat mode),
/// or `NA` for sentinels and timestamps in the future.
pub fn age_days_str(mtime: i64, now: i64) -> String {
    match age_seconds(mtime, now) {
        Some(secs) => format!("{:.3}", secs as f64 / SECS_PER_DAY as f64),
        None => "NA".to_string(),
    }
}

fn age_seconds(mtime: i64, now: i64) -> Option<u64> {
    if is_mtime_sentinel(mtime) || mtime > now {
        return None;
    }
    Some((now - mtime) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_comma_separated() {
        assert_eq!(comma_separated(0), "0");
        assert_eq!(comma_separated(999), "999");
        assert_eq!(comma_separated(1000), "1,000");
        assert_eq!(comma_separated(1234567), "1,234,567");
        assert_eq!(comma_separated(1234567890), "1,234,567,890");
    }

    #[test]
    fn test_compact_duration_precision() {
        let secs = 3 * SECS_PER_DAY + 4 * SECS_PER_HOUR + 12 * SECS_PER_MINUTE + 9;
        assert_eq!(compact_duration(secs, 3), "3d4h12m");
        assert_eq!(compact_duration(secs, 2), "3d4h");
        assert_eq!(compact_duration(secs, 6), "3d4h12m9s");
    }

    #[test]
    fn test_compact_duration_skips_zero_units() {
        assert_eq!(compact_duration(SECS_PER_YEAR + 30, 3), "1y30s");
        assert_eq!(compact_duration(0, 3), "0s");
        assert_eq!(compact_duration(59, 3), "59s");
    }

    #[test]
    fn test_age_sentinels_render_na() {
        assert_eq!(age_str(i64::MAX, 1000), "NA");
        assert_eq!(age_str(i64::MIN, 1000), "NA");
        assert_eq!(age_days_str(i64::MAX, 1000), "NA");
    }

    #[test]
    fn test_future_mtime_renders_na() {
        assert_eq!(age_str(2000, 1000), "NA");
        assert_eq!(age_days_str(2000, 1000), "NA");
    }

    #[test]
    fn test_age_days_fractional() {
        let now = 10 * SECS_PER_DAY as i64;
        let mtime = now - (SECS_PER_DAY as i64 + SECS_PER_DAY as i64 / 2);
        assert_eq!(age_days_str(mtime, now), "1.500");
    }

    #[test]
    fn test_bytes_and_count_flat_modes() {
        assert_eq!(bytes_str(1024, true), "1024");
        assert_eq!(count_str(1234, true), "1234");
        assert_eq!(count_str(1234, false), "1,234");
        assert!(bytes_str(1024, false).contains("KiB"));
    }

    #[test]
    fn test_unix_seconds_round_trip() {
        let t = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        assert_eq!(unix_seconds(t), 1_700_000_000);
        let before = UNIX_EPOCH - Duration::from_secs(10);
        assert_eq!(unix_seconds(before), -10);
    }
}
