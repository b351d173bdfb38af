//! Text forms for date-time and duration parameters.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use std::time::Duration;

/// Parse an ISO 8601 instant.
///
/// Supports:
/// - RFC 3339: "2024-01-15T12:00:00Z", "2024-01-15T07:00:00-05:00"
/// - No offset (UTC assumed): "2024-01-15T12:00:00"
/// - Date only (midnight UTC): "2024-01-15"
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, TimeParseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Utc.from_utc_datetime(&ndt));
    }

    if let Some(ndt) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(Utc.from_utc_datetime(&ndt));
    }

    Err(TimeParseError::InvalidFormat(s.to_string()))
}

/// RFC 3339 text with a `Z` suffix, parseable by [`parse_datetime`].
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

const UNITS: [(&str, u128); 5] = [
    ("d", 86_400_000),
    ("h", 3_600_000),
    ("m", 60_000),
    ("s", 1_000),
    ("ms", 1),
];

/// Parse a duration like "250ms", "30s", "5m", "2h", "1d".
///
/// A bare integer is read as seconds. Resolution is one millisecond.
pub fn parse_duration(s: &str) -> Result<Duration, TimeParseError> {
    let trimmed = s.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (digits, unit) = trimmed.split_at(split);

    if digits.is_empty() {
        return Err(TimeParseError::InvalidDuration(s.to_string()));
    }
    let amount: u64 = digits
        .parse()
        .map_err(|_| TimeParseError::InvalidDuration(s.to_string()))?;

    let unit = unit.trim();
    let millis_per_unit = if unit.is_empty() {
        1_000
    } else {
        UNITS
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, millis)| *millis as u64)
            .ok_or_else(|| TimeParseError::UnknownUnit(unit.to_string()))?
    };

    amount
        .checked_mul(millis_per_unit)
        .map(Duration::from_millis)
        .ok_or_else(|| TimeParseError::InvalidDuration(s.to_string()))
}

/// Format a duration using the largest unit that divides it exactly.
///
/// Sub-millisecond precision is dropped.
pub fn format_duration(d: &Duration) -> String {
    let millis = d.as_millis();
    if millis == 0 {
        return "0s".to_string();
    }

    for (name, per_unit) in UNITS {
        if millis % per_unit == 0 {
            return format!("{}{}", millis / per_unit, name);
        }
    }
    format!("{}ms", millis)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeParseError {
    #[error("Invalid time format: {0}")]
    InvalidFormat(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Unknown duration unit '{0}' (expected ms, s, m, h or d)")]
    UnknownUnit(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_iso8601() {
        let dt = parse_datetime("2024-01-15T12:00:00Z").unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.day(), 15);
        assert_eq!(dt.hour(), 12);
    }

    #[test]
    fn test_parse_with_offset_converts_to_utc() {
        let dt = parse_datetime("2024-01-15T07:00:00-05:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_without_zone_and_date_only() {
        let dt = parse_datetime("2024-01-15T06:30:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 15, 6, 30, 0).unwrap());

        let dt = parse_datetime("2024-01-15").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());

        assert!(parse_datetime("yesterday").is_err());
    }

    #[test]
    fn test_format_datetime() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        assert_eq!(format_datetime(&dt), "2024-01-15T12:00:00Z");
    }

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("30s").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_duration("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_duration("2h").unwrap(), Duration::from_secs(7200));
        assert_eq!(parse_duration("1d").unwrap(), Duration::from_secs(86_400));
        assert_eq!(parse_duration("45").unwrap(), Duration::from_secs(45));
        assert_eq!(parse_duration(" 10 s ").unwrap(), Duration::from_secs(10));
    }

    #[test]
    fn test_parse_duration_errors() {
        assert!(matches!(
            parse_duration("s"),
            Err(TimeParseError::InvalidDuration(_))
        ));
        assert!(matches!(
            parse_duration("10w"),
            Err(TimeParseError::UnknownUnit(u)) if u == "w"
        ));
        assert!(parse_duration("-5s").is_err());
    }

    #[test]
    fn test_format_duration_picks_largest_unit() {
        assert_eq!(format_duration(&Duration::from_secs(0)), "0s");
        assert_eq!(format_duration(&Duration::from_secs(90)), "90s");
        assert_eq!(format_duration(&Duration::from_secs(120)), "2m");
        assert_eq!(format_duration(&Duration::from_millis(1500)), "1500ms");
        assert_eq!(format_duration(&Duration::from_secs(7200)), "2h");
        assert_eq!(format_duration(&Duration::from_secs(172_800)), "2d");
    }
}
