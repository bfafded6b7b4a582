use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::{
    constants::TIME_PARSE_LAYOUT,
    errors::{Error, Result},
};

/// Parses "YYYY-MM-DD HH:MM:SS" as a UTC timestamp.
pub fn parse(s: &str) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(s.trim(), TIME_PARSE_LAYOUT)
        .map_err(|e| Error::parse("start time", s, e))?;
    Ok(Utc.from_utc_datetime(&naive))
}

/// Formats the timestamp with the same layout that [`parse`] accepts.
pub fn format(t: &DateTime<Utc>) -> String {
    t.format(TIME_PARSE_LAYOUT).to_string()
}

pub fn from_unix(secs: u64) -> Result<DateTime<Utc>> {
    let secs = i64::try_from(secs).map_err(|e| Error::parse("unix timestamp", &secs.to_string(), e))?;
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| Error::parse("unix timestamp", &secs.to_string(), "out of range"))
}

/// Adds a std duration to a timestamp, failing instead of overflowing.
pub fn add(t: &DateTime<Utc>, d: Duration) -> Result<DateTime<Utc>> {
    let delta = chrono::Duration::from_std(d)
        .map_err(|e| Error::InvalidDuration(format!("{} ({e})", humantime::format_duration(d))))?;
    t.checked_add_signed(delta)
        .ok_or_else(|| Error::InvalidDuration(format!("{} overflows", humantime::format_duration(d))))
}

/// Parses a duration such as "8760h", "1h30m" or "90s".
pub fn parse_duration(s: &str) -> Result<Duration> {
    humantime::parse_duration(s.trim()).map_err(|e| Error::parse("duration", s, e))
}

/// RUST_LOG=debug cargo test --package subnet-ops --lib -- timefmt::test_parse_round_trip --exact --show-output
#[test]
fn test_parse_round_trip() {
    let t = parse("2024-01-01 00:00:00").unwrap();
    assert_eq!(t.timestamp(), 1704067200);
    assert_eq!(format(&t), "2024-01-01 00:00:00");

    assert!(parse("2024-01-01T00:00:00Z").is_err());
    assert!(parse("2024-13-01 00:00:00").is_err());
    assert!(parse("tomorrow").is_err());
}

/// RUST_LOG=debug cargo test --package subnet-ops --lib -- timefmt::test_parse_duration --exact --show-output
#[test]
fn test_parse_duration() {
    assert_eq!(
        parse_duration("8760h").unwrap(),
        Duration::from_secs(8760 * 3600)
    );
    assert_eq!(
        parse_duration("1h30m").unwrap(),
        Duration::from_secs(5400)
    );
    assert_eq!(parse_duration(" 90s ").unwrap(), Duration::from_secs(90));
    assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
    assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);

    // nanosecond precision is kept on long periods
    assert_eq!(
        parse_duration("87600h1ns").unwrap(),
        Duration::new(87600 * 3600, 1)
    );
    assert_eq!(
        parse_duration("2562047h47m16s854775807ns").unwrap(),
        Duration::new(2562047 * 3600 + 47 * 60 + 16, 854775807)
    );

    assert!(matches!(parse_duration(""), Err(Error::Parse { .. })));
    assert!(parse_duration("10").is_err());
    assert!(parse_duration("-1h").is_err());
    assert!(parse_duration("h").is_err());
    assert!(parse_duration("10 parsecs").is_err());
}

#[test]
fn test_add() {
    let t = from_unix(1690000000).unwrap();
    let end = add(&t, Duration::from_secs(10000000)).unwrap();
    assert_eq!(end.timestamp(), 1700000000);

    assert!(matches!(
        add(&t, Duration::from_secs(u64::MAX)),
        Err(Error::InvalidDuration(_))
    ));
}
