//! Typed access to the API's rate-limit and timing headers.

use crate::error::{BoxError, Error, Result};
use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use std::any::type_name;

pub const DAILY_LIMIT: &str = "x-rl-daily-limit";
pub const DAILY_REMAINING: &str = "x-rl-daily-remaining";
pub const DAILY_RESET: &str = "x-rl-daily-reset";
pub const HOURLY_LIMIT: &str = "x-rl-hourly-limit";
pub const HOURLY_REMAINING: &str = "x-rl-hourly-remaining";
pub const HOURLY_RESET: &str = "x-rl-hourly-reset";
pub const RUNTIME: &str = "x-runtime";

pub const RATE_LIMIT_HEADERS: [&str; 6] = [
    DAILY_LIMIT,
    DAILY_REMAINING,
    DAILY_RESET,
    HOURLY_LIMIT,
    HOURLY_REMAINING,
    HOURLY_RESET,
];

/// Read the first value of `name` and convert it with `parse`.
///
/// Fails with [`Error::MissingHeader`] when the header is absent and with
/// [`Error::MalformedHeader`] when it is present but can't be converted.
pub fn header_value<T, E, F>(headers: &HeaderMap, name: &'static str, parse: F) -> Result<T>
where
    F: FnOnce(&str) -> std::result::Result<T, E>,
    E: Into<BoxError>,
{
    let value = headers.get(name).ok_or(Error::MissingHeader { name })?;
    let raw = value.to_str().map_err(|e| Error::MalformedHeader {
        name,
        raw: String::from_utf8_lossy(value.as_bytes()).into_owned(),
        target: type_name::<T>(),
        source: Box::new(e),
    })?;
    parse(raw.trim()).map_err(|e| Error::MalformedHeader {
        name,
        raw: raw.to_string(),
        target: type_name::<T>(),
        source: e.into(),
    })
}

pub fn int_header(headers: &HeaderMap, name: &'static str) -> Result<i32> {
    header_value(headers, name, str::parse::<i32>)
}

pub fn timestamp_header(headers: &HeaderMap, name: &'static str) -> Result<DateTime<Utc>> {
    header_value(headers, name, parse_timestamp)
}

pub fn seconds_header(headers: &HeaderMap, name: &'static str) -> Result<f64> {
    header_value(headers, name, str::parse::<f64>)
}

/// Whether any of the six quota headers is present.
pub fn has_rate_limit_headers(headers: &HeaderMap) -> bool {
    RATE_LIMIT_HEADERS.iter().any(|h| headers.contains_key(*h))
}

/// Parse a reset timestamp. The API sends `2019-04-26 00:00:00 +0000`;
/// RFC 3339 and RFC 2822 are accepted too.
pub fn parse_timestamp(s: &str) -> std::result::Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_rfc2822(s))
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S %z"))
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut h = HeaderMap::new();
        for (k, v) in pairs {
            h.append(*k, v.parse().unwrap());
        }
        h
    }

    #[test]
    fn missing_header_is_reported_by_name() {
        let h = headers(&[(DAILY_REMAINING, "10")]);
        match int_header(&h, DAILY_LIMIT) {
            Err(Error::MissingHeader { name }) => assert_eq!(name, "x-rl-daily-limit"),
            other => panic!("expected MissingHeader, got {other:?}"),
        }
    }

    #[test]
    fn malformed_header_keeps_raw_value_and_target() {
        let h = headers(&[(DAILY_LIMIT, "lots")]);
        match int_header(&h, DAILY_LIMIT) {
            Err(Error::MalformedHeader {
                name, raw, target, ..
            }) => {
                assert_eq!(name, DAILY_LIMIT);
                assert_eq!(raw, "lots");
                assert_eq!(target, "i32");
            }
            other => panic!("expected MalformedHeader, got {other:?}"),
        }
    }

    #[test]
    fn first_value_wins() {
        let h = headers(&[(HOURLY_LIMIT, "100"), (HOURLY_LIMIT, "5")]);
        assert_eq!(int_header(&h, HOURLY_LIMIT).unwrap(), 100);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut h = HeaderMap::new();
        let name = reqwest::header::HeaderName::from_bytes(b"X-RL-Daily-Limit").unwrap();
        h.insert(name, "2500".parse().unwrap());
        assert_eq!(int_header(&h, DAILY_LIMIT).unwrap(), 2500);
    }

    #[test]
    fn negative_remaining_parses() {
        let h = headers(&[(DAILY_REMAINING, "-3")]);
        assert_eq!(int_header(&h, DAILY_REMAINING).unwrap(), -3);
    }

    #[test]
    fn timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2019, 4, 26, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2019-04-26 00:00:00 +0000").unwrap(), expected);
        assert_eq!(parse_timestamp("2019-04-26T00:00:00Z").unwrap(), expected);
        assert_eq!(
            parse_timestamp("Fri, 26 Apr 2019 00:00:00 +0000").unwrap(),
            expected
        );
        assert_eq!(
            parse_timestamp("2019-04-26 02:00:00 +0200").unwrap(),
            expected
        );
        assert!(parse_timestamp("tomorrow").is_err());
    }

    #[test]
    fn runtime_seconds() {
        let h = headers(&[(RUNTIME, "0.042")]);
        assert_eq!(seconds_header(&h, RUNTIME).unwrap(), 0.042);
    }

    #[test]
    fn detects_rate_limit_headers() {
        assert!(!has_rate_limit_headers(&headers(&[(RUNTIME, "0.1")])));
        assert!(has_rate_limit_headers(&headers(&[(HOURLY_RESET, "x")])));
    }
}
