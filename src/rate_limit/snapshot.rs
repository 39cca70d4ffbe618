use super::headers::{
    int_header, seconds_header, timestamp_header, DAILY_LIMIT, DAILY_REMAINING, DAILY_RESET,
    HOURLY_LIMIT, HOURLY_REMAINING, HOURLY_RESET, RUNTIME,
};
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use log::debug;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Daily and hourly quota state as last reported by the API.
///
/// A snapshot is built from a single response and never modified afterwards;
/// newer responses replace it wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitSnapshot {
    /// Requests allowed per day.
    pub daily_limit: i32,
    /// Requests left today; may be zero or negative.
    pub daily_remaining: i32,
    /// When daily usage resets to `daily_limit`.
    pub daily_reset: DateTime<Utc>,
    /// Requests allowed per hour.
    pub hourly_limit: i32,
    /// Requests left this hour; may be zero or negative.
    pub hourly_remaining: i32,
    /// When hourly usage resets to `hourly_limit`.
    pub hourly_reset: DateTime<Utc>,
}

impl RateLimitSnapshot {
    /// Read all six quota headers. Nothing is returned unless every one parses.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self> {
        Ok(Self {
            daily_limit: int_header(headers, DAILY_LIMIT)?,
            daily_remaining: int_header(headers, DAILY_REMAINING)?,
            daily_reset: timestamp_header(headers, DAILY_RESET)?,
            hourly_limit: int_header(headers, HOURLY_LIMIT)?,
            hourly_remaining: int_header(headers, HOURLY_REMAINING)?,
            hourly_reset: timestamp_header(headers, HOURLY_RESET)?,
        })
    }

    /// Whether either window has reset since this snapshot was taken.
    pub fn is_outdated(&self) -> bool {
        self.is_outdated_at(Utc::now())
    }

    pub fn is_outdated_at(&self, now: DateTime<Utc>) -> bool {
        self.hourly_reset < now || self.daily_reset < now
    }

    /// Whether both windows are exhausted. One exhausted window alone
    /// doesn't block requests.
    pub fn is_blocked(&self) -> bool {
        self.daily_remaining <= 0 && self.hourly_remaining <= 0
    }

    /// The earlier of the two reset times.
    pub fn next_reset(&self) -> DateTime<Utc> {
        self.hourly_reset.min(self.daily_reset)
    }

    /// Time until requests are allowed again; zero when not blocked.
    pub fn time_until_renewal(&self) -> Duration {
        self.time_until_renewal_at(Utc::now())
    }

    pub fn time_until_renewal_at(&self, now: DateTime<Utc>) -> Duration {
        if !self.is_blocked() {
            return Duration::ZERO;
        }
        (self.next_reset() - now).to_std().unwrap_or(Duration::ZERO)
    }
}

/// The latest snapshot plus the server-side runtime of the request that
/// produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RequestMetadata {
    #[serde(flatten)]
    pub rate_limits: RateLimitSnapshot,
    /// Seconds the API spent processing the most recent request, when it
    /// sent `x-runtime`.
    #[serde(default)]
    pub last_request_runtime_seconds: Option<f64>,
}

impl RequestMetadata {
    /// Only the six quota headers are required; a missing or unreadable
    /// `x-runtime` leaves the runtime unset.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self> {
        let rate_limits = RateLimitSnapshot::from_headers(headers)?;
        let last_request_runtime_seconds = match seconds_header(headers, RUNTIME) {
            Ok(secs) => Some(secs),
            Err(Error::MissingHeader { .. }) => None,
            Err(e) => {
                debug!("ignoring runtime: {e}");
                None
            }
        };
        Ok(Self {
            rate_limits,
            last_request_runtime_seconds,
        })
    }
}
