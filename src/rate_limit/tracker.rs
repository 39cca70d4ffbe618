use super::headers::{has_rate_limit_headers, DAILY_LIMIT};
use super::snapshot::{RateLimitSnapshot, RequestMetadata};
use crate::error::Result;
use crate::http::ApiResponse;
use log::{debug, warn};
use reqwest::StatusCode;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use url::Url;

/// Called synchronously with every response before control returns to the
/// code that issued the request, whatever the status.
pub trait ResponseObserver: Send + Sync {
    fn observe(&self, response: &ApiResponse) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackerState {
    /// No in-scope response seen yet.
    NoState,
    HasSnapshot(RequestMetadata),
    /// The last in-scope response was a 401.
    AuthFailed,
}

/// Keeps the rate-limit snapshot of one client up to date.
///
/// Writers build the new state completely before taking the lock, so readers
/// see either the previous snapshot or the next one.
#[derive(Debug)]
pub struct RateLimitTracker {
    api_base: Url,
    state: RwLock<TrackerState>,
}

impl RateLimitTracker {
    pub fn new(api_base: Url) -> Self {
        Self {
            api_base,
            state: RwLock::new(TrackerState::NoState),
        }
    }

    pub fn state(&self) -> TrackerState {
        *self.read()
    }

    pub fn snapshot(&self) -> Option<RateLimitSnapshot> {
        self.last_request_metadata().map(|m| m.rate_limits)
    }

    pub fn last_request_metadata(&self) -> Option<RequestMetadata> {
        match *self.read() {
            TrackerState::HasSnapshot(meta) => Some(meta),
            _ => None,
        }
    }

    pub fn is_auth_failed(&self) -> bool {
        matches!(*self.read(), TrackerState::AuthFailed)
    }

    /// A response counts toward bookkeeping when it came from the API host or
    /// carries the daily-limit header.
    pub fn is_in_scope(&self, response: &ApiResponse) -> bool {
        same_origin(&self.api_base, &response.url) || response.headers.contains_key(DAILY_LIMIT)
    }

    fn read(&self) -> RwLockReadGuard<'_, TrackerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, TrackerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ResponseObserver for RateLimitTracker {
    fn observe(&self, response: &ApiResponse) -> Result<()> {
        if !self.is_in_scope(response) {
            debug!("ignoring out-of-scope response from {}", response.url);
            return Ok(());
        }

        if response.status == StatusCode::UNAUTHORIZED {
            let mut state = self.write();
            if !matches!(*state, TrackerState::AuthFailed) {
                warn!("API key rejected (401 from {}); discarding rate limits", response.url);
            }
            *state = TrackerState::AuthFailed;
            return Ok(());
        }

        if !has_rate_limit_headers(&response.headers) {
            debug!("no rate-limit headers on {} response from {}", response.status, response.url);
            return Ok(());
        }

        let meta = RequestMetadata::from_headers(&response.headers)?;
        let mut state = self.write();
        if matches!(*state, TrackerState::AuthFailed) {
            debug!("authentication recovered");
        }
        debug!(
            "rate limits: daily {}/{}, hourly {}/{}",
            meta.rate_limits.daily_remaining,
            meta.rate_limits.daily_limit,
            meta.rate_limits.hourly_remaining,
            meta.rate_limits.hourly_limit
        );
        *state = TrackerState::HasSnapshot(meta);
        Ok(())
    }
}

/// Same host and effective port.
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.host_str().is_some()
        && a.host_str() == b.host_str()
        && a.port_or_known_default() == b.port_or_known_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::rate_limit::headers::*;
    use chrono::{Duration, Utc};
    use reqwest::header::HeaderMap;
    use std::sync::Arc;

    fn base() -> Url {
        Url::parse("https://api.nexusmods.com/").unwrap()
    }

    fn quota_headers(daily_remaining: i32, hourly_remaining: i32) -> HeaderMap {
        let mut h = HeaderMap::new();
        let daily_reset = (Utc::now() + Duration::hours(20)).to_rfc3339();
        let hourly_reset = (Utc::now() + Duration::minutes(40)).to_rfc3339();
        h.insert(DAILY_LIMIT, "2500".parse().unwrap());
        h.insert(DAILY_REMAINING, daily_remaining.to_string().parse().unwrap());
        h.insert(DAILY_RESET, daily_reset.parse().unwrap());
        h.insert(HOURLY_LIMIT, "100".parse().unwrap());
        h.insert(HOURLY_REMAINING, hourly_remaining.to_string().parse().unwrap());
        h.insert(HOURLY_RESET, hourly_reset.parse().unwrap());
        h.insert(RUNTIME, "0.042".parse().unwrap());
        h
    }

    fn response(url: &str, status: StatusCode, headers: HeaderMap) -> ApiResponse {
        ApiResponse::new(Url::parse(url).unwrap(), status, headers, "")
    }

    fn api(status: StatusCode, headers: HeaderMap) -> ApiResponse {
        response(
            "https://api.nexusmods.com/v1/users/validate.json",
            status,
            headers,
        )
    }

    #[test]
    fn first_response_builds_snapshot() {
        let tracker = RateLimitTracker::new(base());
        assert_eq!(tracker.state(), TrackerState::NoState);
        tracker
            .observe(&api(StatusCode::OK, quota_headers(2490, 97)))
            .unwrap();
        let s = tracker.snapshot().unwrap();
        assert_eq!(s.daily_remaining, 2490);
        assert_eq!(s.hourly_remaining, 97);
        assert_eq!(
            tracker
                .last_request_metadata()
                .unwrap()
                .last_request_runtime_seconds,
            Some(0.042)
        );
    }

    #[test]
    fn snapshot_updates_without_runtime_header() {
        let tracker = RateLimitTracker::new(base());
        let mut h = quota_headers(2490, 97);
        h.remove(RUNTIME);
        tracker.observe(&api(StatusCode::OK, h)).unwrap();
        assert_eq!(tracker.snapshot().unwrap().daily_remaining, 2490);
        assert_eq!(
            tracker
                .last_request_metadata()
                .unwrap()
                .last_request_runtime_seconds,
            None
        );
    }

    #[test]
    fn later_response_replaces_snapshot() {
        let tracker = RateLimitTracker::new(base());
        tracker
            .observe(&api(StatusCode::OK, quota_headers(2490, 97)))
            .unwrap();
        tracker
            .observe(&api(StatusCode::NOT_FOUND, quota_headers(2489, 96)))
            .unwrap();
        let s = tracker.snapshot().unwrap();
        assert_eq!(s.daily_remaining, 2489);
        assert_eq!(s.hourly_remaining, 96);
    }

    #[test]
    fn unauthorized_discards_snapshot_and_success_recovers() {
        let tracker = RateLimitTracker::new(base());
        tracker
            .observe(&api(StatusCode::OK, quota_headers(10, 10)))
            .unwrap();
        tracker
            .observe(&api(StatusCode::UNAUTHORIZED, HeaderMap::new()))
            .unwrap();
        assert_eq!(tracker.state(), TrackerState::AuthFailed);
        assert!(tracker.snapshot().is_none());
        assert!(tracker.last_request_metadata().is_none());

        tracker
            .observe(&api(StatusCode::OK, quota_headers(9, 9)))
            .unwrap();
        assert!(!tracker.is_auth_failed());
        assert_eq!(tracker.snapshot().unwrap().daily_remaining, 9);
    }

    #[test]
    fn other_hosts_are_ignored() {
        let tracker = RateLimitTracker::new(base());
        tracker
            .observe(&api(StatusCode::OK, quota_headers(10, 10)))
            .unwrap();
        let cdn = response(
            "https://file-metadata.nexusmods.com/file/preview.json",
            StatusCode::UNAUTHORIZED,
            HeaderMap::new(),
        );
        tracker.observe(&cdn).unwrap();
        assert_eq!(tracker.snapshot().unwrap().daily_remaining, 10);
    }

    #[test]
    fn other_host_with_quota_headers_is_in_scope() {
        let tracker = RateLimitTracker::new(base());
        let proxied = response(
            "http://127.0.0.1:9000/v1/games.json",
            StatusCode::OK,
            quota_headers(5, 6),
        );
        assert!(tracker.is_in_scope(&proxied));
        tracker.observe(&proxied).unwrap();
        assert_eq!(tracker.snapshot().unwrap().hourly_remaining, 6);
    }

    #[test]
    fn api_response_without_quota_headers_changes_nothing() {
        let tracker = RateLimitTracker::new(base());
        tracker
            .observe(&api(StatusCode::OK, HeaderMap::new()))
            .unwrap();
        assert_eq!(tracker.state(), TrackerState::NoState);
    }

    #[test]
    fn partial_headers_fail_without_touching_state() {
        let tracker = RateLimitTracker::new(base());
        tracker
            .observe(&api(StatusCode::OK, quota_headers(10, 10)))
            .unwrap();
        let mut partial = quota_headers(1, 1);
        partial.remove(HOURLY_RESET);
        let err = tracker
            .observe(&api(StatusCode::OK, partial))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::MissingHeader {
                name: "x-rl-hourly-reset"
            }
        ));
        assert_eq!(tracker.snapshot().unwrap().daily_remaining, 10);
    }

    #[test]
    fn origin_compares_host_and_port() {
        let a = Url::parse("https://api.nexusmods.com").unwrap();
        assert!(same_origin(&a, &Url::parse("https://api.nexusmods.com:443/x").unwrap()));
        assert!(!same_origin(&a, &Url::parse("http://api.nexusmods.com/x").unwrap()));
        assert!(!same_origin(&a, &Url::parse("https://cf-files.nexusmods.com/x").unwrap()));
    }

    // Each writer encodes its id into every field; a reader must never see two ids.
    #[test]
    fn concurrent_updates_are_never_mixed() {
        let tracker = Arc::new(RateLimitTracker::new(base()));
        let writers: Vec<_> = (1..=8)
            .map(|id: i32| {
                let tracker = Arc::clone(&tracker);
                std::thread::spawn(move || {
                    let reset = (Utc::now() + Duration::hours(1) + Duration::seconds(id.into()))
                        .to_rfc3339();
                    let mut h = HeaderMap::new();
                    for name in [DAILY_LIMIT, DAILY_REMAINING, HOURLY_LIMIT, HOURLY_REMAINING] {
                        h.insert(name, id.to_string().parse().unwrap());
                    }
                    h.insert(DAILY_RESET, reset.parse().unwrap());
                    h.insert(HOURLY_RESET, reset.parse().unwrap());
                    h.insert(RUNTIME, id.to_string().parse().unwrap());
                    let res = api(StatusCode::OK, h);
                    for _ in 0..200 {
                        tracker.observe(&res).unwrap();
                    }
                })
            })
            .collect();
        let reader = {
            let tracker = Arc::clone(&tracker);
            std::thread::spawn(move || {
                for _ in 0..2_000 {
                    if let Some(meta) = tracker.last_request_metadata() {
                        let s = meta.rate_limits;
                        let id = s.daily_limit;
                        assert_eq!(s.daily_remaining, id);
                        assert_eq!(s.hourly_limit, id);
                        assert_eq!(s.hourly_remaining, id);
                        assert_eq!(s.daily_reset, s.hourly_reset);
                        assert_eq!(meta.last_request_runtime_seconds, Some(f64::from(id)));
                    }
                }
            })
        };
        for w in writers {
            w.join().unwrap();
        }
        reader.join().unwrap();
        assert!(tracker.snapshot().is_some());
    }
}
