//! Rate-limit bookkeeping derived from API response headers.
//!
//! The API reports two quota windows on every response:
//! - `x-rl-daily-limit`, `x-rl-daily-remaining`, `x-rl-daily-reset`
//! - `x-rl-hourly-limit`, `x-rl-hourly-remaining`, `x-rl-hourly-reset`
//!
//! plus `x-runtime`, the server-side processing time. [`RateLimitTracker`]
//! observes each response and keeps the latest [`RateLimitSnapshot`];
//! a 401 discards it until the next successful response.

pub mod headers;
mod snapshot;
mod tracker;

pub use snapshot::{RateLimitSnapshot, RequestMetadata};
pub use tracker::{same_origin, RateLimitTracker, ResponseObserver, TrackerState};
