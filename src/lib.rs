//! Typed client for the Nexus Mods API.
//!
//! ```no_run
//! use nexus_mods_api::{Config, NexusClient};
//!
//! # async fn run() -> nexus_mods_api::Result<()> {
//! let client = NexusClient::new(Config::new("my-api-key").with_application("MyTool", "1.0.0"))?;
//! let game = client.games().get_game("stardewvalley").await?;
//! println!("{} has {} mods", game.name, game.mods);
//!
//! let limits = client.get_rate_limits().await?;
//! if limits.is_blocked() {
//!     println!("blocked for {:?}", limits.time_until_renewal());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod models;
pub mod rate_limit;

pub use client::NexusClient;
pub use config::Config;
pub use error::{Error, Result};
pub use rate_limit::{
    RateLimitSnapshot, RateLimitTracker, RequestMetadata, ResponseObserver, TrackerState,
};
