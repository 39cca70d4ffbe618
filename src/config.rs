use std::env;

pub const DEFAULT_API_URL: &str = "https://api.nexusmods.com";

/// Runtime configuration for the Nexus Mods API client.
/// Values are sourced from environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_url: String,
    pub app_name: Option<String>,
    pub app_version: Option<String>,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Extra attempts for 429/5xx responses. Transport failures are never retried.
    pub max_retries: u32,
}

impl Config {
    /// Configuration with defaults for everything but the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            app_name: None,
            app_version: None,
            user_agent: default_user_agent(),
            timeout_secs: 30,
            max_retries: 0,
        }
    }

    /// Load configuration from environment.
    ///
    /// Env vars:
    /// - NEXUS_API_KEY [required]
    /// - NEXUS_API_URL (default: https://api.nexusmods.com)
    /// - NEXUS_APP_NAME, NEXUS_APP_VERSION (optional application headers)
    /// - NEXUS_USER_AGENT (default: nexus-mods-api/<version>)
    /// - NEXUS_HTTP_TIMEOUT_SECS (default: 30)
    /// - NEXUS_MAX_RETRIES (default: 0)
    pub fn from_env() -> Result<Self, String> {
        let api_key = env::var("NEXUS_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| "Missing NEXUS_API_KEY".to_string())?;

        let mut cfg = Self::new(api_key);
        if let Ok(url) = env::var("NEXUS_API_URL") {
            cfg.api_url = url;
        }
        cfg.app_name = env::var("NEXUS_APP_NAME").ok();
        cfg.app_version = env::var("NEXUS_APP_VERSION").ok();
        if let Ok(ua) = env::var("NEXUS_USER_AGENT") {
            cfg.user_agent = ua;
        }
        cfg.timeout_secs = env::var("NEXUS_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(cfg.timeout_secs);
        cfg.max_retries = env::var("NEXUS_MAX_RETRIES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(cfg.max_retries);
        Ok(cfg)
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Identify the calling application to the API.
    pub fn with_application(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self.app_version = Some(version.into());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

fn default_user_agent() -> String {
    format!(
        "nexus-mods-api/{} (+https://crates.io/crates/nexus-mods-api)",
        env!("CARGO_PKG_VERSION")
    )
}
