use crate::config::Config;
use crate::endpoints::{
    ColorSchemesEndpoint, GamesEndpoint, ModFilesEndpoint, ModsEndpoint, UsersEndpoint,
};
use crate::error::{Error, Result};
use crate::http::{
    compute_backoff, error_from_response, is_retriable_status, ApiRequest, ApiResponse,
    ReqwestTransport, Transport,
};
use crate::rate_limit::headers::DAILY_LIMIT;
use crate::rate_limit::{
    same_origin, RateLimitSnapshot, RateLimitTracker, RequestMetadata, ResponseObserver,
    TrackerState,
};
use log::{debug, warn};
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::Mutex;
use url::Url;

/// A client for the Nexus Mods API.
///
/// Every response passes through the client's [`ResponseObserver`]s before
/// the caller sees it, so rate limits stay current even for failed requests.
pub struct NexusClient {
    config: Config,
    base_url: Url,
    transport: Arc<dyn Transport>,
    tracker: Arc<RateLimitTracker>,
    observers: Vec<Arc<dyn ResponseObserver>>,
    // Serializes rate-limit refreshes so concurrent callers share one request.
    refresh: Mutex<()>,
}

impl NexusClient {
    pub fn new(config: Config) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new(&config)?);
        Self::with_transport(config, transport)
    }

    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Result<Self> {
        let base_url = parse_base_url(&config.api_url)?;
        let tracker = Arc::new(RateLimitTracker::new(base_url.clone()));
        let tracking: Arc<dyn ResponseObserver> = tracker.clone();
        Ok(Self {
            config,
            base_url,
            transport,
            tracker,
            observers: vec![tracking],
            refresh: Mutex::new(()),
        })
    }

    /// Register another observer; it runs after rate-limit tracking.
    pub fn with_observer(mut self, observer: Arc<dyn ResponseObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn color_schemes(&self) -> ColorSchemesEndpoint<'_> {
        ColorSchemesEndpoint::new(self)
    }

    pub fn games(&self) -> GamesEndpoint<'_> {
        GamesEndpoint::new(self)
    }

    pub fn mods(&self) -> ModsEndpoint<'_> {
        ModsEndpoint::new(self)
    }

    pub fn mod_files(&self) -> ModFilesEndpoint<'_> {
        ModFilesEndpoint::new(self)
    }

    pub fn users(&self) -> UsersEndpoint<'_> {
        UsersEndpoint::new(self)
    }

    /// Metadata from the last response that carried rate-limit headers.
    /// Never sends a request.
    pub fn last_request_metadata(&self) -> Option<RequestMetadata> {
        self.tracker.last_request_metadata()
    }

    /// Current rate limits, refreshed with a key-validation request (which
    /// doesn't count against the quota) when none are known or the known
    /// ones are past a reset.
    ///
    /// Fails with [`Error::AuthenticationRequired`] after the API rejected
    /// the key, until a later request succeeds.
    pub async fn get_rate_limits(&self) -> Result<RateLimitSnapshot> {
        let _refresh = self.refresh.lock().await;
        match self.tracker.state() {
            TrackerState::AuthFailed => return Err(Error::AuthenticationRequired),
            TrackerState::HasSnapshot(meta) if !meta.rate_limits.is_outdated() => {
                return Ok(meta.rate_limits)
            }
            _ => {}
        }

        debug!("refreshing rate limits");
        if let Err(e) = self.users().validate().await {
            // A throttled or failed reply may still have carried fresh quota headers.
            let observed = match self.tracker.state() {
                TrackerState::HasSnapshot(meta) if !meta.rate_limits.is_outdated() => {
                    Some(meta.rate_limits)
                }
                _ => None,
            };
            if let Some(limits) = observed.filter(|_| matches!(e, Error::Api { .. })) {
                debug!("refresh request failed ({e}); using its rate limits");
                return Ok(limits);
            }
            return Err(e);
        }

        match self.tracker.state() {
            TrackerState::HasSnapshot(meta) => {
                if meta.rate_limits.is_outdated() {
                    warn!("API reported reset times already in the past; clocks may be skewed");
                }
                Ok(meta.rate_limits)
            }
            TrackerState::AuthFailed => Err(Error::AuthenticationRequired),
            TrackerState::NoState => Err(Error::MissingHeader { name: DAILY_LIMIT }),
        }
    }

    /// Whether `url` points at the API host, i.e. should carry credentials.
    pub(crate) fn is_api_url(&self, url: &Url) -> bool {
        same_origin(&self.base_url, url)
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> Result<ApiRequest> {
        let url = self.base_url.join(path.trim_start_matches('/'))?;
        Ok(ApiRequest::new(method, url))
    }

    /// Send a request and run the observers, retrying 429/5xx responses up
    /// to `max_retries` times. Returns the final response whatever its status.
    pub(crate) async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let mut attempt: u32 = 0;
        loop {
            let response = self.transport.send(request.clone()).await?;
            self.notify(&response)?;

            if is_retriable_status(response.status) && attempt < self.config.max_retries {
                let backoff = compute_backoff(attempt, response.retry_after());
                warn!(
                    "{} {} retrying (status {}), backoff {:?}",
                    request.method, request.url, response.status, backoff
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
                continue;
            }
            return Ok(response);
        }
    }

    /// Like [`execute`](Self::execute), but non-success statuses become errors.
    pub(crate) async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let response = self.execute(request).await?;
        if !response.status.is_success() {
            return Err(error_from_response(&response));
        }
        Ok(response)
    }

    pub(crate) async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.send(request).await?.json()
    }

    fn notify(&self, response: &ApiResponse) -> Result<()> {
        let mut first_error = None;
        for observer in &self.observers {
            if let Err(e) = observer.observe(response) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

/// Parse the API base so relative endpoint paths join beneath it.
fn parse_base_url(api_url: &str) -> Result<Url> {
    let mut base = api_url.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Ok(Url::parse(&base)?)
}
