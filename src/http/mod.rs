use crate::config::Config;
use crate::error::{status_code_name, Error, Result};
use futures::future::BoxFuture;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, RETRY_AFTER, USER_AGENT};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const API_KEY_HEADER: &str = "apikey";
const APP_NAME_HEADER: &str = "application-name";
const APP_VERSION_HEADER: &str = "application-version";

/// An outbound request, fully resolved against the API base.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    /// Attach the API key and application headers.
    pub authenticated: bool,
}

impl ApiRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            query: Vec::new(),
            body: None,
            authenticated: true,
        }
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn json_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn authenticated(mut self, authenticated: bool) -> Self {
        self.authenticated = authenticated;
        self
    }
}

/// A fully read response. `url` is the final URL after redirects.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub url: Url,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl ApiResponse {
    pub fn new(url: Url, status: StatusCode, headers: HeaderMap, body: impl Into<String>) -> Self {
        Self {
            url,
            status,
            headers,
            body: body.into(),
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    pub fn retry_after(&self) -> Option<Duration> {
        self.headers
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
    }
}

/// Sends requests and returns complete responses.
///
/// Implementations deliver either a response (any status) or a transport
/// failure; timeouts and connection handling live here, not in the client.
pub trait Transport: Send + Sync {
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<ApiResponse>>;
}

/// The default [`Transport`], backed by a shared `reqwest::Client`.
pub struct ReqwestTransport {
    client: Client,
    credentials: HeaderMap,
}

impl ReqwestTransport {
    pub fn new(cfg: &Config) -> Result<Self> {
        Ok(Self {
            client: build_client(cfg)?,
            credentials: credential_headers(cfg)?,
        })
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<ApiResponse>> {
        Box::pin(async move {
            let mut builder = self
                .client
                .request(request.method.clone(), request.url.clone())
                .header(ACCEPT, HeaderValue::from_static("application/json"));
            if !request.query.is_empty() {
                builder = builder.query(&request.query);
            }
            if request.authenticated {
                builder = builder.headers(self.credentials.clone());
            }
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }

            let res = builder.send().await?;
            let url = res.url().clone();
            let status = res.status();
            let headers = res.headers().clone();
            let body = res.text().await?;
            debug!("{} {} -> {}", request.method, url, status);
            Ok(ApiResponse {
                url,
                status,
                headers,
                body,
            })
        })
    }
}

pub fn build_client(cfg: &Config) -> Result<Client> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(USER_AGENT, header_value("user-agent", &cfg.user_agent)?);
    // Credentials are attached per request so they never leak to CDN hosts.
    let client = Client::builder()
        .default_headers(default_headers)
        .timeout(Duration::from_secs(cfg.timeout_secs))
        .use_rustls_tls()
        .build()?;
    Ok(client)
}

fn credential_headers(cfg: &Config) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(API_KEY_HEADER, header_value(API_KEY_HEADER, &cfg.api_key)?);
    if let Some(name) = &cfg.app_name {
        headers.insert(APP_NAME_HEADER, header_value(APP_NAME_HEADER, name)?);
    }
    if let Some(version) = &cfg.app_version {
        headers.insert(APP_VERSION_HEADER, header_value(APP_VERSION_HEADER, version)?);
    }
    Ok(headers)
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| Error::InvalidHeader { name })
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Turn a non-success response into an [`Error::Api`], preferring the
/// message from the API's `{code, message}` error body.
pub fn error_from_response(response: &ApiResponse) -> Error {
    let status = response.status;
    let message = serde_json::from_str::<ErrorBody>(&response.body)
        .ok()
        .and_then(|e| e.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            format!(
                "The Nexus API returned status code {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )
        });
    Error::Api {
        status,
        code: status_code_name(status),
        message,
    }
}

pub fn compute_backoff(attempt: u32, retry_after: Option<Duration>) -> Duration {
    if let Some(d) = retry_after {
        return d;
    }
    // Exponential backoff with jitter: base 200ms * 2^attempt, max 5s.
    let base = 200u64.saturating_mul(1u64 << attempt.min(5));
    let max = 5_000u64.min(base);
    let jitter = fastrand::u64(0..=max / 2);
    Duration::from_millis(max / 2 + jitter)
}

pub fn is_retriable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Percent-encode one URL path segment (game domains, hashes).
pub fn encode_path_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: StatusCode, body: &str) -> ApiResponse {
        ApiResponse::new(
            Url::parse("https://api.nexusmods.com/v1/games.json").unwrap(),
            status,
            HeaderMap::new(),
            body,
        )
    }

    #[test]
    fn api_error_uses_body_message() {
        let res = response(
            StatusCode::NOT_FOUND,
            r#"{"code":404,"message":"No Game Found: xyz"}"#,
        );
        match error_from_response(&res) {
            Error::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(code, "not_found");
                assert_eq!(message, "No Game Found: xyz");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn api_error_falls_back_to_status_text() {
        let res = response(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        let err = error_from_response(&res);
        assert_eq!(
            err.to_string(),
            "The Nexus API returned status code 502: Bad Gateway"
        );
        assert!(err.is_retriable());
    }

    #[test]
    fn retry_after_seconds() {
        let mut res = response(StatusCode::TOO_MANY_REQUESTS, "");
        res.headers.insert(RETRY_AFTER, "7".parse().unwrap());
        assert_eq!(res.retry_after(), Some(Duration::from_secs(7)));
        assert_eq!(
            compute_backoff(0, res.retry_after()),
            Duration::from_secs(7)
        );
    }

    #[test]
    fn backoff_is_bounded() {
        for attempt in 0..10 {
            let d = compute_backoff(attempt, None);
            assert!(d >= Duration::from_millis(100));
            assert!(d <= Duration::from_millis(5_000));
        }
    }

    #[test]
    fn retriable_statuses() {
        assert!(is_retriable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retriable_status(StatusCode::SERVICE_UNAVAILABLE));
        assert!(!is_retriable_status(StatusCode::UNAUTHORIZED));
        assert!(!is_retriable_status(StatusCode::OK));
    }

    #[test]
    fn credentials_include_application_headers() {
        let cfg = Config::new("secret").with_application("Modpack", "1.0");
        let headers = credential_headers(&cfg).unwrap();
        assert_eq!(headers.get("apikey").unwrap(), "secret");
        assert_eq!(headers.get("application-name").unwrap(), "Modpack");
        assert_eq!(headers.get("application-version").unwrap(), "1.0");
    }

    #[test]
    fn invalid_api_key_is_rejected() {
        let cfg = Config::new("bad\nkey");
        assert!(matches!(
            credential_headers(&cfg),
            Err(Error::InvalidHeader { name: "apikey" })
        ));
    }

    #[test]
    fn url_path_segment_encoding() {
        assert_eq!(encode_path_segment("Prod Env/Blue%"), "Prod%20Env%2FBlue%25");
        assert_eq!(encode_path_segment("abc-._~123"), "abc-._~123");
    }
}
