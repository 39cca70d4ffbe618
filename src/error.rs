use reqwest::StatusCode;
use thiserror::Error;

/// Boxed parse failure carried by [`Error::MalformedHeader`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A rate-limit or timing header the API always sends was absent.
    #[error("the response doesn't include the expected {name} header")]
    MissingHeader { name: &'static str },

    #[error("the response includes unexpected {name} value: '{raw}' can't be converted to {target}")]
    MalformedHeader {
        name: &'static str,
        raw: String,
        target: &'static str,
        #[source]
        source: BoxError,
    },

    /// The last in-scope response was a 401; a new API key is needed.
    #[error("the API key was rejected; re-authenticate before querying rate limits")]
    AuthenticationRequired,

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Api {
        status: StatusCode,
        code: &'static str,
        message: String,
    },

    #[error("can't decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("invalid header value for {name}")]
    InvalidHeader { name: &'static str },
}

impl Error {
    /// Whether the failure is transient and the same request may succeed later.
    pub fn is_retriable(&self) -> bool {
        match self {
            Error::Api { code, .. } => matches!(*code, "rate_limited" | "upstream_error"),
            Error::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Map an HTTP error status to a stable error code.
pub fn status_code_name(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "bad_request",
        StatusCode::UNAUTHORIZED => "unauthorized",
        StatusCode::FORBIDDEN => "forbidden",
        StatusCode::NOT_FOUND => "not_found",
        StatusCode::CONFLICT => "conflict",
        StatusCode::UNPROCESSABLE_ENTITY => "unprocessable",
        StatusCode::TOO_MANY_REQUESTS => "rate_limited",
        s if s.is_server_error() => "upstream_error",
        _ => "server_error",
    }
}
