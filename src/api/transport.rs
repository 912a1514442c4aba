//! Catalog HTTP Transport
//!
//! The transport performs exactly one HTTP exchange per call and never
//! retries. Retry, rate limiting and classification live above it in the
//! client, which only sees the [`Transport`] trait; tests substitute a mock.
//!
//! # Example
//!
//! ```ignore
//! let transport = HttpTransport::new("https://api.magicthegathering.io/v1")?
//!     .with_timeout(Duration::from_secs(10));
//! let response = transport.get(&ApiRequest::card("abc")).await?;
//! ```

use super::params::QueryParameters;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Url;
use std::time::Duration;

/// Default catalog API location
pub const DEFAULT_BASE_URL: &str = "https://api.magicthegathering.io/v1";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
pub const DEFAULT_USER_AGENT: &str = concat!("mtg-catalog-mcp/", env!("CARGO_PKG_VERSION"));

/// One outbound GET request: resource path segments plus query parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    segments: Vec<String>,
    params: QueryParameters,
}

impl ApiRequest {
    /// `/cards` listing
    pub fn cards(params: QueryParameters) -> Self {
        Self {
            segments: vec!["cards".to_string()],
            params,
        }
    }

    /// `/cards/{id}`
    pub fn card(id: impl Into<String>) -> Self {
        Self {
            segments: vec!["cards".to_string(), id.into()],
            params: QueryParameters::new(),
        }
    }

    /// `/sets` listing
    pub fn sets(params: QueryParameters) -> Self {
        Self {
            segments: vec!["sets".to_string()],
            params,
        }
    }

    /// `/sets/{code}`
    pub fn set(code: impl Into<String>) -> Self {
        Self {
            segments: vec!["sets".to_string(), code.into()],
            params: QueryParameters::new(),
        }
    }

    /// Resource path relative to the base URL, e.g. `/cards/abc`
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn params(&self) -> &QueryParameters {
        &self.params
    }
}

/// Raw HTTP response (any status)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport-level failure (no HTTP status available)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The exchange did not finish within the per-request timeout
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// DNS resolution or TCP/TLS connect failed
    #[error("connection failed: {0}")]
    Connect(String),

    /// The connection broke while sending or reading
    #[error("request failed: {0}")]
    Request(String),

    /// The request could not be built (bad base URL)
    #[error("invalid request: {0}")]
    Build(String),
}

impl TransportError {
    /// Timeouts and connection-level failures are worth retrying
    pub fn is_transient(&self) -> bool {
        !matches!(self, TransportError::Build(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout(_))
    }
}

/// Result of one transport exchange
pub type TransportResult = Result<RawResponse, TransportError>;

/// Single-exchange transport abstraction
///
/// Implementations must be shareable across concurrent calls; each call owns
/// its request for the duration of the exchange.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one GET exchange
    async fn get(&self, request: &ApiRequest) -> TransportResult;
}

/// HTTP transport backed by a pooled reqwest client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// Reqwest HTTP client (connection pool shared by clones)
    client: reqwest::Client,

    /// API base URL
    base_url: Url,

    /// Per-request timeout
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport for the given base URL with the default User-Agent
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        Self::with_user_agent(base_url, DEFAULT_USER_AGENT)
    }

    /// Create a transport sending a custom User-Agent header
    pub fn with_user_agent(base_url: &str, user_agent: &str) -> Result<Self, TransportError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| TransportError::Build(format!("invalid base URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(TransportError::Build(format!(
                "base URL '{}' cannot carry a path",
                base_url
            )));
        }

        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| TransportError::Build(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Full URL for a request: base URL, path segments, query string
    pub fn url_for(&self, request: &ApiRequest) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                TransportError::Build(format!("base URL '{}' cannot carry a path", self.base_url))
            })?;
            segments.pop_if_empty();
            for segment in request.segments() {
                segments.push(segment);
            }
        }
        if !request.params().is_empty() {
            url.query_pairs_mut().extend_pairs(request.params().iter());
        }
        Ok(url)
    }

    async fn exchange(&self, url: Url) -> Result<RawResponse, reqwest::Error> {
        let response = self.client.get(url).timeout(self.timeout).send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok(RawResponse { status, body })
    }

    fn map_error(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.timeout)
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else if err.is_builder() {
            TransportError::Build(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, request: &ApiRequest) -> TransportResult {
        let url = self.url_for(request)?;
        tracing::debug!(%url, "sending catalog request");

        match tokio::time::timeout(self.timeout, self.exchange(url)).await {
            Ok(Ok(response)) => {
                tracing::debug!(
                    status = response.status,
                    bytes = response.body.len(),
                    "received catalog response"
                );
                Ok(response)
            }
            Ok(Err(err)) => Err(self.map_error(err)),
            Err(_) => Err(TransportError::Timeout(self.timeout)),
        }
    }
}
