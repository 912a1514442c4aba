//! Classified Error Taxonomy
//!
//! Every non-success outcome of a catalog operation surfaces as exactly one
//! [`ClassifiedError`]. The `Display` text is a stable summary meant for the
//! tool caller; upstream and library text is kept in [`ClassifiedError::detail`]
//! and only ever goes to the logs.

use serde::Serialize;

/// Taxonomy kind of a classified error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or invalid tool argument (never reaches the network)
    Validation,
    /// Upstream confirmed the entity does not exist
    NotFound,
    /// Upstream kept answering 429 after retries
    RateLimited,
    /// Upstream kept answering 5xx after retries
    UpstreamUnavailable,
    /// Upstream refused the request with another 4xx status
    UpstreamRejected,
    /// DNS/connect/timeout failure with no status code
    Network,
    /// Successful body that could not be parsed into the expected shape
    Mapping,
}

impl ErrorKind {
    /// Stable name used in tool output and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "ValidationError",
            ErrorKind::NotFound => "NotFoundError",
            ErrorKind::RateLimited => "RateLimitedError",
            ErrorKind::UpstreamUnavailable => "UpstreamUnavailableError",
            ErrorKind::UpstreamRejected => "UpstreamRejectedError",
            ErrorKind::Network => "NetworkError",
            ErrorKind::Mapping => "MappingError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by every catalog operation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifiedError {
    /// Invalid tool argument
    #[error("Invalid parameter '{field}': {constraint}")]
    Validation { field: String, constraint: String },

    /// Referenced card or set does not exist
    #[error("{entity} not found")]
    NotFound {
        entity: String,
        status: Option<u16>,
        detail: Option<String>,
    },

    /// Rate limit still exceeded after retries
    #[error("MTG API rate limit exceeded, please try again later")]
    RateLimited { status: u16 },

    /// Upstream server errors after retries
    #[error("MTG API service unavailable (status {status})")]
    UpstreamUnavailable { status: u16, detail: Option<String> },

    /// Upstream rejected the request
    #[error("MTG API rejected the request (status {status})")]
    UpstreamRejected { status: u16, detail: Option<String> },

    /// Connection-level failure
    #[error("{}", network_summary(.timed_out))]
    Network { detail: String, timed_out: bool },

    /// Unparseable success payload
    #[error("MTG API returned a response that could not be read")]
    Mapping { detail: String },
}

fn network_summary(timed_out: &bool) -> &'static str {
    if *timed_out {
        "MTG API request timed out"
    } else {
        "Unable to connect to MTG API"
    }
}

impl ClassifiedError {
    /// Create a validation error for the given field
    pub fn validation(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            constraint: constraint.into(),
        }
    }

    /// Create a not-found error for an entity description such as `Card with ID abc`
    pub fn not_found(entity: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            status: None,
            detail: None,
        }
    }

    /// Create a mapping error
    pub fn mapping(detail: impl Into<String>) -> Self {
        Self::Mapping {
            detail: detail.into(),
        }
    }

    /// Create a network error
    pub fn network(detail: impl Into<String>, timed_out: bool) -> Self {
        Self::Network {
            detail: detail.into(),
            timed_out,
        }
    }

    /// Taxonomy kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::UpstreamUnavailable { .. } => ErrorKind::UpstreamUnavailable,
            Self::UpstreamRejected { .. } => ErrorKind::UpstreamRejected,
            Self::Network { .. } => ErrorKind::Network,
            Self::Mapping { .. } => ErrorKind::Mapping,
        }
    }

    /// Upstream HTTP status code, when one was received
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::NotFound { status, .. } => *status,
            Self::RateLimited { status } => Some(*status),
            Self::UpstreamUnavailable { status, .. } => Some(*status),
            Self::UpstreamRejected { status, .. } => Some(*status),
            Self::Validation { .. } | Self::Network { .. } | Self::Mapping { .. } => None,
        }
    }

    /// Diagnostic detail for logs (never shown to the tool caller)
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Validation { .. } | Self::RateLimited { .. } => None,
            Self::NotFound { detail, .. }
            | Self::UpstreamUnavailable { detail, .. }
            | Self::UpstreamRejected { detail, .. } => detail.as_deref(),
            Self::Network { detail, .. } | Self::Mapping { detail } => Some(detail),
        }
    }

    /// Name of the offending parameter for validation errors
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Whether this error represents an exceeded timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Network { timed_out: true, .. })
    }
}
