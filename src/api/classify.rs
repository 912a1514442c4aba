//! Error Classification
//!
//! Maps the final transport outcome of an operation onto the error taxonomy.
//! Pure: the same status or transport failure always yields the same kind.

use super::transport::{RawResponse, TransportError, TransportResult};
use crate::error::ClassifiedError;
use serde_json::Value;

/// Entity description used when the caller has none
const DEFAULT_ENTITY: &str = "Resource";

/// Longest upstream body excerpt kept in a diagnostic detail
const DETAIL_LIMIT: usize = 200;

/// Classify a final outcome; `None` means it was a success
pub fn classify(outcome: &TransportResult, entity: Option<&str>) -> Option<ClassifiedError> {
    match outcome {
        Ok(response) if response.is_success() => None,
        Ok(response) => Some(classify_status(response, entity)),
        Err(err) => Some(classify_transport(err)),
    }
}

/// Classify a non-2xx response
///
/// 404 is NotFound, 429 is RateLimited, 5xx is UpstreamUnavailable and every
/// other status is UpstreamRejected.
pub fn classify_status(response: &RawResponse, entity: Option<&str>) -> ClassifiedError {
    let status = response.status;
    let detail = upstream_detail(&response.body);

    match status {
        404 => ClassifiedError::NotFound {
            entity: entity.unwrap_or(DEFAULT_ENTITY).to_string(),
            status: Some(status),
            detail,
        },
        429 => ClassifiedError::RateLimited { status },
        500.. => ClassifiedError::UpstreamUnavailable { status, detail },
        _ => ClassifiedError::UpstreamRejected { status, detail },
    }
}

/// Classify a failure that produced no HTTP status
pub fn classify_transport(err: &TransportError) -> ClassifiedError {
    ClassifiedError::network(err.to_string(), err.is_timeout())
}

/// Upstream explanation, preferring the `error` field of a JSON body
fn upstream_detail(body: &[u8]) -> Option<String> {
    if body.is_empty() {
        return None;
    }

    if let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(body) {
        if let Some(Value::String(message)) = map.get("error") {
            return Some(message.clone());
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.chars().take(DETAIL_LIMIT).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::time::Duration;

    fn status(code: u16) -> ClassifiedError {
        classify_status(&RawResponse::new(code, ""), None)
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status(404).kind(), ErrorKind::NotFound);
        assert_eq!(status(429).kind(), ErrorKind::RateLimited);
        assert_eq!(status(500).kind(), ErrorKind::UpstreamUnavailable);
        assert_eq!(status(503).kind(), ErrorKind::UpstreamUnavailable);
        assert_eq!(status(400).kind(), ErrorKind::UpstreamRejected);
        assert_eq!(status(403).kind(), ErrorKind::UpstreamRejected);
    }

    #[test]
    fn test_status_code_preserved() {
        assert_eq!(status(503).status_code(), Some(503));
        assert_eq!(status(429).status_code(), Some(429));
        assert_eq!(status(404).status_code(), Some(404));
    }

    #[test]
    fn test_not_found_entity() {
        let err = classify_status(&RawResponse::new(404, ""), Some("Card with ID abc"));
        assert_eq!(err.to_string(), "Card with ID abc not found");
        assert_eq!(status(404).to_string(), "Resource not found");
    }

    #[test]
    fn test_upstream_error_text_kept_as_detail() {
        let err = classify_status(
            &RawResponse::new(400, r#"{"status": 400, "error": "Invalid parameter: foo"}"#),
            None,
        );
        assert_eq!(err.detail(), Some("Invalid parameter: foo"));
        assert!(!err.to_string().contains("foo"));

        let err = classify_status(&RawResponse::new(502, "<html>Bad Gateway</html>"), None);
        assert_eq!(err.detail(), Some("<html>Bad Gateway</html>"));
    }

    #[test]
    fn test_transport_failures_are_network() {
        let timeout = classify_transport(&TransportError::Timeout(Duration::from_secs(30)));
        assert_eq!(timeout.kind(), ErrorKind::Network);
        assert!(timeout.is_timeout());
        assert_eq!(timeout.status_code(), None);
        assert_eq!(timeout.to_string(), "MTG API request timed out");

        let refused = classify_transport(&TransportError::Connect("refused".into()));
        assert!(!refused.is_timeout());
        assert_eq!(refused.to_string(), "Unable to connect to MTG API");
        assert!(refused.detail().unwrap().contains("refused"));
    }

    #[test]
    fn test_success_is_unclassified() {
        assert!(classify(&Ok(RawResponse::new(200, "{}")), None).is_none());
        assert!(classify(&Ok(RawResponse::new(500, "")), None).is_some());
    }
}
