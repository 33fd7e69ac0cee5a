use std::time::Duration;
use thiserror::Error;

/// Failure of a metadata lookup.
///
/// Cloneable because a single in-flight fetch hands the same outcome to every
/// caller waiting on that key.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("fetch task aborted: {0}")]
    Aborted(String),
}

impl FetchError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        FetchError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Stable tag for the error kind, used in JSON error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::NotFound { .. } => "not_found",
            FetchError::MalformedResponse(_) => "malformed_response",
            FetchError::Network(_) => "network_error",
            FetchError::Timeout(_) => "timeout",
            FetchError::Aborted(_) => "aborted",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            // reqwest does not report the configured duration back
            FetchError::Timeout(Duration::ZERO)
        } else if e.is_decode() {
            FetchError::MalformedResponse(e.to_string())
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_distinguishable() {
        assert_eq!(FetchError::not_found("video", "abc").kind(), "not_found");
        assert_eq!(
            FetchError::MalformedResponse("x".into()).kind(),
            "malformed_response"
        );
        assert_eq!(FetchError::Network("x".into()).kind(), "network_error");
        assert_eq!(
            FetchError::Timeout(Duration::from_millis(5)).kind(),
            "timeout"
        );
    }

    #[test]
    fn display_names_the_missing_entity() {
        let err = FetchError::not_found("channel", "UC123");
        assert_eq!(err.to_string(), "channel 'UC123' not found");
        assert_eq!(
            FetchError::Timeout(Duration::from_millis(250)).to_string(),
            "timed out after 250ms"
        );
    }
}
