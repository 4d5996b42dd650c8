//! Error types shared across crates

use thiserror::Error;

/// Failure of a call to an external model service (chat or moderation).
///
/// Every component that calls out treats these as recoverable: the error is
/// reported and a documented default takes its place.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LlmError {
    /// Could not reach the service (DNS, connect, TLS, timeout)
    #[error("network error: {0}")]
    Network(String),

    /// Service answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Rate limited by the service
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Credentials missing or rejected
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Response body did not have the expected envelope
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Client is not usable (missing key, bad base URL)
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl LlmError {
    /// Map an HTTP status plus body to the matching variant.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Self::Authentication(message),
            429 => Self::RateLimited(message),
            _ => Self::Api { status, message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(LlmError::from_status(401, "bad key"), LlmError::Authentication(_)));
        assert!(matches!(LlmError::from_status(429, "slow down"), LlmError::RateLimited(_)));
        assert_eq!(
            LlmError::from_status(500, "boom"),
            LlmError::Api {
                status: 500,
                message: "boom".to_string()
            }
        );
    }

    #[test]
    fn test_display() {
        let err = LlmError::Network("connection refused".into());
        assert_eq!(err.to_string(), "network error: connection refused");
    }
}
