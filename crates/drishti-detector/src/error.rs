//! Detector capability error types.

use thiserror::Error;

pub type DetectorResult<T> = Result<T, DetectorError>;

#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("API key not configured: {0}")]
    ApiKeyMissing(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("API returned {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DetectorError {
    /// True for failures that a retry can plausibly resolve: transport
    /// errors, rate limiting, and server-side failures. Client errors
    /// (4xx other than 429) fail fast.
    pub fn is_retryable(&self) -> bool {
        match self {
            DetectorError::Network(_) => true,
            DetectorError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16) -> DetectorError {
        DetectorError::HttpStatus {
            status,
            message: String::new(),
        }
    }

    #[test]
    fn test_server_errors_and_rate_limits_are_retryable() {
        assert!(http(429).is_retryable());
        assert!(http(500).is_retryable());
        assert!(http(503).is_retryable());
    }

    #[test]
    fn test_client_errors_fail_fast() {
        assert!(!http(400).is_retryable());
        assert!(!http(403).is_retryable());
        assert!(!http(404).is_retryable());
        assert!(!DetectorError::RequestFailed("no models configured".to_string()).is_retryable());
        assert!(!DetectorError::InvalidResponse("no content".to_string()).is_retryable());
    }
}
