//! Error types for the digest job.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.

use std::time::Duration;

/// Errors from the HTTP client layer.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Middleware error
    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// Rate limited by the remote service (429 response)
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Wait time suggested by the service
        retry_after: Duration,
    },

    /// Resource not found (404 response)
    #[error("Resource not found: {resource}")]
    NotFound {
        /// Description of the missing resource
        resource: String,
    },

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Atom/XML parsing error
    #[error("Failed to parse feed: {0}")]
    Xml(String),

    /// Server error (5xx response)
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Unexpected HTTP status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },
}

impl ClientError {
    /// Create a rate limited error with retry-after duration.
    #[must_use]
    pub fn rate_limited(seconds: u64) -> Self {
        Self::RateLimited { retry_after: Duration::from_secs(seconds) }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    /// Create a server error.
    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server { status, message: message.into() }
    }

    /// Create a feed parsing error.
    #[must_use]
    pub fn xml(message: impl std::fmt::Display) -> Self {
        Self::Xml(message.to_string())
    }

    /// Returns true for a 404 from the remote service.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Errors that end a digest run.
#[derive(thiserror::Error, Debug)]
pub enum DigestError {
    /// Missing or invalid configuration
    #[error("Configuration error ({variable}): {message}")]
    Config {
        /// Environment variable at fault
        variable: String,
        /// What is wrong with it
        message: String,
    },

    /// Webhook rejected the digest
    #[error("Webhook delivery failed: HTTP {status} {message}")]
    Delivery {
        /// HTTP status code
        status: u16,
        /// Response body (truncated)
        message: String,
    },

    /// Transport error during delivery
    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    /// Payload could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DigestError {
    /// Create a configuration error.
    #[must_use]
    pub fn config(variable: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config { variable: variable.into(), message: message.into() }
    }

    /// Create a delivery error.
    #[must_use]
    pub fn delivery(status: u16, message: impl Into<String>) -> Self {
        Self::Delivery { status, message: message.into() }
    }

    /// Process exit code for this error.
    ///
    /// Configuration problems exit with 2, everything else with 1.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config { .. } => 2,
            _ => 1,
        }
    }
}

impl From<reqwest::Error> for DigestError {
    fn from(err: reqwest::Error) -> Self {
        Self::Client(ClientError::Http(err))
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for run-level operations.
pub type DigestResult<T> = Result<T, DigestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        assert!(ClientError::not_found("doi/10.1/x").is_not_found());
        assert!(!ClientError::server(503, "down").is_not_found());
        assert!(!ClientError::rate_limited(60).is_not_found());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(DigestError::config("SLACK_WEBHOOK_URL", "missing").exit_code(), 2);
        assert_eq!(DigestError::delivery(500, "boom").exit_code(), 1);
    }

    #[test]
    fn test_json_error_is_serialization_failure() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = DigestError::from(json_err);
        assert!(matches!(err, DigestError::Serialization(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_delivery_message_mentions_status() {
        let err = DigestError::delivery(403, "invalid_token");
        let msg = err.to_string();
        assert!(msg.contains("403"));
        assert!(msg.contains("invalid_token"));
    }
}
