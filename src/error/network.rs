//! Network-related error types.
//!
//! Errors raised while talking to the agent service over HTTP.

use thiserror::Error;

use crate::traits::HttpError;

/// Network-specific error variants.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NetworkError {
    /// Connection to the service failed.
    #[error("Connection failed to '{url}': {message}")]
    ConnectionFailed { url: String, message: String },

    /// Request timed out.
    #[error("Request timed out: {message}")]
    Timeout { message: String },

    /// HTTP status error (non-2xx response).
    #[error("HTTP {status} error: {message}")]
    HttpStatus { status: u16, message: String },

    /// Rate limited by the service.
    #[error("Rate limited")]
    RateLimited,

    /// The request URL was rejected before sending.
    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },

    /// Request was cancelled.
    #[error("Request cancelled")]
    Cancelled,

    /// Generic network error.
    #[error("Network error: {message}")]
    Other { message: String },
}

impl NetworkError {
    /// Build the error for a non-2xx response.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        if status == 429 {
            NetworkError::RateLimited
        } else {
            NetworkError::HttpStatus {
                status,
                message: message.into(),
            }
        }
    }

    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            NetworkError::ConnectionFailed { .. } => true,
            NetworkError::Timeout { .. } => true,
            NetworkError::HttpStatus { status, .. } => *status >= 500 || *status == 408,
            NetworkError::RateLimited => true,
            NetworkError::InvalidUrl { .. }
            | NetworkError::Cancelled
            | NetworkError::Other { .. } => false,
        }
    }

    /// Whether the service itself reported the failure.
    pub fn is_server_side(&self) -> bool {
        matches!(self, NetworkError::HttpStatus { status, .. } if *status >= 500)
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            NetworkError::ConnectionFailed { url, .. } => {
                format!("Unable to reach the agent service at {}.", url)
            }
            NetworkError::Timeout { .. } => {
                "The agent service did not answer in time.".to_string()
            }
            NetworkError::HttpStatus { status, .. } => match *status {
                400 => "The request was invalid.".to_string(),
                401 => "The API key was rejected.".to_string(),
                403 => "Access denied for this agent.".to_string(),
                404 => "The requested agent or resource was not found.".to_string(),
                500..=599 => {
                    "The agent service is experiencing issues. Please try again later.".to_string()
                }
                _ => format!("The agent service returned an error (HTTP {}).", status),
            },
            NetworkError::RateLimited => {
                "Too many requests. Please wait a moment and try again.".to_string()
            }
            NetworkError::InvalidUrl { url } => format!("'{}' is not a valid URL.", url),
            NetworkError::Cancelled => "The request was cancelled.".to_string(),
            NetworkError::Other { message } => format!("Network error: {}", message),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed { .. } => "E_NET_CONN",
            NetworkError::Timeout { .. } => "E_NET_TIMEOUT",
            NetworkError::HttpStatus { .. } => "E_NET_HTTP",
            NetworkError::RateLimited => "E_NET_RATE",
            NetworkError::InvalidUrl { .. } => "E_NET_URL",
            NetworkError::Cancelled => "E_NET_CANCEL",
            NetworkError::Other { .. } => "E_NET_OTHER",
        }
    }
}

impl From<HttpError> for NetworkError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::ConnectionFailed(message) => NetworkError::ConnectionFailed {
                url: String::new(),
                message,
            },
            HttpError::Timeout(message) => NetworkError::Timeout { message },
            HttpError::ServerError { status, message } => {
                NetworkError::from_status(status, message)
            }
            HttpError::Cancelled => NetworkError::Cancelled,
            HttpError::Io(message) => NetworkError::Other { message },
            HttpError::InvalidUrl(url) => NetworkError::InvalidUrl { url },
            HttpError::Other(message) => NetworkError::Other { message },
        }
    }
}
