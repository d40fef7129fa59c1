//! Streaming-related error types.
//!
//! Errors raised while consuming a run's event stream. Malformed spans
//! and truncation are not errors at this level; they travel inside the
//! stream as items.

use thiserror::Error;

/// Stream-specific error variants.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StreamError {
    /// The body stopped delivering bytes with an error.
    #[error("Stream connection lost: {message}")]
    ConnectionLost { message: String },

    /// The service reported a failed run.
    #[error("Agent run failed: {message}")]
    Backend { message: String },
}

impl StreamError {
    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StreamError::ConnectionLost { .. })
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::ConnectionLost { .. } => {
                "Connection to the agent was lost mid-response.".to_string()
            }
            StreamError::Backend { message } => format!("The agent run failed: {}", message),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::ConnectionLost { .. } => "E_STREAM_LOST",
            StreamError::Backend { .. } => "E_STREAM_BACKEND",
        }
    }
}
