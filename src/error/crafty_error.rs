//! Unified error type for Crafty.

use thiserror::Error;

use super::category::ErrorCategory;
use super::config::ConfigError;
use super::context::ErrorContext;
use super::network::NetworkError;
use super::stream::StreamError;
use crate::traits::HttpError;

/// Unified error type for all Crafty operations.
#[derive(Debug, Error)]
pub enum CraftyError {
    /// Network-related errors.
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// Event stream errors.
    #[error(transparent)]
    Stream(#[from] StreamError),

    /// Configuration errors.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Filesystem or stdio errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON body did not have the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error with additional context attached.
    #[error("{context}: {error}")]
    WithContext {
        error: Box<CraftyError>,
        context: ErrorContext,
    },
}

impl CraftyError {
    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            CraftyError::Network(e) if e.is_server_side() => ErrorCategory::Server,
            CraftyError::Network(_) => ErrorCategory::Network,
            CraftyError::Stream(StreamError::Backend { .. }) => ErrorCategory::Server,
            CraftyError::Stream(StreamError::ConnectionLost { .. }) => ErrorCategory::Network,
            CraftyError::Config(_) => ErrorCategory::Configuration,
            CraftyError::Io(_) => ErrorCategory::System,
            CraftyError::Json(_) => ErrorCategory::Client,
            CraftyError::WithContext { error, .. } => error.category(),
        }
    }

    /// Check if this error is likely transient and can be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            CraftyError::Network(e) => e.is_retryable(),
            CraftyError::Stream(e) => e.is_retryable(),
            CraftyError::Config(_) | CraftyError::Json(_) => false,
            CraftyError::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::Interrupted | std::io::ErrorKind::WouldBlock
            ),
            CraftyError::WithContext { error, .. } => error.is_retryable(),
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            CraftyError::Network(e) => e.user_message(),
            CraftyError::Stream(e) => e.user_message(),
            CraftyError::Config(e) => e.to_string(),
            CraftyError::Io(e) => format!("File error: {}", e),
            CraftyError::Json(_) => "The agent service sent data in an unexpected format.".to_string(),
            CraftyError::WithContext { error, .. } => error.user_message(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            CraftyError::Network(e) => e.error_code(),
            CraftyError::Stream(e) => e.error_code(),
            CraftyError::Config(e) => e.error_code(),
            CraftyError::Io(_) => "E_SYS_IO",
            CraftyError::Json(_) => "E_JSON",
            CraftyError::WithContext { error, .. } => error.error_code(),
        }
    }

    /// Get the recovery hint for this error.
    pub fn recovery_hint(&self) -> &'static str {
        self.category().recovery_hint()
    }

    /// Attach context to this error.
    ///
    /// Context already present is replaced rather than nested.
    pub fn with_context(self, context: ErrorContext) -> Self {
        match self {
            CraftyError::WithContext { error, .. } => CraftyError::WithContext { error, context },
            other => CraftyError::WithContext {
                error: Box::new(other),
                context,
            },
        }
    }

    /// Get the context if this error carries one.
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            CraftyError::WithContext { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Get the underlying error without context.
    pub fn inner(&self) -> &CraftyError {
        match self {
            CraftyError::WithContext { error, .. } => error.inner(),
            other => other,
        }
    }
}

impl From<HttpError> for CraftyError {
    fn from(err: HttpError) -> Self {
        CraftyError::Network(err.into())
    }
}
