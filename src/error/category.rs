//! Error category classification for unified error handling.
//!
//! Categories label errors in logs and pick the hint shown next to them.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network-related errors (connection, DNS, timeout).
    /// Generally transient and retryable.
    Network,

    /// Agent service errors (HTTP 5xx, run failures).
    /// Generally transient and retryable after delay.
    Server,

    /// Client-side errors (bad request, undecodable response).
    /// Not retryable.
    Client,

    /// System/OS errors (reading a capture file, stdout closed).
    System,

    /// Configuration errors (bad URL, unparsable number).
    /// Not retryable until configuration is corrected.
    Configuration,
}

impl ErrorCategory {
    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Server => "server",
            ErrorCategory::Client => "client",
            ErrorCategory::System => "system",
            ErrorCategory::Configuration => "configuration",
        }
    }

    /// Returns suggested recovery actions for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check that the agent service is reachable and try again",
            ErrorCategory::Server => "The agent service may be experiencing issues. Please try again later",
            ErrorCategory::Client => "This may be a bug. Please report this issue if it persists",
            ErrorCategory::System => "Check file paths and permissions",
            ErrorCategory::Configuration => "Check your CRAFTY_* environment variables",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
