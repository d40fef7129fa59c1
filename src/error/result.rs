//! Result type alias for Crafty operations.

use super::context::ErrorContext;
use super::crafty_error::CraftyError;

/// Type alias for Results using CraftyError.
pub type CraftyResult<T> = Result<T, CraftyError>;

/// Extension trait for Result types to add context to errors.
pub trait ResultExt<T> {
    /// Add context using a closure (only called on error).
    fn with_context<F>(self, f: F) -> CraftyResult<T>
    where
        F: FnOnce() -> ErrorContext;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<CraftyError>,
{
    fn with_context<F>(self, f: F) -> CraftyResult<T>
    where
        F: FnOnce() -> ErrorContext,
    {
        self.map_err(|e| e.into().with_context(f()))
    }
}
