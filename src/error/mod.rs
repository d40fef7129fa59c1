//! Unified error handling for Crafty.
//!
//! - **Error Categories**: high-level classification for handling decisions
//! - **Domain-specific Errors**: Network, Stream and Config errors
//! - **Unified Error Type**: `CraftyError` consolidates all error types
//! - **Error Context**: operation, agent and session attached to errors
//! - **Result Type Alias**: `CraftyResult<T>`
//!
//! Malformed stream spans and truncation are reported in-band as stream
//! items, never as errors. The CLI turns a `CraftyError` into a report
//! using `user_message`, `error_code` and `recovery_hint`.
//!
//! | Category | Description | Retryable |
//! |----------|-------------|-----------|
//! | Network | Connection, timeout, 4xx | Mostly |
//! | Server | 5xx, failed runs | Yes |
//! | Client | Undecodable data | No |
//! | System | Filesystem, stdio | Rarely |
//! | Configuration | Bad CRAFTY_* values | No |

mod category;
mod config;
mod context;
mod crafty_error;
mod network;
mod result;
mod stream;

pub use category::ErrorCategory;
pub use config::ConfigError;
pub use context::ErrorContext;
pub use crafty_error::CraftyError;
pub use network::NetworkError;
pub use result::{CraftyResult, ResultExt};
pub use stream::StreamError;
