//! Version command for the crafty CLI.

/// The current version of crafty, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Line printed by `crafty --version`.
pub fn version_line() -> String {
    format!("crafty {}", VERSION)
}
