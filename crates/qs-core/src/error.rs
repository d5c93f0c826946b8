//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`, so configuration problems detected here surface
//! unchanged at the simulation boundary.

use thiserror::Error;

/// The top-level error type for `qs-core`.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid time {input:?}: {reason}")]
    Time { input: String, reason: &'static str },
}

/// Shorthand result type for `qs-core`.
pub type CoreResult<T> = Result<T, CoreError>;
