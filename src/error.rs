//! Crate-level error types.
//!
//! [`FinfolioError`] unifies every error source (configuration, HTTP,
//! JSON) behind a single enum so callers can match on the variant they
//! care about while still using the `?` operator for easy propagation.
//!
//! Per-symbol refresh failures are not errors: they are reported as
//! [`RefreshOutcome::Failed`](crate::models::RefreshOutcome::Failed) values.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FinfolioError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, thiserror::Error)]
pub enum FinfolioError {
    /// Configuration was missing, inconsistent, or unparseable.
    #[error("configuration error: {0}")]
    Config(String),

    /// An HTTP request could not be built, sent, or read.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A provider request did not complete within its time limit.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// A provider response did not have the expected shape.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// A portfolio already holds a position in this symbol.
    #[error("holding already exists for {0}")]
    DuplicateHolding(String),
}
