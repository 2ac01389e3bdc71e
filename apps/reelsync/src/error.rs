//! Error types for reelsync.
//!
//! Every failure aborts the running scenario; the variants carry enough
//! context to say which step failed and why.

use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading/parsing errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// TMDB API key absent or blank
    #[error("TMDB API key required: set tmdb.api_key in credentials.toml or REELSYNC_TMDB__API_KEY")]
    MissingApiKey,

    /// Stub server could not start or stop
    #[error("Stub server error: {0}")]
    Stub(#[from] stub_server::StubError),

    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// Response body did not have the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// A step answered with a status other than the expected one(s)
    #[error("{step}: expected status {expected}, got {actual}")]
    UnexpectedStatus {
        step: String,
        expected: String,
        actual: u16,
    },

    /// A results list came back empty
    #[error("{0}: expected at least one result")]
    EmptyResults(String),

    /// A required field was null, absent or empty
    #[error("{0}: required field missing")]
    MissingField(String),

    /// An identifier was not a positive integer
    #[error("{step}: expected a positive id, got {id}")]
    InvalidId { step: String, id: i64 },

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Credentials rejected by the remote service
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Rate limited by external service
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;
