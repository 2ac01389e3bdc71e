//! Error types for the stub server.

use thiserror::Error;

/// Errors raised while compiling rules or running the server.
#[derive(Error, Debug)]
pub enum StubError {
    /// The listener could not be bound
    #[error("Failed to bind stub server: {0}")]
    Bind(#[source] std::io::Error),

    /// A regex path pattern did not compile
    #[error("Invalid path pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A rule carries a status code outside 100..=999
    #[error("Invalid status code: {0}")]
    InvalidStatus(u16),

    /// A rule carries a header name or value that is not valid HTTP
    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    /// The serving task failed or panicked
    #[error("Stub server error: {0}")]
    Serve(String),
}

pub type Result<T> = std::result::Result<T, StubError>;
