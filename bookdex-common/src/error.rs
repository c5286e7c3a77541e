//! Common error types for bookdex

use thiserror::Error;

/// Common result type for bookdex operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared across the catalog service
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found (book id, or zero upstream results)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Upstream metadata lookup failed (network, timeout, non-success status)
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Field-level constraint violation on a create or update
    #[error("Validation failed: {0}")]
    Validation(String),

    /// UNIQUE constraint violation on isbn
    #[error("A book with ISBN {0} already exists")]
    DuplicateIsbn(String),

    /// Aggregation has nothing to chart
    #[error("No data available for chart generation")]
    NoData,

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this error is a duplicate-isbn or validation failure, i.e.
    /// a failure of the optional save sub-step rather than of the whole
    /// ingestion operation.
    pub fn is_save_failure(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::DuplicateIsbn(_))
    }
}
