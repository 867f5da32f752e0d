//! Error types for the ingestion and query services.

use envlog_types::ParseError;

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Failures returned by [`Ingestor`](crate::Ingestor) and
/// [`ReadingQueries`](crate::ReadingQueries).
///
/// A query that finds nothing is not an error: it yields an empty series
/// or the store's `NO_DATA` value.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The submitted payload could not be parsed into a reading.
    #[error(transparent)]
    InvalidInput(#[from] ParseError),

    /// The store failed to read or write.
    #[error("Storage failure: {0}")]
    StorageFailure(#[from] envlog_store::Error),
}
