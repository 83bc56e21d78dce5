use thiserror::Error;

/// Result type for key-value store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors raised by a [`KvStore`](crate::store::KvStore) backend.
///
/// A missing key is never an error: reads report it as `Ok(None)`.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("store backend unavailable: {0}")]
    Unavailable(String),
    #[error("store operation timed out: {0}")]
    Timeout(String),
    #[error("stored value is invalid: {0}")]
    InvalidData(String),
    #[error("store operation failed: {0}")]
    Operation(String),
}
