use portal_core::StoreError;
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShortenerError>;

#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("rate limit exceeded, resets in {}s", reset_in.as_secs())]
    QuotaExceeded { reset_in: Duration },
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid domain: {0}")]
    InvalidDomain(String),
    #[error("short code already in use: {0}")]
    AliasConflict(String),
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}
