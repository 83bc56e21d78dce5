use crate::error::Result;
use async_trait::async_trait;
use portal_core::LinkEntry;
use portal_quota::QuotaStatus;

/// Parameters for creating a shortened URL.
#[derive(Debug, Clone, Default)]
pub struct ShortenRequest {
    /// The URL to be shortened, as submitted.
    pub url: String,
    /// Optional custom identifier. Empty counts as absent.
    pub custom: Option<String>,
    /// Requested retention in hours. Zero or absent selects the default.
    pub expiry_hours: Option<u64>,
}

/// A successfully created short link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortened {
    /// The link as written to the store.
    pub link: LinkEntry,
    /// Public short URL: domain + "/" + identifier.
    pub short_url: String,
    /// The requesting client's quota after this request was charged.
    pub quota: QuotaStatus,
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Creates a short link on behalf of `client` (the caller's address).
    async fn shorten(&self, client: &str, request: ShortenRequest) -> Result<Shortened>;
}
