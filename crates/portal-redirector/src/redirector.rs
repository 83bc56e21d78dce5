use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait Redirector: Send + Sync + 'static {
    /// Resolves a short code to the target URL it was stored with, on behalf
    /// of `client` (the caller's address).
    ///
    /// Returns [`RedirectorError::NotFound`](crate::RedirectorError::NotFound)
    /// if the code does not exist or has expired.
    async fn resolve(&self, client: &str, code: &str) -> Result<String>;
}
