use crate::error::Result;
use async_trait::async_trait;
use std::fmt::Display;
use std::time::Duration;

/// The two logical namespaces sharing the key-value substrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Short identifier -> target URL.
    Links,
    /// Client key -> remaining quota, plus the global access counter.
    Quota,
}

impl Namespace {
    /// Logical database index backing this namespace.
    pub fn db_index(self) -> i64 {
        match self {
            Namespace::Links => 0,
            Namespace::Quota => 1,
        }
    }
}

impl Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Namespace::Links => f.write_str("links"),
            Namespace::Quota => f.write_str("quota"),
        }
    }
}

/// A key-value store with per-key expiry, scoped to a single [`Namespace`].
///
/// Every call is one round trip to the backend and is attempted exactly once.
/// Implementations must not retry.
#[async_trait]
pub trait KvStore: Send + Sync + 'static {
    /// Returns the value stored at `key`.
    ///
    /// Returns `Ok(None)` if the key is absent or has expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` at `key`, replacing any previous value and expiry.
    ///
    /// If `ttl` is `None` the key never expires.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()>;

    /// Atomically increments the integer at `key` and returns the new value.
    ///
    /// An absent key is treated as `0`. The existing expiry is preserved.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// Atomically decrements the integer at `key` and returns the new value.
    ///
    /// An absent key is treated as `0` and recreated without expiry.
    /// The existing expiry is preserved.
    async fn decr(&self, key: &str) -> Result<i64>;

    /// Returns the residual time-to-live of `key`.
    ///
    /// Returns `Ok(None)` if the key is absent or has no expiry.
    async fn ttl(&self, key: &str) -> Result<Option<Duration>>;

    /// Attaches an expiry to an existing key.
    ///
    /// Returns `false` if the key does not exist.
    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool>;

    /// Removes `key`. Returns `true` if it existed.
    async fn del(&self, key: &str) -> Result<bool>;
}

#[async_trait]
impl<S: KvStore + ?Sized> KvStore for std::sync::Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        (**self).set(key, value, ttl).await
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        (**self).incr(key).await
    }

    async fn decr(&self, key: &str) -> Result<i64> {
        (**self).decr(key).await
    }

    async fn ttl(&self, key: &str) -> Result<Option<Duration>> {
        (**self).ttl(key).await
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool> {
        (**self).expire(key, ttl).await
    }

    async fn del(&self, key: &str) -> Result<bool> {
        (**self).del(key).await
    }
}
