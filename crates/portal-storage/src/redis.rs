use async_trait::async_trait;
use portal_core::{KvStore, Namespace, Result, StoreError};
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, trace, warn};
use typed_builder::TypedBuilder;

/// Reply of `TTL` for a key that does not exist.
const TTL_MISSING: i64 = -2;
/// Reply of `TTL` for a key without an expiry.
const TTL_PERSISTENT: i64 = -1;

/// Connection settings for a Redis server.
#[derive(Debug, Clone, TypedBuilder)]
pub struct RedisSettings {
    /// `host:port` of the server.
    #[builder(setter(into))]
    pub addr: String,
    #[builder(default, setter(into, strip_option))]
    pub password: Option<String>,
}

impl RedisSettings {
    /// Builds the connection URL for the logical database of `namespace`.
    pub fn connection_url(&self, namespace: Namespace) -> Result<String> {
        let mut url = url::Url::parse(&format!(
            "redis://{}/{}",
            self.addr,
            namespace.db_index()
        ))
        .map_err(|e| StoreError::Operation(format!("invalid redis address '{}': {e}", self.addr)))?;

        if let Some(password) = self.password.as_deref().filter(|p| !p.is_empty()) {
            url.set_password(Some(password)).map_err(|()| {
                StoreError::Operation(format!(
                    "redis address '{}' cannot carry a password",
                    self.addr
                ))
            })?;
        }

        Ok(url.into())
    }
}

/// A Redis-based implementation of [`KvStore`].
///
/// Each instance talks to the logical database of one [`Namespace`], so the
/// link and quota namespaces never see each other's keys.
///
/// The connection is opened on first use and shared by clones. A command
/// that fails because the connection broke drops it, and the next command
/// dials again, so the store recovers once the server is back.
#[derive(Debug, Clone)]
pub struct RedisStore {
    client: redis::Client,
    conn: Arc<RwLock<Option<MultiplexedConnection>>>,
    namespace: Namespace,
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> StoreError {
    let message = format!("{operation}: {err}");
    let lower = message.to_ascii_lowercase();
    if err.is_timeout() || lower.contains("timed out") {
        StoreError::Timeout(message)
    } else if lower.contains("not an integer") {
        StoreError::InvalidData(message)
    } else if err.is_io_error() || err.is_connection_refusal() || err.is_connection_dropped() {
        StoreError::Unavailable(message)
    } else {
        StoreError::Operation(message)
    }
}

impl RedisStore {
    /// Creates a store for the logical database of `namespace` without
    /// contacting the server.
    pub fn open(settings: &RedisSettings, namespace: Namespace) -> Result<Self> {
        let url = settings.connection_url(namespace)?;
        let client = redis::Client::open(url.as_str())
            .map_err(|e| map_redis_error("failed to create Redis client", e))?;

        Ok(Self {
            client,
            conn: Arc::new(RwLock::new(None)),
            namespace,
        })
    }

    /// Like [`open`](Self::open), but fails unless the server is reachable.
    pub async fn connect(settings: &RedisSettings, namespace: Namespace) -> Result<Self> {
        let store = Self::open(settings, namespace)?;
        store.connection().await?;

        debug!(addr = %settings.addr, namespace = %namespace, "connected to Redis");
        Ok(store)
    }

    async fn connection(&self) -> Result<MultiplexedConnection> {
        if let Some(conn) = self.conn.read().await.as_ref() {
            return Ok(conn.clone());
        }

        let mut guard = self.conn.write().await;
        if let Some(conn) = guard.as_ref() {
            return Ok(conn.clone());
        }

        let conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| {
                warn!(namespace = %self.namespace, error = %e, "failed to connect to Redis");
                StoreError::Unavailable(format!("failed to connect to Redis: {e}"))
            })?;
        debug!(namespace = %self.namespace, "Redis connection established");
        *guard = Some(conn.clone());
        Ok(conn)
    }

    /// Maps a command failure, dropping the connection if it is broken.
    async fn failed(&self, command: &str, key: &str, err: redis::RedisError) -> StoreError {
        warn!(namespace = %self.namespace, key, error = %err, "Redis error on {command}");
        let mapped = map_redis_error(&format!("Redis {command} failed"), err);

        if matches!(mapped, StoreError::Unavailable(_) | StoreError::Timeout(_)) {
            *self.conn.write().await = None;
            debug!(namespace = %self.namespace, "Redis connection reset");
        }
        mapped
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        trace!(namespace = %self.namespace, key, "GET");

        let mut conn = self.connection().await?;
        match conn.get::<_, Option<String>>(key).await {
            Ok(value) => Ok(value),
            Err(e) => Err(self.failed("get", key, e).await),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        trace!(namespace = %self.namespace, key, ?ttl, "SET");

        let mut conn = self.connection().await?;
        let result = match ttl {
            // Redis rejects a zero expiry; round sub-second TTLs up.
            Some(ttl) => {
                conn.set_ex::<_, _, ()>(key, value, ttl.as_secs().max(1))
                    .await
            }
            None => conn.set::<_, _, ()>(key, value).await,
        };

        match result {
            Ok(()) => Ok(()),
            Err(e) => Err(self.failed("set", key, e).await),
        }
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        trace!(namespace = %self.namespace, key, "INCR");

        let mut conn = self.connection().await?;
        match conn.incr::<_, _, i64>(key, 1).await {
            Ok(value) => Ok(value),
            Err(e) => Err(self.failed("incr", key, e).await),
        }
    }

    async fn decr(&self, key: &str) -> Result<i64> {
        trace!(namespace = %self.namespace, key, "DECR");

        let mut conn = self.connection().await?;
        match conn.decr::<_, _, i64>(key, 1).await {
            Ok(value) => Ok(value),
            Err(e) => Err(self.failed("decr", key, e).await),
        }
    }

    async fn ttl(&self, key: &str) -> Result<Option<Duration>> {
        trace!(namespace = %self.namespace, key, "TTL");

        let mut conn = self.connection().await?;
        let seconds = match conn.ttl::<_, i64>(key).await {
            Ok(seconds) => seconds,
            Err(e) => return Err(self.failed("ttl", key, e).await),
        };

        match seconds {
            TTL_MISSING | TTL_PERSISTENT => Ok(None),
            s if s >= 0 => Ok(Some(Duration::from_secs(s as u64))),
            other => Err(StoreError::InvalidData(format!(
                "unexpected TTL reply {other} for key '{key}'"
            ))),
        }
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool> {
        trace!(namespace = %self.namespace, key, ?ttl, "EXPIRE");

        let seconds = i64::try_from(ttl.as_secs().max(1)).unwrap_or(i64::MAX);
        let mut conn = self.connection().await?;
        match conn.expire::<_, bool>(key, seconds).await {
            Ok(applied) => Ok(applied),
            Err(e) => Err(self.failed("expire", key, e).await),
        }
    }

    async fn del(&self, key: &str) -> Result<bool> {
        trace!(namespace = %self.namespace, key, "DEL");

        let mut conn = self.connection().await?;
        match conn.del::<_, i64>(key).await {
            Ok(removed) => Ok(removed > 0),
            Err(e) => Err(self.failed("del", key, e).await),
        }
    }
}
