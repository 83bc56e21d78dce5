use std::time::Duration;

use portal_core::{KvStore, Namespace, StoreError};
use portal_storage::{RedisSettings, RedisStore};
use portal_test_infra::redis::{RedisConfig, RedisServer};

/// Test fixture that manages a Redis container using test-infra.
pub struct RedisTestContainer {
    #[allow(dead_code)]
    redis: RedisServer,
    settings: RedisSettings,
}

impl RedisTestContainer {
    /// Starts a new Redis container with a random available port.
    pub async fn start() -> Self {
        Self::start_with(RedisConfig::default()).await
    }

    pub async fn start_with(config: RedisConfig) -> Self {
        let redis = RedisServer::new(config)
            .await
            .expect("Failed to start Redis server");
        let addr = redis.addr().await.expect("Failed to get Redis address");

        let settings = match redis.password() {
            Some(password) => RedisSettings::builder()
                .addr(addr)
                .password(password)
                .build(),
            None => RedisSettings::builder().addr(addr).build(),
        };

        // Wait a moment to ensure Redis is fully ready
        tokio::time::sleep(Duration::from_millis(500)).await;

        Self { redis, settings }
    }

    /// Drops every client connection the server holds except the caller's.
    pub async fn kill_clients(&self) {
        let url = self
            .settings
            .connection_url(Namespace::Links)
            .expect("Failed to build Redis URL");
        let client = redis::Client::open(url).expect("Failed to create Redis client");
        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .expect("Failed to connect to Redis");
        redis::cmd("CLIENT")
            .arg("KILL")
            .arg("TYPE")
            .arg("normal")
            .query_async::<()>(&mut conn)
            .await
            .expect("Failed to kill Redis clients");
    }

    pub async fn store(&self, namespace: Namespace) -> RedisStore {
        RedisStore::connect(&self.settings, namespace)
            .await
            .expect("Failed to connect to Redis")
    }
}

#[tokio::test]
async fn test_redis_store_get_set() {
    let fixture = RedisTestContainer::start().await;
    let store = fixture.store(Namespace::Links).await;

    assert!(store.get("abc123").await.unwrap().is_none());

    store
        .set("abc123", "http://example.com", None)
        .await
        .unwrap();

    assert_eq!(
        store.get("abc123").await.unwrap().as_deref(),
        Some("http://example.com")
    );
}

#[tokio::test]
async fn test_redis_namespaces_are_isolated() {
    let fixture = RedisTestContainer::start().await;
    let links = fixture.store(Namespace::Links).await;
    let quota = fixture.store(Namespace::Quota).await;

    links.set("shared", "http://example.com", None).await.unwrap();

    assert!(quota.get("shared").await.unwrap().is_none());
    assert_eq!(
        links.get("shared").await.unwrap().as_deref(),
        Some("http://example.com")
    );
}

#[tokio::test]
async fn test_redis_ttl_replies() {
    let fixture = RedisTestContainer::start().await;
    let store = fixture.store(Namespace::Quota).await;

    // absent key
    assert!(store.ttl("10.0.0.1").await.unwrap().is_none());

    // key without expiry
    store.incr("counter").await.unwrap();
    assert!(store.ttl("counter").await.unwrap().is_none());

    // key with expiry
    store
        .set("10.0.0.1", "10", Some(Duration::from_secs(1800)))
        .await
        .unwrap();
    let ttl = store.ttl("10.0.0.1").await.unwrap().unwrap();
    assert!(ttl <= Duration::from_secs(1800));
    assert!(ttl > Duration::from_secs(1790));
}

#[tokio::test]
async fn test_redis_decr_keeps_window() {
    let fixture = RedisTestContainer::start().await;
    let store = fixture.store(Namespace::Quota).await;

    store
        .set("10.0.0.1", "10", Some(Duration::from_secs(1800)))
        .await
        .unwrap();

    assert_eq!(store.decr("10.0.0.1").await.unwrap(), 9);
    assert!(store.ttl("10.0.0.1").await.unwrap().is_some());
}

#[tokio::test]
async fn test_redis_decr_missing_key_recreates_without_expiry() {
    let fixture = RedisTestContainer::start().await;
    let store = fixture.store(Namespace::Quota).await;

    assert_eq!(store.decr("10.0.0.2").await.unwrap(), -1);
    assert!(store.ttl("10.0.0.2").await.unwrap().is_none());

    assert!(store
        .expire("10.0.0.2", Duration::from_secs(60))
        .await
        .unwrap());
    assert!(store.ttl("10.0.0.2").await.unwrap().is_some());
}

#[tokio::test]
async fn test_redis_key_expires() {
    let fixture = RedisTestContainer::start().await;
    let store = fixture.store(Namespace::Links).await;

    store
        .set("ttl_test", "http://example.com", Some(Duration::from_secs(1)))
        .await
        .unwrap();
    assert!(store.get("ttl_test").await.unwrap().is_some());

    // Wait for TTL to expire
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert!(store.get("ttl_test").await.unwrap().is_none());
}

#[tokio::test]
async fn test_redis_incr_on_text_value_fails() {
    let fixture = RedisTestContainer::start().await;
    let store = fixture.store(Namespace::Quota).await;

    store.set("text", "hello", None).await.unwrap();

    let err = store.incr("text").await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
}

#[tokio::test]
async fn test_redis_del() {
    let fixture = RedisTestContainer::start().await;
    let store = fixture.store(Namespace::Links).await;

    store.set("gone", "http://example.com", None).await.unwrap();

    assert!(store.del("gone").await.unwrap());
    assert!(!store.del("gone").await.unwrap());
}

#[tokio::test]
async fn test_redis_with_password() {
    let fixture =
        RedisTestContainer::start_with(RedisConfig::builder().password("s3cret").build()).await;
    let store = fixture.store(Namespace::Links).await;

    store.set("auth", "http://example.com", None).await.unwrap();
    assert!(store.get("auth").await.unwrap().is_some());
}

#[tokio::test]
async fn test_redis_unreachable_server() {
    let settings = RedisSettings::builder().addr("127.0.0.1:1").build();

    let err = RedisStore::connect(&settings, Namespace::Links)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Unavailable(_)));
}

#[tokio::test]
async fn test_redis_store_reconnects_after_connection_loss() {
    let fixture = RedisTestContainer::start().await;
    let store = fixture.store(Namespace::Links).await;
    store.set("abc123", "http://example.com", None).await.unwrap();

    fixture.kill_clients().await;

    // The first call may still hit the dead connection; it must not poison
    // the store for later calls.
    let mut value = None;
    for _ in 0..3 {
        match store.get("abc123").await {
            Ok(v) => {
                value = v;
                break;
            }
            Err(e) => assert!(
                matches!(e, StoreError::Unavailable(_) | StoreError::Timeout(_)),
                "unexpected error: {e}"
            ),
        }
    }
    assert_eq!(value.as_deref(), Some("http://example.com"));
}

#[tokio::test]
async fn test_redis_store_opens_while_server_is_down() {
    let settings = RedisSettings::builder().addr("127.0.0.1:1").build();

    let store = RedisStore::open(&settings, Namespace::Quota).unwrap();

    let err = store.incr("counter").await.unwrap_err();
    assert!(matches!(err, StoreError::Unavailable(_)));
}
