use crate::counter::AccessCounter;
use crate::error::{RedirectorError, Result};
use crate::redirector::Redirector;
use async_trait::async_trait;
use portal_core::KvStore;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Service for handling URL redirects.
///
/// Reads targets from the `L` link store and counts each successful
/// resolution through an [`AccessCounter`] over the `Q` quota store.
#[derive(Debug)]
pub struct RedirectorService<L, Q> {
    links: Arc<L>,
    counter: AccessCounter<Q>,
}

impl<L, Q> Clone for RedirectorService<L, Q> {
    fn clone(&self) -> Self {
        Self {
            links: Arc::clone(&self.links),
            counter: self.counter.clone(),
        }
    }
}

impl<L: KvStore, Q: KvStore> RedirectorService<L, Q> {
    pub fn new(links: L, counter: AccessCounter<Q>) -> Self {
        Self {
            links: Arc::new(links),
            counter,
        }
    }

    pub fn counter(&self) -> &AccessCounter<Q> {
        &self.counter
    }
}

#[async_trait]
impl<L: KvStore, Q: KvStore> Redirector for RedirectorService<L, Q> {
    async fn resolve(&self, client: &str, code: &str) -> Result<String> {
        trace!(client, code, "resolving short code");

        let target = self.links.get(code).await.inspect_err(|e| {
            warn!(client, code, error = %e, "failed to look up short code");
        })?;

        let Some(target) = target else {
            warn!(client, code, "short code not found");
            return Err(RedirectorError::NotFound(code.to_string()));
        };

        self.counter.record().await;

        debug!(client, code, url = %target, "resolved short code");
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::ACCESS_COUNTER_KEY;
    use portal_core::StoreError;
    use portal_storage::{InMemoryStore, ManualClock};
    use portal_test_infra::LogCapture;
    use std::time::Duration;
    use tracing::Level;

    const CLIENT: &str = "198.51.100.4";

    type TestStore = Arc<InMemoryStore<ManualClock>>;

    struct Fixture {
        service: RedirectorService<TestStore, TestStore>,
        links: TestStore,
        quota: TestStore,
        clock: ManualClock,
    }

    fn fixture() -> Fixture {
        let clock = ManualClock::default();
        let links = Arc::new(InMemoryStore::with_clock(clock.clone()));
        let quota = Arc::new(InMemoryStore::with_clock(clock.clone()));
        let service = RedirectorService::new(
            Arc::clone(&links),
            AccessCounter::new(Arc::clone(&quota)),
        );
        Fixture {
            service,
            links,
            quota,
            clock,
        }
    }

    #[tokio::test]
    async fn resolve_existing_code() {
        let f = fixture();
        f.links
            .set("abc123", "https://example.com", None)
            .await
            .unwrap();

        let target = f.service.resolve(CLIENT, "abc123").await.unwrap();

        assert_eq!(target, "https://example.com");
    }

    #[tokio::test]
    async fn resolve_nonexistent_code() {
        let f = fixture();

        let err = f.service.resolve(CLIENT, "nope").await.unwrap_err();

        assert!(matches!(err, RedirectorError::NotFound(code) if code == "nope"));
    }

    #[tokio::test]
    async fn code_is_gone_one_second_after_expiry() {
        let f = fixture();
        f.links
            .set("brief", "http://example.com", Some(Duration::from_secs(3600)))
            .await
            .unwrap();

        f.clock.advance(Duration::from_secs(3599));
        assert!(f.service.resolve(CLIENT, "brief").await.is_ok());

        f.clock.advance(Duration::from_secs(2));
        let err = f.service.resolve(CLIENT, "brief").await.unwrap_err();
        assert!(matches!(err, RedirectorError::NotFound(_)));
    }

    #[tokio::test]
    async fn successful_resolutions_are_counted() {
        let f = fixture();
        f.links.set("abc123", "http://example.com", None).await.unwrap();

        f.service.resolve(CLIENT, "abc123").await.unwrap();
        f.service.resolve(CLIENT, "abc123").await.unwrap();
        let _ = f.service.resolve(CLIENT, "missing").await;

        assert_eq!(f.service.counter().current().await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn counter_failure_does_not_fail_resolution() {
        let f = fixture();
        f.links.set("abc123", "http://example.com", None).await.unwrap();
        f.quota.set(ACCESS_COUNTER_KEY, "corrupt", None).await.unwrap();

        let target = f.service.resolve(CLIENT, "abc123").await.unwrap();

        assert_eq!(target, "http://example.com");
    }

    /// Link store that fails every read.
    struct DownStore;

    #[async_trait]
    impl KvStore for DownStore {
        async fn get(&self, _: &str) -> portal_core::Result<Option<String>> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
        async fn set(&self, _: &str, _: &str, _: Option<Duration>) -> portal_core::Result<()> {
            unimplemented!()
        }
        async fn incr(&self, _: &str) -> portal_core::Result<i64> {
            unimplemented!()
        }
        async fn decr(&self, _: &str) -> portal_core::Result<i64> {
            unimplemented!()
        }
        async fn ttl(&self, _: &str) -> portal_core::Result<Option<Duration>> {
            unimplemented!()
        }
        async fn expire(&self, _: &str, _: Duration) -> portal_core::Result<bool> {
            unimplemented!()
        }
        async fn del(&self, _: &str) -> portal_core::Result<bool> {
            unimplemented!()
        }
    }

    #[tokio::test]
    async fn store_failure_is_not_not_found() {
        let quota = Arc::new(InMemoryStore::new());
        let service = RedirectorService::new(DownStore, AccessCounter::new(Arc::clone(&quota)));

        let err = service.resolve(CLIENT, "abc123").await.unwrap_err();

        assert!(matches!(err, RedirectorError::Storage(StoreError::Unavailable(_))));
        assert!(quota.get(ACCESS_COUNTER_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failed_resolutions_log_the_requester() {
        let logs = LogCapture::new();
        let _guard = logs.install(Level::WARN);

        let f = fixture();
        f.service.resolve(CLIENT, "missing").await.unwrap_err();

        let down = RedirectorService::new(DownStore, AccessCounter::new(InMemoryStore::new()));
        down.resolve("192.0.2.9", "abc123").await.unwrap_err();

        let contents = logs.contents();
        assert!(contents.contains("short code not found"));
        assert!(contents.contains(CLIENT));
        assert!(contents.contains("failed to look up short code"));
        assert!(contents.contains("192.0.2.9"));
    }
}
