use async_trait::async_trait;
use dashmap::DashMap;
use jiff::{SignedDuration, Timestamp};
use portal_core::{Clock, KvStore, Result, StoreError, SystemClock};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// In-memory storage entry.
#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expire_at: Option<Timestamp>,
}

impl Entry {
    fn persistent(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            expire_at: None,
        }
    }

    fn is_expired(&self, now: Timestamp) -> bool {
        self.expire_at.is_some_and(|expire_at| now >= expire_at)
    }
}

fn deadline(now: Timestamp, ttl: Duration) -> Result<Timestamp> {
    let ttl = SignedDuration::try_from(ttl)
        .map_err(|e| StoreError::Operation(format!("invalid ttl {ttl:?}: {e}")))?;
    now.checked_add(ttl)
        .map_err(|e| StoreError::Operation(format!("ttl overflows timestamp: {e}")))
}

/// In-memory implementation of [`KvStore`] using DashMap.
///
/// Expiry is evaluated lazily against the injected [`Clock`]: an entry whose
/// deadline has passed behaves exactly like an absent key and is dropped on
/// the next access. Increment and decrement hold the shard lock for the key,
/// so they are atomic per key like their Redis counterparts.
#[derive(Debug)]
pub struct InMemoryStore<C = SystemClock> {
    storage: DashMap<String, Entry>,
    clock: C,
}

impl InMemoryStore<SystemClock> {
    /// Creates a new in-memory store backed by the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for InMemoryStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> InMemoryStore<C> {
    /// Creates a new in-memory store that reads time from `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            storage: DashMap::new(),
            clock,
        }
    }

    /// Number of live (unexpired) keys.
    pub fn len(&self) -> usize {
        let now = self.clock.now();
        self.storage
            .iter()
            .filter(|entry| !entry.is_expired(now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn live(&self, key: &str) -> Option<Entry> {
        let now = self.clock.now();
        let entry = self.storage.get(key)?;
        if entry.is_expired(now) {
            drop(entry);
            self.storage.remove_if(key, |_, e| e.is_expired(now));
            return None;
        }
        Some(entry.clone())
    }

    fn step(&self, key: &str, delta: i64) -> Result<i64> {
        let now = self.clock.now();
        let mut entry = self
            .storage
            .entry(key.to_owned())
            .or_insert_with(|| Entry::persistent("0"));

        // An expired counter restarts from zero with no expiry.
        if entry.is_expired(now) {
            *entry = Entry::persistent("0");
        }

        let current: i64 = entry.value.parse().map_err(|_| {
            StoreError::InvalidData(format!("value at '{key}' is not an integer"))
        })?;
        let next = current
            .checked_add(delta)
            .ok_or_else(|| StoreError::Operation(format!("counter at '{key}' would overflow")))?;
        entry.value = next.to_string();
        Ok(next)
    }
}

#[async_trait]
impl<C: Clock> KvStore for InMemoryStore<C> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.live(key).map(|entry| entry.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()> {
        let expire_at = ttl
            .map(|ttl| deadline(self.clock.now(), ttl))
            .transpose()?;
        self.storage.insert(
            key.to_owned(),
            Entry {
                value: value.to_owned(),
                expire_at,
            },
        );
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        self.step(key, 1)
    }

    async fn decr(&self, key: &str) -> Result<i64> {
        self.step(key, -1)
    }

    async fn ttl(&self, key: &str) -> Result<Option<Duration>> {
        let Some(entry) = self.live(key) else {
            return Ok(None);
        };
        let Some(expire_at) = entry.expire_at else {
            return Ok(None);
        };
        let remaining = expire_at.duration_since(self.clock.now());
        Ok(Duration::try_from(remaining).ok())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<bool> {
        let now = self.clock.now();
        let expire_at = deadline(now, ttl)?;
        match self.storage.get_mut(key) {
            Some(mut entry) if !entry.is_expired(now) => {
                entry.expire_at = Some(expire_at);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn del(&self, key: &str) -> Result<bool> {
        let now = self.clock.now();
        Ok(self
            .storage
            .remove(key)
            .is_some_and(|(_, entry)| !entry.is_expired(now)))
    }
}

/// A manually driven [`Clock`] for tests.
///
/// Clones share the same time, so a test can keep one handle and advance the
/// clock seen by a store it handed another handle to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Timestamp>>,
}

impl ManualClock {
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let by = SignedDuration::try_from(by).unwrap_or(SignedDuration::MAX);
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now = now.checked_add(by).unwrap_or(Timestamp::MAX);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Timestamp::UNIX_EPOCH)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
