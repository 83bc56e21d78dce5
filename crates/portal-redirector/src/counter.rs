use portal_core::KvStore;
use std::sync::Arc;
use tracing::{trace, warn};

/// Key of the global resolution counter.
pub const ACCESS_COUNTER_KEY: &str = "counter";

/// Global count of successful resolutions.
///
/// The count is telemetry only. A failed increment is logged and otherwise
/// ignored, so it never affects the redirect it accompanies.
#[derive(Debug)]
pub struct AccessCounter<S> {
    store: Arc<S>,
}

impl<S> Clone for AccessCounter<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KvStore> AccessCounter<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Counts one resolution.
    pub async fn record(&self) {
        match self.store.incr(ACCESS_COUNTER_KEY).await {
            Ok(count) => trace!(count, "access counted"),
            Err(e) => warn!(error = %e, "failed to update access counter"),
        }
    }

    /// Current count, or `None` before the first resolution.
    pub async fn current(&self) -> portal_core::Result<Option<i64>> {
        let Some(raw) = self.store.get(ACCESS_COUNTER_KEY).await? else {
            return Ok(None);
        };
        raw.parse().map(Some).map_err(|_| {
            portal_core::StoreError::InvalidData(format!(
                "access counter is not an integer: '{raw}'"
            ))
        })
    }
}
