use portal_core::{KvStore, Result, StoreError};
use std::time::Duration;
use tracing::{debug, trace, warn};
use typed_builder::TypedBuilder;

/// Length of a quota window.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(30 * 60);

/// How many requests a client may make per window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TypedBuilder)]
pub struct QuotaPolicy {
    #[builder(default = 10)]
    pub limit: i64,
    #[builder(default = DEFAULT_WINDOW)]
    pub window: Duration,
}

impl Default for QuotaPolicy {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// The outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    pub allowed: bool,
    /// Count stored for the client at check time.
    pub remaining: i64,
    /// Residual lifetime of the client's window.
    pub reset_in: Duration,
}

/// A client's quota after a successful request has been charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaStatus {
    pub remaining: i64,
    pub reset_in: Duration,
}

/// Tracks per-client quota in a [`KvStore`].
///
/// Checking and charging are separate store calls. Two concurrent requests
/// from one client can both pass [`admit`](Self::admit) before either
/// [`consume`](Self::consume)s, so accounting is approximate under contention.
#[derive(Debug, Clone)]
pub struct QuotaTracker<S> {
    store: S,
    policy: QuotaPolicy,
}

impl<S: KvStore> QuotaTracker<S> {
    pub fn new(store: S, policy: QuotaPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &QuotaPolicy {
        &self.policy
    }

    /// Decides whether `client` may make another request.
    ///
    /// A client without a live window is admitted and a new window holding
    /// the full quota is opened. Otherwise the client is admitted while its
    /// stored count is positive. Nothing is charged here.
    pub async fn admit(&self, client: &str) -> Result<Admission> {
        let Some(raw) = self.store.get(client).await? else {
            self.store
                .set(
                    client,
                    &self.policy.limit.to_string(),
                    Some(self.policy.window),
                )
                .await?;
            debug!(client, limit = self.policy.limit, "opened quota window");
            return Ok(Admission {
                allowed: true,
                remaining: self.policy.limit,
                reset_in: self.policy.window,
            });
        };

        let remaining = parse_count(client, &raw)?;
        let reset_in = self.window_ttl(client).await?;

        if remaining <= 0 {
            warn!(client, reset_in_secs = reset_in.as_secs(), "quota exhausted");
            return Ok(Admission {
                allowed: false,
                remaining,
                reset_in,
            });
        }

        trace!(client, remaining, "quota admitted");
        Ok(Admission {
            allowed: true,
            remaining,
            reset_in,
        })
    }

    /// Charges one request against `client`'s current window.
    ///
    /// The window's expiry is left untouched. If the window expired between
    /// the check and this call, the store recreates the counter from zero;
    /// the recreated key is given a fresh window so it cannot outlive one.
    pub async fn consume(&self, client: &str) -> Result<QuotaStatus> {
        let remaining = self.store.decr(client).await?;
        let reset_in = self.window_ttl(client).await?;

        debug!(client, remaining, "charged quota");
        Ok(QuotaStatus {
            remaining,
            reset_in,
        })
    }

    async fn window_ttl(&self, client: &str) -> Result<Duration> {
        if let Some(ttl) = self.store.ttl(client).await? {
            return Ok(ttl);
        }

        warn!(client, "quota counter has no window, restarting it");
        self.store.expire(client, self.policy.window).await?;
        Ok(self.policy.window)
    }
}

fn parse_count(client: &str, raw: &str) -> Result<i64> {
    raw.trim().parse().map_err(|_| {
        StoreError::InvalidData(format!(
            "quota counter for '{client}' is not an integer: '{raw}'"
        ))
    })
}
