use crate::error::{Result, ShortenerError};
use crate::shortener::{ShortenRequest, Shortened, Shortener};
use crate::url::{self, DomainGuard};
use async_trait::async_trait;
use portal_core::{KvStore, LinkEntry, Retention};
use portal_generator::{Allocator, Generator};
use portal_quota::{QuotaStatus, QuotaTracker};
use std::sync::Arc;
use tracing::{debug, warn};
use typed_builder::TypedBuilder;

/// Retention applied when a request does not ask for one.
pub const DEFAULT_RETENTION: Retention = Retention::from_hours(24);

#[derive(Debug, Clone, TypedBuilder)]
pub struct ShortenerSettings {
    /// Public domain short URLs are issued under.
    #[builder(setter(into))]
    pub domain: String,
    #[builder(default = DEFAULT_RETENTION)]
    pub default_retention: Retention,
}

/// A concrete implementation of the [`Shortener`] trait.
///
/// Links are written to the `L` store and client quota is tracked in the `Q`
/// store. The two are expected to be separate namespaces.
///
/// Identifier uniqueness is best effort: a single existence check precedes
/// the write, and a collision fails the request without retrying.
#[derive(Debug, Clone)]
pub struct ShortenerService<L, Q, G> {
    links: Arc<L>,
    quota: Arc<QuotaTracker<Q>>,
    allocator: Arc<Allocator<G>>,
    guard: DomainGuard,
    settings: ShortenerSettings,
}

impl<L: KvStore, Q: KvStore, G: Generator> ShortenerService<L, Q, G> {
    pub fn new(
        links: L,
        quota: QuotaTracker<Q>,
        generator: G,
        settings: ShortenerSettings,
    ) -> Self {
        Self {
            links: Arc::new(links),
            quota: Arc::new(quota),
            allocator: Arc::new(Allocator::new(generator)),
            guard: DomainGuard::new(settings.domain.clone()),
            settings,
        }
    }
}

#[async_trait]
impl<L: KvStore, Q: KvStore, G: Generator> Shortener for ShortenerService<L, Q, G> {
    async fn shorten(&self, client: &str, request: ShortenRequest) -> Result<Shortened> {
        let admission = self.quota.admit(client).await.inspect_err(|e| {
            warn!(client, error = %e, "quota check failed");
        })?;
        if !admission.allowed {
            warn!(client, "rejected: rate limit exceeded");
            return Err(ShortenerError::QuotaExceeded {
                reset_in: admission.reset_in,
            });
        }

        url::validate(&request.url).inspect_err(|e| {
            warn!(client, url = %request.url, error = %e, "rejected: invalid url");
        })?;

        if !self.guard.allows(&request.url) {
            warn!(client, url = %request.url, "rejected: url points at this service");
            return Err(ShortenerError::InvalidDomain(request.url));
        }

        let target = url::normalize(&request.url);
        let code = self.allocator.allocate(request.custom.as_deref());

        let existing = self.links.get(code.as_str()).await.inspect_err(|e| {
            warn!(client, %code, error = %e, "existence check failed");
        })?;
        if existing.is_some() {
            warn!(client, %code, "rejected: short code already in use");
            return Err(ShortenerError::AliasConflict(code.to_string()));
        }

        let expiry =
            Retention::requested_or(request.expiry_hours, self.settings.default_retention);
        let link = LinkEntry {
            code,
            target,
            expiry,
        };
        self.links
            .set(
                link.code.as_str(),
                &link.target,
                Some(link.expiry.as_duration()),
            )
            .await
            .inspect_err(|e| {
                warn!(client, code = %link.code, error = %e, "failed to store link");
            })?;

        // The link is already written, so a failed charge only degrades the
        // figures reported back.
        let quota = match self.quota.consume(client).await {
            Ok(status) => status,
            Err(e) => {
                warn!(client, error = %e, "failed to charge quota");
                QuotaStatus {
                    remaining: admission.remaining - 1,
                    reset_in: admission.reset_in,
                }
            }
        };

        debug!(
            client,
            code = %link.code,
            custom = link.code.is_custom(),
            url = %link.target,
            hours = link.expiry.hours(),
            "shortened url"
        );
        Ok(Shortened {
            short_url: link.code.to_url(&self.settings.domain),
            link,
            quota,
        })
    }
}
