use portal_core::KvStore;
use portal_generator::Generator;
use portal_quota::{QuotaPolicy, QuotaTracker};
use portal_redirector::{AccessCounter, Redirector, RedirectorService};
use portal_shortener::{Shortener, ShortenerService, ShortenerSettings};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    shortener: Arc<dyn Shortener>,
    redirector: Arc<dyn Redirector>,
}

impl AppState {
    pub fn new(shortener: Arc<dyn Shortener>, redirector: Arc<dyn Redirector>) -> Self {
        Self {
            shortener,
            redirector,
        }
    }

    /// Wires both services over a link store and a quota store.
    pub fn from_stores<L, Q, G>(
        links: L,
        quota: Q,
        generator: G,
        policy: QuotaPolicy,
        settings: ShortenerSettings,
    ) -> Self
    where
        L: KvStore + Clone,
        Q: KvStore + Clone,
        G: Generator,
    {
        let shortener = ShortenerService::new(
            links.clone(),
            QuotaTracker::new(quota.clone(), policy),
            generator,
            settings,
        );
        let redirector = RedirectorService::new(links, AccessCounter::new(quota));
        Self::new(Arc::new(shortener), Arc::new(redirector))
    }

    pub fn shortener(&self) -> &dyn Shortener {
        self.shortener.as_ref()
    }

    pub fn redirector(&self) -> &dyn Redirector {
        self.redirector.as_ref()
    }
}
