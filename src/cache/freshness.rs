//! Freshness decisions: cache hit vs. cache miss.

use tokio::time::Instant;

use super::config::CacheTtls;
use super::keys::{ContentClass, DetailClass, ListClass};

/// Decides whether cached content is still usable for a given class.
///
/// The policy is pure over the clocks handed to it; the clock for a list
/// class covers the whole collection, the clock for a detail class covers
/// one slug. A key that was never fetched has no clock and is never fresh.
#[derive(Debug, Clone, Default)]
pub struct FreshnessPolicy {
    ttls: CacheTtls,
}

impl FreshnessPolicy {
    pub fn new(ttls: CacheTtls) -> Self {
        Self { ttls }
    }

    pub fn ttls(&self) -> &CacheTtls {
        &self.ttls
    }

    pub fn list_fresh(&self, class: ListClass, fetched_at: Option<Instant>) -> bool {
        self.fresh(ContentClass::List(class), fetched_at)
    }

    pub fn detail_fresh(&self, class: DetailClass, fetched_at: Option<Instant>) -> bool {
        self.fresh(ContentClass::Detail(class), fetched_at)
    }

    pub fn profile_fresh(&self, fetched_at: Option<Instant>) -> bool {
        self.fresh(ContentClass::Profile, fetched_at)
    }

    fn fresh(&self, class: ContentClass, fetched_at: Option<Instant>) -> bool {
        match fetched_at {
            Some(at) => Instant::now().saturating_duration_since(at) < self.ttls.ttl(class),
            None => false,
        }
    }
}
