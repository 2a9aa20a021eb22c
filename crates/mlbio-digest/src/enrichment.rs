//! Popularity enrichment via Altmetric.
//!
//! Lookups run one item at a time. A failed lookup is never an error for the
//! run: the item keeps `popularity = None` and simply ranks last.

use crate::client::ScholarlyClient;
use crate::error::ClientResult;
use crate::models::{CandidateItem, Identifier, Popularity};

/// Source of popularity data keyed by identifier.
#[async_trait::async_trait]
pub trait PopularityLookup: Send + Sync {
    /// Look up popularity for one identifier.
    ///
    /// `Ok(None)` means the service answered but had no score.
    async fn lookup(&self, identifier: &Identifier) -> ClientResult<Option<Popularity>>;
}

#[async_trait::async_trait]
impl PopularityLookup for ScholarlyClient {
    async fn lookup(&self, identifier: &Identifier) -> ClientResult<Option<Popularity>> {
        Ok(self.altmetric(identifier).await?.into_popularity())
    }
}

/// Attach popularity to every item, sequentially.
pub async fn enrich<L>(items: &mut [CandidateItem], lookup: &L)
where
    L: PopularityLookup + ?Sized,
{
    for item in items.iter_mut() {
        item.popularity = match lookup.lookup(&item.identifier).await {
            Ok(popularity) => {
                tracing::debug!(id = %item.identifier, score = ?popularity.as_ref().map(|p| p.score), "Popularity");
                popularity
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!(id = %item.identifier, "No popularity record");
                None
            }
            Err(e) => {
                tracing::warn!(id = %item.identifier, error = %e, "Popularity lookup failed");
                None
            }
        };
    }
}
