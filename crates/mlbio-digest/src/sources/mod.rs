//! Source queries: Crossref journal articles and arXiv preprints.
//!
//! Each source is queried once, without pagination. A failing source
//! contributes no items; the run continues with the other one.

pub mod arxiv;
pub mod crossref;

use crate::client::ScholarlyClient;
use crate::error::ClientResult;
use crate::models::{CandidateItem, LookbackWindow, SourceKind};

/// Query one source.
///
/// # Errors
///
/// Returns error on API failure or an undecodable body.
pub async fn fetch(
    client: &ScholarlyClient,
    kind: SourceKind,
    window: &LookbackWindow,
) -> ClientResult<Vec<CandidateItem>> {
    match kind {
        SourceKind::Journal => crossref::fetch(client, window).await,
        SourceKind::Preprint => arxiv::fetch(client, window).await,
    }
}

/// Query one source, degrading any failure to an empty list.
pub async fn fetch_or_empty(
    client: &ScholarlyClient,
    kind: SourceKind,
    window: &LookbackWindow,
) -> Vec<CandidateItem> {
    match fetch(client, kind, window).await {
        Ok(items) => {
            tracing::info!(source = kind.name(), candidates = items.len(), "Source query complete");
            items
        }
        Err(e) => {
            tracing::warn!(source = kind.name(), error = %e, "Source query failed, continuing without it");
            Vec::new()
        }
    }
}
