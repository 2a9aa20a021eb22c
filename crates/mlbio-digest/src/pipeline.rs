//! The digest run: fetch, enrich, rank, summarize, format, deliver.
//!
//! Stages run strictly one after another: both sources are queried, then
//! all items are enriched, then ranked and summarized.

use chrono::Utc;

use crate::client::ScholarlyClient;
use crate::config::Config;
use crate::delivery::{DeliveryReport, WebhookClient};
use crate::error::DigestResult;
use crate::models::{CandidateItem, DigestMessage, LookbackWindow, SourceKind};
use crate::{enrichment, formatters, ranking, sources, summary};

/// Ranked, summarized items for both sources.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedLists {
    /// Journal articles, at most 5.
    pub journals: Vec<CandidateItem>,
    /// Preprints, at most 2.
    pub preprints: Vec<CandidateItem>,
}

impl RankedLists {
    /// Total number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.journals.len() + self.preprints.len()
    }

    /// True if neither source produced anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render the webhook payload.
    #[must_use]
    pub fn render(&self, window: &LookbackWindow) -> DigestMessage {
        formatters::render_digest(&self.journals, &self.preprints, window)
    }
}

/// A configured digest job.
#[derive(Debug)]
pub struct Digest {
    client: ScholarlyClient,
    webhook: WebhookClient,
    lookback_days: i64,
}

impl Digest {
    /// Build the clients for one run.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> DigestResult<Self> {
        Ok(Self {
            client: ScholarlyClient::new(config)?,
            webhook: WebhookClient::new(config)?,
            lookback_days: config.lookback_days,
        })
    }

    /// Run for the window ending today (UTC).
    ///
    /// # Errors
    ///
    /// Returns error only if delivery fails.
    pub async fn run(&self) -> DigestResult<DeliveryReport> {
        let today = Utc::now().date_naive();
        self.run_for(&LookbackWindow::ending(today, self.lookback_days)).await
    }

    /// Run for an explicit window.
    ///
    /// # Errors
    ///
    /// Returns error only if delivery fails.
    pub async fn run_for(&self, window: &LookbackWindow) -> DigestResult<DeliveryReport> {
        tracing::info!(since = %window.since, until = %window.until, "Building digest");

        let lists = self.build(window).await;
        if lists.is_empty() {
            tracing::warn!("No items from any source; posting an empty digest");
        }
        let message = lists.render(window);

        let report = self.webhook.post(&message, lists.len()).await?;
        tracing::info!(items = report.items, status = report.status, "Digest delivered");
        Ok(report)
    }

    /// Everything up to (not including) formatting and delivery.
    ///
    /// Each stage covers both sources before the next stage starts.
    pub async fn build(&self, window: &LookbackWindow) -> RankedLists {
        let mut journals = sources::fetch_or_empty(&self.client, SourceKind::Journal, window).await;
        let mut preprints = sources::fetch_or_empty(&self.client, SourceKind::Preprint, window).await;

        enrichment::enrich(&mut journals, &self.client).await;
        enrichment::enrich(&mut preprints, &self.client).await;

        let mut lists = RankedLists {
            journals: ranking::rank(journals, SourceKind::Journal),
            preprints: ranking::rank(preprints, SourceKind::Preprint),
        };

        summary::summarize_all(&mut lists.journals);
        summary::summarize_all(&mut lists.preprints);

        tracing::info!(journals = lists.journals.len(), preprints = lists.preprints.len(), "Ranked");
        lists
    }
}
