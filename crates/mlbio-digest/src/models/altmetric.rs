//! Altmetric `/v1/{doi|arxiv}/{id}` response schema.

use serde::Deserialize;

use super::Popularity;

/// Subset of an Altmetric record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AltmetricRecord {
    /// Attention score.
    #[serde(default)]
    pub score: Option<f64>,

    /// Distinct accounts sharing the item on X/Twitter.
    #[serde(default)]
    pub cited_by_tweeters_count: Option<u64>,

    /// Details page on altmetric.com.
    #[serde(default)]
    pub details_url: Option<String>,
}

impl AltmetricRecord {
    /// Convert to a popularity value; a record without a score carries none.
    #[must_use]
    pub fn into_popularity(self) -> Option<Popularity> {
        let score = self.score.filter(|s| s.is_finite())?;
        Some(Popularity {
            score,
            tweeters: self.cited_by_tweeters_count,
            details_url: self.details_url,
        })
    }
}
