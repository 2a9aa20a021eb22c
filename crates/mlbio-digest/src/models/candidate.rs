//! Candidate items flowing through the digest pipeline.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::digest;

const DOI_RESOLVERS: &[&str] =
    &["https://doi.org/", "http://doi.org/", "https://dx.doi.org/", "http://dx.doi.org/"];

/// Identifier used both for links and for the popularity lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Identifier {
    /// Digital Object Identifier, e.g. `10.1038/s41586-024-00001-x`.
    Doi(String),
    /// arXiv identifier without version suffix, e.g. `2401.01234`.
    Arxiv(String),
}

impl Identifier {
    /// Build a DOI identifier, trimming a resolver prefix (`doi.org` or
    /// `dx.doi.org`, over http or https) if present.
    #[must_use]
    pub fn doi(raw: &str) -> Self {
        let raw = raw.trim();
        let doi = DOI_RESOLVERS.iter().find_map(|prefix| raw.strip_prefix(prefix)).unwrap_or(raw);
        Self::Doi(doi.to_string())
    }

    /// Build an arXiv identifier from a bare ID or an abs URL, dropping `vN`.
    #[must_use]
    pub fn arxiv(raw: &str) -> Self {
        let raw = raw.trim();
        let id = raw.split_once("/abs/").map_or(raw, |(_, rest)| rest);
        Self::Arxiv(strip_version(id).to_string())
    }

    /// The bare identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Doi(v) | Self::Arxiv(v) => v,
        }
    }

    /// Canonical landing page.
    #[must_use]
    pub fn link(&self) -> String {
        match self {
            Self::Doi(doi) => format!("https://doi.org/{doi}"),
            Self::Arxiv(id) => format!("https://arxiv.org/abs/{id}"),
        }
    }

    /// Path under the Altmetric API, with the value encoded as one segment.
    #[must_use]
    pub fn altmetric_path(&self) -> String {
        let (kind, value) = match self {
            Self::Doi(v) => ("doi", v),
            Self::Arxiv(v) => ("arxiv", v),
        };
        let encoded: String = url::form_urlencoded::byte_serialize(value.as_bytes()).collect();
        format!("{kind}/{encoded}")
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Doi(v) => write!(f, "doi:{v}"),
            Self::Arxiv(v) => write!(f, "arXiv:{v}"),
        }
    }
}

/// `2401.01234v3` -> `2401.01234`; old-style IDs keep their slash.
fn strip_version(id: &str) -> &str {
    match id.rfind('v') {
        Some(pos)
            if pos > 0
                && pos + 1 < id.len()
                && id[pos + 1..].bytes().all(|b| b.is_ascii_digit())
                && id.as_bytes()[pos - 1].is_ascii_digit() =>
        {
            &id[..pos]
        }
        _ => id,
    }
}

/// Attention metrics for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Popularity {
    /// Altmetric attention score.
    pub score: f64,

    /// Number of distinct accounts that shared the item.
    #[serde(default)]
    pub tweeters: Option<u64>,

    /// Altmetric details page.
    #[serde(default)]
    pub details_url: Option<String>,
}

/// Which source an item came from; fixes its cap and heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Crossref journal article.
    Journal,
    /// arXiv preprint.
    Preprint,
}

impl SourceKind {
    /// Maximum number of items kept after ranking.
    #[must_use]
    pub const fn cap(self) -> usize {
        match self {
            Self::Journal => digest::JOURNAL_CAP,
            Self::Preprint => digest::PREPRINT_CAP,
        }
    }

    /// Section heading in the digest.
    #[must_use]
    pub const fn heading(self) -> &'static str {
        match self {
            Self::Journal => "High-impact journals",
            Self::Preprint => "arXiv preprints",
        }
    }

    /// Short name for logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Journal => "crossref",
            Self::Preprint => "arxiv",
        }
    }
}

/// One publication or preprint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateItem {
    /// Title with whitespace collapsed.
    pub title: String,

    /// DOI or arXiv ID.
    pub identifier: Identifier,

    /// Publication (journal) or submission (preprint) date.
    pub published: Option<NaiveDate>,

    /// Plain-text abstract.
    pub abstract_text: Option<String>,

    /// Journal title or arXiv primary category.
    pub venue: String,

    /// Author display names.
    #[serde(default)]
    pub authors: Vec<String>,

    /// Originating source.
    pub source: SourceKind,

    /// Filled in by enrichment.
    #[serde(default)]
    pub popularity: Option<Popularity>,

    /// Filled in by summary extraction.
    #[serde(default)]
    pub summary: Option<String>,
}

impl CandidateItem {
    /// Create an item with no popularity and no summary yet.
    #[must_use]
    pub fn new(title: impl Into<String>, identifier: Identifier, source: SourceKind) -> Self {
        Self {
            title: title.into(),
            identifier,
            published: None,
            abstract_text: None,
            venue: String::new(),
            authors: Vec::new(),
            source,
            popularity: None,
            summary: None,
        }
    }

    /// Set the publication date.
    #[must_use]
    pub fn with_published(mut self, date: NaiveDate) -> Self {
        self.published = Some(date);
        self
    }

    /// Set the abstract.
    #[must_use]
    pub fn with_abstract(mut self, text: impl Into<String>) -> Self {
        self.abstract_text = Some(text.into());
        self
    }

    /// Set the popularity score.
    #[must_use]
    pub fn with_score(mut self, score: f64) -> Self {
        self.popularity = Some(Popularity { score, tweeters: None, details_url: None });
        self
    }

    /// Popularity score if known.
    #[must_use]
    pub fn score(&self) -> Option<f64> {
        self.popularity.as_ref().map(|p| p.score)
    }

    /// Title, falling back to "(no title)".
    #[must_use]
    pub fn title_or_default(&self) -> &str {
        if self.title.trim().is_empty() { "(no title)" } else { &self.title }
    }

    /// Link built from the identifier.
    #[must_use]
    pub fn link(&self) -> String {
        self.identifier.link()
    }

    /// Summary text or the placeholder.
    #[must_use]
    pub fn summary_or_placeholder(&self) -> &str {
        self.summary.as_deref().unwrap_or(digest::SUMMARY_PLACEHOLDER)
    }
}

/// Fixed date range both source queries are bounded by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookbackWindow {
    /// First day included.
    pub since: NaiveDate,
    /// Last day included.
    pub until: NaiveDate,
}

impl LookbackWindow {
    /// Window of `days` ending on `today`.
    #[must_use]
    pub fn ending(today: NaiveDate, days: i64) -> Self {
        Self { since: today - Duration::days(days), until: today }
    }

    /// True if `date` falls inside the window (inclusive).
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.since && date <= self.until
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arxiv_identifier_drops_version() {
        assert_eq!(Identifier::arxiv("2401.01234v2").value(), "2401.01234");
        assert_eq!(Identifier::arxiv("http://arxiv.org/abs/2401.01234v1").value(), "2401.01234");
        assert_eq!(Identifier::arxiv("q-bio/0601001v1").value(), "q-bio/0601001");
        assert_eq!(Identifier::arxiv("2401.01234").value(), "2401.01234");
    }

    #[test]
    fn test_doi_identifier_strips_resolver() {
        for resolver in ["https://doi.org/", "http://doi.org/", "https://dx.doi.org/", "http://dx.doi.org/"] {
            let doi = Identifier::doi(&format!("{resolver}10.1038/abc"));
            assert_eq!(doi.value(), "10.1038/abc", "resolver {resolver}");
        }
        assert_eq!(Identifier::doi("10.1016/j.cell.2024.01.001").value(), "10.1016/j.cell.2024.01.001");
    }

    #[test]
    fn test_links() {
        assert_eq!(Identifier::doi("10.1038/abc").link(), "https://doi.org/10.1038/abc");
        assert_eq!(Identifier::arxiv("2401.01234").link(), "https://arxiv.org/abs/2401.01234");
    }

    #[test]
    fn test_altmetric_path_encodes_slash() {
        assert_eq!(Identifier::doi("10.1038/abc").altmetric_path(), "doi/10.1038%2Fabc");
        assert_eq!(Identifier::arxiv("2401.01234").altmetric_path(), "arxiv/2401.01234");
    }

    #[test]
    fn test_window_bounds() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let window = LookbackWindow::ending(today, 30);
        assert_eq!(window.since, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert!(window.contains(window.since));
        assert!(window.contains(today));
        assert!(!window.contains(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
    }

    #[test]
    fn test_summary_placeholder_when_unset() {
        let item = CandidateItem::new("T", Identifier::doi("10.1/x"), SourceKind::Journal);
        assert_eq!(item.summary_or_placeholder(), digest::SUMMARY_PLACEHOLDER);
    }
}
