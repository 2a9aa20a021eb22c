//! Journal articles from Crossref, restricted to the venue allow-list.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use crate::client::ScholarlyClient;
use crate::config::venues;
use crate::error::ClientResult;
use crate::models::{CandidateItem, Identifier, LookbackWindow, SourceKind, Work};

static JATS_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<jats:title[^>]*>.*?</jats:title>").expect("valid regex")
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]+>").expect("valid regex"));
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Fetch accepted journal articles published inside `window`.
///
/// # Errors
///
/// Returns error on API failure or an undecodable body.
pub async fn fetch(client: &ScholarlyClient, window: &LookbackWindow) -> ClientResult<Vec<CandidateItem>> {
    let response = client.crossref_works(window).await?;

    tracing::debug!(
        total = ?response.message.total_results,
        page = response.message.items.len(),
        "Crossref page received"
    );

    Ok(candidates_from_works(response.message.items))
}

/// Keep works from accepted venues that carry a DOI and a title.
#[must_use]
pub fn candidates_from_works(works: Vec<Work>) -> Vec<CandidateItem> {
    works.into_iter().filter_map(candidate_from_work).collect()
}

fn candidate_from_work(work: Work) -> Option<CandidateItem> {
    let journal = work.journal()?;
    if !venues::is_accepted(journal) {
        return None;
    }

    let doi = work.doi.as_deref().filter(|d| !d.trim().is_empty())?;
    let title = collapse_whitespace(work.first_title().unwrap_or_default());

    let abstract_text = work
        .abstract_jats
        .as_deref()
        .map(clean_abstract)
        .filter(|text| !text.is_empty());

    Some(CandidateItem {
        title,
        identifier: Identifier::doi(doi),
        published: work.published(),
        abstract_text,
        venue: journal.to_string(),
        authors: work.author_names(),
        source: SourceKind::Journal,
        popularity: None,
        summary: None,
    })
}

/// Strip JATS markup from a Crossref abstract.
///
/// Section headings such as `<jats:title>Abstract</jats:title>` are dropped
/// entirely; remaining tags become spaces.
#[must_use]
pub fn clean_abstract(jats: &str) -> String {
    let without_titles = JATS_TITLE_RE.replace_all(jats, " ");
    let without_tags = TAG_RE.replace_all(&without_titles, " ");
    collapse_whitespace(&unescape_entities(&without_tags))
}

/// Resolve XML entities and numeric character references. Text with an
/// entity quick-xml does not know (e.g. `&nbsp;`) is kept as is.
fn unescape_entities(text: &str) -> String {
    quick_xml::escape::unescape(text).map_or_else(|_| text.to_string(), Cow::into_owned)
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    WS_RE.replace_all(text.trim(), " ").into_owned()
}
