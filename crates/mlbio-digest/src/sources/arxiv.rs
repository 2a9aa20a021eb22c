//! Preprints from the arXiv export API (Atom feed).

use chrono::NaiveDate;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::crossref::collapse_whitespace;
use crate::client::ScholarlyClient;
use crate::error::{ClientError, ClientResult};
use crate::models::{ArxivEntry, CandidateItem, Identifier, LookbackWindow, SourceKind};

/// Fetch preprints submitted inside `window`, newest first.
///
/// # Errors
///
/// Returns error on API failure or a malformed feed.
pub async fn fetch(client: &ScholarlyClient, window: &LookbackWindow) -> ClientResult<Vec<CandidateItem>> {
    let xml = client.arxiv_query(window).await?;
    let entries = parse_feed(&xml)?;

    tracing::debug!(entries = entries.len(), "arXiv feed received");

    Ok(candidates_from_entries(entries, window))
}

/// Parse the Atom document into entries.
///
/// Element names are matched on their local part so the `arxiv:` namespace
/// prefix does not matter.
///
/// # Errors
///
/// Returns [`ClientError::Xml`] if the document is not well-formed.
pub fn parse_feed(xml: &str) -> ClientResult<Vec<ArxivEntry>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut current: Option<ArxivEntry> = None;
    let mut in_author = false;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let local = e.local_name();
                match local.as_ref() {
                    b"entry" => current = Some(ArxivEntry::default()),
                    b"author" => in_author = true,
                    b"primary_category" => set_primary_category(current.as_mut(), &e),
                    _ => {}
                }
                text.clear();
            }
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"primary_category" {
                    set_primary_category(current.as_mut(), &e);
                }
            }
            Ok(Event::Text(t)) => {
                let unescaped = t.unescape().map_err(ClientError::xml)?;
                text.push_str(&unescaped);
            }
            Ok(Event::CData(t)) => {
                text.push_str(&String::from_utf8_lossy(&t.into_inner()));
            }
            Ok(Event::End(e)) => {
                let local = e.local_name();
                let name = local.as_ref();

                if name == b"entry" {
                    if let Some(entry) = current.take() {
                        entries.push(entry);
                    }
                } else if name == b"author" {
                    in_author = false;
                } else if let Some(entry) = current.as_mut() {
                    let value = collapse_whitespace(&text);
                    match name {
                        b"id" => entry.id_url = value,
                        b"title" => entry.title = value,
                        b"summary" => entry.summary = value,
                        b"published" => entry.published = non_empty(value),
                        b"updated" => entry.updated = non_empty(value),
                        b"name" if in_author && !value.is_empty() => entry.authors.push(value),
                        _ => {}
                    }
                }
                text.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ClientError::xml(format!(
                    "at byte {}: {e}",
                    reader.buffer_position()
                )));
            }
            _ => {}
        }
    }

    Ok(entries)
}

/// Convert entries to candidates, keeping only those dated inside `window`.
#[must_use]
pub fn candidates_from_entries(entries: Vec<ArxivEntry>, window: &LookbackWindow) -> Vec<CandidateItem> {
    entries
        .into_iter()
        .filter_map(|entry| {
            if entry.id_url.is_empty() {
                return None;
            }

            let published = entry
                .published
                .as_deref()
                .or(entry.updated.as_deref())
                .and_then(parse_date)?;
            if !window.contains(published) {
                return None;
            }

            let abstract_text = non_empty(entry.summary);
            Some(CandidateItem {
                title: entry.title,
                identifier: Identifier::arxiv(&entry.id_url),
                published: Some(published),
                abstract_text,
                venue: entry.primary_category.unwrap_or_else(|| "arXiv".to_string()),
                authors: entry.authors,
                source: SourceKind::Preprint,
                popularity: None,
                summary: None,
            })
        })
        .collect()
}

fn set_primary_category(entry: Option<&mut ArxivEntry>, e: &BytesStart<'_>) {
    let Some(entry) = entry else { return };
    entry.primary_category = e
        .attributes()
        .flatten()
        .find(|a| a.key.as_ref() == b"term")
        .and_then(|a| a.unescape_value().ok().map(|v| v.trim().to_string()))
        .filter(|v| !v.is_empty());
}

fn parse_date(timestamp: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(timestamp.get(..10)?, "%Y-%m-%d").ok()
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:arxiv="http://arxiv.org/schemas/atom">
  <title type="html">ArXiv Query</title>
  <id>http://arxiv.org/api/abc</id>
  <entry>
    <id>http://arxiv.org/abs/2403.01234v2</id>
    <updated>2024-03-05T10:00:00Z</updated>
    <published>2024-03-04T18:00:00Z</published>
    <title>Protein Language
      Models for Immunology</title>
    <summary>  We train a model. It works &amp; generalises.
    </summary>
    <author><name>Ada Lovelace</name></author>
    <author><name>Alan Turing</name><arxiv:affiliation>Cambridge</arxiv:affiliation></author>
    <link href="http://arxiv.org/abs/2403.01234v2" rel="alternate" type="text/html"/>
    <arxiv:primary_category term="q-bio.BM" scheme="http://arxiv.org/schemas/atom"/>
    <category term="q-bio.BM" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2401.00001v1</id>
    <published>2024-01-02T00:00:00Z</published>
    <title>Old preprint</title>
    <summary>Too old.</summary>
  </entry>
</feed>"#;

    fn march_window() -> LookbackWindow {
        LookbackWindow::ending(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(), 30)
    }

    #[test]
    fn test_parse_feed_entries() {
        let entries = parse_feed(FEED).unwrap();
        assert_eq!(entries.len(), 2);

        let first = &entries[0];
        assert_eq!(first.id_url, "http://arxiv.org/abs/2403.01234v2");
        assert_eq!(first.title, "Protein Language Models for Immunology");
        assert_eq!(first.summary, "We train a model. It works & generalises.");
        assert_eq!(first.authors, vec!["Ada Lovelace", "Alan Turing"]);
        assert_eq!(first.primary_category.as_deref(), Some("q-bio.BM"));
        assert_eq!(first.published.as_deref(), Some("2024-03-04T18:00:00Z"));
    }

    #[test]
    fn test_window_filter() {
        let items = candidates_from_entries(parse_feed(FEED).unwrap(), &march_window());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].identifier, Identifier::Arxiv("2403.01234".to_string()));
        assert_eq!(items[0].venue, "q-bio.BM");
        assert_eq!(items[0].source, SourceKind::Preprint);
    }

    #[test]
    fn test_entry_without_date_is_dropped() {
        let entries = vec![ArxivEntry {
            id_url: "http://arxiv.org/abs/2403.00002v1".to_string(),
            title: "Undated".to_string(),
            ..Default::default()
        }];
        assert!(candidates_from_entries(entries, &march_window()).is_empty());
    }

    #[test]
    fn test_empty_feed() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom"><title>none</title></feed>"#;
        assert!(parse_feed(xml).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_feed_is_error() {
        let result = parse_feed("<feed><entry><title>x</entry></feed>");
        assert!(matches!(result, Err(ClientError::Xml(_))));
    }
}
