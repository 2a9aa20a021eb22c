//! Slack Block Kit rendering.

use std::borrow::Cow;

use crate::config::digest;
use crate::models::{Block, CandidateItem, DigestMessage, LookbackWindow, SourceKind};

/// Longest summary shown per item, in characters.
const MAX_SUMMARY_CHARS: usize = 600;

/// Render both ranked lists into one webhook payload.
///
/// Items are numbered continuously across sources. Output depends only on the
/// inputs.
#[must_use]
pub fn render_digest(
    journals: &[CandidateItem],
    preprints: &[CandidateItem],
    window: &LookbackWindow,
) -> DigestMessage {
    let mut blocks = vec![
        Block::header(digest::TITLE),
        Block::context(format!(
            "{} – {} · Crossref and arXiv, ranked by Altmetric attention",
            window.since.format("%Y-%m-%d"),
            window.until.format("%Y-%m-%d"),
        )),
    ];
    let mut text = format!("{}\n", digest::TITLE);

    let mut index = 1;
    for (kind, items) in [(SourceKind::Journal, journals), (SourceKind::Preprint, preprints)] {
        blocks.push(Block::section(format!("*{}*", kind.heading())));
        blocks.push(Block::Divider);
        text.push_str(&format!("\n{}\n", kind.heading()));

        if items.is_empty() {
            blocks.push(Block::section("_No items this period._"));
            text.push_str("No items this period.\n");
            continue;
        }

        for item in items {
            blocks.push(Block::section(format_item_line(index, item)));
            if let Some(popularity) = format_popularity(item) {
                blocks.push(Block::context(popularity));
            }
            text.push_str(&format!(
                "{}. {} ({}) {}\n",
                index,
                item.title_or_default(),
                display_date(item),
                item.link()
            ));
            index += 1;
        }
    }

    DigestMessage { text, blocks }
}

/// `*{n}. <{link}|{title}>*` then the date and summary on the next line.
#[must_use]
pub fn format_item_line(index: usize, item: &CandidateItem) -> String {
    format!(
        "*{}. <{}|{}>*\n_{}_ – {}",
        index,
        item.link(),
        escape_mrkdwn(item.title_or_default()),
        display_date(item),
        escape_mrkdwn(&truncate(item.summary_or_placeholder(), MAX_SUMMARY_CHARS)),
    )
}

/// Popularity context line, if the item has a score.
#[must_use]
pub fn format_popularity(item: &CandidateItem) -> Option<String> {
    let popularity = item.popularity.as_ref()?;
    let mut line = format!("Altmetric {:.0}", popularity.score);
    if let Some(tweeters) = popularity.tweeters {
        line.push_str(&format!(" · {tweeters} tweeters"));
    }
    if let Some(url) = &popularity.details_url {
        line.push_str(&format!(" · <{url}|details>"));
    }
    line.push_str(&format!(" · {}", escape_mrkdwn(&item.venue)));
    Some(line)
}

/// Escape the three characters Slack treats as control sequences.
#[must_use]
pub fn escape_mrkdwn(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>']) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;"))
}

fn display_date(item: &CandidateItem) -> String {
    item.published
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "date unknown".to_string())
}

fn truncate(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        None => Cow::Borrowed(text),
        Some((idx, _)) => Cow::Owned(format!("{}…", text[..idx].trim_end())),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::{Identifier, Popularity};

    fn window() -> LookbackWindow {
        LookbackWindow::ending(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(), 30)
    }

    fn journal(title: &str) -> CandidateItem {
        let mut item = CandidateItem::new(title, Identifier::doi("10.1038/x1"), SourceKind::Journal)
            .with_published(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
        item.summary = Some("First. Second.".to_string());
        item
    }

    #[test]
    fn test_item_line_layout() {
        let line = format_item_line(1, &journal("Cells & <Genes>"));
        assert_eq!(
            line,
            "*1. <https://doi.org/10.1038/x1|Cells &amp; &lt;Genes&gt;>*\n_2024-03-07_ – First. Second."
        );
    }

    #[test]
    fn test_item_without_summary_or_date() {
        let item = CandidateItem::new("T", Identifier::arxiv("2403.00001"), SourceKind::Preprint);
        let line = format_item_line(6, &item);
        assert!(line.starts_with("*6. <https://arxiv.org/abs/2403.00001|T>*"));
        assert!(line.ends_with("_date unknown_ – Summary unavailable."));
    }

    #[test]
    fn test_numbering_continues_across_sources() {
        let preprint = CandidateItem::new("P", Identifier::arxiv("2403.00001"), SourceKind::Preprint);
        let message = render_digest(&[journal("J1"), journal("J2")], &[preprint], &window());

        let items: Vec<&str> = message.section_texts().filter(|t| t.starts_with("*3.")).collect();
        assert_eq!(items.len(), 1);
        assert!(items[0].contains("|P>"));
    }

    #[test]
    fn test_empty_source_placeholder() {
        let message = render_digest(&[journal("J1")], &[], &window());
        let sections: Vec<&str> = message.section_texts().collect();
        assert_eq!(sections.last().copied(), Some("_No items this period._"));
        assert!(message.text.contains("No items this period."));
    }

    #[test]
    fn test_popularity_line() {
        let mut item = journal("J");
        item.venue = "Nature".to_string();
        assert!(format_popularity(&item).is_none());

        item.popularity = Some(Popularity {
            score: 41.6,
            tweeters: Some(12),
            details_url: Some("https://altmetric.com/details/9".to_string()),
        });
        assert_eq!(
            format_popularity(&item).unwrap(),
            "Altmetric 42 · 12 tweeters · <https://altmetric.com/details/9|details> · Nature"
        );
    }

    #[test]
    fn test_long_summary_truncated() {
        let mut item = journal("J");
        item.summary = Some("x".repeat(MAX_SUMMARY_CHARS + 50));
        let line = format_item_line(1, &item);
        assert!(line.ends_with('…'));
    }

    #[test]
    fn test_render_is_deterministic() {
        let journals = vec![journal("A"), journal("B")];
        assert_eq!(render_digest(&journals, &[], &window()), render_digest(&journals, &[], &window()));
    }
}
