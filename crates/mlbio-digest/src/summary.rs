//! Summary extraction from abstracts.
//!
//! A segment ends at `.`, `?` or `!` followed by whitespace or the end of the
//! text; an unterminated tail also counts as a segment. No attempt is made to
//! recognise abbreviations or decimals beyond the whitespace rule, so "3.5"
//! stays intact while "e.g. this" splits.

use crate::config::digest;
use crate::models::CandidateItem;

/// Number of leading segments kept.
const MAX_SEGMENTS: usize = 2;

/// Summarize an optional abstract.
///
/// Two or more segments yield the first two joined by a space, one segment
/// yields itself, and nothing yields the placeholder.
#[must_use]
pub fn summarize(abstract_text: Option<&str>) -> String {
    let segments = abstract_text.map(split_segments).unwrap_or_default();

    if segments.is_empty() {
        return digest::SUMMARY_PLACEHOLDER.to_string();
    }

    segments.into_iter().take(MAX_SEGMENTS).collect::<Vec<_>>().join(" ")
}

/// Fill `summary` on every item.
pub fn summarize_all(items: &mut [CandidateItem]) {
    for item in items.iter_mut() {
        item.summary = Some(summarize(item.abstract_text.as_deref()));
    }
}

/// Split text into trimmed, non-empty sentence-like segments.
#[must_use]
pub fn split_segments(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if !matches!(ch, '.' | '?' | '!') {
            continue;
        }
        let boundary = match chars.peek() {
            None => true,
            Some((_, next)) => next.is_whitespace(),
        };
        if boundary {
            let end = idx + ch.len_utf8();
            push_segment(&mut segments, &text[start..end]);
            start = end;
        }
    }
    push_segment(&mut segments, &text[start..]);

    segments
}

fn push_segment<'a>(segments: &mut Vec<&'a str>, raw: &'a str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        segments.push(trimmed);
    }
}
