//! Ranking and selection.
//!
//! Order: popularity score descending, items without a score after every
//! scored item, then publication date descending (undated last). The sort is
//! stable, so remaining ties keep their source order.

use std::cmp::Ordering;

use crate::models::{CandidateItem, SourceKind};

/// Sort `items` and keep at most `kind.cap()` of them.
#[must_use]
pub fn rank(items: Vec<CandidateItem>, kind: SourceKind) -> Vec<CandidateItem> {
    rank_with_cap(items, kind.cap())
}

/// Sort `items` and keep at most `cap` of them.
#[must_use]
pub fn rank_with_cap(mut items: Vec<CandidateItem>, cap: usize) -> Vec<CandidateItem> {
    items.sort_by(compare);
    items.truncate(cap);
    items
}

/// Ordering used by [`rank`]; `Less` means "comes first".
#[must_use]
pub fn compare(a: &CandidateItem, b: &CandidateItem) -> Ordering {
    compare_scores(b.score(), a.score()).then_with(|| b.published.cmp(&a.published))
}

/// `None` sorts below any score; scores compare totally.
fn compare_scores(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::Identifier;

    fn item(id: &str, score: Option<f64>, day: u32) -> CandidateItem {
        let mut item = CandidateItem::new(id, Identifier::Doi(id.to_string()), SourceKind::Journal)
            .with_published(NaiveDate::from_ymd_opt(2024, 3, day).unwrap());
        if let Some(score) = score {
            item = item.with_score(score);
        }
        item
    }

    fn titles(items: &[CandidateItem]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_score_then_recency() {
        let ranked = rank(
            vec![item("low", Some(1.0), 20), item("old", Some(5.0), 1), item("new", Some(5.0), 9)],
            SourceKind::Journal,
        );
        assert_eq!(titles(&ranked), vec!["new", "old", "low"]);
    }

    #[test]
    fn test_unscored_rank_below_zero_score() {
        let ranked = rank(
            vec![item("none-recent", None, 30), item("zero", Some(0.0), 1)],
            SourceKind::Journal,
        );
        assert_eq!(titles(&ranked), vec!["zero", "none-recent"]);
    }

    #[test]
    fn test_unscored_fall_back_to_recency() {
        let ranked = rank(vec![item("a", None, 2), item("b", None, 9)], SourceKind::Preprint);
        assert_eq!(titles(&ranked), vec!["b", "a"]);
    }

    #[test]
    fn test_cap_applies() {
        let items = (1..=4).map(|d| item(&d.to_string(), Some(f64::from(d)), d)).collect();
        let ranked = rank(items, SourceKind::Preprint);
        assert_eq!(titles(&ranked), vec!["4", "3"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(rank(Vec::new(), SourceKind::Journal).is_empty());
    }
}
