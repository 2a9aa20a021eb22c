//! Crossref `/works` response schema (only the selected fields).

use chrono::NaiveDate;
use serde::Deserialize;

/// Top-level `/works` envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorksResponse {
    /// Response status ("ok").
    #[serde(default)]
    pub status: Option<String>,

    /// Result page.
    #[serde(default)]
    pub message: WorksMessage,
}

/// Result page of works.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WorksMessage {
    /// Total matches reported by Crossref (beyond this page).
    #[serde(default)]
    pub total_results: Option<u64>,

    /// Works on this page.
    #[serde(default)]
    pub items: Vec<Work>,
}

/// One Crossref work.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Work {
    /// Digital Object Identifier.
    #[serde(rename = "DOI", default)]
    pub doi: Option<String>,

    /// Titles (first is used).
    #[serde(default)]
    pub title: Vec<String>,

    /// Journal titles (first is used).
    #[serde(default)]
    pub container_title: Vec<String>,

    /// Authors.
    #[serde(default)]
    pub author: Vec<Contributor>,

    /// JATS-tagged abstract.
    #[serde(rename = "abstract", default)]
    pub abstract_jats: Option<String>,

    /// Landing page URL.
    #[serde(rename = "URL", default)]
    pub url: Option<String>,

    /// Earliest publication date.
    #[serde(default)]
    pub issued: Option<DateParts>,

    /// Record creation timestamp.
    #[serde(default)]
    pub created: Option<Timestamp>,
}

impl Work {
    /// First title, if any.
    #[must_use]
    pub fn first_title(&self) -> Option<&str> {
        self.title.first().map(String::as_str)
    }

    /// First journal title, if any.
    #[must_use]
    pub fn journal(&self) -> Option<&str> {
        self.container_title.first().map(String::as_str)
    }

    /// Issued date, falling back to the creation date.
    #[must_use]
    pub fn published(&self) -> Option<NaiveDate> {
        self.issued
            .as_ref()
            .and_then(DateParts::to_date)
            .or_else(|| self.created.as_ref().and_then(Timestamp::to_date))
    }

    /// "Given Family" display names.
    #[must_use]
    pub fn author_names(&self) -> Vec<String> {
        self.author.iter().map(Contributor::display_name).filter(|n| !n.is_empty()).collect()
    }
}

/// Author entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Contributor {
    /// Given name.
    #[serde(default)]
    pub given: Option<String>,

    /// Family name.
    #[serde(default)]
    pub family: Option<String>,

    /// Consortium or organisation name.
    #[serde(default)]
    pub name: Option<String>,
}

impl Contributor {
    /// Joined display name.
    #[must_use]
    pub fn display_name(&self) -> String {
        let joined = [self.given.as_deref(), self.family.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if joined.trim().is_empty() {
            self.name.clone().unwrap_or_default()
        } else {
            joined.trim().to_string()
        }
    }
}

/// `{"date-parts": [[2024, 3, 7]]}`; month and day may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DateParts {
    /// Nested date parts; Crossref sends `null` entries for unknown dates.
    #[serde(default)]
    pub date_parts: Vec<Vec<Option<i32>>>,
}

impl DateParts {
    /// Convert to a date, defaulting missing month/day to 1.
    #[must_use]
    pub fn to_date(&self) -> Option<NaiveDate> {
        let parts = self.date_parts.first()?;
        let year = (*parts.first()?)?;
        let month = parts.get(1).copied().flatten().unwrap_or(1);
        let day = parts.get(2).copied().flatten().unwrap_or(1);
        NaiveDate::from_ymd_opt(year, u32::try_from(month).ok()?, u32::try_from(day).ok()?)
    }
}

/// `{"date-time": "2024-03-07T10:00:00Z"}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Timestamp {
    /// RFC 3339 timestamp.
    #[serde(default)]
    pub date_time: Option<String>,
}

impl Timestamp {
    /// Date part of the timestamp.
    #[must_use]
    pub fn to_date(&self) -> Option<NaiveDate> {
        let raw = self.date_time.as_deref()?;
        NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok()
    }
}
