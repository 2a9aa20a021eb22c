//! Configuration for the ML x biology digest job.

use std::time::Duration;

use crate::error::{DigestError, DigestResult};

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Crossref REST API base URL.
    pub const CROSSREF_API: &str = "https://api.crossref.org";

    /// arXiv export API base URL.
    pub const ARXIV_API: &str = "https://export.arxiv.org/api";

    /// Altmetric public API base URL.
    pub const ALTMETRIC_API: &str = "https://api.altmetric.com/v1";

    /// Request timeout for read-only source and metrics calls.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(25);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Timeout for the single webhook POST.
    pub const DELIVERY_TIMEOUT: Duration = Duration::from_secs(20);

    /// Extra attempts for transient failures on read-only GETs (3 attempts total).
    pub const SOURCE_RETRIES: u32 = 2;

    /// User agent sent to every service.
    pub const USER_AGENT: &str = concat!("mlbio-digest/", env!("CARGO_PKG_VERSION"));
}

/// Digest shape constants.
pub mod digest {
    /// Lookback window in days.
    pub const LOOKBACK_DAYS: i64 = 30;

    /// Number of journal articles kept.
    pub const JOURNAL_CAP: usize = 5;

    /// Number of preprints kept.
    pub const PREPRINT_CAP: usize = 2;

    /// Crossref page size (single page, no cursor).
    pub const CROSSREF_ROWS: u32 = 200;

    /// arXiv page size (single page).
    pub const ARXIV_MAX_RESULTS: u32 = 100;

    /// Shown when no summary can be extracted from an abstract.
    pub const SUMMARY_PLACEHOLDER: &str = "Summary unavailable.";

    /// Header text of the posted message.
    pub const TITLE: &str = "ML ↔ Biology: Last 30 Days (Top 5 + 2 arXiv)";
}

/// Accepted journal titles (Nature and Cell families).
pub mod venues {
    pub const TOP_VENUES: &[&str] = &[
        "Nature",
        "Nature Medicine",
        "Nature Biotechnology",
        "Nature Methods",
        "Nature Genetics",
        "Nature Chemical Biology",
        "Nature Machine Intelligence",
        "Nature Communications",
        "Nature Aging",
        "Nature Computational Science",
        "Cell",
        "Cell Reports",
        "Cell Systems",
        "Immunity",
        "Cancer Cell",
        "Molecular Cell",
        "Cell Genomics",
        "Cell Host & Microbe",
    ];

    /// Exact, case-sensitive match against the allow-list.
    #[must_use]
    pub fn is_accepted(venue: &str) -> bool {
        TOP_VENUES.contains(&venue)
    }
}

/// Search queries sent to the sources.
pub mod queries {
    /// Crossref `query.bibliographic` value.
    pub const CROSSREF: &str = r#"("machine learning" OR "deep learning" OR "artificial intelligence" OR "neural network") (biology OR biomedical OR genomics OR proteomics OR immunology OR cancer)"#;

    /// arXiv `search_query` value (ML x biology cross-listing).
    pub const ARXIV: &str = r#"((ti:"biology" OR ti:"biomedical" OR ti:"genomics" OR ti:"proteomics" OR ti:"protein" OR ti:"immunology" OR ti:"cancer" OR abs:"biology" OR abs:"genomics" OR abs:"proteomics")) AND (cat:cs.LG OR cat:stat.ML OR cat:q-bio.BM OR cat:q-bio.QM OR ti:"machine learning" OR ti:"deep learning")"#;
}

/// Environment variable holding the destination webhook.
pub const WEBHOOK_ENV: &str = "SLACK_WEBHOOK_URL";

/// Job configuration.
#[derive(Clone)]
pub struct Config {
    /// Slack Incoming Webhook URL (secret).
    pub webhook_url: String,

    /// Base URL for the Crossref API (for testing with mock servers).
    pub crossref_api_url: String,

    /// Base URL for the arXiv API.
    pub arxiv_api_url: String,

    /// Base URL for the Altmetric API.
    pub altmetric_api_url: String,

    /// Contact address for the Crossref polite pool.
    pub crossref_mailto: Option<String>,

    /// Request timeout for source and metrics calls.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Timeout for the webhook POST.
    pub delivery_timeout: Duration,

    /// Retries for transient GET failures.
    pub source_retries: u32,

    /// Lookback window in days.
    pub lookback_days: i64,
}

impl Config {
    /// Create a configuration for the given webhook with production endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::Config`] if the webhook is not an absolute http(s) URL.
    pub fn new(webhook_url: impl Into<String>) -> DigestResult<Self> {
        let webhook_url = validate_webhook(&webhook_url.into())?;
        Ok(Self {
            webhook_url,
            crossref_api_url: api::CROSSREF_API.to_string(),
            arxiv_api_url: api::ARXIV_API.to_string(),
            altmetric_api_url: api::ALTMETRIC_API.to_string(),
            crossref_mailto: None,
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            delivery_timeout: api::DELIVERY_TIMEOUT,
            source_retries: api::SOURCE_RETRIES,
            lookback_days: digest::LOOKBACK_DAYS,
        })
    }

    /// Create a test configuration pointing every service at one mock server.
    ///
    /// Services live under `/crossref`, `/arxiv` and `/altmetric`; the webhook is
    /// taken as given.
    #[must_use]
    pub fn for_testing(base_url: &str, webhook_url: &str) -> Self {
        Self {
            webhook_url: webhook_url.to_string(),
            crossref_api_url: format!("{}/crossref", base_url),
            arxiv_api_url: format!("{}/arxiv", base_url),
            altmetric_api_url: format!("{}/altmetric", base_url),
            crossref_mailto: None,
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            delivery_timeout: Duration::from_secs(5),
            source_retries: 0, // No retries in tests
            lookback_days: digest::LOOKBACK_DAYS,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::Config`] if `SLACK_WEBHOOK_URL` is missing, empty,
    /// or not a valid URL.
    pub fn from_env() -> DigestResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub(crate) fn from_lookup<F>(lookup: F) -> DigestResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let webhook = non_empty(WEBHOOK_ENV)
            .ok_or_else(|| DigestError::config(WEBHOOK_ENV, "environment variable is not set"))?;

        let mut config = Self::new(webhook)?;
        if let Some(url) = non_empty("CROSSREF_API_URL") {
            config.crossref_api_url = trim_base(&url);
        }
        if let Some(url) = non_empty("ARXIV_API_URL") {
            config.arxiv_api_url = trim_base(&url);
        }
        if let Some(url) = non_empty("ALTMETRIC_API_URL") {
            config.altmetric_api_url = trim_base(&url);
        }
        config.crossref_mailto = non_empty("CROSSREF_MAILTO");

        Ok(config)
    }

    /// Host of the webhook, safe to log.
    #[must_use]
    pub fn webhook_host(&self) -> Option<String> {
        url::Url::parse(&self.webhook_url).ok()?.host_str().map(str::to_string)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("webhook_host", &self.webhook_host())
            .field("crossref_api_url", &self.crossref_api_url)
            .field("arxiv_api_url", &self.arxiv_api_url)
            .field("altmetric_api_url", &self.altmetric_api_url)
            .field("lookback_days", &self.lookback_days)
            .finish()
    }
}

fn validate_webhook(raw: &str) -> DigestResult<String> {
    let raw = raw.trim();
    let parsed = url::Url::parse(raw)
        .map_err(|e| DigestError::config(WEBHOOK_ENV, format!("invalid URL: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(raw.to_string()),
        other => Err(DigestError::config(WEBHOOK_ENV, format!("unsupported scheme '{other}'"))),
    }
}

fn trim_base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_missing_webhook_is_config_error() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, DigestError::Config { .. }));
        assert!(err.to_string().contains(WEBHOOK_ENV));
    }

    #[test]
    fn test_blank_webhook_is_config_error() {
        let err = Config::from_lookup(lookup(&[(WEBHOOK_ENV, "   ")])).unwrap_err();
        assert!(matches!(err, DigestError::Config { .. }));
    }

    #[test]
    fn test_non_http_webhook_rejected() {
        assert!(Config::new("ftp://hooks.example.com/x").is_err());
        assert!(Config::new("not a url").is_err());
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = Config::from_lookup(lookup(&[
            (WEBHOOK_ENV, "https://hooks.slack.com/services/T/B/X"),
            ("CROSSREF_API_URL", "http://localhost:9000/"),
            ("CROSSREF_MAILTO", "team@example.org"),
        ]))
        .unwrap();

        assert_eq!(config.crossref_api_url, "http://localhost:9000");
        assert_eq!(config.arxiv_api_url, api::ARXIV_API);
        assert_eq!(config.crossref_mailto.as_deref(), Some("team@example.org"));
    }

    #[test]
    fn test_debug_hides_webhook() {
        let config = Config::new("https://hooks.slack.com/services/T/B/secret-token").unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("hooks.slack.com"));
    }

    #[test]
    fn test_venue_allow_list() {
        assert!(venues::is_accepted("Nature Methods"));
        assert!(venues::is_accepted("Cell Host & Microbe"));
        assert!(!venues::is_accepted("Science"));
        assert!(!venues::is_accepted("nature"));
    }
}
