//! Read-only HTTP client for Crossref, arXiv and Altmetric.
//!
//! Provides an async HTTP client with:
//! - Connection pooling via reqwest
//! - Retry middleware with exponential backoff for transient GET failures
//! - Uniform status-code mapping into [`ClientError`]
//!
//! Calls are issued one at a time by the pipeline; nothing here is shared
//! across tasks.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{
    Retryable, RetryableStrategy, RetryTransientMiddleware, default_on_request_failure,
    default_on_request_success, policies::ExponentialBackoff,
};

use crate::config::{Config, api, digest, queries};
use crate::error::{ClientError, ClientResult};
use crate::models::{AltmetricRecord, Identifier, LookbackWindow, WorksResponse};

/// Client for the scholarly metadata, preprint and metrics services.
#[derive(Clone)]
pub struct ScholarlyClient {
    /// HTTP client with middleware.
    client: ClientWithMiddleware,

    /// Crossref base URL.
    crossref_api_url: String,

    /// arXiv base URL.
    arxiv_api_url: String,

    /// Altmetric base URL.
    altmetric_api_url: String,

    /// Crossref polite-pool contact.
    crossref_mailto: Option<String>,
}

impl ScholarlyClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> ClientResult<Self> {
        let client = Client::builder()
            .user_agent(api::USER_AGENT)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .gzip(true)
            .build()?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_millis(1200), Duration::from_secs(10))
            .build_with_max_retries(config.source_retries);

        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy_and_strategy(retry_policy, NoRateLimitWait))
            .build();

        Ok(Self {
            client,
            crossref_api_url: config.crossref_api_url.clone(),
            arxiv_api_url: config.arxiv_api_url.clone(),
            altmetric_api_url: config.altmetric_api_url.clone(),
            crossref_mailto: config.crossref_mailto.clone(),
        })
    }

    /// Query Crossref for journal articles inside the window.
    ///
    /// Single page of up to 200 rows, restricted to journal articles that carry
    /// an abstract.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn crossref_works(&self, window: &LookbackWindow) -> ClientResult<WorksResponse> {
        let url = format!("{}/works", self.crossref_api_url);

        let mut params = vec![
            (
                "filter".to_string(),
                format!(
                    "from-pub-date:{},until-pub-date:{},type:journal-article,has-abstract:true",
                    window.since.format("%Y-%m-%d"),
                    window.until.format("%Y-%m-%d"),
                ),
            ),
            ("query.bibliographic".to_string(), queries::CROSSREF.to_string()),
            (
                "select".to_string(),
                "DOI,title,container-title,author,abstract,URL,created,issued".to_string(),
            ),
            ("rows".to_string(), digest::CROSSREF_ROWS.to_string()),
        ];

        if let Some(ref mailto) = self.crossref_mailto {
            params.push(("mailto".to_string(), mailto.clone()));
        }

        let response = self.get(&url, &params).await?;
        let value: serde_json::Value = response.json().await?;
        serde_json::from_value(value).map_err(ClientError::from)
    }

    /// Query arXiv for ML x biology preprints submitted inside the window,
    /// newest first.
    ///
    /// Returns the raw Atom document. The `submittedDate` range narrows the
    /// search server-side; callers still check each entry's date.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn arxiv_query(&self, window: &LookbackWindow) -> ClientResult<String> {
        let url = format!("{}/query", self.arxiv_api_url);

        let params = vec![
            ("search_query".to_string(), arxiv_search_query(window)),
            ("sortBy".to_string(), "submittedDate".to_string()),
            ("sortOrder".to_string(), "descending".to_string()),
            ("max_results".to_string(), digest::ARXIV_MAX_RESULTS.to_string()),
        ];

        let response = self.get(&url, &params).await?;
        Ok(response.text().await?)
    }

    /// Look up the Altmetric record for one identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] when Altmetric has no record, or any
    /// other error on API failure.
    pub async fn altmetric(&self, identifier: &Identifier) -> ClientResult<AltmetricRecord> {
        let url = format!("{}/{}", self.altmetric_api_url, identifier.altmetric_path());
        let params: Vec<(String, String)> = vec![];

        let response = self.get(&url, &params).await?;
        let value: serde_json::Value = response.json().await?;
        serde_json::from_value(value).map_err(ClientError::from)
    }

    /// Make a GET request.
    async fn get(&self, url: &str, params: &[(String, String)]) -> ClientResult<reqwest::Response> {
        tracing::trace!(url, "GET");

        let response = self.client.get(url).query(params).send().await?;

        Self::handle_response(response).await
    }

    /// Map API response status codes to errors.
    async fn handle_response(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        match status.as_u16() {
            429 => {
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60);

                Err(ClientError::rate_limited(retry_after))
            }
            404 => {
                let resource = response.url().path().to_string();
                Err(ClientError::not_found(resource))
            }
            500..=599 => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::server(status.as_u16(), text))
            }
            _ => {
                let text = response.text().await.unwrap_or_default();
                Err(ClientError::UnexpectedStatus { status: status.as_u16(), message: text })
            }
        }
    }
}

/// arXiv search query restricted to submissions inside `window` (whole days, UTC).
#[must_use]
pub fn arxiv_search_query(window: &LookbackWindow) -> String {
    format!(
        "({}) AND submittedDate:[{}0000 TO {}2359]",
        queries::ARXIV,
        window.since.format("%Y%m%d"),
        window.until.format("%Y%m%d"),
    )
}

/// Default transient classification, except that 429 is final: a rate-limited
/// source is reported, not waited on.
struct NoRateLimitWait;

impl RetryableStrategy for NoRateLimitWait {
    fn handle(&self, res: &Result<reqwest::Response, reqwest_middleware::Error>) -> Option<Retryable> {
        match res {
            Ok(response) if response.status() == StatusCode::TOO_MANY_REQUESTS => Some(Retryable::Fatal),
            Ok(response) => default_on_request_success(response),
            Err(error) => default_on_request_failure(error),
        }
    }
}

impl std::fmt::Debug for ScholarlyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScholarlyClient")
            .field("crossref_api_url", &self.crossref_api_url)
            .field("arxiv_api_url", &self.arxiv_api_url)
            .field("altmetric_api_url", &self.altmetric_api_url)
            .finish()
    }
}
