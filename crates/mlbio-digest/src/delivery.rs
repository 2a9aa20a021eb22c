//! Webhook delivery.
//!
//! Exactly one POST per run. There is no retry layer here: a failed POST ends
//! the run, and re-running the job posts the same digest again.

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;

use crate::config::{Config, api};
use crate::error::{DigestError, DigestResult};
use crate::models::DigestMessage;

/// Longest response body kept in a delivery error.
const MAX_ERROR_BODY: usize = 2000;

/// Outcome of a successful delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReport {
    /// HTTP status returned by the webhook.
    pub status: u16,
    /// Number of digest entries posted.
    pub items: usize,
}

/// Client for the Slack Incoming Webhook.
#[derive(Clone)]
pub struct WebhookClient {
    client: Client,
    url: String,
}

impl WebhookClient {
    /// Create a webhook client from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> DigestResult<Self> {
        let client = Client::builder()
            .user_agent(api::USER_AGENT)
            .timeout(config.delivery_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self { client, url: config.webhook_url.clone() })
    }

    /// POST the message once.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::Serialization`] if the payload cannot be encoded,
    /// [`DigestError::Delivery`] on any status >= 300 and
    /// [`DigestError::Client`] on transport failure.
    pub async fn post(&self, message: &DigestMessage, items: usize) -> DigestResult<DeliveryReport> {
        let payload = serde_json::to_vec(message)?;
        tracing::debug!(bytes = payload.len(), "Posting digest");

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await?;
        let status = response.status();

        if status.as_u16() >= 300 {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(MAX_ERROR_BODY).collect();
            return Err(DigestError::delivery(status.as_u16(), body));
        }

        Ok(DeliveryReport { status: status.as_u16(), items })
    }
}

impl std::fmt::Debug for WebhookClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookClient").finish_non_exhaustive()
    }
}
