// Operational alert publishing
//
// Alerts are advisory. A failed publish is logged and never turns a
// health probe into an error of its own.

use async_trait::async_trait;
use serde_json::json;

#[async_trait]
pub trait AlertPublisher: Send + Sync {
    async fn publish(&self, subject: &str, message: &str);
}

/// POSTs alerts as JSON to a configured webhook.
pub struct WebhookAlerter {
    client: reqwest::Client,
    url: String,
}

impl WebhookAlerter {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl AlertPublisher for WebhookAlerter {
    async fn publish(&self, subject: &str, message: &str) {
        let payload = json!({
            "subject": subject,
            "message": message,
        });

        let outcome = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .and_then(|r| r.error_for_status());

        match outcome {
            Ok(_) => tracing::info!(subject, "alert published"),
            Err(e) => tracing::error!(subject, error = %e, "alert publish failed"),
        }
    }
}

/// Fallback when no webhook is configured: alerts land in the log.
pub struct LogAlerter;

#[async_trait]
impl AlertPublisher for LogAlerter {
    async fn publish(&self, subject: &str, message: &str) {
        tracing::warn!(subject, message, "alert");
    }
}
