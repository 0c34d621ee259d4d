//! Delivers emails by posting them to a webhook.

use moments_core::error::{MomentsError, MomentsResult};
use moments_core::notify::Notifier;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct EmailPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    to: Option<&'a str>,
    subject: &'a str,
    body: &'a str,
}

pub struct WebhookNotifier {
    url: String,
    recipient: Option<String>,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, recipient: Option<String>) -> Self {
        WebhookNotifier {
            url: url.into(),
            recipient,
            client: reqwest::Client::new(),
        }
    }
}

impl Notifier for WebhookNotifier {
    async fn send_email(&self, subject: &str, body: &str) -> MomentsResult<bool> {
        let payload = EmailPayload {
            to: self.recipient.as_deref(),
            subject,
            body,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| MomentsError::Provider(format!("Failed to reach notify webhook: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "notify webhook refused the email");
        }

        Ok(status.is_success())
    }
}
