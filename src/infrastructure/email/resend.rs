use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::{
    errors::EmailError,
    repositories::email::{EmailMessage, EmailResult, EmailSender},
    settings::AppConfig,
};

#[derive(Serialize)]
struct ResendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

#[derive(Deserialize)]
struct ResendResponse {
    id: String,
}

/// Sends mail through the Resend HTTP API.
pub struct ResendSender {
    client: Client,
    api_key: Zeroizing<String>,
    api_url: String,
    from: String,
}

impl ResendSender {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(config.email_timeout())
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });

        ResendSender {
            client,
            api_key: Zeroizing::new(config.resend_api_key.clone()),
            api_url: config.resend_api_url.clone(),
            from: config.from_email.clone(),
        }
    }

    async fn deliver(&self, message: &EmailMessage) -> Result<String, EmailError> {
        if self.api_key.is_empty() {
            return Err(EmailError::NotConfigured("missing Resend API key".into()));
        }

        let body = ResendRequest {
            from: &self.from,
            to: [&message.to],
            subject: &message.subject,
            html: &message.html,
            text: &message.text,
            reply_to: message.reply_to.as_deref(),
        };

        let response = self.client
            .post(&self.api_url)
            .bearer_auth(self.api_key.as_str())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmailError::Rejected { status: status.as_u16(), body });
        }

        let parsed: ResendResponse = response.json().await?;
        Ok(parsed.id)
    }
}

#[async_trait]
impl EmailSender for ResendSender {
    async fn send(&self, message: &EmailMessage) -> EmailResult {
        self.deliver(message).await.into()
    }

    fn provider(&self) -> &'static str {
        "resend"
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.from.is_empty()
    }
}
