use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::EmailError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

/// Outcome of a single send. Backends report failure here instead of erroring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EmailResult {
    pub fn sent(message_id: impl Into<String>) -> Self {
        EmailResult { success: true, message_id: Some(message_id.into()), error: None }
    }

    pub fn failed(error: impl ToString) -> Self {
        EmailResult { success: false, message_id: None, error: Some(error.to_string()) }
    }
}

impl From<Result<String, EmailError>> for EmailResult {
    fn from(result: Result<String, EmailError>) -> Self {
        match result {
            Ok(id) => EmailResult::sent(id),
            Err(e) => EmailResult::failed(e),
        }
    }
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Delivers one message
    async fn send(&self, message: &EmailMessage) -> EmailResult;

    /// Short backend name for logs and diagnostics
    fn provider(&self) -> &'static str;

    /// Whether the backend has what it needs to deliver mail
    fn is_configured(&self) -> bool;
}

#[async_trait]
impl<T> EmailSender for Arc<T>
where
    T: EmailSender + ?Sized,
{
    async fn send(&self, message: &EmailMessage) -> EmailResult {
        (**self).send(message).await
    }

    fn provider(&self) -> &'static str {
        (**self).provider()
    }

    fn is_configured(&self) -> bool {
        (**self).is_configured()
    }
}
