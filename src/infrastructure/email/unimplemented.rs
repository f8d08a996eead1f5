use async_trait::async_trait;

use crate::{
    errors::EmailError,
    repositories::email::{EmailMessage, EmailResult, EmailSender},
};

/// Placeholder for providers that are selectable in config but not wired up.
pub struct UnimplementedSender {
    provider: &'static str,
}

impl UnimplementedSender {
    pub fn new(provider: &'static str) -> Self {
        UnimplementedSender { provider }
    }
}

#[async_trait]
impl EmailSender for UnimplementedSender {
    async fn send(&self, message: &EmailMessage) -> EmailResult {
        tracing::warn!(provider = self.provider, to = %message.to, "Email backend not implemented");
        EmailResult::failed(EmailError::NotImplemented(self.provider.to_string()))
    }

    fn provider(&self) -> &'static str {
        self.provider
    }

    fn is_configured(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_rt::test]
    async fn always_reports_failure() {
        let sender = UnimplementedSender::new("sendgrid");
        let message = EmailMessage {
            to: "a@b.com".into(),
            subject: "s".into(),
            html: "<p>h</p>".into(),
            text: "h".into(),
            reply_to: None,
        };

        let result = sender.send(&message).await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("sendgrid backend is not implemented"));
    }
}
