use std::sync::Arc;

use crate::{
    repositories::email::EmailSender,
    settings::{AppConfig, EmailProvider},
};

pub mod console;
pub mod resend;
pub mod templates;
pub mod unimplemented;

use console::ConsoleSender;
use resend::ResendSender;
use unimplemented::UnimplementedSender;

/// Builds the backend selected by `email_provider`.
pub fn build_email_sender(config: &AppConfig) -> Arc<dyn EmailSender> {
    match config.email_provider {
        EmailProvider::Resend => Arc::new(ResendSender::new(config)),
        EmailProvider::Console => Arc::new(ConsoleSender::new(&config.from_email)),
        EmailProvider::Sendgrid => Arc::new(UnimplementedSender::new("sendgrid")),
        EmailProvider::Smtp => Arc::new(UnimplementedSender::new("smtp")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::test_config;

    #[test]
    fn provider_selection_follows_config() {
        let mut config = test_config();
        assert_eq!(build_email_sender(&config).provider(), "console");

        config.email_provider = EmailProvider::Smtp;
        let sender = build_email_sender(&config);
        assert_eq!(sender.provider(), "smtp");
        assert!(!sender.is_configured());

        config.email_provider = EmailProvider::Resend;
        config.resend_api_key = "re_test_key".into();
        let sender = build_email_sender(&config);
        assert_eq!(sender.provider(), "resend");
        assert!(sender.is_configured());
    }
}
