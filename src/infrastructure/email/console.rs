use async_trait::async_trait;
use uuid::Uuid;

use crate::repositories::email::{EmailMessage, EmailResult, EmailSender};

/// Development backend: writes the message to the log and reports success.
pub struct ConsoleSender {
    from: String,
}

impl ConsoleSender {
    pub fn new(from: &str) -> Self {
        ConsoleSender { from: from.to_string() }
    }
}

#[async_trait]
impl EmailSender for ConsoleSender {
    async fn send(&self, message: &EmailMessage) -> EmailResult {
        let id = format!("console-{}", Uuid::new_v4());
        tracing::info!(
            id = %id,
            from = %self.from,
            to = %message.to,
            reply_to = ?message.reply_to,
            subject = %message.subject,
            "📧 Email (console backend)\n{}",
            message.text
        );
        EmailResult::sent(id)
    }

    fn provider(&self) -> &'static str {
        "console"
    }

    fn is_configured(&self) -> bool {
        !self.from.is_empty()
    }
}
