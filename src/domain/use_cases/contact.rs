use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::timeout;
use uuid::Uuid;

use crate::{
    entities::contact::{ContactOutcome, ContactRequest, ContactSubmission, SubmissionMeta},
    errors::{AppError, EmailError},
    email::templates,
    heuristics::{detect_spam, honeypot_triggered, submitted_too_fast},
    repositories::{
        email::{EmailMessage, EmailResult, EmailSender},
        rate_limit::RateLimitStore,
    },
    settings::AppConfig,
};

/// The parts of the app config that the pipeline reads.
#[derive(Debug, Clone)]
pub struct ContactSettings {
    pub operator_email: String,
    pub site_name: String,
    pub auto_response_enabled: bool,
    pub min_submit_millis: i64,
    pub email_timeout: Duration,
}

impl From<&AppConfig> for ContactSettings {
    fn from(config: &AppConfig) -> Self {
        ContactSettings {
            operator_email: config.operator_email.clone(),
            site_name: config.site_name.clone(),
            auto_response_enabled: config.auto_response_enabled,
            min_submit_millis: config.min_submit_millis,
            email_timeout: config.email_timeout(),
        }
    }
}

/// Results of the two notification sends for one accepted submission.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    pub operator: EmailResult,
    pub auto_response: Option<EmailResult>,
}

pub struct ContactHandler<L, M>
where
    L: RateLimitStore,
    M: EmailSender,
{
    pub rate_limiter: L,
    pub mailer: M,
    pub settings: ContactSettings,
}

impl<L, M> ContactHandler<L, M>
where
    L: RateLimitStore,
    M: EmailSender,
{
    pub fn new(rate_limiter: L, mailer: M, settings: ContactSettings) -> Self {
        ContactHandler {
            rate_limiter,
            mailer,
            settings,
        }
    }

    /// Runs one contact form submission through every check and, when it
    /// survives them all, notifies the operator and the submitter.
    ///
    /// Stages run in a fixed order and the first rejection ends the request:
    /// rate limit, body decoding, honeypot, fill timing, schema, spam.
    pub async fn submit(
        &self,
        client_address: &str,
        body: &[u8],
        now: DateTime<Utc>,
    ) -> Result<ContactOutcome, AppError> {
        let now_ms = now.timestamp_millis();

        let decision = self.rate_limiter.check(client_address, now_ms);
        if !decision.allowed {
            tracing::warn!(client = %client_address, reset_time = ?decision.reset_time, "Contact submission rate limited");
            return Err(AppError::RateLimited {
                reset_time: decision.reset_time.unwrap_or(now_ms),
                retry_after_secs: decision.retry_after_secs(now_ms),
            });
        }

        let request: ContactRequest = serde_json::from_slice(body).map_err(|e| {
            tracing::warn!(client = %client_address, "Undecodable contact body: {}", e);
            AppError::from(e)
        })?;

        if honeypot_triggered(request.honeypot.as_deref()) {
            tracing::warn!(client = %client_address, "Honeypot field filled, rejecting submission");
            return Err(AppError::HoneypotFilled);
        }

        if let Some(elapsed_ms) =
            submitted_too_fast(request.start_time, now_ms, self.settings.min_submit_millis)
        {
            tracing::warn!(client = %client_address, elapsed_ms, "Contact form submitted too fast");
            return Err(AppError::SubmittedTooFast { elapsed_ms });
        }

        let submission = ContactSubmission::try_from_request(request).map_err(|e| {
            let err = AppError::from(e);
            tracing::info!(client = %client_address, "Contact form failed validation: {}", err);
            err
        })?;

        let verdict = detect_spam(&submission);
        if verdict.is_spam {
            let reason = verdict.reason.unwrap_or_else(|| "unspecified".to_string());
            tracing::warn!(client = %client_address, reason = %reason, "Discarding spam submission");
            return Ok(ContactOutcome::Discarded { reason });
        }

        let meta = SubmissionMeta {
            id: Uuid::new_v4(),
            received_at: now,
            client_address: client_address.to_string(),
        };

        let report = self.dispatch(&submission, &meta).await;
        self.log_dispatch(&meta, &report);

        tracing::info!(id = %meta.id, client = %client_address, "Contact submission accepted");
        Ok(ContactOutcome::Accepted { id: meta.id })
    }

    /// Sends both notifications concurrently; neither failure stops the other.
    async fn dispatch(&self, submission: &ContactSubmission, meta: &SubmissionMeta) -> DispatchReport {
        let notification = templates::operator_notification(
            submission,
            meta,
            &self.settings.operator_email,
            &self.settings.site_name,
        );

        let confirmation = self.settings.auto_response_enabled.then(|| {
            templates::auto_response(submission, &self.settings.operator_email, &self.settings.site_name)
        });

        let operator = self.send_bounded(&notification);
        let auto_response = async {
            match &confirmation {
                Some(message) => Some(self.send_bounded(message).await),
                None => None,
            }
        };

        let (operator, auto_response) = futures::join!(operator, auto_response);
        DispatchReport { operator, auto_response }
    }

    async fn send_bounded(&self, message: &EmailMessage) -> EmailResult {
        let limit = self.settings.email_timeout;
        match timeout(limit, self.mailer.send(message)).await {
            Ok(result) => result,
            Err(_) => EmailResult::failed(EmailError::Timeout(limit.as_millis() as u64)),
        }
    }

    fn log_dispatch(&self, meta: &SubmissionMeta, report: &DispatchReport) {
        let provider = self.mailer.provider();

        if report.operator.success {
            tracing::info!(id = %meta.id, provider, message_id = ?report.operator.message_id, "Operator notification sent");
        } else {
            tracing::error!(id = %meta.id, provider, error = ?report.operator.error, "Operator notification failed");
        }

        match &report.auto_response {
            Some(result) if result.success => {
                tracing::info!(id = %meta.id, provider, message_id = ?result.message_id, "Auto-response sent");
            }
            Some(result) => {
                tracing::error!(id = %meta.id, provider, error = ?result.error, "Auto-response failed");
            }
            None => tracing::debug!(id = %meta.id, "Auto-response disabled"),
        }
    }
}
