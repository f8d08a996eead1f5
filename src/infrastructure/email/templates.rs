use ammonia::Builder;

use crate::{
    entities::contact::{ContactSubmission, SubmissionMeta},
    repositories::email::EmailMessage,
};

/// Strips markup from user input and escapes what is left for an HTML text node.
fn plain_text(value: &str) -> String {
    Builder::empty().clean(value).to_string()
}

/// Email to the site owner describing a new submission.
pub fn operator_notification(
    submission: &ContactSubmission,
    meta: &SubmissionMeta,
    operator_email: &str,
    site_name: &str,
) -> EmailMessage {
    let received = meta.received_at.to_rfc3339();
    let method = submission.preferred_method.label();

    let html = format!(
        r#"<h2>New contact form submission</h2>
<table>
  <tr><td><strong>Name</strong></td><td>{name}</td></tr>
  <tr><td><strong>Email</strong></td><td>{email}</td></tr>
  <tr><td><strong>Preferred contact</strong></td><td>{method}</td></tr>
</table>
<h3>Message</h3>
<p style="white-space: pre-wrap">{message}</p>
<hr>
<p style="color:#666;font-size:12px">Submission {id} received {received} from {address}</p>"#,
        name = plain_text(&submission.name),
        email = plain_text(&submission.email),
        method = method,
        message = plain_text(&submission.message),
        id = meta.id,
        received = received,
        address = plain_text(&meta.client_address),
    );

    let text = format!(
        "New contact form submission\n\n\
         Name: {}\n\
         Email: {}\n\
         Preferred contact: {}\n\n\
         Message:\n{}\n\n\
         --\nSubmission {} received {} from {}\n",
        submission.name,
        submission.email,
        method,
        submission.message,
        meta.id,
        received,
        meta.client_address,
    );

    EmailMessage {
        to: operator_email.to_string(),
        subject: format!("[{}] New message from {}", site_name, submission.name),
        html,
        text,
        reply_to: Some(submission.email.clone()),
    }
}

/// Confirmation sent back to the submitter, in English and Swedish.
pub fn auto_response(
    submission: &ContactSubmission,
    operator_email: &str,
    site_name: &str,
) -> EmailMessage {
    let name = plain_text(&submission.name);

    let html = format!(
        r#"<p>Hi {name},</p>
<p>Thank you for reaching out! I have received your message and will get back to you within 24 hours.</p>
<hr>
<p>Hej {name},</p>
<p>Tack för att du hör av dig! Jag har tagit emot ditt meddelande och återkommer inom 24 timmar.</p>
<p>{site}</p>"#,
        name = name,
        site = plain_text(site_name),
    );

    let text = format!(
        "Hi {0},\n\n\
         Thank you for reaching out! I have received your message and will get back to you within 24 hours.\n\n\
         --\n\n\
         Hej {0},\n\n\
         Tack för att du hör av dig! Jag har tagit emot ditt meddelande och återkommer inom 24 timmar.\n\n\
         {1}\n",
        submission.name, site_name,
    );

    EmailMessage {
        to: submission.email.clone(),
        subject: format!("Thanks for your message / Tack för ditt meddelande - {}", site_name),
        html,
        text,
        reply_to: Some(operator_email.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::contact::PreferredMethod;
    use chrono::Utc;
    use uuid::Uuid;

    fn submission() -> ContactSubmission {
        ContactSubmission {
            name: "Jane Doe".into(),
            email: "jane@x.com".into(),
            message: "<script>alert('hi')</script> let's talk".into(),
            preferred_method: PreferredMethod::Meeting,
        }
    }

    #[test]
    fn operator_email_escapes_user_content() {
        let meta = SubmissionMeta {
            id: Uuid::new_v4(),
            received_at: Utc::now(),
            client_address: "203.0.113.7".into(),
        };

        let email = operator_notification(&submission(), &meta, "owner@example.com", "Portfolio");

        assert_eq!(email.to, "owner@example.com");
        assert_eq!(email.reply_to.as_deref(), Some("jane@x.com"));
        assert!(!email.html.contains("<script>"));
        assert!(email.html.contains("Jane Doe"));
        assert!(email.text.contains("<script>"));
        assert!(email.html.contains("203.0.113.7"));
        assert!(email.html.contains("Meeting"));
        assert!(email.text.contains(&meta.id.to_string()));
    }

    #[test]
    fn auto_response_goes_to_submitter_in_both_languages() {
        let email = auto_response(&submission(), "owner@example.com", "Portfolio");

        assert_eq!(email.to, "jane@x.com");
        assert_eq!(email.reply_to.as_deref(), Some("owner@example.com"));
        assert!(email.text.contains("within 24 hours"));
        assert!(email.text.contains("inom 24 timmar"));
    }

    #[test]
    fn escaped_html_keeps_whitespace_readable() {
        let mut submission = submission();
        submission.message = "line one\nline two & a < b".into();
        let meta = SubmissionMeta {
            id: Uuid::new_v4(),
            received_at: Utc::now(),
            client_address: "unknown".into(),
        };

        let email = operator_notification(&submission, &meta, "owner@example.com", "Portfolio");

        assert!(email.html.contains("line one\nline two &amp; a &lt; b"));
        assert!(!email.html.contains("&#32;"));
    }
}
