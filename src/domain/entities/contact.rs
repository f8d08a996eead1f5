use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::{Validate, ValidationError};

static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-ZÀ-ÿ\s'-]+$").expect("name pattern is valid")
});

/// How the submitter would like to be contacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredMethod {
    Email,
    Phone,
    Meeting,
    Linkedin,
}

impl PreferredMethod {
    pub fn label(&self) -> &'static str {
        match self {
            PreferredMethod::Email => "Email",
            PreferredMethod::Phone => "Phone call",
            PreferredMethod::Meeting => "Meeting",
            PreferredMethod::Linkedin => "LinkedIn",
        }
    }
}

impl FromStr for PreferredMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(PreferredMethod::Email),
            "phone" => Ok(PreferredMethod::Phone),
            "meeting" => Ok(PreferredMethod::Meeting),
            "linkedin" => Ok(PreferredMethod::Linkedin),
            _ => Err(()),
        }
    }
}

impl fmt::Display for PreferredMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PreferredMethod::Email => "email",
            PreferredMethod::Phone => "phone",
            PreferredMethod::Meeting => "meeting",
            PreferredMethod::Linkedin => "linkedin",
        };
        write!(f, "{s}")
    }
}

fn validate_preferred_method(value: &str) -> Result<(), ValidationError> {
    value.parse::<PreferredMethod>().map(|_| ()).map_err(|_| {
        let mut error = ValidationError::new("preferred_method");
        error.message = Some("Preferred method must be one of email, phone, meeting, linkedin".into());
        error
    })
}

/// Missing, `null` or non-string values decode to an empty string.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

/// Any non-null value is kept, rendered as text when it is not a string.
fn lenient_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// Raw body of `POST /api/contact`.
///
/// Schema fields decode leniently so that a missing or mistyped field surfaces
/// as a field-level validation error instead of a decoding failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(
        length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"),
        regex(path = *NAME_PATTERN, message = "Name can only contain letters, spaces, hyphens and apostrophes")
    )]
    pub name: String,

    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(
        email(message = "Please enter a valid email address"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,

    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(length(min = 10, max = 5000, message = "Message must be between 10 and 5000 characters"))]
    pub message: String,

    #[serde(default, deserialize_with = "lenient_string")]
    #[validate(custom(function = "validate_preferred_method"))]
    pub preferred_method: String,

    #[serde(
        default,
        deserialize_with = "lenient_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub honeypot: Option<String>,

    /// Epoch milliseconds recorded by the browser when the form was rendered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
}

impl ContactRequest {
    /// Applies the transforms that run ahead of validation.
    pub fn normalized(mut self) -> Self {
        self.message = self.message.trim().to_string();
        self.email = self.email.trim().to_string();
        self
    }
}

/// A contact message that has passed schema validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
    pub preferred_method: PreferredMethod,
}

impl ContactSubmission {
    /// Validates `request` and builds the immutable submission from it.
    pub fn try_from_request(request: ContactRequest) -> Result<Self, validator::ValidationErrors> {
        let request = request.normalized();
        request.validate()?;

        let preferred_method = request.preferred_method.parse().map_err(|_| {
            let mut errors = validator::ValidationErrors::new();
            errors.add("preferred_method", ValidationError::new("preferred_method"));
            errors
        })?;

        Ok(ContactSubmission {
            name: request.name,
            email: request.email.to_lowercase(),
            message: request.message,
            preferred_method,
        })
    }
}

/// Context attached to an accepted submission for the operator's email.
#[derive(Debug, Clone)]
pub struct SubmissionMeta {
    pub id: Uuid,
    pub received_at: DateTime<Utc>,
    pub client_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpamVerdict {
    pub is_spam: bool,
    pub reason: Option<String>,
}

impl SpamVerdict {
    pub fn clean() -> Self {
        SpamVerdict { is_spam: false, reason: None }
    }

    pub fn spam(reason: impl Into<String>) -> Self {
        SpamVerdict { is_spam: true, reason: Some(reason.into()) }
    }
}

/// What the pipeline did with a submission that reached the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactOutcome {
    Accepted { id: Uuid },
    Discarded { reason: String },
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}
