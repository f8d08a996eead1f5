use std::fmt;

use actix_web::{
    error::ResponseError,
    http::{header::{self, ContentType}, StatusCode},
    HttpResponse
};
use derive_more::Display;
use serde::Serialize;
use validator::ValidationErrors;

#[derive(Debug)]
pub enum AppError {
    RateLimited { reset_time: i64, retry_after_secs: u64 },
    InvalidBody(String),
    HoneypotFilled,
    SubmittedTooFast { elapsed_ms: i64 },
    ValidationError(Vec<FieldError>),
    NotFound,
    MethodNotAllowed,
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::RateLimited { retry_after_secs, .. } => {
                write!(f, "rate limited, retry after {}s", retry_after_secs)
            }
            AppError::InvalidBody(msg) => write!(f, "Invalid request body: {}", msg),
            AppError::HoneypotFilled => write!(f, "Honeypot field filled"),
            AppError::SubmittedTooFast { elapsed_ms } => {
                write!(f, "Submitted {}ms after form load", elapsed_ms)
            }
            AppError::ValidationError(errors) => {
                let messages = errors.iter()
                    .map(|e| format!("{}:{}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "validation error: {}", messages)
            }
            AppError::NotFound => write!(f, "Not found"),
            AppError::MethodNotAllowed => write!(f, "Method not allowed"),
            AppError::InternalError(msg) => write!(f, "Internal server error: {}", msg)
        }
    }
}

impl AppError {
    /// The message shown to the caller. Abuse rejections stay generic.
    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::RateLimited { .. } => "Too many requests. Please try again later.",
            AppError::InvalidBody(_) => "Invalid request body.",
            AppError::HoneypotFilled => "Invalid submission detected.",
            AppError::SubmittedTooFast { .. } => {
                "Submission too fast. Please take your time filling out the form."
            }
            AppError::ValidationError(_) => "Invalid form data.",
            AppError::NotFound => "Not found.",
            AppError::MethodNotAllowed => "Method not allowed.",
            AppError::InternalError(_) => "An unexpected error occurred. Please try again later.",
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        builder.insert_header(ContentType::json());

        let body = match self {
            AppError::RateLimited { reset_time, retry_after_secs } => {
                builder.insert_header((header::RETRY_AFTER, retry_after_secs.to_string()));
                serde_json::json!({
                    "success": false,
                    "error": self.public_message(),
                    "resetTime": reset_time,
                })
            }
            AppError::ValidationError(errors) => {
                serde_json::json!({
                    "success": false,
                    "error": self.public_message(),
                    "details": errors,
                })
            }
            AppError::MethodNotAllowed => {
                builder.insert_header((header::ALLOW, "POST, OPTIONS"));
                serde_json::json!({"success": false, "error": self.public_message()})
            }
            _ => {
                serde_json::json!({"success": false, "error": self.public_message()})
            }
        };

        builder.json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            AppError::HoneypotFilled => StatusCode::BAD_REQUEST,
            AppError::SubmittedTooFast { .. } => StatusCode::BAD_REQUEST,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut field_errors: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(|e| FieldError {
                    field: camel_case(field),
                    message: e
                        .message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "Invalid value".to_string()),
                })
            })
            .collect();

        // field_errors() is a HashMap, keep the response stable
        field_errors.sort_by(|a, b| a.field.cmp(&b.field));

        AppError::ValidationError(field_errors)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidBody(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Failures raised by an email backend before it produces a result.
#[derive(Debug, Display)]
pub enum EmailError {
    #[display("{_0} backend is not implemented")]
    NotImplemented(String),

    #[display("Email backend is not configured: {_0}")]
    NotConfigured(String),

    #[display("Email request failed: {_0}")]
    Transport(String),

    #[display("Email provider rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[display("Email dispatch timed out after {_0}ms")]
    Timeout(u64),
}

impl From<reqwest::Error> for EmailError {
    fn from(err: reqwest::Error) -> Self {
        EmailError::Transport(err.to_string())
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_cases_snake_field_names() {
        assert_eq!(camel_case("preferred_method"), "preferredMethod");
        assert_eq!(camel_case("name"), "name");
    }

    #[test]
    fn rate_limited_response_carries_retry_after() {
        let err = AppError::RateLimited { reset_time: 1_700_000_000_000, retry_after_secs: 42 };
        let res = err.error_response();

        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(res.headers().get(header::RETRY_AFTER).unwrap(), "42");
    }

    #[test]
    fn internal_error_hides_details() {
        let err = AppError::InternalError("db exploded".into());
        assert!(!err.public_message().contains("db"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
