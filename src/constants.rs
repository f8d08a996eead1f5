use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

pub const MAX_BODY_BYTES: usize = 64 * 1024;

pub const ACCEPTED_MESSAGE: &str =
    "Thank you for your message! I'll get back to you within 24 hours.";
/// Returned for submissions dropped as spam, so the sender cannot tell.
pub const DISCARDED_MESSAGE: &str = "Message received successfully.";
