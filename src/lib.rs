use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod background_task;

pub use domain::{entities, heuristics, use_cases};
pub use interfaces::{handlers, middlewares, repositories, routes};
pub use infrastructure::{email, limiter, utils};

use entities::rate_limit::RateLimitPolicy;
use limiter::rate_limiter::InMemoryRateLimiter;
use repositories::email::EmailSender;
use use_cases::contact::{ContactHandler, ContactSettings};

pub struct AppState {
    pub contact_handler: AppContactHandler,
    pub config: settings::AppConfig,
}

pub type AppContactHandler = ContactHandler<InMemoryRateLimiter, Arc<dyn EmailSender>>;

impl AppState {
    pub fn new(config: &settings::AppConfig) -> Self {
        Self::with_mailer(config, email::build_email_sender(config))
    }

    /// Builds the state around an explicit email backend.
    pub fn with_mailer(config: &settings::AppConfig, mailer: Arc<dyn EmailSender>) -> Self {
        let rate_limiter = InMemoryRateLimiter::new(RateLimitPolicy::from(config));
        let contact_handler = ContactHandler::new(
            rate_limiter,
            mailer,
            ContactSettings::from(config),
        );

        AppState {
            contact_handler,
            config: config.clone(),
        }
    }
}
