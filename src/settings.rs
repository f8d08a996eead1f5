use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr, time::Duration};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

/// Which backend delivers outbound mail.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmailProvider {
    Resend,
    Console,
    Sendgrid,
    Smtp,
}

impl fmt::Display for EmailProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EmailProvider::Resend => "resend",
            EmailProvider::Console => "console",
            EmailProvider::Sendgrid => "sendgrid",
            EmailProvider::Smtp => "smtp",
        };
        write!(f, "{s}")
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default = "default_site_name")]
    pub site_name: String,

    #[serde(default)]
    pub operator_email: String,

    #[serde(default)]
    pub from_email: String,

    #[serde(default = "default_email_provider")]
    pub email_provider: EmailProvider,

    #[serde(default)]
    pub resend_api_key: String,

    #[serde(default = "default_resend_api_url")]
    pub resend_api_url: String,

    #[serde(default = "default_email_timeout")]
    pub email_timeout_secs: u64,

    #[serde(default = "default_true")]
    pub auto_response_enabled: bool,

    #[serde(default = "default_rate_window_max")]
    pub rate_window_max: u32,

    #[serde(default = "default_rate_window_minutes")]
    pub rate_window_minutes: i64,

    #[serde(default = "default_rate_daily_max")]
    pub rate_daily_max: u32,

    #[serde(default = "default_rate_daily_hours")]
    pub rate_daily_hours: i64,

    #[serde(default = "default_min_submit_millis")]
    pub min_submit_millis: i64,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Portfolio-Contact-API".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_site_name() -> String {
    "Portfolio".to_string()
}
fn default_email_provider() -> EmailProvider {
    EmailProvider::Console
}
fn default_resend_api_url() -> String {
    "https://api.resend.com/emails".to_string()
}
fn default_email_timeout() -> u64 {
    10
}
fn default_true() -> bool {
    true
}
fn default_rate_window_max() -> u32 {
    5
}
fn default_rate_window_minutes() -> i64 {
    15
}
fn default_rate_daily_max() -> u32 {
    20
}
fn default_rate_daily_hours() -> i64 {
    24
}
fn default_min_submit_millis() -> i64 {
    3000
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .ignore_empty(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.operator_email.trim().is_empty() {
            errors.push("OPERATOR_EMAIL cannot be empty");
        }
        if self.from_email.trim().is_empty() {
            errors.push("FROM_EMAIL cannot be empty");
        }
        if self.email_provider == EmailProvider::Resend && self.resend_api_key.trim().is_empty() {
            errors.push("RESEND_API_KEY must be set when EMAIL_PROVIDER is resend");
        }
        if self.rate_window_max == 0 || self.rate_daily_max == 0 {
            errors.push("Rate limits must be greater than zero");
        }
        if self.rate_window_minutes <= 0 || self.rate_daily_hours <= 0 {
            errors.push("Rate limit windows must be positive");
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn email_timeout(&self) -> Duration {
        Duration::from_secs(self.email_timeout_secs)
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("site_name", &self.site_name)
            .field("operator_email", &self.operator_email)
            .field("from_email", &self.from_email)
            .field("email_provider", &self.email_provider)
            .field("resend_api_key", &self.resend_api_key.redact())
            .field("resend_api_url", &self.resend_api_url)
            .field("email_timeout_secs", &self.email_timeout_secs)
            .field("auto_response_enabled", &self.auto_response_enabled)
            .field("rate_window_max", &self.rate_window_max)
            .field("rate_window_minutes", &self.rate_window_minutes)
            .field("rate_daily_max", &self.rate_daily_max)
            .field("rate_daily_hours", &self.rate_daily_hours)
            .field("min_submit_millis", &self.min_submit_millis)
            .finish()
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "Portfolio Contact Test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        worker_count: 1,
        cors_allowed_origins: vec!["https://example.com".to_string()],
        site_name: "Portfolio".to_string(),
        operator_email: "owner@example.com".to_string(),
        from_email: "noreply@example.com".to_string(),
        email_provider: EmailProvider::Console,
        resend_api_key: String::new(),
        resend_api_url: default_resend_api_url(),
        email_timeout_secs: 2,
        auto_response_enabled: true,
        rate_window_max: 5,
        rate_window_minutes: 15,
        rate_daily_max: 20,
        rate_daily_hours: 24,
        min_submit_millis: 3000,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resend_without_api_key_is_rejected() {
        let mut config = test_config();
        config.email_provider = EmailProvider::Resend;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("RESEND_API_KEY"));
    }

    #[test]
    fn wildcard_cors_is_rejected_in_production() {
        let mut config = test_config();
        config.env = AppEnvironment::Production;
        config.cors_allowed_origins = vec!["https://a.com, *".to_string()];

        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let mut config = test_config();
        config.resend_api_key = "re_live_secret".to_string();

        let printed = format!("{:?}", config);
        assert!(!printed.contains("re_live_secret"));
        assert!(printed.contains("[REDACTED]"));
    }

    #[test]
    fn cors_origins_split_and_skip_blanks() {
        let mut config = test_config();
        config.cors_allowed_origins = vec![
            "https://a.example, https://b.example".to_string(),
            " ".to_string(),
        ];

        assert_eq!(config.cors_origins(), vec!["https://a.example", "https://b.example"]);
    }
}
