//! Runtime configuration.
//!
//! Everything is read from the environment (a `.env` file is honoured) and
//! every setting has a default, so an empty environment yields a working
//! configuration pointed at a local assistant service.

use std::env;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::error::AppError;
use crate::solicitations::DEFAULT_LIST_LIMIT;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8001";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_HEALTH_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_HANDLING_TIMEOUT_SECS: u64 = 75;
pub const DEFAULT_CLIENT_AGENT: &str = "MockERP/1.0";
pub const DEFAULT_REQUEST_SOURCE: &str = "mock_erp";
pub const DEFAULT_FEEDBACK_SOURCE: &str = "mock_erp_feedback";
pub const DEFAULT_ORIGIN: &str = "mock_erp_dashboard";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" | "bunyan" => Ok(LogFormat::Json),
            other => Err(AppError::Config(format!("unknown LOG_FORMAT '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    pub format: LogFormat,
    /// Default level for this crate when `RUST_LOG` is unset
    pub level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            level: "info".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Load from the process environment (and `.env`).
    pub fn from_env() -> Result<Self, AppError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let format = match lookup("LOG_FORMAT") {
            Some(value) => value.parse()?,
            None => LogFormat::default(),
        };
        let level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(Self { format, level })
    }
}

/// Settings for talking to the assistant service
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantConfig {
    /// Base URL of the assistant service
    pub base_url: Url,
    /// Hard timeout of one outbound dispatch or feedback call
    pub request_timeout: Duration,
    /// Timeout of the health probe
    pub health_timeout: Duration,
    /// Overall time a caller waits for a dispatch, queueing included
    pub handling_timeout: Duration,
    /// `User-Agent` of outbound calls
    pub client_agent: String,
    /// `X-Request-Source` of dispatches
    pub request_source: String,
    /// `X-Request-Source` of feedback submissions
    pub feedback_source: String,
    /// Origin tag in feedback bodies and context snapshots
    pub origin: String,
    /// Default number of records listed by the store
    pub list_limit: usize,
    pub environment: String,
}

impl AssistantConfig {
    /// Load from the process environment (and `.env`).
    pub fn from_env() -> Result<Self, AppError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let seconds = |key: &str, default: u64| -> Result<Duration, AppError> {
            let secs = match lookup(key) {
                Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                    AppError::Config(format!("{} must be a number of seconds: {}", key, e))
                })?,
                None => default,
            };
            if secs == 0 {
                return Err(AppError::Config(format!("{} must be greater than zero", key)));
            }
            Ok(Duration::from_secs(secs))
        };

        let list_limit = match lookup("SOLICITATION_LIST_LIMIT") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|e| {
                AppError::Config(format!("SOLICITATION_LIST_LIMIT must be a number: {}", e))
            })?,
            None => DEFAULT_LIST_LIMIT,
        };

        let config = Self {
            base_url: parse_base_url(&text("ASSISTANT_BASE_URL", DEFAULT_BASE_URL))?,
            request_timeout: seconds("ASSISTANT_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            health_timeout: seconds("ASSISTANT_HEALTH_TIMEOUT_SECS", DEFAULT_HEALTH_TIMEOUT_SECS)?,
            handling_timeout: seconds(
                "ASSISTANT_HANDLING_TIMEOUT_SECS",
                DEFAULT_HANDLING_TIMEOUT_SECS,
            )?,
            client_agent: text("ASSISTANT_CLIENT_AGENT", DEFAULT_CLIENT_AGENT),
            request_source: text("ASSISTANT_REQUEST_SOURCE", DEFAULT_REQUEST_SOURCE),
            feedback_source: text("ASSISTANT_FEEDBACK_SOURCE", DEFAULT_FEEDBACK_SOURCE),
            origin: text("ASSISTANT_ORIGIN", DEFAULT_ORIGIN),
            list_limit,
            environment: text("APP_ENV", "production"),
        };

        config.validate()?;
        Ok(config)
    }

    /// Defaults pointed at the given base URL.
    pub fn for_base_url(base_url: &str) -> Result<Self, AppError> {
        Ok(Self::with_base_url(parse_base_url(base_url)?))
    }

    fn with_base_url(base_url: Url) -> Self {
        Self {
            base_url,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            health_timeout: Duration::from_secs(DEFAULT_HEALTH_TIMEOUT_SECS),
            handling_timeout: Duration::from_secs(DEFAULT_HANDLING_TIMEOUT_SECS),
            client_agent: DEFAULT_CLIENT_AGENT.to_string(),
            request_source: DEFAULT_REQUEST_SOURCE.to_string(),
            feedback_source: DEFAULT_FEEDBACK_SOURCE.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            list_limit: DEFAULT_LIST_LIMIT,
            environment: "production".to_string(),
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        if self.handling_timeout <= timeout {
            self.handling_timeout = timeout + Duration::from_secs(1);
        }
        self
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.handling_timeout <= self.request_timeout {
            return Err(AppError::Config(format!(
                "handling timeout ({:?}) must exceed the request timeout ({:?})",
                self.handling_timeout, self.request_timeout
            )));
        }
        Ok(())
    }

    /// `POST /solicitacoes/executar`
    pub fn execute_url(&self) -> Result<Url, AppError> {
        self.endpoint(&["solicitacoes", "executar"])
    }

    /// `PUT /solicitacoes/{remote_id}/feedback`
    pub fn feedback_url(&self, remote_id: &str) -> Result<Url, AppError> {
        self.endpoint(&["solicitacoes", remote_id, "feedback"])
    }

    /// `GET /health`
    pub fn health_url(&self) -> Result<Url, AppError> {
        self.endpoint(&["health"])
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, AppError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("base URL cannot take a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn parse_base_url(raw: &str) -> Result<Url, AppError> {
    let url = Url::parse(raw.trim())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AppError::Config(format!(
            "ASSISTANT_BASE_URL must be http(s), got '{}'",
            other
        ))),
    }
}
