use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;
use thiserror::Error;

use crate::form::identity::IdentityPolicy;

pub const BASE_URL_VAR: &str = "RESUME_API_BASE_URL";
pub const TIMEOUT_VAR: &str = "RESUME_UPLOAD_TIMEOUT_SECS";
pub const PLACEHOLDER_VAR: &str = "RESUME_PLACEHOLDER_USER_ID";
pub const REQUIRE_USER_VAR: &str = "RESUME_REQUIRE_USER";

pub const MIN_TIMEOUT_SECS: u64 = 30;
pub const MAX_TIMEOUT_SECS: u64 = 90;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_PLACEHOLDER_USER_ID: &str = "anonymous";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid base URL '{value}': {reason}")]
    InvalidBaseUrl { value: String, reason: String },

    #[error("Upload timeout must be between 30 and 90 seconds, got {0}")]
    TimeoutOutOfRange(u64),

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Client configuration loaded from environment variables.
/// Fails at startup if the base URL is missing or a value is out of range.
#[derive(Debug, Clone)]
pub struct Config {
    /// Always ends with `/`.
    pub base_url: Url,
    pub upload_timeout: Duration,
    pub placeholder_user_id: String,
    pub require_user: bool,
    pub rust_log: String,
}

impl Config {
    /// Defaults for everything except the base URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Config {
            base_url: parse_base_url(base_url)?,
            upload_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            placeholder_user_id: DEFAULT_PLACEHOLDER_USER_ID.to_string(),
            require_user: false,
            rust_log: "info".to_string(),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::from_env_or(None)
    }

    /// Like [`Config::from_env`], but an explicit base URL wins over the
    /// environment and makes the variable optional.
    pub fn from_env_or(base_url: Option<&str>) -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let base_url = match base_url {
            Some(url) => url.to_string(),
            None => require_env(BASE_URL_VAR)?,
        };

        let mut config = Config::new(&base_url)?;

        if let Ok(raw) = std::env::var(TIMEOUT_VAR) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: TIMEOUT_VAR,
                    value: raw.clone(),
                })?;
            config = config.with_timeout_secs(secs)?;
        }

        if let Ok(placeholder) = std::env::var(PLACEHOLDER_VAR) {
            if !placeholder.trim().is_empty() {
                config.placeholder_user_id = placeholder.trim().to_string();
            }
        }

        if let Ok(raw) = std::env::var(REQUIRE_USER_VAR) {
            config.require_user = parse_flag(REQUIRE_USER_VAR, &raw)?;
        }

        config.rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(config)
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Result<Self, ConfigError> {
        if !(MIN_TIMEOUT_SECS..=MAX_TIMEOUT_SECS).contains(&secs) {
            return Err(ConfigError::TimeoutOutOfRange(secs));
        }
        self.upload_timeout = Duration::from_secs(secs);
        Ok(self)
    }

    pub fn identity_policy(&self) -> IdentityPolicy {
        if self.require_user {
            IdentityPolicy::require_user()
        } else {
            IdentityPolicy::with_placeholder(&self.placeholder_user_id)
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidBaseUrl {
        value: raw.to_string(),
        reason: reason.to_string(),
    };

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("must not carry a query or fragment"));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
        }),
    }
}
