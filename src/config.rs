//! Client configuration loaded from environment variables.
//!
//! Every endpoint is resolved against a single base URL so that the login,
//! course and upload calls always talk to the same backend.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:8080";
const SESSION_DIR: &str = ".course-admin";
const SESSION_FILE: &str = "session.json";

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL, without trailing slash
    pub api_url: String,
    /// Where the file-backed session is persisted
    pub session_file: PathBuf,
    /// Per-request timeout; `None` waits indefinitely
    pub request_timeout: Option<Duration>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let api_url = env::var("COURSE_ADMIN_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let session_file = env::var("COURSE_ADMIN_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_session_file());

        let request_timeout = match env::var("COURSE_ADMIN_TIMEOUT_SECS") {
            Ok(raw) => Some(parse_timeout(&raw)?),
            Err(_) => None,
        };

        Ok(Self {
            api_url: normalize_api_url(&api_url)?,
            session_file,
            request_timeout,
        })
    }

    /// Deterministic config for tests.
    pub fn test_default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_file: PathBuf::from(SESSION_FILE),
            request_timeout: Some(Duration::from_secs(5)),
        }
    }

    /// Replace the base URL, applying the same checks as `from_env`.
    pub fn with_api_url(mut self, api_url: &str) -> Result<Self, ConfigError> {
        self.api_url = normalize_api_url(api_url)?;
        Ok(self)
    }
}

fn default_session_file() -> PathBuf {
    match env::var("HOME") {
        Ok(home) if !home.is_empty() => PathBuf::from(home).join(SESSION_DIR).join(SESSION_FILE),
        _ => PathBuf::from(format!("{}-{}", SESSION_DIR, SESSION_FILE)),
    }
}

fn normalize_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid("COURSE_ADMIN_API_URL", "empty".to_string()));
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::Invalid(
            "COURSE_ADMIN_API_URL",
            format!("expected http:// or https:// URL, got {}", trimmed),
        ));
    }
    Ok(trimmed.to_string())
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::Invalid(
            "COURSE_ADMIN_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        )),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(ConfigError::Invalid("COURSE_ADMIN_TIMEOUT_SECS", e.to_string())),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
