//! Process configuration read from environment variables.
//!
//! Every variable has a default so the dashboard core boots with no setup:
//!
//! - `SHEPHERD_LOGIN_PATH` (default `/login`)
//! - `SHEPHERD_DEFAULT_REDIRECT` (default `/dashboard`)
//! - `SHEPHERD_LOG_FORMAT` (`json` | `pretty`, default `json`)

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

pub const LOGIN_PATH_VAR: &str = "SHEPHERD_LOGIN_PATH";
pub const DEFAULT_REDIRECT_VAR: &str = "SHEPHERD_DEFAULT_REDIRECT";
pub const LOG_FORMAT_VAR: &str = "SHEPHERD_LOG_FORMAT";

/// Log output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl LogFormat {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "pretty" => Some(Self::Pretty),
            _ => None,
        }
    }
}

/// Shared configuration for the access-control and preload layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShepherdConfig {
    /// Where unauthenticated actors are sent.
    pub login_path: String,

    /// Where authenticated actors lacking permission are sent when a guard
    /// supplies neither a fallback nor its own redirect target.
    pub default_redirect: String,

    pub log_format: LogFormat,
}

impl Default for ShepherdConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            default_redirect: "/dashboard".to_string(),
            log_format: LogFormat::Json,
        }
    }
}

impl ShepherdConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> CoreResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary lookup (used by tests).
    pub fn from_lookup<F>(lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let login_path = match lookup(LOGIN_PATH_VAR) {
            Some(raw) => validate_path(LOGIN_PATH_VAR, raw)?,
            None => defaults.login_path,
        };

        let default_redirect = match lookup(DEFAULT_REDIRECT_VAR) {
            Some(raw) => validate_path(DEFAULT_REDIRECT_VAR, raw)?,
            None => defaults.default_redirect,
        };

        let log_format = match lookup(LOG_FORMAT_VAR) {
            Some(raw) => LogFormat::parse(&raw).unwrap_or_else(|| {
                tracing::warn!(
                    key = LOG_FORMAT_VAR,
                    value = %raw,
                    "unknown log format; using json"
                );
                LogFormat::Json
            }),
            None => defaults.log_format,
        };

        Ok(Self {
            login_path,
            default_redirect,
            log_format,
        })
    }
}

fn validate_path(key: &str, raw: String) -> CoreResult<String> {
    let trimmed = raw.trim();
    if !trimmed.starts_with('/') {
        return Err(CoreError::config(key, format!("'{trimmed}' must start with '/'")));
    }
    Ok(trimmed.to_string())
}
