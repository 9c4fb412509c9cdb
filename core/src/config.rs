//! Client configuration.
//!
//! Set once when the client is built and read-only afterwards.

use std::env;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ApiError;

pub const DEFAULT_API_URL: &str = "api.twitter.com";
pub const DEFAULT_UPLOAD_URL: &str = "upload.twitter.com";
pub const DEFAULT_API_VERSION: &str = "1.1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Hosts, version and debug switch for a `TwitterClient`.
///
/// `api_url` and `upload_url` are bare hosts (optionally with a port), not
/// full URLs; the scheme is kept separately.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Configuration {
    pub api_url: String,
    pub upload_url: String,
    pub api_version: String,
    pub scheme: String,
    pub debug_mode: bool,
    pub timeout_secs: u64,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            upload_url: DEFAULT_UPLOAD_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            scheme: "https".to_string(),
            debug_mode: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Configuration {
    /// Defaults overridden by `TWITTER_*` environment variables.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, ApiError> {
        serde_json::from_str(raw).map_err(|e| ApiError::Config(e.to_string()))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let mut config = Self::default();
        if let Some(v) = lookup("TWITTER_API_URL") {
            config.api_url = v;
        }
        if let Some(v) = lookup("TWITTER_UPLOAD_URL") {
            config.upload_url = v;
        }
        if let Some(v) = lookup("TWITTER_API_VERSION") {
            config.api_version = v;
        }
        if let Some(v) = lookup("TWITTER_SCHEME") {
            config.scheme = v;
        }
        if let Some(v) = lookup("TWITTER_DEBUG") {
            config.debug_mode = parse_flag("TWITTER_DEBUG", &v)?;
        }
        if let Some(v) = lookup("TWITTER_TIMEOUT_SECS") {
            config.timeout_secs = parse_value("TWITTER_TIMEOUT_SECS", &v)?;
        }
        Ok(config)
    }

    pub fn with_hosts(mut self, api_url: impl Into<String>, upload_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self.upload_url = upload_url.into();
        self
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_debug(mut self, debug_mode: bool) -> Self {
        self.debug_mode = debug_mode;
        self
    }
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, ApiError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ApiError::Config(format!("{key}: not a boolean: {other}"))),
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, ApiError>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| ApiError::Config(format!("{key}: {e}")))
}
