//! Client configuration.
//!
//! Settings are resolved with the precedence
//! defaults < `~/.config/docuchat/config.toml` < environment < command line.
//! The command-line layer is applied by the binary.

use crate::error::{DocuChatError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

pub const ENV_BASE_URL: &str = "DOCUCHAT_BASE_URL";
pub const ENV_NOTIFICATION_TTL: &str = "DOCUCHAT_NOTIFICATION_TTL_SECS";
pub const ENV_REQUEST_TIMEOUT: &str = "DOCUCHAT_REQUEST_TIMEOUT_SECS";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL every endpoint is joined onto
    pub base_url: String,
    pub notification_ttl_secs: u64,
    pub request_timeout_secs: u64,
    /// Maximum characters of a citation snippet shown in the transcript
    pub snippet_width: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            notification_ttl_secs: 5,
            request_timeout_secs: 120,
            snippet_width: 96,
        }
    }
}

impl ClientConfig {
    pub fn notification_ttl(&self) -> Duration {
        Duration::from_secs(self.notification_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Loads configuration from the default location, then applies the
    /// process environment.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Like [`ClientConfig::load`], reading `path` instead of the default
    /// location when given.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut config = match path.map(Path::to_path_buf).or_else(default_config_path) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML config file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            DocuChatError::config(format!(
                "Failed to read configuration file at {}: {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            DocuChatError::config(format!(
                "Failed to parse configuration file at {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Overrides fields from environment variables.
    ///
    /// `lookup` returns the value of a variable, if set.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(raw) = lookup(ENV_NOTIFICATION_TTL) {
            self.notification_ttl_secs = parse_secs(ENV_NOTIFICATION_TTL, &raw)?;
        }
        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT) {
            self.request_timeout_secs = parse_secs(ENV_REQUEST_TIMEOUT, &raw)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(DocuChatError::config(format!(
                "base_url must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        if self.notification_ttl_secs == 0 {
            return Err(DocuChatError::config("notification_ttl_secs must be positive"));
        }
        if self.request_timeout_secs == 0 {
            return Err(DocuChatError::config("request_timeout_secs must be positive"));
        }
        Ok(())
    }
}

fn parse_secs(key: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| DocuChatError::config(format!("{key} must be a whole number of seconds: {e}")))
}

/// Returns `~/.config/docuchat/config.toml` (platform equivalent elsewhere).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("docuchat").join("config.toml"))
}
