//! Client configuration
//!
//! Default config location: ~/.esapi/config.toml

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Cluster base URL
    #[serde(default = "default_url")]
    pub url: String,

    /// Connection timeout in milliseconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,

    /// Request timeout in milliseconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Forward every non-reserved argument as a query parameter
    #[serde(default)]
    pub skip_parameter_validation: bool,

    /// Action table to use instead of the built-in one
    pub actions_file: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_url() -> String {
    "http://localhost:9200".to_string()
}

fn default_connect_timeout() -> u64 {
    5000
}

fn default_request_timeout() -> u64 {
    30000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            connect_timeout_ms: default_connect_timeout(),
            request_timeout_ms: default_request_timeout(),
            headers: BTreeMap::new(),
            skip_parameter_validation: false,
            actions_file: None,
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

/// Directory holding the default config file
pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".esapi"))
        .unwrap_or_else(|| PathBuf::from(".esapi"))
}

/// Expand ~ to home directory in path
pub fn expand_tilde(path: &Path) -> Result<PathBuf> {
    let s = path.to_string_lossy();
    if let Some(rest) = s.strip_prefix("~/") {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Cannot determine home directory".to_string()))?;
        Ok(home.join(rest))
    } else if s == "~" {
        dirs::home_dir().ok_or_else(|| Error::Config("Cannot determine home directory".to_string()))
    } else {
        Ok(path.to_path_buf())
    }
}

impl ClientConfig {
    /// Load config from default location (~/.esapi/config.toml)
    pub fn load() -> Result<Self> {
        Self::load_from(&default_config_dir().join("config.toml"))
    }

    /// Load config from a file, falling back to defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            ClientConfig::default()
        };
        config.expand_paths()?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Parse the base URL
    pub fn base_url(&self) -> Result<url::Url> {
        url::Url::parse(&self.url)
            .map_err(|e| Error::Config(format!("Invalid url '{}': {}", self.url, e)))
    }

    /// Reject settings no transport can use
    pub fn validate(&self) -> Result<()> {
        let url = self.base_url()?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(Error::Config(format!(
                "Unsupported url scheme '{}', expected http or https",
                url.scheme()
            )));
        }
        Ok(())
    }

    fn expand_paths(&mut self) -> Result<()> {
        if let Some(ref f) = self.actions_file {
            self.actions_file = Some(expand_tilde(f)?);
        }
        Ok(())
    }
}
