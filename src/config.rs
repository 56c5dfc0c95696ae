use std::fs;
use std::path::PathBuf;

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// The deployed backend both original app variants ultimately talk to.
pub const DEFAULT_BASE_URL: &str = "https://anymty.onrender.com";

/// How often the chat screen re-fetches message history.
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 5000;

/// Where the client points and how fast it polls. The two historical app
/// variants hardcoded different base URLs; this is the single surface that
/// replaces both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_ms: u64,
}

fn default_refresh_interval() -> u64 {
    DEFAULT_REFRESH_INTERVAL_MS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_url(base_url),
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
        }
    }

    /// Parsed base URL, with a trailing slash so `Url::join` appends instead
    /// of replacing the last path segment.
    pub fn parsed_base_url(&self) -> Result<Url> {
        let mut raw = normalize_url(&self.base_url);
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Url::parse(&raw).map_err(|e| Error::InvalidBaseUrl(format!("{}: {e}", self.base_url)))
    }

    fn config_path() -> Option<PathBuf> {
        let base = BaseDirs::new()?;
        Some(base.config_dir().join("anymty.toml"))
    }

    /// Reads the config file, falling back to defaults when it is missing or
    /// unparseable. A broken config file should never lock the user out.
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            if let Ok(text) = fs::read_to_string(&path) {
                if let Ok(cfg) = toml::from_str::<ClientConfig>(&text) {
                    return cfg;
                }
                log::warn!("ignoring unparseable config at {}", path.display());
            }
        }
        Self::default()
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| Error::Storage("no config directory".to_string()))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(Error::storage)?;
        }
        let toml = toml::to_string_pretty(self).map_err(Error::storage)?;
        fs::write(path, toml).map_err(Error::storage)
    }
}

/// Users type bare hosts; assume https unless a scheme is already present.
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}
