use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub api_url: String,
    pub site_url: String,
    pub debounce_ms: u64,
    pub lookup_timeout_ms: u64,
    pub max_visible: usize,
    /// Sent with every lookup request, in file order.
    pub headers: IndexMap<String, String>,
    /// Serve lookups from this name list instead of the HTTP API.
    pub players_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000/api".to_string(),
            site_url: "http://localhost:3000".to_string(),
            debounce_ms: 400,
            lookup_timeout_ms: 5_000,
            max_visible: 8,
            headers: IndexMap::new(),
            players_file: None,
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub site_url: Option<String>,
    pub debounce_ms: Option<u64>,
    pub players_file: Option<PathBuf>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(text.as_str())
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(api_url) = overrides.api_url {
            self.api_url = api_url;
        }
        if let Some(site_url) = overrides.site_url {
            self.site_url = site_url;
        }
        if let Some(debounce_ms) = overrides.debounce_ms {
            self.debounce_ms = debounce_ms;
        }
        if overrides.players_file.is_some() {
            self.players_file = overrides.players_file;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.players_file.is_none() && !is_http_url(self.api_url.as_str()) {
            return Err(Error::InvalidConfig(format!(
                "api_url must be an http(s) URL, got {:?}",
                self.api_url
            )));
        }
        if self.max_visible == 0 {
            return Err(Error::InvalidConfig(
                "max_visible must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms.max(1))
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}
