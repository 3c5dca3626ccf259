use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::transport::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};

pub const DEFAULT_BASE_URL: &str = "https://atlas.microsoft.com/search/fuzzy/json";
pub const ENV_BASE_URL: &str = "AZURE_MAPS_BASE_URL";
pub const ENV_API_KEY: &str = "AZURE_MAPS_API_KEY";

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// Settings as written in `azure-maps.toml`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FileConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Fully resolved settings needed to talk to Azure Maps.
#[derive(Clone, PartialEq)]
pub struct Config {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl FileConfig {
    /// First parseable config file from the standard locations.
    pub fn load() -> Option<Self> {
        for path in get_config_paths() {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file");
                    }
                }
            }
        }
        None
    }

    /// Read an explicitly requested config file. Missing or invalid files
    /// are errors here, unlike in [`FileConfig::load`].
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("Config file not found: {:?}", path);
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Apply `AZURE_MAPS_*` overrides from the process environment.
    pub fn with_env(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from any variable lookup. Empty values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        self
    }

    pub fn resolve(self) -> Result<Config> {
        if self.base_url.trim().is_empty() {
            bail!("Azure Maps base URL is empty");
        }
        let api_key = match self.api_key {
            Some(key) if !key.trim().is_empty() => key,
            _ => bail!(
                "No Azure Maps API key configured: set api_key in azure-maps.toml or {}",
                ENV_API_KEY
            ),
        };

        Ok(Config {
            base_url: self.base_url,
            api_key,
            timeout: Duration::from_secs(self.timeout_secs),
            user_agent: self.user_agent,
        })
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("azure-maps.toml"));
    paths.push(PathBuf::from(".azure-maps.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("azure-maps").join("config.toml"));
        paths.push(config_dir.join("azure-maps.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".azure-maps.toml"));
        paths.push(home.join(".config").join("azure-maps").join("config.toml"));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_from_empty_file() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config, FileConfig::default());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("azure-maps.toml");
        std::fs::write(
            &path,
            "base_url = \"http://localhost:9000/search\"\napi_key = \"abc\"\ntimeout_secs = 5\n",
        )
        .unwrap();

        let config = FileConfig::from_path(&path).unwrap().resolve().unwrap();
        assert_eq!(config.base_url, "http://localhost:9000/search");
        assert_eq!(config.api_key, "abc");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = tempdir().unwrap();
        let err = FileConfig::from_path(&dir.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_from_path_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "timeout_secs = \"soon\"").unwrap();
        assert!(FileConfig::from_path(&path).is_err());
    }

    #[test]
    fn test_overrides_win_over_file() {
        let env: HashMap<&str, &str> = [(ENV_API_KEY, "from-env"), (ENV_BASE_URL, "")]
            .into_iter()
            .collect();
        let file = FileConfig {
            api_key: Some("from-file".to_string()),
            ..FileConfig::default()
        };

        let config = file
            .with_overrides(|name| env.get(name).map(|v| v.to_string()))
            .resolve()
            .unwrap();
        assert_eq!(config.api_key, "from-env");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_resolve_requires_api_key() {
        assert!(FileConfig::default().resolve().is_err());

        let blank = FileConfig {
            api_key: Some("  ".to_string()),
            ..FileConfig::default()
        };
        assert!(blank.resolve().is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = FileConfig {
            api_key: Some("secret-key".to_string()),
            ..FileConfig::default()
        }
        .resolve()
        .unwrap();
        assert!(!format!("{:?}", config).contains("secret-key"));
    }
}
