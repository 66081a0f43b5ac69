//! Application configuration management.
//!
//! Holds the backend base URL and where the session token is kept.
//! Configuration is stored at `~/.config/quarcc/config.json`; the
//! `QUARCC_API_URL` and `QUARCC_TOKEN_STORE` environment variables override
//! the file.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::client::DEFAULT_API_URL;
use crate::api::ApiClient;
use crate::auth::{FileTokenStore, KeyringTokenStore, MemoryTokenStore, SessionManager, TokenStore};

/// Application name used for the config directory path
const APP_NAME: &str = "quarcc";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const API_URL_ENV: &str = "QUARCC_API_URL";
pub const TOKEN_STORE_ENV: &str = "QUARCC_TOKEN_STORE";

/// Backend for the persisted session token
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStoreKind {
    #[default]
    File,
    Keyring,
    Memory,
}

impl FromStr for TokenStoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(TokenStoreKind::File),
            "keyring" => Ok(TokenStoreKind::Keyring),
            "memory" => Ok(TokenStoreKind::Memory),
            other => Err(anyhow::anyhow!(
                "Unknown token store '{}' (expected file, keyring, or memory)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub token_store: TokenStoreKind,
    /// Unset means the HTTP client's default (no timeout)
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    /// Load from the default location, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_overrides(
            std::env::var(API_URL_ENV).ok(),
            std::env::var(TOKEN_STORE_ENV).ok(),
        )?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path).context("Failed to read config file")?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Apply override values (normally from the environment). Blank values
    /// are ignored.
    pub fn apply_overrides(
        &mut self,
        api_url: Option<String>,
        token_store: Option<String>,
    ) -> Result<()> {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_url = Some(url);
        }
        if let Some(kind) = token_store.filter(|k| !k.trim().is_empty()) {
            self.token_store = kind.parse()?;
        }
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Directory holding the config file and the token file
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME))
    }

    /// Base URL of the backend, without a trailing slash
    pub fn api_url(&self) -> String {
        self.api_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn token_store(&self) -> Result<Arc<dyn TokenStore>> {
        let store: Arc<dyn TokenStore> = match self.token_store {
            TokenStoreKind::File => Arc::new(FileTokenStore::new(Self::config_dir()?)),
            TokenStoreKind::Keyring => Arc::new(KeyringTokenStore),
            TokenStoreKind::Memory => Arc::new(MemoryTokenStore::new()),
        };
        Ok(store)
    }

    /// Build the session manager for this configuration
    pub fn session_manager(&self) -> Result<SessionManager> {
        let api = ApiClient::new(&self.api_url(), self.request_timeout())
            .context("Failed to build HTTP client")?;
        Ok(SessionManager::new(api, self.token_store()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_api_url() {
        assert_eq!(Config::default().api_url(), "http://127.0.0.1:5000/api");
    }

    #[test]
    fn test_api_url_trims_trailing_slash() {
        let config = Config {
            api_url: Some("https://api.quarcc.com/api/".into()),
            ..Default::default()
        };
        assert_eq!(config.api_url(), "https://api.quarcc.com/api");
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(Some("http://10.0.0.2:5000/api".into()), Some("Keyring".into()))
            .unwrap();
        assert_eq!(config.api_url(), "http://10.0.0.2:5000/api");
        assert_eq!(config.token_store, TokenStoreKind::Keyring);

        // Blank overrides leave values alone
        config.apply_overrides(Some("  ".into()), Some(String::new())).unwrap();
        assert_eq!(config.api_url(), "http://10.0.0.2:5000/api");
        assert_eq!(config.token_store, TokenStoreKind::Keyring);

        assert!(config.apply_overrides(None, Some("floppy".into())).is_err());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert!(config.api_url.is_none());
        assert_eq!(config.token_store, TokenStoreKind::File);
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("quarcc").join("config.json");

        let config = Config {
            api_url: Some("http://localhost:8080/api".into()),
            token_store: TokenStoreKind::Memory,
            request_timeout_secs: Some(15),
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api_url(), "http://localhost:8080/api");
        assert_eq!(loaded.token_store, TokenStoreKind::Memory);
        assert_eq!(loaded.request_timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"token_store":"keyring"}"#).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.token_store, TokenStoreKind::Keyring);
        assert_eq!(loaded.api_url(), "http://127.0.0.1:5000/api");
    }
}
