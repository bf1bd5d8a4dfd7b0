//! Configuration loaded from `{config_dir}/music-app-rs/config.toml`.
//!
//! Every section falls back to defaults, so a partial or missing file
//! still yields a usable config.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const APP_DIR: &str = "music-app-rs";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub search: SearchConfig,
    pub audio: AudioConfig,
    pub account: AccountConfig,
    pub storage: StorageConfig,
    pub ui: UiConfig,
}

/// Song search service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub base_url: String,
    pub search_limit: u32,
    pub trending_limit: u32,
    pub radio_limit: u32,
    /// Tracks fetched per seeded playlist
    pub seed_limit: u32,
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://itunes.apple.com".to_string(),
            search_limit: 15,
            trending_limit: 8,
            radio_limit: 20,
            seed_limit: 6,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Initial volume, 0-100
    pub volume: i64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self { volume: 100 }
    }
}

/// Profile used for federated sign-in
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountConfig {
    pub display_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Namespace for all documents
    pub app_id: String,
    pub data_dir: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            app_id: "default-app-id".to_string(),
            data_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Ask the terminal emulator to go fullscreen with the fullscreen player
    pub native_fullscreen: bool,
    pub notification_secs: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            native_fullscreen: true,
            notification_secs: 3,
        }
    }
}

impl Config {
    /// Directory holding the session and document files.
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join(APP_DIR)))
            .unwrap_or_else(|| PathBuf::from(".cache"))
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

/// Load configuration from disk.
///
/// Never fails: problems are logged and defaults are used.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        tracing::warn!("Could not determine config directory, using defaults");
        return Config::default();
    };

    if !path.exists() {
        tracing::info!(path = %path.display(), "No config file found, using defaults");
        return Config::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(contents) => parse(&contents).unwrap_or_else(|e| {
            tracing::error!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
            Config::default()
        }),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Failed to read config file");
            Config::default()
        }
    }
}

pub fn parse(contents: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let toml = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(toml.contains("[search]"));
        assert!(toml.contains("[audio]"));
        assert!(toml.contains("[storage]"));
        assert!(toml.contains("[ui]"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = parse(
            r#"
[account]
display_name = "Ada"
email = "ada@example.com"

[search]
search_limit = 25
"#,
        )
        .unwrap();

        assert_eq!(config.account.display_name.as_deref(), Some("Ada"));
        assert_eq!(config.search.search_limit, 25);
        assert_eq!(config.search.trending_limit, 8);
        assert_eq!(config.search.base_url, "https://itunes.apple.com");
        assert_eq!(config.audio.volume, 100);
        assert_eq!(config.storage.app_id, "default-app-id");
        assert!(config.ui.native_fullscreen);
    }

    #[test]
    fn test_explicit_data_dir_wins() {
        let mut config = Config::default();
        config.storage.data_dir = Some(PathBuf::from("/tmp/music"));
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/music"));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(parse("[search\nbase_url = 1").is_err());
    }
}
