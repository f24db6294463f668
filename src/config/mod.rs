//! Configuration management for reelsync
//!
//! Settings come from an optional TOML file, with every field defaulted and
//! the credentials read from the environment.

mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// YouTube Data API settings
    #[serde(default)]
    pub youtube: YouTubeConfig,

    /// Import selection
    #[serde(default)]
    pub import: ImportConfig,

    /// Catalog database settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Paths configuration (internal, not user-editable)
    #[serde(skip)]
    pub paths: PathsConfig,
}

/// YouTube Data API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouTubeConfig {
    /// API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Channel whose playlists are imported
    #[serde(default = "default_channel_id")]
    pub channel_id: Option<String>,

    /// Results per page for playlist and playlist item listings
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Video ids per details request
    #[serde(default = "default_ids_per_request")]
    pub ids_per_request: usize,

    /// Requests per second across all endpoints
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Which playlists an import touches
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Only import these playlists (empty = every playlist of the channel)
    #[serde(default)]
    pub playlist_ids: Vec<String>,

    /// Never import these playlists
    #[serde(default)]
    pub exclude_playlist_ids: Vec<String>,
}

/// Catalog database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file (defaults to catalog.db next to the config file)
    #[serde(default = "default_database_path")]
    pub path: Option<PathBuf>,

    /// Connection pool size
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Default page size for listings
    #[serde(default = "default_list_limit")]
    pub list_limit: i64,
}

/// Internal paths configuration
#[derive(Debug, Clone, Default)]
pub struct PathsConfig {
    /// Base directory for reelsync data
    pub base_dir: PathBuf,

    /// Path to config file
    pub config_file: PathBuf,

    /// Path to the SQLite catalog
    pub db_file: PathBuf,
}

/// Credentials required before an import touches the network
#[derive(Debug, Clone)]
pub struct ImportCredentials {
    pub api_key: String,
    pub channel_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            youtube: YouTubeConfig::default(),
            import: ImportConfig::default(),
            database: DatabaseConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_key_env: default_api_key_env(),
            channel_id: default_channel_id(),
            page_size: default_page_size(),
            ids_per_request: default_ids_per_request(),
            requests_per_second: default_requests_per_second(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
            list_limit: default_list_limit(),
        }
    }
}

impl ImportConfig {
    /// Whether a playlist passes the include/exclude lists
    pub fn includes(&self, playlist_id: &str) -> bool {
        if self.exclude_playlist_ids.iter().any(|id| id == playlist_id) {
            return false;
        }
        self.playlist_ids.is_empty() || self.playlist_ids.iter().any(|id| id == playlist_id)
    }
}

impl Config {
    /// Get the default base directory for reelsync (~/.reelsync)
    pub fn default_base_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".reelsync")
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        Self::default_base_dir().join("config.toml")
    }

    /// Initialize paths configuration
    fn init_paths(&mut self, base_dir: PathBuf, config_file: PathBuf) {
        self.paths = PathsConfig {
            db_file: self
                .database
                .path
                .clone()
                .unwrap_or_else(|| base_dir.join("catalog.db")),
            config_file,
            base_dir,
        };
    }

    /// Load configuration from a specific file path
    pub fn load(config_path: &Path) -> Result<Self> {
        debug!("Loading config from {:?}", config_path);

        if !config_path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        let content = std::fs::read_to_string(config_path)?;
        let mut config: Config = toml::from_str(&content)?;

        let base = config_path.parent().unwrap_or(Path::new(".")).to_path_buf();
        config.init_paths(base, config_path.to_path_buf());

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file if present, otherwise from defaults and the environment
    pub fn load_or_default(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            return Self::load(config_path);
        }

        debug!(
            "No config file at {:?}, using defaults and environment",
            config_path
        );
        let mut config = Config::default();
        let base = config_path.parent().unwrap_or(Path::new(".")).to_path_buf();
        config.init_paths(base, config_path.to_path_buf());
        config.validate()?;
        Ok(config)
    }

    /// Fresh defaults rooted at a base directory
    pub fn for_base_dir(base_dir: PathBuf, config_file: PathBuf) -> Self {
        let mut config = Config::default();
        config.init_paths(base_dir, config_file);
        config
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.paths.config_file.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&self.paths.config_file, content)?;
        info!("Saved config to {:?}", self.paths.config_file);
        Ok(())
    }

    /// Get the YouTube API key from the environment
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.youtube.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    /// Resolve everything an import needs, failing before any network call
    pub fn import_credentials(&self) -> Result<ImportCredentials> {
        let api_key = self.api_key().ok_or_else(|| {
            Error::Config(format!(
                "YouTube API key not set: export {}",
                self.youtube.api_key_env
            ))
        })?;

        let channel_id = self
            .youtube
            .channel_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                Error::Config(
                    "YouTube channel not set: export YOUTUBE_CHANNEL_ID or set youtube.channel_id"
                        .to_string(),
                )
            })?;

        Ok(ImportCredentials {
            api_key,
            channel_id,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.youtube.page_size == 0 || self.youtube.page_size > 50 {
            return Err(Error::Config(
                "youtube.page_size must be between 1 and 50".to_string(),
            ));
        }

        if self.youtube.ids_per_request == 0 || self.youtube.ids_per_request > 50 {
            return Err(Error::Config(
                "youtube.ids_per_request must be between 1 and 50".to_string(),
            ));
        }

        if self.youtube.requests_per_second == 0 {
            return Err(Error::Config(
                "youtube.requests_per_second must be positive".to_string(),
            ));
        }

        if self.youtube.api_key_env.trim().is_empty() {
            return Err(Error::Config(
                "youtube.api_key_env must name an environment variable".to_string(),
            ));
        }

        url::Url::parse(&self.youtube.api_base_url)?;

        if self.database.max_connections == 0 {
            return Err(Error::Config(
                "database.max_connections must be positive".to_string(),
            ));
        }

        if self.database.list_limit <= 0 {
            return Err(Error::Config(
                "database.list_limit must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.youtube.api_key_env, "YOUTUBE_API_KEY");
        assert_eq!(config.youtube.page_size, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_save_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        let mut config = Config::for_base_dir(tmp.path().to_path_buf(), config_path.clone());
        config.youtube.channel_id = Some("UCstudio".to_string());
        config.import.exclude_playlist_ids = vec!["PLdrafts".to_string()];

        config.save().unwrap();
        assert!(config_path.exists());

        let loaded = Config::load(&config_path).unwrap();
        assert_eq!(loaded.youtube.channel_id.as_deref(), Some("UCstudio"));
        assert_eq!(loaded.import.exclude_playlist_ids, vec!["PLdrafts"]);
        assert_eq!(loaded.paths.base_dir, tmp.path());
    }

    #[test]
    fn test_database_path_follows_config_dir() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(&config_path, "[database]\nmax_connections = 2\n").unwrap();

        let loaded = Config::load(&config_path).unwrap();
        let expected = default_database_path().unwrap_or_else(|| tmp.path().join("catalog.db"));
        assert_eq!(loaded.paths.db_file, expected);
        assert_eq!(loaded.database.max_connections, 2);
    }

    #[test]
    fn test_database_path_from_file_wins() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        let db_file = tmp.path().join("elsewhere").join("site.db");
        std::fs::write(
            &config_path,
            format!("[database]\npath = {:?}\n", db_file.display().to_string()),
        )
        .unwrap();

        let loaded = Config::load(&config_path).unwrap();
        assert_eq!(loaded.paths.db_file, db_file);
    }

    #[test]
    fn test_load_or_default_without_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("missing.toml");
        let config = Config::load_or_default(&config_path).unwrap();
        assert_eq!(config.paths.config_file, config_path);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.youtube.page_size = 51;
        assert!(config.validate().is_err());
        config.youtube.page_size = 25;
        assert!(config.validate().is_ok());

        config.youtube.ids_per_request = 0;
        assert!(config.validate().is_err());
        config.youtube.ids_per_request = 10;

        config.youtube.api_base_url = "not a url".to_string();
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_missing_api_key_is_configuration_error() {
        let mut config = Config::default();
        config.youtube.api_key_env = "REELSYNC_TEST_UNSET_API_KEY".to_string();
        config.youtube.channel_id = Some("UCstudio".to_string());

        let err = config.import_credentials().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("REELSYNC_TEST_UNSET_API_KEY"));
    }

    #[test]
    fn test_import_credentials_resolved() {
        std::env::set_var("REELSYNC_TEST_API_KEY_PRESENT", "secret");
        let mut config = Config::default();
        config.youtube.api_key_env = "REELSYNC_TEST_API_KEY_PRESENT".to_string();
        config.youtube.channel_id = Some("UCstudio".to_string());

        let creds = config.import_credentials().unwrap();
        assert_eq!(creds.api_key, "secret");
        assert_eq!(creds.channel_id, "UCstudio");

        config.youtube.channel_id = Some("  ".to_string());
        assert!(config.import_credentials().is_err());
    }

    #[test]
    fn test_playlist_selection() {
        let mut import = ImportConfig::default();
        assert!(import.includes("PLa"));

        import.playlist_ids = vec!["PLa".to_string(), "PLb".to_string()];
        import.exclude_playlist_ids = vec!["PLb".to_string()];
        assert!(import.includes("PLa"));
        assert!(!import.includes("PLb"));
        assert!(!import.includes("PLc"));
    }
}
