/// Application configuration
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use walkup_playback::{PlaybackConfig, DEFAULT_AUTOPLAY_RETRY_DELAYS_MS};

/// Most autoplay retries allowed per announce
pub const MAX_AUTOPLAY_RETRIES: usize = 10;

/// Latest allowed autoplay retry offset, in milliseconds
pub const MAX_AUTOPLAY_RETRY_DELAY_MS: u64 = 30_000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,

    #[serde(default = "default_logging")]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StorageSettings {
    /// `sqlite://` URL of the record database (`sqlite::memory:` for a
    /// throwaway session)
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlaybackSettings {
    /// Offsets after an announce at which to retry starting an embed
    #[serde(default = "default_autoplay_retry_delays_ms")]
    pub autoplay_retry_delays_ms: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingSettings {
    /// `tracing` filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: default_storage(),
            playback: default_playback(),
            logging: default_logging(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `walkup.toml` (if present) and environment
    pub fn load() -> Result<Self> {
        Self::load_from("walkup.toml")
    }

    /// Load configuration from `path` (if present) and environment
    ///
    /// Environment variables are prefixed with `WALKUP_` and use `__` between
    /// sections, e.g. `WALKUP_STORAGE__DATABASE_URL`. Retry delays are a
    /// comma-separated list.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        // Load from config file if it exists
        let config_path = PathBuf::from(path.as_ref());
        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        }

        // Override with environment variables (prefixed with WALKUP_)
        settings = settings.add_source(
            config::Environment::with_prefix("WALKUP")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("playback.autoplay_retry_delays_ms")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage.database_url.trim().is_empty() {
            return Err(AppError::Config(
                "database URL is required (set WALKUP_STORAGE__DATABASE_URL)".to_string(),
            ));
        }

        let delays = &self.playback.autoplay_retry_delays_ms;
        if delays.len() > MAX_AUTOPLAY_RETRIES {
            return Err(AppError::Config(format!(
                "at most {MAX_AUTOPLAY_RETRIES} autoplay retries are allowed, got {}",
                delays.len()
            )));
        }
        if let Some(delay) = delays.iter().find(|d| **d > MAX_AUTOPLAY_RETRY_DELAY_MS) {
            return Err(AppError::Config(format!(
                "autoplay retry delay {delay}ms exceeds {MAX_AUTOPLAY_RETRY_DELAY_MS}ms"
            )));
        }

        Ok(())
    }

    /// Engine settings derived from this configuration
    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            autoplay_retry_delays: self
                .playback
                .autoplay_retry_delays_ms
                .iter()
                .map(|ms| Duration::from_millis(*ms))
                .collect(),
        }
    }
}

// Default values
fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://walkup.db".to_string()
}

fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        autoplay_retry_delays_ms: default_autoplay_retry_delays_ms(),
    }
}

fn default_autoplay_retry_delays_ms() -> Vec<u64> {
    DEFAULT_AUTOPLAY_RETRY_DELAYS_MS.to_vec()
}

fn default_logging() -> LoggingSettings {
    LoggingSettings {
        filter: default_log_filter(),
    }
}

fn default_log_filter() -> String {
    "walkup=info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.storage.database_url, "sqlite://walkup.db");
        assert_eq!(config.playback_config(), PlaybackConfig::default());
    }

    #[test]
    fn too_many_retries_are_rejected() {
        let mut config = AppConfig::default();
        config.playback.autoplay_retry_delays_ms = vec![100; MAX_AUTOPLAY_RETRIES + 1];
        assert!(config.validate().is_err());
    }

    #[test]
    fn late_retry_is_rejected() {
        let mut config = AppConfig::default();
        config.playback.autoplay_retry_delays_ms = vec![1000, 45_000];
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_database_url_is_rejected() {
        let mut config = AppConfig::default();
        config.storage.database_url = "  ".to_string();
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn loads_file_with_partial_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("walkup.toml");
        std::fs::write(
            &path,
            "[playback]\nautoplay_retry_delays_ms = [500, 2500]\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.playback.autoplay_retry_delays_ms, vec![500, 2500]);
        assert_eq!(config.storage.database_url, "sqlite://walkup.db");
        assert_eq!(config.logging.filter, "walkup=info");
    }

    #[test]
    fn invalid_file_values_fail_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("walkup.toml");
        std::fs::write(&path, "[playback]\nautoplay_retry_delays_ms = [60000]\n").unwrap();

        assert!(AppConfig::load_from(&path).is_err());
    }
}
