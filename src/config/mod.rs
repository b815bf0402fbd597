//! # Configuration
//!
//! Tumbleweed reads a single TOML file. Every section has defaults, so an empty
//! file is a valid configuration.
//!
//! ```toml
//! [game]
//! name = "Tumbleweed"
//! start_room = "main_street"
//!
//! [storage]
//! data_dir = "data"
//! # db_path = "data/world"          # defaults to <data_dir>/world
//! # seed_file = "data/seeds/world.json"
//!
//! [echo]
//! default_rate_secs = 42
//! default_chance = 0.3
//! tick_resolution_ms = 1000
//!
//! [map]
//! enabled = true
//!
//! [logging]
//! level = "info"
//! file = "tumbleweed.log"
//! ```
//!
//! ```rust,no_run
//! use tumbleweed::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     println!("Start room: {}", config.game.start_room);
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::world::types::{EchoConfig, DEFAULT_ECHO_CHANCE, DEFAULT_ECHO_RATE_SECS};
use crate::world::START_ROOM_ID;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub name: String,
    /// Where new characters are placed.
    pub start_room: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            name: "Tumbleweed".to_string(),
            start_room: START_ROOM_ID.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    /// Sled database path; defaults to `<data_dir>/world`.
    #[serde(default)]
    pub db_path: Option<String>,
    /// JSON seed imported by `init` instead of the built-in town.
    #[serde(default)]
    pub seed_file: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            db_path: None,
            seed_file: None,
        }
    }
}

impl StorageConfig {
    pub fn db_path(&self) -> PathBuf {
        match &self.db_path {
            Some(p) => PathBuf::from(p),
            None => PathBuf::from(&self.data_dir).join("world"),
        }
    }
}

/// Defaults applied to echo settings that omit them, and the ticker cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EchoSettings {
    #[serde(default = "default_rate_secs")]
    pub default_rate_secs: u64,
    #[serde(default = "default_chance")]
    pub default_chance: f64,
    /// How often the server loop advances the ticker.
    #[serde(default = "default_tick_resolution_ms")]
    pub tick_resolution_ms: u64,
}

fn default_rate_secs() -> u64 {
    DEFAULT_ECHO_RATE_SECS
}

fn default_chance() -> f64 {
    DEFAULT_ECHO_CHANCE
}

fn default_tick_resolution_ms() -> u64 {
    1000
}

impl Default for EchoSettings {
    fn default() -> Self {
        Self {
            default_rate_secs: default_rate_secs(),
            default_chance: default_chance(),
            tick_resolution_ms: default_tick_resolution_ms(),
        }
    }
}

impl EchoSettings {
    /// Echo settings used to fill gaps in seed files.
    pub fn defaults(&self) -> EchoConfig {
        EchoConfig {
            echoes: Vec::new(),
            echo_rate: self.default_rate_secs,
            echo_chance: self.default_chance,
        }
    }

    pub fn tick_resolution(&self) -> Duration {
        Duration::from_millis(self.tick_resolution_ms.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Global switch for the mini-map header.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Default for MapConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: Some("tumbleweed.log".to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub echo: EchoSettings,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config = Self::parse(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the defaults. A file
    /// that exists and fails to parse or validate is still an error.
    pub async fn load_or_default(path: &str) -> Result<Self> {
        match fs::try_exists(path).await {
            Ok(false) => Ok(Self::default()),
            _ => Self::load(path).await,
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.echo.default_chance) {
            return Err(anyhow!(
                "echo.default_chance must be within 0.0..=1.0 (got {})",
                self.echo.default_chance
            ));
        }
        if self.echo.default_rate_secs == 0 {
            return Err(anyhow!("echo.default_rate_secs must be positive"));
        }
        if self.game.start_room.trim().is_empty() {
            return Err(anyhow!("game.start_room must not be empty"));
        }
        Ok(())
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.game.start_room, "main_street");
        assert_eq!(config.echo.default_rate_secs, 42);
        assert!(config.map.enabled);
        assert_eq!(config.storage.db_path(), PathBuf::from("data").join("world"));
    }

    #[test]
    fn default_round_trips_through_toml() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let parsed = Config::parse(&text).unwrap();
        assert_eq!(parsed.logging.level, "info");
        assert_eq!(parsed.echo.tick_resolution(), Duration::from_secs(1));
    }

    #[test]
    fn out_of_range_chance_is_rejected() {
        let err = Config::parse("[echo]\ndefault_chance = 1.5\n").unwrap_err();
        assert!(err.to_string().contains("default_chance"));
    }

    #[tokio::test]
    async fn create_default_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let path = path.to_str().unwrap();
        Config::create_default(path).await.unwrap();
        let loaded = Config::load(path).await.unwrap();
        assert_eq!(loaded.game.name, "Tumbleweed");
    }
}
