//! Configuration management for coaweb
//!
//! This module handles loading, validation, and management of
//! coaweb configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::{ConfigError, ConfigResult};

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

/// Account store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding the account store
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
    /// JSON file with the flat account list (relative to data path)
    #[serde(default = "default_accounts_file")]
    pub accounts_file: String,
    /// Seed the standard chart of accounts when the store file is missing
    #[serde(default = "default_true")]
    pub seed_default_chart: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            accounts_file: default_accounts_file(),
            seed_default_chart: true,
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./data")
}

fn default_accounts_file() -> String {
    "accounts.json".to_string()
}

fn default_true() -> bool {
    true
}

/// Directory browsing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Open every root-level account on first load
    #[serde(default = "default_true")]
    pub open_roots_on_load: bool,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self { open_roots_on_load: true }
    }
}

/// Currency and number formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// Currency label shown next to balances
    #[serde(default = "default_currency")]
    pub default_currency: String,
    /// Number of decimal places
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            default_currency: default_currency(),
            decimal_places: default_decimal_places(),
        }
    }
}

fn default_currency() -> String {
    "EGP".to_string()
}

fn default_decimal_places() -> u32 {
    2
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Account store settings
    #[serde(default)]
    pub data: DataConfig,
    /// Directory browsing settings
    #[serde(default)]
    pub directory: DirectoryConfig,
    /// Currency settings
    #[serde(default)]
    pub currency: CurrencyConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_string_lossy().to_string(),
            source,
        })?;

        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(content)?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(ConfigError::invalid("server.port", "Port must be greater than 0"));
        }

        if self.data.accounts_file.trim().is_empty() {
            return Err(ConfigError::invalid("data.accounts_file", "Accounts file name must not be empty"));
        }

        if self.currency.decimal_places > 10 {
            return Err(ConfigError::invalid("currency.decimal_places", "Decimal places must be between 0 and 10"));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::invalid(
                "logging.level",
                format!("Log level must be one of: {}", LOG_LEVELS.join(", ")),
            ));
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Get the full path to the account store file
    pub fn accounts_path(&self) -> PathBuf {
        self.data.path.join(&self.data.accounts_file)
    }
}
