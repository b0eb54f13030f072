//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub worldbank: WorldBankSettings,

    #[serde(default)]
    pub refresh: RefreshSettings,

    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Local dataset configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_pollution_csv")]
    pub pollution_csv: String,
}

fn default_pollution_csv() -> String {
    "data/Air_Quality.csv".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            pollution_csv: default_pollution_csv(),
        }
    }
}

/// World Bank download configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WorldBankSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_year_start")]
    pub year_start: i32,

    #[serde(default = "default_year_end")]
    pub year_end: i32,

    #[serde(default = "default_per_page")]
    pub per_page: u32,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_base_url() -> String {
    "https://api.worldbank.org/v2".to_string()
}

fn default_year_start() -> i32 {
    2005
}

fn default_year_end() -> i32 {
    2016
}

fn default_per_page() -> u32 {
    20_000
}

fn default_request_timeout() -> u64 {
    10_000
}

fn default_max_retries() -> u32 {
    3
}

impl Default for WorldBankSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            year_start: default_year_start(),
            year_end: default_year_end(),
            per_page: default_per_page(),
            request_timeout_ms: default_request_timeout(),
            max_retries: default_max_retries(),
        }
    }
}

/// Background refresh configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshSettings {
    #[serde(default = "default_refresh_enabled")]
    pub enabled: bool,

    #[serde(default = "default_refresh_interval")]
    pub interval_secs: u64,
}

fn default_refresh_enabled() -> bool {
    true
}

fn default_refresh_interval() -> u64 {
    60
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            enabled: default_refresh_enabled(),
            interval_secs: default_refresh_interval(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8050
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("geodash").join("config.toml")),
            Some(PathBuf::from("/etc/geodash/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("GEODASH_POLLUTION_CSV") {
            self.data.pollution_csv = path;
        }

        if let Ok(url) = std::env::var("GEODASH_WORLDBANK_URL") {
            self.worldbank.base_url = url;
        }

        if let Ok(host) = std::env::var("GEODASH_API_HOST") {
            self.api.host = host;
        }
        if let Ok(port) = std::env::var("GEODASH_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        if let Ok(secs) = std::env::var("GEODASH_REFRESH_INTERVAL_SECS") {
            if let Ok(s) = secs.parse() {
                self.refresh.interval_secs = s;
            }
        }

        if let Ok(level) = std::env::var("GEODASH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("GEODASH_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Geodash Configuration
#
# Environment variables override these settings:
# - GEODASH_POLLUTION_CSV
# - GEODASH_WORLDBANK_URL
# - GEODASH_API_HOST
# - GEODASH_API_PORT
# - GEODASH_REFRESH_INTERVAL_SECS
# - GEODASH_LOG_LEVEL
# - GEODASH_LOG_FORMAT

[data]
# Air-quality readings CSV (Geo Place Name, Start_Date, Data Value columns)
pollution_csv = "data/Air_Quality.csv"

[worldbank]
# World Bank API base URL
base_url = "https://api.worldbank.org/v2"

# Download window (inclusive years)
year_start = 2005
year_end = 2016

# Rows per page to request
per_page = 20000

# Request timeout (ms) and retry attempts
request_timeout_ms = 10000
max_retries = 3

[refresh]
# Enable the periodic background refresh
enabled = true

# Seconds between refreshes
interval_secs = 60

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8050

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.port, 8050);
        assert_eq!(config.refresh.interval_secs, 60);
        assert_eq!(config.worldbank.year_start, 2005);
        assert_eq!(config.worldbank.year_end, 2016);
    }

    #[test]
    fn test_generated_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.worldbank.base_url, "https://api.worldbank.org/v2");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nport = 9000").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.refresh.interval_secs, 60);
    }
}
