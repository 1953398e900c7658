//! Configuration management for Cortex.
//!
//! Configuration is loaded in order of precedence:
//! 1. Defaults
//! 2. Config file (~/.cortex/config.toml)
//! 3. Environment variables
//! 4. CLI flags (handled at CLI layer)
//!
//! The loaded `Config` is passed explicitly into the server state and the
//! pipeline entry points; there is no ambient global configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Gemini CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Path to the gemini binary (default: "gemini")
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Model to use for study-guide generation
    #[serde(default = "default_model")]
    pub model: String,

    /// Upstream call timeout in seconds (0 = no timeout)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_binary() -> String {
    "gemini".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Request-size limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum accepted PDF upload size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Extracted text is truncated to this many characters before prompting
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_max_content_chars() -> usize {
    20_000
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: default_max_upload_bytes(),
            max_content_chars: default_max_content_chars(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gemini: GeminiConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub limits: LimitsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Returns the default Cortex configuration directory (~/.cortex)
    pub fn cortex_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".cortex"))
    }

    /// Returns the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        Self::cortex_dir().map(|d| d.join("config.toml"))
    }

    /// Load configuration from the default path with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = Self::default_config_path() {
            if path.exists() {
                Self::load_from_file(&path)?
            } else {
                Config::default()
            }
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        if let Ok(model) = std::env::var("CORTEX_MODEL") {
            self.gemini.model = model;
        }

        if let Ok(port) = std::env::var("CORTEX_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }

        if let Ok(host) = std::env::var("CORTEX_HOST") {
            self.server.host = host;
        }

        if let Ok(level) = std::env::var("CORTEX_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Ok(binary) = std::env::var("CORTEX_GEMINI_BINARY") {
            self.gemini.binary = binary;
        }

        if let Ok(bytes) = std::env::var("CORTEX_MAX_UPLOAD_BYTES") {
            if let Ok(bytes) = bytes.parse() {
                self.limits.max_upload_bytes = bytes;
            }
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(path) = Self::default_config_path() {
            self.save_to_file(&path)
        } else {
            Err(ConfigError::ValidationError(
                "Could not determine config path".to_string(),
            ))
        }
    }

    /// Save configuration to a specific file
    pub fn save_to_file(&self, path: &PathBuf) -> Result<(), ConfigError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Get the server URL
    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server.host, self.server.port)
    }

    /// Ensure the Cortex directory exists
    pub fn ensure_dirs() -> std::io::Result<()> {
        if let Some(cortex_dir) = Self::cortex_dir() {
            std::fs::create_dir_all(&cortex_dir)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.gemini.binary, "gemini");
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.limits.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.limits.max_content_chars, 20_000);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(config.server.port, parsed.server.port);
        assert_eq!(config.limits.max_content_chars, parsed.limits.max_content_chars);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[server]
port = 9999
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        // Custom value
        assert_eq!(config.server.port, 9999);
        // Defaults still applied
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
    }
}
