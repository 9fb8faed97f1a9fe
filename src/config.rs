//! Configuration management for the receipt intake server
//!
//! Loads `config.toml` and applies `RECEIPT_INTAKE_*` environment overrides.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

/// Complete server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    // ═══ NETWORK (Environment Override Supported) ═══
    /// IP address to bind the intake listener
    pub bind_address: String,

    /// Port for the intake listener
    pub port: u16,

    // ═══ STORAGE ═══
    /// Directory receiving stored receipts
    /// Environment: RECEIPT_INTAKE_UPLOAD_DIRECTORY
    pub upload_directory: String,

    /// Scratch directory the transport writes incoming bodies to
    pub temp_directory: String,

    // ═══ LIMITS ═══
    /// Largest body the transport accepts before marking the transfer failed
    pub max_request_bytes: u64,

    /// Maximum concurrent clients
    pub max_clients: usize,

    /// Maximum request line length
    pub max_command_length: usize,

    /// Transaction ids served by the in-memory transaction store
    #[serde(default)]
    pub transactions: Vec<String>,
}

impl AppConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        // Try container path first, then development path
        let config_paths = [
            "receipt-intake-server/config", // Docker: /app/receipt-intake-server/config.toml
            "config",                       // Local development: ./config.toml
        ];

        let mut last_error = None;

        for config_path in &config_paths {
            match Config::builder()
                .add_source(File::with_name(config_path))
                .add_source(Environment::with_prefix("RECEIPT_INTAKE"))
                .build()
            {
                Ok(settings) => {
                    let config: AppConfig = settings.try_deserialize()?;
                    config.validate()?;
                    return Ok(config);
                }
                Err(e) => {
                    last_error = Some(e);
                    continue;
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ConfigError::Message(format!(
                "Failed to load config.toml from any location. Tried: {config_paths:?}"
            ))
        }))
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Message("port cannot be 0".into()));
        }

        if self.upload_directory.trim().is_empty() {
            return Err(ConfigError::Message(
                "upload_directory cannot be empty".into(),
            ));
        }

        if self.temp_directory.trim().is_empty() {
            return Err(ConfigError::Message(
                "temp_directory cannot be empty".into(),
            ));
        }

        if self.max_request_bytes == 0 {
            return Err(ConfigError::Message(
                "max_request_bytes must be greater than 0".into(),
            ));
        }

        if self.max_clients == 0 {
            return Err(ConfigError::Message(
                "max_clients must be greater than 0".into(),
            ));
        }

        if self.max_command_length < 16 {
            return Err(ConfigError::Message(
                "max_command_length must be at least 16".into(),
            ));
        }

        Ok(())
    }

    /// Get bind address and port as socket address
    pub fn listen_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    /// Get upload directory as PathBuf
    pub fn upload_directory_path(&self) -> PathBuf {
        PathBuf::from(&self.upload_directory)
    }

    /// Get temporary directory as PathBuf
    pub fn temp_directory_path(&self) -> PathBuf {
        PathBuf::from(&self.temp_directory)
    }
}
