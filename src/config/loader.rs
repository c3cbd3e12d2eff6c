//! Configuration loader
//!
//! Handles loading configuration from TOML files and merging with defaults.

use super::defaults::default_config;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable overriding the configuration file location
pub const CONFIG_ENV_VAR: &str = "SUPERUSER_CONFIG";

/// File name looked up next to the executable
pub const CONFIG_FILE_NAME: &str = "superuser.toml";

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_service")]
    pub service: ServiceConfig,

    #[serde(default = "default_context")]
    pub context: ContextConfig,

    #[serde(default = "default_launch")]
    pub launch: LaunchConfig,

    #[serde(default = "default_logging")]
    pub logging: LoggingConfig,
}

/// Privileged service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_service_name")]
    pub name: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,
}

impl ServiceConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// System context configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Image names of processes running as the system account, in order of
    /// preference
    #[serde(default = "default_reference_processes")]
    pub reference_processes: Vec<String>,
}

/// Launch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchConfig {
    /// Command run when none is given on the command line
    #[serde(default = "default_command")]
    pub default_command: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Configuration loader
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new configuration loader
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        ConfigLoader {
            config_path: path.as_ref().to_path_buf(),
        }
    }

    /// Creates a loader for the default location: `SUPERUSER_CONFIG` if set,
    /// otherwise `superuser.toml` beside the executable
    pub fn from_env() -> Self {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Self::new(path);
        }
        let path = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(CONFIG_FILE_NAME)))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Loads configuration from file
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.config_path.exists() {
            return Err(ConfigError::FileNotFound(
                self.config_path.display().to_string(),
            ));
        }

        let contents = fs::read_to_string(&self.config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }
}

/// Loads and validates configuration from the default location.
///
/// A missing file yields the defaults; an unreadable or invalid one is an
/// error the caller may fall back from.
pub fn load_config() -> Result<Config, ConfigError> {
    let loader = ConfigLoader::from_env();
    let config = match loader.load() {
        Ok(config) => config,
        Err(ConfigError::FileNotFound(_)) => Config::default(),
        Err(e) => return Err(e),
    };
    super::validate_config(&config)?;
    Ok(config)
}

// Default functions for serde
fn default_service() -> ServiceConfig {
    let defaults = default_config();
    ServiceConfig {
        name: defaults.service.name,
        poll_interval_ms: defaults.service.poll_interval_ms,
        max_poll_attempts: defaults.service.max_poll_attempts,
    }
}

fn default_context() -> ContextConfig {
    ContextConfig {
        reference_processes: default_config().context.reference_processes,
    }
}

fn default_launch() -> LaunchConfig {
    LaunchConfig {
        default_command: default_config().launch.default_command,
    }
}

fn default_logging() -> LoggingConfig {
    LoggingConfig {
        level: default_config().logging.level,
    }
}

// Individual field defaults
fn default_service_name() -> String {
    default_config().service.name
}

fn default_poll_interval_ms() -> u64 {
    default_config().service.poll_interval_ms
}

fn default_max_poll_attempts() -> u32 {
    default_config().service.max_poll_attempts
}

fn default_reference_processes() -> Vec<String> {
    default_config().context.reference_processes
}

fn default_command() -> String {
    default_config().launch.default_command
}

fn default_log_level() -> String {
    default_config().logging.level
}

impl Default for Config {
    fn default() -> Self {
        Config {
            service: default_service(),
            context: default_context(),
            launch: default_launch(),
            logging: default_logging(),
        }
    }
}
