//! Default configuration values

use serde::{Deserialize, Serialize};

/// Default configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDefaults {
    pub service: ServiceDefaults,
    pub context: ContextDefaults,
    pub launch: LaunchDefaults,
    pub logging: LoggingDefaults,
}

/// Default privileged service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceDefaults {
    pub name: String,
    pub poll_interval_ms: u64,
    pub max_poll_attempts: u32,
}

/// Default system context configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextDefaults {
    pub reference_processes: Vec<String>,
}

/// Default launch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchDefaults {
    pub default_command: String,
}

/// Default logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingDefaults {
    pub level: String,
}

/// Returns the default configuration
pub fn default_config() -> ConfigDefaults {
    ConfigDefaults {
        service: ServiceDefaults {
            name: "TrustedInstaller".to_string(),
            poll_interval_ms: 100,
            max_poll_attempts: 100, // ~10s
        },
        context: ContextDefaults {
            // winlogon first: lsass may run as a protected process
            reference_processes: vec!["winlogon.exe".to_string(), "lsass.exe".to_string()],
        },
        launch: LaunchDefaults {
            default_command: "cmd.exe".to_string(),
        },
        logging: LoggingDefaults {
            level: "warn".to_string(),
        },
    }
}
