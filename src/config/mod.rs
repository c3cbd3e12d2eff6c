//! Configuration module
//!
//! Provides configuration loading, validation, and default settings for the
//! privileged service, the system context, the launch and logging.

mod defaults;
mod loader;
mod validator;

pub use defaults::{default_config, ConfigDefaults};
pub use loader::{load_config, ConfigLoader, CONFIG_ENV_VAR, CONFIG_FILE_NAME};
pub use validator::{validate_config, ConfigValidator};

// Re-export the configuration structures
pub use loader::{Config, ContextConfig, LaunchConfig, LoggingConfig, ServiceConfig};

// Configuration-related error type
pub use loader::ConfigError;

// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_agree_with_config_default() {
        let defaults = default_config();
        let config = Config::default();
        assert_eq!(config.service.name, defaults.service.name);
        assert_eq!(config.service.max_poll_attempts, defaults.service.max_poll_attempts);
        assert_eq!(config.context.reference_processes, defaults.context.reference_processes);
        assert_eq!(config.launch.default_command, defaults.launch.default_command);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_missing_file_is_reported_as_such() {
        let result: ConfigResult<Config> = ConfigLoader::new("no-such-dir/superuser.toml").load();
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}
