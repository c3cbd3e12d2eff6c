//! Configuration validator
//!
//! Validates configuration values to ensure they are within acceptable ranges.

use super::loader::{Config, ConfigError, ContextConfig, LaunchConfig, LoggingConfig, ServiceConfig};

/// Upper bound for both the poll interval (ms) and the poll attempt count
const MAX_POLL_SETTING: u64 = 10_000;

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates the entire configuration
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        Self::validate_service(&config.service)?;
        Self::validate_context(&config.context)?;
        Self::validate_launch(&config.launch)?;
        Self::validate_logging(&config.logging)?;
        Ok(())
    }

    /// Validates privileged service configuration
    fn validate_service(service: &ServiceConfig) -> Result<(), ConfigError> {
        if service.name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "Service name cannot be empty".to_string(),
            ));
        }

        if service.poll_interval_ms == 0 || service.poll_interval_ms > MAX_POLL_SETTING {
            return Err(ConfigError::Invalid(format!(
                "Service poll interval must be between 1 and {} ms",
                MAX_POLL_SETTING
            )));
        }

        // The poll must stay bounded
        if service.max_poll_attempts == 0 || u64::from(service.max_poll_attempts) > MAX_POLL_SETTING
        {
            return Err(ConfigError::Invalid(format!(
                "Service poll attempts must be between 1 and {}",
                MAX_POLL_SETTING
            )));
        }

        Ok(())
    }

    /// Validates system context configuration
    fn validate_context(context: &ContextConfig) -> Result<(), ConfigError> {
        if context.reference_processes.is_empty() {
            return Err(ConfigError::Invalid(
                "At least one reference process is required".to_string(),
            ));
        }

        if context.reference_processes.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "Reference process names cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Validates launch configuration
    fn validate_launch(launch: &LaunchConfig) -> Result<(), ConfigError> {
        if launch.default_command.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "Default command cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Validates logging configuration
    fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level: {}. Must be one of: {:?}",
                logging.level, valid_levels
            )));
        }
        Ok(())
    }
}

/// Validates a configuration
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    ConfigValidator::validate(config)
}
