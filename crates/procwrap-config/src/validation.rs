use thiserror::Error;

use procwrap_runner::{ErrorCategory, UserFriendlyError};

use crate::model::Config;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration file: {0}")]
    InvalidFile(String),

    #[error("Invalid value for '{key}': {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    NotFound { path: String },
}

impl UserFriendlyError for ConfigError {
    fn user_message(&self) -> String {
        match self {
            Self::InvalidFile(reason) => {
                format!("Configuration file has invalid format: {reason}")
            }
            Self::InvalidValue { key, value } => {
                format!("Configuration '{key}' has invalid value: {value}")
            }
            Self::NotFound { path } => format!("Configuration file not found: {path}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::InvalidFile(_) => Some(
                "Configuration files must be valid TOML with an optional [runner] section."
                    .to_string(),
            ),
            Self::InvalidValue { key, .. } => Some(format!(
                "The '{key}' configuration option has specific format requirements."
            )),
            Self::NotFound { .. } => Some(
                "procwrap searches for .procwrap/config.toml starting from the current directory upward."
                    .to_string(),
            ),
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidFile(_) => vec!["Check the TOML syntax of the file".to_string()],
            Self::InvalidValue { key, .. } => match key.as_str() {
                "launch_mode" => vec!["Use 'argv' or 'shell'".to_string()],
                "timeout_secs" => vec!["Use a timeout of at least 1 second".to_string()],
                _ => vec!["Environment keys must be non-empty and must not contain '='".to_string()],
            },
            Self::NotFound { .. } => vec![
                "Check the path passed with --config or PROCWRAP_CONFIG".to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

impl Config {
    /// Validate the effective configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] for an unknown launch mode, a zero
    /// timeout, or a malformed environment key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.launch_mode()?;

        if self.runner.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: "timeout_secs".to_string(),
                value: "0".to_string(),
            });
        }

        for key in self.runner.env.keys() {
            if key.is_empty() || key.contains('=') || key.contains('\0') {
                return Err(ConfigError::InvalidValue {
                    key: format!("env.{key}"),
                    value: key.clone(),
                });
            }
        }

        Ok(())
    }
}
