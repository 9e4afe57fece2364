use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use procwrap_runner::{LaunchMode, ProcessOptions};

use crate::validation::ConfigError;

/// `[runner]` section of config.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RunnerConfig {
    /// "argv" (default) or "shell"
    pub launch_mode: Option<String>,
    /// Default timeout for blocking calls; absent means wait forever
    pub timeout_secs: Option<u64>,
    /// Environment overrides applied to every call
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

/// Where an effective configuration value came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Cli,
    ConfigFile(PathBuf),
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cli => write!(f, "cli"),
            Self::ConfigFile(path) => write!(f, "config ({})", path.display()),
            Self::Defaults => write!(f, "defaults"),
        }
    }
}

/// Values supplied on the command line; `None` leaves lower layers in effect.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config_path: Option<PathBuf>,
    pub launch_mode: Option<String>,
    pub timeout_secs: Option<u64>,
    pub env: Vec<(String, String)>,
}

/// Effective configuration after layering.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub runner: RunnerConfig,
    /// The file that contributed values, if any
    pub config_path: Option<PathBuf>,
    pub source_attribution: HashMap<String, ConfigSource>,
}

impl Config {
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] for an unknown launch mode.
    pub fn launch_mode(&self) -> Result<LaunchMode, ConfigError> {
        match self.runner.launch_mode.as_deref() {
            None => Ok(LaunchMode::default()),
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "launch_mode".to_string(),
                value: raw.to_string(),
            }),
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.runner.timeout_secs.map(Duration::from_secs)
    }

    /// Seed per-call [`ProcessOptions`] from the configured defaults.
    ///
    /// # Errors
    ///
    /// Propagates [`Config::launch_mode`] failures.
    pub fn to_process_options(&self) -> Result<ProcessOptions, ConfigError> {
        let mut options = ProcessOptions::new()
            .launch_mode(self.launch_mode()?)
            .envs(self.runner.env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        if let Some(timeout) = self.timeout() {
            options = options.timeout(timeout);
        }
        Ok(options)
    }

    /// Effective configuration as key → (value, source) pairs
    #[must_use]
    pub fn effective_config(&self) -> BTreeMap<String, (String, String)> {
        let source = |key: &str| {
            self.source_attribution
                .get(key)
                .unwrap_or(&ConfigSource::Defaults)
                .to_string()
        };

        let mut config = BTreeMap::new();
        config.insert(
            "launch_mode".to_string(),
            (
                self.runner
                    .launch_mode
                    .clone()
                    .unwrap_or_else(|| LaunchMode::default().to_string()),
                source("launch_mode"),
            ),
        );
        config.insert(
            "timeout_secs".to_string(),
            (
                self.runner
                    .timeout_secs
                    .map_or_else(|| "none".to_string(), |t| t.to_string()),
                source("timeout_secs"),
            ),
        );
        for (key, value) in &self.runner.env {
            let attribution_key = format!("env.{key}");
            let src = source(&attribution_key);
            config.insert(attribution_key, (value.clone(), src));
        }
        config
    }
}
