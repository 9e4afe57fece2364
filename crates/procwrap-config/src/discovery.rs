use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::model::{CliArgs, Config, ConfigSource, RunnerConfig};
use crate::validation::ConfigError;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "PROCWRAP_CONFIG";

/// TOML configuration file structure
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    runner: Option<RunnerConfig>,
}

impl Config {
    /// Discover and load configuration with precedence: CLI > file > defaults
    ///
    /// Honours `PROCWRAP_CONFIG` when `cli_args` names no explicit file, and
    /// searches upward from the current directory otherwise.
    pub fn discover(cli_args: &CliArgs) -> Result<Self> {
        let start_dir = std::env::current_dir().context("Failed to get current directory")?;
        let mut cli_args = cli_args.clone();
        if cli_args.config_path.is_none() {
            cli_args.config_path = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        }
        Self::discover_from(&start_dir, &cli_args)
    }

    /// Discover and load configuration starting from a specific directory
    ///
    /// This is the path-driven variant used by tests to avoid process-global state.
    pub fn discover_from(start_dir: &Path, cli_args: &CliArgs) -> Result<Self> {
        let mut source_attribution = HashMap::new();
        let mut runner = RunnerConfig::default();

        source_attribution.insert("launch_mode".to_string(), ConfigSource::Defaults);
        source_attribution.insert("timeout_secs".to_string(), ConfigSource::Defaults);

        let config_path = if let Some(explicit_path) = &cli_args.config_path {
            if !explicit_path.exists() {
                return Err(ConfigError::NotFound {
                    path: explicit_path.display().to_string(),
                }
                .into());
            }
            Some(explicit_path.clone())
        } else {
            Self::discover_config_file_from(start_dir)
        };

        if let Some(path) = &config_path {
            debug!(path = %path.display(), "Loading config file");
            let file_config = Self::load_config_file(path)
                .with_context(|| format!("Failed to load config file: {}", path.display()))?;
            let config_source = ConfigSource::ConfigFile(path.clone());

            if let Some(file_runner) = file_config.runner {
                if file_runner.launch_mode.is_some() {
                    runner.launch_mode = file_runner.launch_mode;
                    source_attribution.insert("launch_mode".to_string(), config_source.clone());
                }
                if file_runner.timeout_secs.is_some() {
                    runner.timeout_secs = file_runner.timeout_secs;
                    source_attribution.insert("timeout_secs".to_string(), config_source.clone());
                }
                for (key, value) in file_runner.env {
                    source_attribution.insert(format!("env.{key}"), config_source.clone());
                    runner.env.insert(key, value);
                }
            }
        }

        // CLI overrides
        if let Some(mode) = &cli_args.launch_mode {
            runner.launch_mode = Some(mode.clone());
            source_attribution.insert("launch_mode".to_string(), ConfigSource::Cli);
        }
        if let Some(timeout) = cli_args.timeout_secs {
            runner.timeout_secs = Some(timeout);
            source_attribution.insert("timeout_secs".to_string(), ConfigSource::Cli);
        }
        for (key, value) in &cli_args.env {
            source_attribution.insert(format!("env.{key}"), ConfigSource::Cli);
            runner.env.insert(key.clone(), value.clone());
        }

        let config = Self {
            runner,
            config_path,
            source_attribution,
        };
        config.validate()?;
        Ok(config)
    }

    /// Search upward from `start_dir` for `.procwrap/config.toml`.
    ///
    /// Stops at the filesystem root or at the first directory that looks like
    /// a repository root (`.git`, `.hg`, `.svn`).
    #[must_use]
    pub fn discover_config_file_from(start_dir: &Path) -> Option<PathBuf> {
        let mut current_dir = Some(start_dir);

        while let Some(dir) = current_dir {
            let config_path = dir.join(".procwrap").join("config.toml");
            if config_path.is_file() {
                return Some(config_path);
            }

            if dir.join(".git").exists() || dir.join(".hg").exists() || dir.join(".svn").exists()
            {
                break;
            }

            current_dir = dir.parent();
        }

        None
    }

    /// Load configuration from TOML file
    fn load_config_file(path: &Path) -> Result<TomlConfig> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: TomlConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::InvalidFile(e.to_string()))?;
        Ok(config)
    }
}
