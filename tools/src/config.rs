//! Configuration loading and parsing

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG_PATH: &str = "/etc/macops/config.toml";

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub exec: ExecConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecConfig {
    #[serde(default = "default_command_timeout")]
    pub command_timeout_seconds: u64,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            command_timeout_seconds: default_command_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct PathsConfig {
    /// Override for the trash directory; defaults to `~/.Trash`.
    #[serde(default)]
    pub trash_dir: Option<String>,
}

fn default_command_timeout() -> u64 {
    30
}

/// Load configuration from `MACOPS_CONFIG` or /etc/macops/config.toml.
pub fn load_config() -> Result<Config> {
    let config_path =
        std::env::var("MACOPS_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    if Path::new(&config_path).exists() {
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config from {config_path}"))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {config_path}"))?;
        Ok(config)
    } else {
        tracing::debug!("Config file not found at {config_path}, using defaults");
        Ok(Config::default())
    }
}
