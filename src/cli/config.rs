// ABOUTME: Configuration management for the substitutor application
// ABOUTME: Handles loading and merging configuration from files and environment variables

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::functions::builtins::MINIMAL_PROVIDER;
use crate::template::{Params, SubstitutorConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub strict_mode: bool,

    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default)]
    pub params: Params,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

fn default_provider() -> String {
    MINIMAL_PROVIDER.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strict_mode: false,
            provider: default_provider(),
            params: Params::new(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file path or default locations
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::find_config_file(),
        };

        let mut config = if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            serde_yaml::from_str(&contents)
                .map_err(|e| anyhow!("Invalid config file '{}': {}", config_path.display(), e))?
        } else {
            Config::default()
        };

        config.merge_env()?;
        Ok(config)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> PathBuf {
        let possible_paths = [
            PathBuf::from("substitutor.yaml"),
            PathBuf::from("substitutor.yml"),
            PathBuf::from(".substitutor.yaml"),
            PathBuf::from(".substitutor.yml"),
        ];

        // Check home directory
        if let Some(home_dir) = dirs::home_dir() {
            let home_config = home_dir.join(".substitutor").join("config.yaml");
            if home_config.exists() {
                return home_config;
            }
        }

        // Check current directory
        for path in possible_paths {
            if path.exists() {
                return path;
            }
        }

        // Return default path (may not exist)
        PathBuf::from("substitutor.yaml")
    }

    /// Merge environment variables into configuration
    fn merge_env(&mut self) -> Result<()> {
        self.merge_env_from(|name| std::env::var(name).ok())
    }

    /// Merge overrides from a variable lookup
    pub fn merge_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(strict) = lookup("SUBSTITUTOR_STRICT") {
            self.strict_mode = parse_bool(&strict)
                .ok_or_else(|| anyhow!("SUBSTITUTOR_STRICT must be a boolean, got '{}'", strict))?;
        }
        if let Some(provider) = lookup("SUBSTITUTOR_PROVIDER") {
            self.provider = provider;
        }

        // Logging configuration
        if let Some(level) = lookup("SUBSTITUTOR_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("SUBSTITUTOR_LOG_FORMAT") {
            self.logging.format = format;
        }

        Ok(())
    }

    /// Engine options, with command line overrides applied
    pub fn substitutor_config(&self, provider: Option<&str>, strict: bool) -> SubstitutorConfig {
        SubstitutorConfig {
            provider: provider.unwrap_or(&self.provider).to_string(),
            strict_mode: strict || self.strict_mode,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
