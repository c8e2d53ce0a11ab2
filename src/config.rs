use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::LoginFlowError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub flow: FlowConfig,
    pub directory: DirectoryConfig,
}

/// Channel sizes used by the flow controllers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Buffered events per subscriber before it starts lagging
    pub event_capacity: usize,
    /// Buffered stage results waiting for the driver
    pub result_capacity: usize,
    /// Buffered confirm presses waiting for the driver
    pub trigger_capacity: usize,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            event_capacity: 64,
            result_capacity: 16,
            trigger_capacity: 16,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    pub accounts: Vec<AccountConfig>,
    pub latency_ms: u64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            accounts: vec![AccountConfig {
                email: "user@test.com".to_string(),
                password: "password".to_string(),
            }],
            latency_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    pub email: String,
    pub password: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            flow: FlowConfig::default(),
            directory: DirectoryConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let project_name = env!("CARGO_PKG_NAME");
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Reject values the channels cannot be built with
    pub fn validate(&self) -> crate::error::Result<()> {
        let capacities = [
            ("flow.event_capacity", self.flow.event_capacity),
            ("flow.result_capacity", self.flow.result_capacity),
            ("flow.trigger_capacity", self.flow.trigger_capacity),
        ];
        for (name, value) in capacities {
            if value == 0 {
                return Err(LoginFlowError::Config(format!("{} must be greater than 0", name)));
            }
        }
        Ok(())
    }
}
