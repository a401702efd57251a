use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::PathBuf};

use crate::source::ServiceId;

/// Default location of the cost-of-living table, relative to the working
/// directory, used when the config names no other path.
pub const DEFAULT_DATASET_PATH: &str = "data/cost_of_living.csv";

/// Credentials for a single external service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub api_key: String,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Optional override for the cost-of-living CSV path.
    pub dataset: Option<PathBuf>,

    /// Example TOML:
    /// [services.weatherstack]
    /// api_key = "..."
    pub services: HashMap<String, ServiceConfig>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "tripbudget", "tripbudget-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Set or replace the API key for a service.
    pub fn upsert_service_api_key(&mut self, id: ServiceId, api_key: String) {
        self.services.insert(id.as_str().to_string(), ServiceConfig { api_key });
    }

    /// Returns the API key for a service, if present.
    pub fn service_api_key(&self, id: ServiceId) -> Option<&str> {
        self.services.get(id.as_str()).map(|cfg| cfg.api_key.as_str())
    }

    pub fn is_service_configured(&self, id: ServiceId) -> bool {
        self.service_api_key(id).is_some()
    }

    /// Effective dataset path: the configured override, else the default.
    pub fn dataset_path(&self) -> PathBuf {
        self.dataset.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET_PATH))
    }
}
