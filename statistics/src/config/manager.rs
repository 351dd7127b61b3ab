use super::Config;
use crate::errors::ConfigError;
use anyhow::Result;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

pub struct ConfigManager {
    current_config: Arc<Config>,
}

impl ConfigManager {
    pub async fn new(config_path: String) -> Result<Self> {
        let config = Self::load_configuration(&config_path).await?;
        Ok(Self {
            current_config: Arc::new(config),
        })
    }

    pub fn get_current_config(&self) -> Arc<Config> {
        self.current_config.clone()
    }

    async fn load_configuration(config_path: &str) -> Result<Config> {
        if config_path.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "config".to_string(),
            }
            .into());
        }

        debug!("Loading config: {}", config_path);
        let content = fs::read_to_string(config_path)
            .await
            .map_err(|e| ConfigError::LoadFailed {
                path: config_path.to_string(),
                reason: e.to_string(),
            })?;

        let config = Self::parse(&content)?;

        info!(
            "Loaded config: {}s slots, {} slots per epoch, database at {}",
            config.chain.seconds_per_slot, config.chain.slots_per_epoch, config.database.path
        );

        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn parse(content: &str) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }
}
