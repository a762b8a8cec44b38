//! Planner configuration

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use piggy_jar_model::{ChainId, ROOTSTOCK_TESTNET_CHAIN_ID};
use serde::{Deserialize, Serialize};

pub const CONFIG_PATH_VAR: &str = "PIGGY_JAR_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "piggy-jar.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Prefix of every storage key
    pub storage_prefix: String,

    /// Chain that jar contracts are deployed to
    pub chain_id: ChainId,

    /// Directory used by the file storage backend
    pub storage_dir: PathBuf,

    /// Name of native coin and simulated jars created with a blank name
    pub default_jar_name: String,

    /// Name of token jars created with a blank name
    pub default_token_jar_name: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            storage_prefix: "piggybit".to_string(),
            chain_id: ROOTSTOCK_TESTNET_CHAIN_ID,
            storage_dir: PathBuf::from(".piggy-jar"),
            default_jar_name: "My Jar".to_string(),
            default_token_jar_name: "USDC Jar".to_string(),
        }
    }
}

impl PlannerConfig {
    /// Load configuration from the TOML file named by `PIGGY_JAR_CONFIG`
    pub fn load() -> Result<Self> {
        let config_path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        Self::load_from(&config_path)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let config_str =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&config_str)
    }

    pub fn from_toml(config_str: &str) -> Result<Self> {
        toml::from_str(config_str).context("Failed to parse config TOML")
    }

    /// Write default config to file
    pub fn write_default(path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let toml_str = toml::to_string_pretty(&Self::default()).context("Failed to serialize config")?;

        std::fs::write(path, toml_str).with_context(|| format!("Failed to write config to {}", path.display()))?;

        tracing::info!("Created default config at {}", path.display());
        Ok(())
    }
}
