use std::fs;
use std::path::{Path, PathBuf};

use predmarket_sdk::Network;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "app_config.json";
pub const STORE_FILE: &str = "markets.sqlite";

pub const DEFAULT_APP_NAME: &str = "Web3 Prediction Market";
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Application settings persisted next to the market store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub network: Network,
    pub contract_address: String,
    pub app_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            contract_address: ZERO_ADDRESS.to_string(),
            app_name: DEFAULT_APP_NAME.to_string(),
        }
    }
}

impl AppConfig {
    /// Load the config from `dir`. A missing file yields defaults; an
    /// unreadable one is logged and also yields defaults.
    pub fn load(dir: &Path) -> Self {
        let path = config_path(dir);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                log::warn!("failed to read {}: {e}", path.display());
                return Self::default();
            }
        };
        match serde_json::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("ignoring corrupt config {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, dir: &Path) -> Result<(), ConfigError> {
        fs::create_dir_all(dir)?;
        let json = serde_json::to_string_pretty(self)?;
        fs::write(config_path(dir), json)?;
        Ok(())
    }

    pub fn chain_id(&self) -> u64 {
        self.network.chain_id()
    }
}

pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE)
}

pub fn store_path(dir: &Path) -> PathBuf {
    dir.join(STORE_FILE)
}

pub fn is_first_launch(dir: &Path) -> bool {
    !config_path(dir).exists()
}
