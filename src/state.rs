use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use predmarket_sdk::{MarketWizard, Network};
use predmarket_store::MarketStore;
use serde::Serialize;

use crate::config::{self, AppConfig};

static ID_COUNTER: AtomicU64 = AtomicU64::new(1);

fn next_id(prefix: &str) -> String {
    let id = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id}")
}

// ============================================================================
// Network status & app state (sent to frontend)
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStatus {
    pub network: String,
    pub is_mainnet: bool,
    pub chain_id: u64,
    pub contract_address: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub revision: u64,
    pub app_name: String,
    pub network_status: NetworkStatus,
    pub market_count: i64,
    pub open_wizards: Vec<String>,
}

// ============================================================================
// App state manager
// ============================================================================

pub struct AppStateManager {
    app_data_dir: PathBuf,
    config: AppConfig,
    store: Option<MarketStore>,
    wizards: HashMap<String, MarketWizard>,
    revision: u64,
}

impl AppStateManager {
    pub fn new(app_data_dir: PathBuf) -> Self {
        let config = AppConfig::load(&app_data_dir);
        Self {
            app_data_dir,
            config,
            store: None,
            wizards: HashMap::new(),
            revision: 0,
        }
    }

    /// Open the market store in the app data directory.
    pub fn initialize(&mut self) -> Result<(), String> {
        std::fs::create_dir_all(&self.app_data_dir)
            .map_err(|e| format!("failed to create app data dir: {e}"))?;
        let path = config::store_path(&self.app_data_dir);
        let path_str = path
            .to_str()
            .ok_or_else(|| format!("non-utf8 store path: {}", path.display()))?;
        let store = MarketStore::open(path_str).map_err(|e| e.to_string())?;
        log::info!("market store opened at {}", path.display());
        self.store = Some(store);
        Ok(())
    }

    pub fn app_data_dir(&self) -> &Path {
        &self.app_data_dir
    }

    pub fn is_first_launch(&self) -> bool {
        config::is_first_launch(&self.app_data_dir)
    }

    pub fn is_initialized(&self) -> bool {
        self.store.is_some()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn network(&self) -> Network {
        self.config.network
    }

    pub fn set_network(&mut self, network: Network) -> Result<AppState, String> {
        self.config.network = network;
        self.config
            .save(&self.app_data_dir)
            .map_err(|e| e.to_string())?;
        log::info!("network set to {}", network.as_str());
        self.bump_revision();
        Ok(self.snapshot())
    }

    pub fn store_mut(&mut self) -> Result<&mut MarketStore, String> {
        self.store
            .as_mut()
            .ok_or_else(|| "Market store not initialized".to_string())
    }

    // --- Wizard sessions ---

    pub fn open_wizard(&mut self) -> String {
        let id = next_id("wizard");
        self.wizards.insert(id.clone(), MarketWizard::new());
        log::debug!("opened {id}");
        id
    }

    pub fn close_wizard(&mut self, id: &str) -> bool {
        let removed = self.wizards.remove(id).is_some();
        if removed {
            log::debug!("closed {id}");
        }
        removed
    }

    pub fn wizard(&self, id: &str) -> Result<&MarketWizard, String> {
        self.wizards
            .get(id)
            .ok_or_else(|| format!("Unknown wizard: {id}"))
    }

    pub fn wizard_mut(&mut self, id: &str) -> Result<&mut MarketWizard, String> {
        self.wizards
            .get_mut(id)
            .ok_or_else(|| format!("Unknown wizard: {id}"))
    }

    // --- Snapshot ---

    pub fn network_status(&self) -> NetworkStatus {
        let network = self.config.network;
        NetworkStatus {
            network: network.as_str().to_string(),
            is_mainnet: network.is_mainnet(),
            chain_id: network.chain_id(),
            contract_address: self.config.contract_address.clone(),
        }
    }

    pub fn snapshot(&mut self) -> AppState {
        let market_count = match self.store.as_mut() {
            Some(store) => store.count_markets().unwrap_or_else(|e| {
                log::warn!("failed to count markets: {e}");
                0
            }),
            None => 0,
        };

        let mut open_wizards: Vec<String> = self.wizards.keys().cloned().collect();
        open_wizards.sort();

        AppState {
            revision: self.revision,
            app_name: self.config.app_name.clone(),
            network_status: self.network_status(),
            market_count,
            open_wizards,
        }
    }

    pub fn bump_revision(&mut self) {
        self.revision += 1;
    }
}
