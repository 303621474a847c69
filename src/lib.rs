pub mod commands;
pub mod config;
pub mod invoke;
pub mod state;

use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub use config::AppConfig;
pub use state::{AppState, AppStateManager, NetworkStatus};

const DEFAULT_LOG_FILTER: &str = "info,diesel=warn,diesel_migrations=warn";

/// Install the process-wide log backend. `log` records from every crate are
/// forwarded to a stderr formatter filtered by `RUST_LOG`. Later calls are
/// no-ops.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

/// Build the shared state the command layer runs against: load the config
/// and open the market store under `app_data_dir`.
pub fn init_state(app_data_dir: PathBuf) -> Result<Mutex<AppStateManager>, String> {
    let mut manager = AppStateManager::new(app_data_dir);
    manager.initialize()?;
    if manager.is_first_launch() {
        log::info!("first launch, using default config");
    }
    Ok(Mutex::new(manager))
}

// ============================================================================
// App Entry Point
// ============================================================================

/// Install logging, open the app state and serve commands over stdio until
/// stdin closes.
pub fn run(app_data_dir: PathBuf) -> Result<(), String> {
    init_logging();
    let manager = init_state(app_data_dir)?;
    log::info!("serving commands on stdin");

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    invoke::serve(&manager, stdin.lock(), stdout.lock())
        .map_err(|e| format!("command stream failed: {e}"))
}
