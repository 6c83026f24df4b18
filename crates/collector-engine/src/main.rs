//! Service binary for the chunk collector.
//!
//! Wires the registry, the world seam, the economy, and the storage
//! backend together, then runs the periodic sweeps until shutdown.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `collector-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Open the storage backend (file fallback on failure)
//! 4. Load persisted collectors into the registry
//! 5. Run the service loop
//! 6. Flush the registry and close the backend

mod error;
mod runner;

use std::path::Path;

use tracing::info;
use tracing_subscriber::EnvFilter;

use collector_core::{Registry, ServiceConfig, StubWorld};
use collector_economy::InMemoryLedger;
use collector_store::CollectorStore;

use crate::error::EngineError;
use crate::runner::EngineState;

/// Application entry point for the collector service.
///
/// # Errors
///
/// Returns an error if startup or the final storage flush fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .with_target(true)
        .init();

    info!("collector-engine starting");
    info!(
        backend = ?config.storage.backend,
        sweep_ms = config.settings.collection_sweep_ms,
        autosell_interval_secs = config.settings.autosell_interval_secs,
        max_collectors_per_owner = config.settings.max_collectors_per_owner,
        "Configuration loaded"
    );

    // 3. Open the storage backend.
    let store = CollectorStore::open(&config.storage).await?;
    info!(backend = ?store.backend(), "Storage backend opened");

    // 4. Load persisted collectors.
    let stored = store.load_all().await?;
    let mut registry = Registry::new();
    registry.load_from(stored);
    info!(count = registry.len(), "Collectors restored");

    // 5. Run the service loop.
    let state = EngineState {
        registry,
        world: StubWorld::new(),
        ledger: InMemoryLedger::new(),
        store,
    };
    runner::run(&config, state).await?;

    info!("collector-engine shutdown complete");
    Ok(())
}

/// Load the service configuration from `collector-config.yaml`.
///
/// Looks for the config file relative to the current working directory
/// and falls back to defaults if it is absent.
fn load_config() -> Result<ServiceConfig, EngineError> {
    let config_path = Path::new("collector-config.yaml");
    if config_path.exists() {
        Ok(ServiceConfig::from_file(config_path)?)
    } else {
        Ok(ServiceConfig::default())
    }
}
