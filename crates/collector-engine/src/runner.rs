//! The service loop: periodic sweeps and side-effect dispatch.

use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use collector_core::{
    Registry, ServiceConfig, TickDeps, collection_sweep, tick_sweep, world::World,
};
use collector_economy::{Appraiser, InMemoryLedger, StaticPriceOracle};
use collector_store::CollectorStore;
use collector_types::{Collector, Notification, PersistOp, ResourceKind, SideEffect};

use crate::error::EngineError;

/// Everything the running service owns.
pub struct EngineState<W: World> {
    /// All placed collectors.
    pub registry: Registry,
    /// The world the collectors observe and decorate.
    pub world: W,
    /// The currency ledger settlements deposit into.
    pub ledger: InMemoryLedger,
    /// The persistence backend.
    pub store: CollectorStore,
}

/// Build the price oracle from the configured price table.
///
/// Unknown resource names are skipped with a warning; the appraiser's
/// fallback price covers anything without a quote.
pub fn build_oracle(config: &ServiceConfig) -> StaticPriceOracle {
    let mut oracle = StaticPriceOracle::default();
    for (name, price) in &config.economy.prices {
        match name.parse::<ResourceKind>() {
            Ok(kind) => oracle.set_price(kind, *price),
            Err(e) => warn!(error = %e, "Skipping price entry"),
        }
    }
    oracle
}

/// Run the two periodic passes until a shutdown signal arrives, then
/// flush the registry to storage.
///
/// # Errors
///
/// Returns an error if the final flush or the backend shutdown fails.
pub async fn run<W: World>(
    config: &ServiceConfig,
    mut state: EngineState<W>,
) -> Result<(), EngineError> {
    let allow = config.allow_set();
    let oracle = build_oracle(config);
    let appraiser = Appraiser::new(
        config.economy.fallback_price,
        config.economy.price_multiplier,
    );

    let mut collect_timer =
        tokio::time::interval(Duration::from_millis(config.settings.collection_sweep_ms.max(1)));
    let mut tick_timer = tokio::time::interval(Duration::from_secs(1));

    info!(
        sweep_ms = config.settings.collection_sweep_ms,
        allowed_kinds = allow.len(),
        "Entering service loop"
    );

    loop {
        tokio::select! {
            _ = collect_timer.tick() => {
                let now_ms = Utc::now().timestamp_millis();
                let effects = collection_sweep(
                    &mut state.registry,
                    &mut state.world,
                    &config.settings,
                    &allow,
                    now_ms,
                );
                dispatch(&state.registry, &mut state.world, &mut state.store, effects).await;
            }
            _ = tick_timer.tick() => {
                let now = Utc::now().timestamp();
                let mut deps = TickDeps {
                    ledger: &mut state.ledger,
                    oracle: &oracle,
                    appraiser: &appraiser,
                };
                let effects = tick_sweep(&mut state.registry, now, &config.settings, &mut deps);
                dispatch(&state.registry, &mut state.world, &mut state.store, effects).await;
            }
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    warn!(error = %e, "Shutdown signal listener failed");
                }
                info!("Shutdown signal received");
                break;
            }
        }
    }

    shutdown(&mut state).await
}

/// Apply a batch of side effects: persistence to the store, world
/// effects to the world, notifications to the log.
pub async fn dispatch<W: World>(
    registry: &Registry,
    world: &mut W,
    store: &mut CollectorStore,
    effects: Vec<SideEffect>,
) {
    for effect in effects {
        match effect {
            SideEffect::Persist(PersistOp::SaveOne(id)) => {
                let Some(collector) = registry.lookup_by_id(id) else {
                    continue;
                };
                if let Err(e) = store.save_one(collector).await {
                    warn!(%id, error = %e, "Failed to persist collector");
                }
            }
            SideEffect::Persist(PersistOp::DeleteOne(id)) => {
                if let Err(e) = store.delete_one(id.into_inner()).await {
                    warn!(%id, error = %e, "Failed to delete collector record");
                }
            }
            SideEffect::Notify(notification) => log_notification(&notification),
            SideEffect::Effect { position, effect } => world.play_effect(&position, effect),
        }
    }
}

fn log_notification(notification: &Notification) {
    match notification {
        Notification::Created(id) => info!(%id, "Collector created"),
        Notification::Refreshed(id) => tracing::debug!(%id, "Collector updated"),
        Notification::Depleted(id) => info!(%id, "Collector out of charge"),
        Notification::Removed(id) => info!(%id, "Collector removed"),
        Notification::AutosellCompleted { owner, amount } => {
            info!(%owner, %amount, "Autosell completed");
        }
    }
}

/// Flush every collector to storage and close the backend.
async fn shutdown<W: World>(state: &mut EngineState<W>) -> Result<(), EngineError> {
    let collectors: Vec<Collector> = state.registry.iter().cloned().collect();
    info!(count = collectors.len(), "Flushing registry to storage");
    state.store.save_all(&collectors).await?;
    state.store.shutdown().await?;
    info!("Storage backend closed");
    Ok(())
}
