//! The collection sweep: vacuuming ground items into pending buffers.

use std::collections::BTreeSet;

use collector_types::{Notification, ResourceKind, SideEffect, WorldEffect};

use crate::config::SettingsConfig;
use crate::registry::Registry;
use crate::world::World;

/// Run one collection pass over every active collector.
///
/// A collector only collects while its chunk is resident in the world.
/// Items are filtered by claim status, the configured height band, and
/// the allow set, then moved into the collector's pending buffer. The
/// pickup spark is rate-limited per collector by the effect cooldown.
///
/// Collected items live only in the in-memory pending buffer until the
/// next settlement, so the sweep emits no persistence operations.
pub fn collection_sweep<W: World + ?Sized>(
    registry: &mut Registry,
    world: &mut W,
    settings: &SettingsConfig,
    allow: &BTreeSet<ResourceKind>,
    now_epoch_ms: i64,
) -> Vec<SideEffect> {
    let min_y = f64::from(settings.min_collection_height);
    let max_y = f64::from(settings.max_collection_height);

    let mut effects = Vec::new();
    for collector in registry.iter_mut() {
        if !collector.is_active() {
            continue;
        }
        let chunk = collector.chunk_key();
        if !world.is_chunk_resident(&chunk) {
            continue;
        }

        let mut changed = false;
        for item in world.ground_items(&chunk) {
            if item.claimed || item.y < min_y || item.y > max_y {
                continue;
            }
            if !allow.contains(&item.kind) {
                continue;
            }
            collector.record_collection(item.kind, item.quantity);
            world.remove_item(item.id);
            changed = true;
        }

        if changed {
            if now_epoch_ms.saturating_sub(collector.last_effect_at)
                >= settings.collection_effect_cooldown_ms
            {
                world.play_effect(&collector.position, WorldEffect::CollectSpark);
                collector.last_effect_at = now_epoch_ms;
            }
            effects.push(SideEffect::Notify(Notification::Refreshed(collector.id)));
        }
    }
    effects
}
