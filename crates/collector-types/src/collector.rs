//! The collector entity record.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::{CollectorId, OwnerId};
use crate::position::{ChunkKey, Position};
use crate::resource::ResourceKind;

/// A placed collector and its full mutable state.
///
/// Identity, ownership, and position are fixed at placement; a collector
/// is removed and re-created rather than moved. Everything else changes
/// over the collector's lifetime through charging, collection, and
/// settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collector {
    /// Immutable identity, assigned at creation.
    pub id: CollectorId,
    /// Owning account.
    pub owner_id: OwnerId,
    /// Display name of the owner at placement time.
    pub owner_name: String,
    /// Where the collector stands.
    pub position: Position,
    /// Epoch seconds at creation.
    pub created_at: i64,
    /// Seconds of charge left. The collector is active while positive.
    pub time_remaining: i64,
    /// High-water mark of `time_remaining`, used to scale the battery
    /// display. Never clamps anything.
    pub max_charge_observed: i64,
    /// Total units ever collected. Monotonic.
    pub items_collected: u64,
    /// Resources accumulated since the last settlement.
    pub pending: BTreeMap<ResourceKind, u64>,
    /// Lifetime currency earned through settlement. Never decreases.
    pub total_earned: Decimal,
    /// Epoch seconds of the last autosell settlement.
    pub last_autosell_at: i64,
    /// Epoch milliseconds of the last collection effect, for the cosmetic
    /// effect cooldown.
    pub last_effect_at: i64,
}

impl Collector {
    /// Create a fresh, uncharged collector at a position.
    pub fn new(
        owner_id: OwnerId,
        owner_name: String,
        position: Position,
        created_at: i64,
    ) -> Self {
        Self {
            id: CollectorId::new(),
            owner_id,
            owner_name,
            position,
            created_at,
            time_remaining: 0,
            max_charge_observed: 0,
            items_collected: 0,
            pending: BTreeMap::new(),
            total_earned: Decimal::ZERO,
            last_autosell_at: created_at,
            last_effect_at: 0,
        }
    }

    /// Whether the collector currently has charge.
    pub const fn is_active(&self) -> bool {
        self.time_remaining > 0
    }

    /// The chunk this collector occupies.
    pub fn chunk_key(&self) -> ChunkKey {
        self.position.chunk_key()
    }

    /// Record a collected item stack into the pending map. The lifetime
    /// counter advances by the number of units in the stack.
    pub fn record_collection(&mut self, kind: ResourceKind, quantity: u64) {
        let slot = self.pending.entry(kind).or_insert(0);
        *slot = slot.saturating_add(quantity);
        self.items_collected = self.items_collected.saturating_add(quantity);
    }

    /// Charge level as a fraction of the largest charge the collector has
    /// ever held, for battery-style displays.
    ///
    /// The denominator is at least `default_charge_secs` so a collector
    /// that was never charged beyond one purchase still renders sensibly.
    /// Returns a value in `[0, 1]`.
    pub fn charge_ratio(&self, default_charge_secs: i64) -> Decimal {
        let scale = self.max_charge_observed.max(default_charge_secs).max(1);
        let ratio = Decimal::from(self.time_remaining.max(0))
            .checked_div(Decimal::from(scale))
            .unwrap_or(Decimal::ZERO);
        ratio.clamp(Decimal::ZERO, Decimal::ONE)
    }
}
