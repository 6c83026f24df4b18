//! The persisted shape of a collector.
//!
//! [`CollectorRecord`] is the serialization boundary shared by all three
//! backends. Pending resources are written by the database backends for
//! inspection but are never restored on load: accumulated-but-unsold
//! items do not survive a restart on any backend.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use collector_types::{Collector, Position};

/// One collector as stored on disk, in a row, or under a key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectorRecord {
    /// Collector identity.
    pub id: Uuid,
    /// Owning account.
    pub owner_id: Uuid,
    /// Owner display name at placement time.
    pub owner_name: String,
    /// World name.
    pub world: String,
    /// East-west coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// North-south coordinate.
    pub z: f64,
    /// Horizontal facing in degrees.
    #[serde(default)]
    pub yaw: f32,
    /// Vertical facing in degrees.
    #[serde(default)]
    pub pitch: f32,
    /// Epoch seconds at creation.
    pub created_at: i64,
    /// Seconds of charge left.
    pub time_remaining: i64,
    /// Total item stacks ever collected.
    pub items_collected: u64,
    /// Whether the collector was active when saved.
    pub active: bool,
    /// High-water mark of `time_remaining`.
    #[serde(default)]
    pub max_charge_observed: i64,
    /// Lifetime currency earned.
    #[serde(default)]
    pub total_earned: Decimal,
    /// Epoch seconds of the last settlement.
    #[serde(default)]
    pub last_autosell_at: i64,
    /// Unsold resources at save time, keyed by canonical kind name.
    /// Written for inspection only; the load path never restores it.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pending: BTreeMap<String, u64>,
}

impl CollectorRecord {
    /// Capture the persisted fields of a live collector, pending included.
    pub fn from_collector(c: &Collector) -> Self {
        Self {
            id: c.id.into_inner(),
            owner_id: c.owner_id.into_inner(),
            owner_name: c.owner_name.clone(),
            world: c.position.world.clone(),
            x: c.position.x,
            y: c.position.y,
            z: c.position.z,
            yaw: c.position.yaw,
            pitch: c.position.pitch,
            created_at: c.created_at,
            time_remaining: c.time_remaining,
            items_collected: c.items_collected,
            active: c.is_active(),
            max_charge_observed: c.max_charge_observed,
            total_earned: c.total_earned,
            last_autosell_at: c.last_autosell_at,
            pending: c
                .pending
                .iter()
                .map(|(kind, qty)| (kind.as_str().to_owned(), *qty))
                .collect(),
        }
    }

    /// The same record with the pending map stripped. The flat-file
    /// backend writes this shape.
    #[must_use]
    pub fn without_pending(mut self) -> Self {
        self.pending.clear();
        self
    }

    /// Rebuild a live collector. The pending map always starts empty.
    pub fn into_collector(self) -> Collector {
        Collector {
            id: self.id.into(),
            owner_id: self.owner_id.into(),
            owner_name: self.owner_name,
            position: Position {
                world: self.world,
                x: self.x,
                y: self.y,
                z: self.z,
                yaw: self.yaw,
                pitch: self.pitch,
            },
            created_at: self.created_at,
            time_remaining: self.time_remaining,
            max_charge_observed: self.max_charge_observed,
            items_collected: self.items_collected,
            pending: BTreeMap::new(),
            total_earned: self.total_earned,
            last_autosell_at: self.last_autosell_at,
            last_effect_at: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use collector_types::{OwnerId, ResourceKind};

    use super::*;

    fn make_collector() -> Collector {
        let mut c = Collector::new(
            OwnerId::new(),
            "alex".to_owned(),
            Position::new("overworld".to_owned(), 1.0, 70.0, 2.0),
            1_700_000_000,
        );
        c.time_remaining = 120;
        c.max_charge_observed = 3600;
        c.total_earned = Decimal::from(42);
        c.record_collection(ResourceKind::Wheat, 5);
        c
    }

    #[test]
    fn record_captures_pending_but_load_drops_it() {
        let collector = make_collector();
        let record = CollectorRecord::from_collector(&collector);
        assert_eq!(record.pending.get("WHEAT"), Some(&5));
        assert!(record.active);

        let restored = record.into_collector();
        assert!(restored.pending.is_empty());
        assert_eq!(restored.time_remaining, 120);
        assert_eq!(restored.total_earned, Decimal::from(42));
        assert_eq!(restored.id, collector.id);
    }

    #[test]
    fn without_pending_strips_the_map() {
        let record = CollectorRecord::from_collector(&make_collector()).without_pending();
        assert!(record.pending.is_empty());
    }
}
