//! The collector registry: every placed collector, indexed three ways.
//!
//! The [`Registry`] stores all collectors by ID, an occupancy index by
//! chunk key, and a per-owner count. All three maps are updated as one
//! atomic unit under `&mut self`; callers that share the registry across
//! tasks wrap it in a mutex, which makes every operation a serialized
//! check-and-commit. Insertion into the chunk index goes through the map
//! entry, so the uniqueness check and the claim are a single step.

use std::collections::BTreeMap;

use collector_economy::LedgerAdapter;
use collector_types::{
    ActorAuth, ChunkKey, Collector, CollectorId, Notification, OwnerId, Position, SideEffect,
    WorldEffect,
};

use crate::charge::{self, ChargeReceipt};
use crate::config::SettingsConfig;
use crate::error::{ChargeError, PlacementError, RemovalError};

/// All placed collectors and their spatial/ownership indexes.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    /// Primary store, by collector ID.
    by_id: BTreeMap<CollectorId, Collector>,
    /// Occupancy index: chunk -> the collector standing in it.
    by_chunk: BTreeMap<ChunkKey, CollectorId>,
    /// Per-owner collector counts, for cap enforcement.
    owner_counts: BTreeMap<OwnerId, u32>,
}

impl Registry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            by_id: BTreeMap::new(),
            by_chunk: BTreeMap::new(),
            owner_counts: BTreeMap::new(),
        }
    }

    // -------------------------------------------------------------------
    // Placement and removal
    // -------------------------------------------------------------------

    /// Place a new collector at a position.
    ///
    /// The owner cap is checked first (tiered grants may raise or lift
    /// it), then the chunk claim is made through the occupancy index
    /// entry. On success all three maps are updated together.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::OwnerCapExceeded`] if the owner is at
    /// their cap, or [`PlacementError::ChunkOccupied`] if the chunk
    /// already hosts a collector.
    pub fn place(
        &mut self,
        owner_id: OwnerId,
        owner_name: &str,
        position: Position,
        auth: &ActorAuth,
        settings: &SettingsConfig,
        now_epoch_secs: i64,
    ) -> Result<(CollectorId, Vec<SideEffect>), PlacementError> {
        let count = self.owner_counts.get(&owner_id).copied().unwrap_or(0);
        if let Some(cap) = auth.collector_cap(settings.max_collectors_per_owner)
            && count >= cap
        {
            return Err(PlacementError::OwnerCapExceeded {
                owner: owner_id,
                count,
                cap,
            });
        }

        let chunk = position.chunk_key();
        let entry = self.by_chunk.entry(chunk.clone());
        let std::collections::btree_map::Entry::Vacant(vacant) = entry else {
            return Err(PlacementError::ChunkOccupied(chunk));
        };

        let collector = Collector::new(owner_id, owner_name.to_owned(), position, now_epoch_secs);
        let id = collector.id;
        let effect_position = collector.position.clone();

        vacant.insert(id);
        self.by_id.insert(id, collector);
        *self.owner_counts.entry(owner_id).or_insert(0) =
            count.saturating_add(1);

        tracing::info!(%id, %owner_id, chunk = %chunk, "Collector placed");

        let effects = vec![
            SideEffect::save(id),
            SideEffect::Notify(Notification::Created(id)),
            SideEffect::Effect {
                position: effect_position,
                effect: WorldEffect::PlaceBurst,
            },
        ];
        Ok((id, effects))
    }

    /// Remove the collector standing at a position.
    ///
    /// Only the owner may remove a collector through this path.
    ///
    /// # Errors
    ///
    /// Returns [`RemovalError::NotFound`] if the chunk hosts no
    /// collector, or [`RemovalError::NotOwner`] if it belongs to someone
    /// else.
    pub fn remove(
        &mut self,
        actor_id: OwnerId,
        position: &Position,
    ) -> Result<(CollectorId, Vec<SideEffect>), RemovalError> {
        let chunk = position.chunk_key();
        let Some(&id) = self.by_chunk.get(&chunk) else {
            return Err(RemovalError::NotFound(chunk));
        };
        let Some(collector) = self.by_id.get(&id) else {
            return Err(RemovalError::NotFound(chunk));
        };
        if collector.owner_id != actor_id {
            return Err(RemovalError::NotOwner);
        }

        let owner_id = collector.owner_id;
        let effect_position = collector.position.clone();

        self.by_chunk.remove(&chunk);
        self.by_id.remove(&id);
        if let Some(count) = self.owner_counts.get_mut(&owner_id) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.owner_counts.remove(&owner_id);
            }
        }

        tracing::info!(%id, %owner_id, chunk = %chunk, "Collector removed");

        let effects = vec![
            SideEffect::delete(id),
            SideEffect::Notify(Notification::Removed(id)),
            SideEffect::Effect {
                position: effect_position,
                effect: WorldEffect::BreakBurst,
            },
        ];
        Ok((id, effects))
    }

    // -------------------------------------------------------------------
    // Charging
    // -------------------------------------------------------------------

    /// Purchase charge for a collector on behalf of an actor.
    ///
    /// See [`charge::add_charge`] for the full state machine. Any error
    /// leaves the collector and the ledger untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ChargeError`] with the first check that failed.
    pub fn add_charge<L: LedgerAdapter + ?Sized>(
        &mut self,
        id: CollectorId,
        actor_id: OwnerId,
        auth: &ActorAuth,
        ledger: &mut L,
        settings: &SettingsConfig,
    ) -> Result<(ChargeReceipt, Vec<SideEffect>), ChargeError> {
        let collector = self.by_id.get_mut(&id).ok_or(ChargeError::NotFound(id))?;
        charge::add_charge(collector, actor_id, auth, ledger, settings)
    }

    // -------------------------------------------------------------------
    // Lookups
    // -------------------------------------------------------------------

    /// The collector standing in the chunk containing a position.
    pub fn lookup_by_position(&self, position: &Position) -> Option<&Collector> {
        let id = self.by_chunk.get(&position.chunk_key())?;
        self.by_id.get(id)
    }

    /// A collector by ID.
    pub fn lookup_by_id(&self, id: CollectorId) -> Option<&Collector> {
        self.by_id.get(&id)
    }

    /// All collectors belonging to an owner, in no particular order.
    pub fn collectors_by_owner(&self, owner: OwnerId) -> Vec<&Collector> {
        self.by_id
            .values()
            .filter(|c| c.owner_id == owner)
            .collect()
    }

    /// How many collectors an owner currently has.
    pub fn owner_count(&self, owner: OwnerId) -> u32 {
        self.owner_counts.get(&owner).copied().unwrap_or(0)
    }

    /// Iterate over all collectors immutably.
    pub fn iter(&self) -> impl Iterator<Item = &Collector> {
        self.by_id.values()
    }

    /// Iterate over all collectors mutably. Positions are also the chunk
    /// index keys, so this stays crate-internal.
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Collector> {
        self.by_id.values_mut()
    }

    /// Number of placed collectors.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    // -------------------------------------------------------------------
    // Bulk load
    // -------------------------------------------------------------------

    /// Rebuild the registry from stored records at startup.
    ///
    /// A record whose chunk is already claimed is skipped with a warning;
    /// the first record for a chunk wins.
    pub fn load_from(&mut self, records: Vec<Collector>) {
        for collector in records {
            let chunk = collector.chunk_key();
            let entry = self.by_chunk.entry(chunk.clone());
            let std::collections::btree_map::Entry::Vacant(vacant) = entry else {
                tracing::warn!(
                    id = %collector.id,
                    chunk = %chunk,
                    "Skipping stored collector: chunk already claimed"
                );
                continue;
            };
            vacant.insert(collector.id);
            let owner = collector.owner_id;
            *self.owner_counts.entry(owner).or_insert(0) = self
                .owner_counts
                .get(&owner)
                .copied()
                .unwrap_or(0)
                .saturating_add(1);
            self.by_id.insert(collector.id, collector);
        }
        tracing::info!(count = self.by_id.len(), "Registry loaded");
    }
}
