//! The world collaborator seam.
//!
//! The collection sweep needs four things from whatever game world hosts
//! the collectors: chunk residency, ground item enumeration, item
//! removal, and cosmetic effects. All are best-effort and non-failing;
//! a world that cannot honor a request simply drops it.
//!
//! [`StubWorld`] is an in-memory implementation used by tests and the
//! default wiring.

use std::collections::{BTreeMap, BTreeSet};

use collector_types::{ChunkKey, GroundItem, ItemId, Position, WorldEffect};

/// The game world as seen by the collection sweep.
pub trait World {
    /// Whether the chunk is currently loaded. Collectors in unloaded
    /// chunks are skipped entirely.
    fn is_chunk_resident(&self, chunk: &ChunkKey) -> bool;

    /// The transient ground items currently inside the chunk.
    fn ground_items(&self, chunk: &ChunkKey) -> Vec<GroundItem>;

    /// Remove an item entity from the world. Unknown IDs are ignored.
    fn remove_item(&mut self, item: ItemId);

    /// Play a cosmetic effect at a position.
    fn play_effect(&mut self, position: &Position, effect: WorldEffect);
}

/// In-memory world for tests and default wiring.
#[derive(Debug, Clone, Default)]
pub struct StubWorld {
    resident: BTreeSet<ChunkKey>,
    items: BTreeMap<ChunkKey, Vec<GroundItem>>,
    /// Items removed so far, in removal order.
    pub removed: Vec<ItemId>,
    /// Effects played so far, in order.
    pub effects: Vec<(Position, WorldEffect)>,
}

impl StubWorld {
    /// Create an empty world with no resident chunks.
    pub const fn new() -> Self {
        Self {
            resident: BTreeSet::new(),
            items: BTreeMap::new(),
            removed: Vec::new(),
            effects: Vec::new(),
        }
    }

    /// Mark a chunk as loaded.
    pub fn load_chunk(&mut self, chunk: ChunkKey) {
        self.resident.insert(chunk);
    }

    /// Mark a chunk as unloaded.
    pub fn unload_chunk(&mut self, chunk: &ChunkKey) {
        self.resident.remove(chunk);
    }

    /// Drop an item into a chunk.
    pub fn drop_item(&mut self, chunk: ChunkKey, item: GroundItem) {
        self.items.entry(chunk).or_default().push(item);
    }
}

impl World for StubWorld {
    fn is_chunk_resident(&self, chunk: &ChunkKey) -> bool {
        self.resident.contains(chunk)
    }

    fn ground_items(&self, chunk: &ChunkKey) -> Vec<GroundItem> {
        self.items.get(chunk).cloned().unwrap_or_default()
    }

    fn remove_item(&mut self, item: ItemId) {
        for items in self.items.values_mut() {
            items.retain(|i| i.id != item);
        }
        self.removed.push(item);
    }

    fn play_effect(&mut self, position: &Position, effect: WorldEffect) {
        self.effects.push((position.clone(), effect));
    }
}

#[cfg(test)]
mod tests {
    use collector_types::ResourceKind;

    use super::*;

    #[test]
    fn residency_tracks_load_state() {
        let mut world = StubWorld::new();
        let chunk = ChunkKey::of("overworld", 0.0, 0.0);
        assert!(!world.is_chunk_resident(&chunk));
        world.load_chunk(chunk.clone());
        assert!(world.is_chunk_resident(&chunk));
        world.unload_chunk(&chunk);
        assert!(!world.is_chunk_resident(&chunk));
    }

    #[test]
    fn remove_item_clears_it_from_the_chunk() {
        let mut world = StubWorld::new();
        let chunk = ChunkKey::of("overworld", 0.0, 0.0);
        let item = GroundItem {
            id: ItemId::new(),
            kind: ResourceKind::Wheat,
            quantity: 1,
            y: 64.0,
            claimed: false,
        };
        world.drop_item(chunk.clone(), item.clone());
        assert_eq!(world.ground_items(&chunk).len(), 1);

        world.remove_item(item.id);
        assert!(world.ground_items(&chunk).is_empty());
        assert_eq!(world.removed, vec![item.id]);
    }
}
