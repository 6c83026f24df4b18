//! World positions and the chunk keys derived from them.
//!
//! A [`Position`] is a full entity placement (world, block coordinates,
//! orientation). A [`ChunkKey`] is the 16x16-column bucket a position
//! falls into; it is the uniqueness key for collector placement and the
//! addressing unit for the collection sweep.

use serde::{Deserialize, Serialize};

/// A placement in a named world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Name of the world the position belongs to.
    pub world: String,
    /// East-west coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// North-south coordinate.
    pub z: f64,
    /// Horizontal facing in degrees.
    pub yaw: f32,
    /// Vertical facing in degrees.
    pub pitch: f32,
}

impl Position {
    /// Create a position with zero orientation.
    pub const fn new(world: String, x: f64, y: f64, z: f64) -> Self {
        Self {
            world,
            x,
            y,
            z,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// The chunk this position falls into.
    pub fn chunk_key(&self) -> ChunkKey {
        ChunkKey::of(&self.world, self.x, self.z)
    }
}

/// Convert a continuous coordinate to its integer block coordinate.
///
/// Values beyond the representable block range are clamped to it, so the
/// truncation below cannot lose information.
fn block_coord(v: f64) -> i32 {
    let clamped = v.floor().clamp(f64::from(i32::MIN), f64::from(i32::MAX));
    #[allow(clippy::cast_possible_truncation)]
    let block = clamped as i32;
    block
}

/// Identifies one 16x16 chunk column within a named world.
///
/// Two positions in the same chunk produce equal keys, which is what
/// enforces the one-collector-per-chunk invariant.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChunkKey {
    /// Name of the world.
    pub world: String,
    /// Chunk x coordinate (block x divided by 16, floored).
    pub cx: i32,
    /// Chunk z coordinate (block z divided by 16, floored).
    pub cz: i32,
}

impl ChunkKey {
    /// Derive the chunk key for a block position in a world.
    pub fn of(world: &str, x: f64, z: f64) -> Self {
        Self {
            world: world.to_owned(),
            cx: block_coord(x).div_euclid(16),
            cz: block_coord(z).div_euclid(16),
        }
    }
}

impl core::fmt::Display for ChunkKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}:{}", self.world, self.cx, self.cz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_chunk_same_key() {
        let a = Position::new("overworld".to_owned(), 3.2, 64.0, 12.9);
        let b = Position::new("overworld".to_owned(), 15.9, 70.0, 0.1);
        assert_eq!(a.chunk_key(), b.chunk_key());
    }

    #[test]
    fn chunk_boundary_splits_keys() {
        let inside = Position::new("overworld".to_owned(), 15.9, 64.0, 0.0);
        let outside = Position::new("overworld".to_owned(), 16.0, 64.0, 0.0);
        assert_ne!(inside.chunk_key(), outside.chunk_key());
    }

    #[test]
    fn negative_coordinates_floor_toward_negative_infinity() {
        let key = ChunkKey::of("overworld", -0.5, -16.0);
        assert_eq!(key.cx, -1);
        assert_eq!(key.cz, -1);
    }

    #[test]
    fn different_worlds_never_collide() {
        let a = ChunkKey::of("overworld", 8.0, 8.0);
        let b = ChunkKey::of("nether", 8.0, 8.0);
        assert_ne!(a, b);
    }

    #[test]
    fn display_format() {
        let key = ChunkKey::of("overworld", 33.0, -1.0);
        assert_eq!(key.to_string(), "overworld:2:-1");
    }
}
