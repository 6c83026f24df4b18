//! Shared type definitions for the chunk collector service.
//!
//! This crate is the single source of truth for the types used across the
//! workspace.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for entity identifiers
//! - [`position`] -- World positions and chunk keys
//! - [`resource`] -- Collectible resource kinds and ground items
//! - [`collector`] -- The collector entity record
//! - [`auth`] -- Actor authorization grants
//! - [`events`] -- Side effects returned by registry operations

pub mod auth;
pub mod collector;
pub mod events;
pub mod ids;
pub mod position;
pub mod resource;

// Re-export all public types at crate root for convenience.
pub use auth::{ActorAuth, MAX_TIER_RANK};
pub use collector::Collector;
pub use events::{Notification, PersistOp, SideEffect, WorldEffect};
pub use ids::{CollectorId, ItemId, OwnerId};
pub use position::{ChunkKey, Position};
pub use resource::{GroundItem, ResourceKind, UnknownResourceKind};
