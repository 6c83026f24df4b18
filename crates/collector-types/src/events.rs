//! Side effects produced by registry operations.
//!
//! Registry mutations never touch storage, presentation, or the world
//! directly. Each operation returns the list of side effects it implies,
//! and the caller dispatches them after the mutation has committed. This
//! keeps every state transition synchronous and directly testable.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::{CollectorId, OwnerId};
use crate::position::Position;

/// A persistence action implied by a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersistOp {
    /// Upsert the record for one collector.
    SaveOne(CollectorId),
    /// Delete the record for one collector.
    DeleteOne(CollectorId),
}

/// A presentation event for whatever front end is wired in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Notification {
    /// A collector was placed.
    Created(CollectorId),
    /// A collector's visible state changed (charge, pending, earnings).
    Refreshed(CollectorId),
    /// A collector's charge ran out.
    Depleted(CollectorId),
    /// A collector was removed.
    Removed(CollectorId),
    /// An autosell settlement paid out.
    AutosellCompleted {
        /// Owner who was paid.
        owner: OwnerId,
        /// Amount deposited (or forfeited, when the owner was unreachable).
        amount: Decimal,
    },
}

/// A cosmetic world effect requested at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldEffect {
    /// Placement burst played when a collector is created.
    PlaceBurst,
    /// Break effect played when a collector is removed.
    BreakBurst,
    /// Spark shown when an item is collected.
    CollectSpark,
    /// Chime played on a successful recharge.
    RechargeChime,
    /// Fizzle played when charge runs out.
    DepletionFizzle,
}

/// One deferred action implied by a registry state transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SideEffect {
    /// Write-behind persistence work.
    Persist(PersistOp),
    /// Presentation event.
    Notify(Notification),
    /// Cosmetic effect at a world position.
    Effect {
        /// Where to play the effect.
        position: Position,
        /// Which effect to play.
        effect: WorldEffect,
    },
}

impl SideEffect {
    /// Shorthand for a persistence save.
    pub const fn save(id: CollectorId) -> Self {
        Self::Persist(PersistOp::SaveOne(id))
    }

    /// Shorthand for a persistence delete.
    pub const fn delete(id: CollectorId) -> Self {
        Self::Persist(PersistOp::DeleteOne(id))
    }
}
