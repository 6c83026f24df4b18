//! Error types for registry operations.
//!
//! Each operation has its own enum so callers can match exhaustively on
//! exactly the failures that operation can produce.

use rust_decimal::Decimal;

use collector_types::{ChunkKey, CollectorId, OwnerId};

/// Why a placement was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    /// The target chunk already hosts a collector.
    #[error("chunk {0} already hosts a collector")]
    ChunkOccupied(ChunkKey),

    /// The owner is at their collector cap.
    #[error("owner {owner} already has {count} of {cap} collectors")]
    OwnerCapExceeded {
        /// The owner at the cap.
        owner: OwnerId,
        /// Collectors currently owned.
        count: u32,
        /// The cap that applies to this owner.
        cap: u32,
    },
}

/// Why a removal was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemovalError {
    /// No collector stands in the target chunk.
    #[error("no collector in chunk {0}")]
    NotFound(ChunkKey),

    /// The collector belongs to a different owner.
    #[error("collector belongs to another owner")]
    NotOwner,
}

/// Why a charge purchase failed. Every failure leaves the collector and
/// the ledger untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChargeError {
    /// No collector with this ID is registered.
    #[error("collector {0} not found")]
    NotFound(CollectorId),

    /// The actor is neither the owner nor an admin.
    #[error("actor is not authorized to charge this collector")]
    NotAuthorized,

    /// The collector already holds its maximum charge for this actor.
    #[error("collector is already fully charged")]
    AlreadyFull,

    /// The remaining headroom rounds down to nothing.
    #[error("no charge headroom remaining")]
    NoHeadroom,

    /// The actor cannot afford the purchase.
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds {
        /// Cost of the purchase.
        needed: Decimal,
        /// The actor's current balance.
        available: Decimal,
    },

    /// The ledger refused the withdrawal after the balance check passed.
    #[error("ledger refused the withdrawal")]
    LedgerError,
}
