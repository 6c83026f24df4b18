//! Registry, sweeps, and charge lifecycle for the chunk collector service.
//!
//! This crate owns the in-memory domain state and the two periodic
//! passes that drive it: the collection sweep that vacuums ground items
//! and the per-second tick that burns charge and settles earnings.
//!
//! # Modules
//!
//! - [`charge`] -- Charge purchases against a [`LedgerAdapter`].
//! - [`config`] -- Configuration loading from `collector-config.yaml`
//!   into strongly-typed structs.
//! - [`error`] -- Placement, removal, and charge error types.
//! - [`registry`] -- The triple-indexed [`Registry`] of placed
//!   collectors.
//! - [`settle`] -- Pending-item settlement against the ledger.
//! - [`sweep`] -- The ground-item collection sweep.
//! - [`tick`] -- The per-second charge and settlement tick.
//! - [`world`] -- The [`World`] seam and its test stub.
//!
//! [`LedgerAdapter`]: collector_economy::LedgerAdapter
//! [`Registry`]: registry::Registry
//! [`World`]: world::World

pub mod charge;
pub mod config;
pub mod error;
pub mod registry;
pub mod settle;
pub mod sweep;
pub mod tick;
pub mod world;

pub use charge::{ChargeReceipt, max_duration_secs};
pub use config::{
    ConfigError, EconomyConfig, LoggingConfig, OfflineEarnings, ServiceConfig, SettingsConfig,
};
pub use error::{ChargeError, PlacementError, RemovalError};
pub use registry::Registry;
pub use settle::settle_collector;
pub use sweep::collection_sweep;
pub use tick::{TickDeps, tick_sweep};
pub use world::{StubWorld, World};
