//! Authorization grants carried by an actor into registry operations.
//!
//! Grants are resolved by whatever permission system fronts the service
//! and handed in as plain data. Tiered grants are ranked 1 through 100;
//! when several are held, the strongest (highest rank) wins.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Highest tier rank scanned when resolving ranked grants.
pub const MAX_TIER_RANK: u8 = 100;

/// The set of grants an actor holds for collector operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorAuth {
    /// Administrative override: may charge collectors owned by others.
    pub admin: bool,
    /// Exempt from the per-owner collector cap.
    pub bypass_cap: bool,
    /// Unlimited charge tier: a fixed 24-hour buffer instead of ranked
    /// hour tiers.
    pub unlimited_charge: bool,
    /// Unlimited collector count, regardless of ranked cap tiers.
    pub unlimited_collectors: bool,
    /// Ranked charge tiers held (rank N grants N extra hours of headroom).
    pub charge_tiers: BTreeSet<u8>,
    /// Ranked collector-count tiers held (rank N allows N collectors).
    pub collector_tiers: BTreeSet<u8>,
}

impl ActorAuth {
    /// Grants for a plain actor with no special tiers.
    pub const fn none() -> Self {
        Self {
            admin: false,
            bypass_cap: false,
            unlimited_charge: false,
            unlimited_collectors: false,
            charge_tiers: BTreeSet::new(),
            collector_tiers: BTreeSet::new(),
        }
    }

    /// The strongest ranked charge tier held, scanning rank 100 down to 1.
    pub fn strongest_charge_tier(&self) -> Option<u8> {
        (1..=MAX_TIER_RANK)
            .rev()
            .find(|rank| self.charge_tiers.contains(rank))
    }

    /// The collector cap for this actor: `None` means uncapped.
    ///
    /// Unlimited or cap-bypass grants lift the cap entirely. Otherwise the
    /// strongest ranked tier applies, falling back to the configured
    /// default.
    pub fn collector_cap(&self, default_cap: u32) -> Option<u32> {
        if self.unlimited_collectors || self.bypass_cap {
            return None;
        }
        let ranked = (1..=MAX_TIER_RANK)
            .rev()
            .find(|rank| self.collector_tiers.contains(rank));
        Some(ranked.map_or(default_cap, u32::from))
    }
}
