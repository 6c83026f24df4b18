//! Unit pricing and appraisal of accumulated resources.
//!
//! A [`PriceOracle`] quotes a unit price per resource kind. The
//! [`Appraiser`] turns a pending map into a settlement total, falling
//! back to a configured constant when the oracle has no quote and
//! applying a global multiplier to every price.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use collector_types::ResourceKind;

/// Source of unit prices for resource kinds.
pub trait PriceOracle {
    /// The unit price quoted for a kind, or `None` when unquoted.
    fn unit_price(&self, kind: ResourceKind) -> Option<Decimal>;
}

/// Fixed price table, the stock oracle.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceOracle {
    prices: BTreeMap<ResourceKind, Decimal>,
}

impl StaticPriceOracle {
    /// Create an empty price table.
    pub const fn new() -> Self {
        Self {
            prices: BTreeMap::new(),
        }
    }

    /// Set the unit price for a kind.
    pub fn set_price(&mut self, kind: ResourceKind, price: Decimal) {
        self.prices.insert(kind, price);
    }
}

impl PriceOracle for StaticPriceOracle {
    fn unit_price(&self, kind: ResourceKind) -> Option<Decimal> {
        self.prices.get(&kind).copied()
    }
}

/// Turns pending resources into a settlement total.
#[derive(Debug, Clone)]
pub struct Appraiser {
    /// Unit price used when the oracle has no quote for a kind.
    pub fallback_price: Decimal,
    /// Global multiplier applied to every unit price, quoted or fallback.
    pub multiplier: Decimal,
}

impl Appraiser {
    /// Create an appraiser with the given fallback price and multiplier.
    pub const fn new(fallback_price: Decimal, multiplier: Decimal) -> Self {
        Self {
            fallback_price,
            multiplier,
        }
    }

    /// The effective unit price for one kind.
    pub fn effective_unit_price<O: PriceOracle + ?Sized>(
        &self,
        oracle: &O,
        kind: ResourceKind,
    ) -> Decimal {
        oracle
            .unit_price(kind)
            .unwrap_or(self.fallback_price)
            .saturating_mul(self.multiplier)
    }

    /// Appraise a pending map: sum of quantity times effective unit price
    /// across all kinds.
    pub fn appraise<O: PriceOracle + ?Sized>(
        &self,
        oracle: &O,
        pending: &BTreeMap<ResourceKind, u64>,
    ) -> Decimal {
        pending.iter().fold(Decimal::ZERO, |total, (kind, qty)| {
            let line = self
                .effective_unit_price(oracle, *kind)
                .saturating_mul(Decimal::from(*qty));
            total.saturating_add(line)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn one_point_zero() -> Decimal {
        Decimal::ONE
    }

    #[test]
    fn quoted_price_wins_over_fallback() {
        let mut oracle = StaticPriceOracle::new();
        oracle.set_price(ResourceKind::Wheat, Decimal::from(3));
        let appraiser = Appraiser::new(one_point_zero(), one_point_zero());

        assert_eq!(
            appraiser.effective_unit_price(&oracle, ResourceKind::Wheat),
            Decimal::from(3)
        );
        assert_eq!(
            appraiser.effective_unit_price(&oracle, ResourceKind::Bone),
            Decimal::ONE
        );
    }

    #[test]
    fn multiplier_scales_both_paths() {
        let mut oracle = StaticPriceOracle::new();
        oracle.set_price(ResourceKind::Wheat, Decimal::from(4));
        let appraiser = Appraiser::new(Decimal::from(2), Decimal::new(15, 1));

        assert_eq!(
            appraiser.effective_unit_price(&oracle, ResourceKind::Wheat),
            Decimal::from(6)
        );
        assert_eq!(
            appraiser.effective_unit_price(&oracle, ResourceKind::Bone),
            Decimal::from(3)
        );
    }

    #[test]
    fn appraise_sums_quantity_times_price() {
        let mut oracle = StaticPriceOracle::new();
        oracle.set_price(ResourceKind::Wheat, Decimal::from(2));
        oracle.set_price(ResourceKind::Bone, Decimal::new(5, 1));
        let appraiser = Appraiser::new(one_point_zero(), one_point_zero());

        let mut pending = BTreeMap::new();
        pending.insert(ResourceKind::Wheat, 10_u64);
        pending.insert(ResourceKind::Bone, 4_u64);
        pending.insert(ResourceKind::Egg, 3_u64); // fallback priced

        // 10*2 + 4*0.5 + 3*1 = 25
        assert_eq!(appraiser.appraise(&oracle, &pending), Decimal::from(25));
    }

    #[test]
    fn empty_pending_appraises_to_zero() {
        let oracle = StaticPriceOracle::new();
        let appraiser = Appraiser::new(one_point_zero(), one_point_zero());
        assert_eq!(
            appraiser.appraise(&oracle, &BTreeMap::new()),
            Decimal::ZERO
        );
    }
}
