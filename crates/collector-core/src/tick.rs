//! The once-per-second tick: charge decay and settlement scheduling.

use collector_economy::{Appraiser, LedgerAdapter, PriceOracle};
use collector_types::{Notification, SideEffect, WorldEffect};

use crate::config::SettingsConfig;
use crate::registry::Registry;
use crate::settle;

/// Economy handles borrowed for the duration of a tick pass: the ledger
/// to settle into and the pricing pipeline to value pending items with.
pub struct TickDeps<'a, L: LedgerAdapter + ?Sized, O: PriceOracle + ?Sized> {
    /// Ledger settlements deposit into.
    pub ledger: &'a mut L,
    /// Source of unit prices.
    pub oracle: &'a O,
    /// Fallback-and-multiplier pricing on top of the oracle.
    pub appraiser: &'a Appraiser,
}

/// Advance every active collector by one second.
///
/// Each active collector burns one second of charge. Collectors whose
/// settlement interval has elapsed are settled. A collector whose
/// charge reaches zero goes dormant: it stays placed and keeps its
/// state, but stops collecting until recharged.
pub fn tick_sweep<L, O>(
    registry: &mut Registry,
    now_epoch_secs: i64,
    settings: &SettingsConfig,
    deps: &mut TickDeps<'_, L, O>,
) -> Vec<SideEffect>
where
    L: LedgerAdapter + ?Sized,
    O: PriceOracle + ?Sized,
{
    let mut effects = Vec::new();
    for collector in registry.iter_mut() {
        if !collector.is_active() {
            continue;
        }
        collector.time_remaining = collector.time_remaining.saturating_sub(1);

        if now_epoch_secs.saturating_sub(collector.last_autosell_at)
            >= settings.autosell_interval_secs
        {
            settle::settle_collector(
                collector,
                deps.ledger,
                deps.oracle,
                deps.appraiser,
                settings.offline_earnings,
                &mut effects,
            );
            collector.last_autosell_at = now_epoch_secs;
        }

        if collector.time_remaining <= 0 {
            collector.time_remaining = 0;
            tracing::info!(id = %collector.id, "Collector depleted");
            effects.push(SideEffect::Notify(Notification::Depleted(collector.id)));
            effects.push(SideEffect::Effect {
                position: collector.position.clone(),
                effect: WorldEffect::DepletionFizzle,
            });
            effects.push(SideEffect::save(collector.id));
        } else {
            effects.push(SideEffect::Notify(Notification::Refreshed(collector.id)));
        }
    }
    effects
}

#[cfg(test)]
mod tests {
    use collector_economy::{InMemoryLedger, StaticPriceOracle};
    use collector_types::{ActorAuth, OwnerId, PersistOp, Position, ResourceKind};
    use rust_decimal::Decimal;

    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn pos() -> Position {
        Position::new("overworld".to_owned(), 0.0, 64.0, 0.0)
    }

    fn setup(charge_secs: i64) -> (Registry, OwnerId) {
        let mut registry = Registry::new();
        let owner = OwnerId::new();
        let settings = SettingsConfig::default();
        let placed = registry.place(owner, "steve", pos(), &ActorAuth::none(), &settings, NOW);
        assert!(placed.is_ok());
        for collector in registry.iter_mut() {
            collector.time_remaining = charge_secs;
        }
        (registry, owner)
    }

    struct Economy {
        ledger: InMemoryLedger,
        oracle: StaticPriceOracle,
        appraiser: Appraiser,
    }

    impl Economy {
        fn new() -> Self {
            let mut oracle = StaticPriceOracle::default();
            oracle.set_price(ResourceKind::Wheat, Decimal::from(2));
            Self {
                ledger: InMemoryLedger::default(),
                oracle,
                appraiser: Appraiser::new(Decimal::ONE, Decimal::ONE),
            }
        }

        const fn deps(&mut self) -> TickDeps<'_, InMemoryLedger, StaticPriceOracle> {
            TickDeps {
                ledger: &mut self.ledger,
                oracle: &self.oracle,
                appraiser: &self.appraiser,
            }
        }
    }

    #[test]
    fn active_collectors_burn_one_second() {
        let (mut registry, _) = setup(100);
        let mut economy = Economy::new();

        let effects = tick_sweep(&mut registry, NOW, &SettingsConfig::default(), &mut economy.deps());
        assert_eq!(registry.iter().next().map(|c| c.time_remaining), Some(99));
        assert_eq!(effects.len(), 1);
        assert!(matches!(
            effects.first(),
            Some(SideEffect::Notify(Notification::Refreshed(_)))
        ));
    }

    #[test]
    fn depleted_collector_fizzles_and_is_saved() {
        let (mut registry, _) = setup(1);
        let mut economy = Economy::new();

        let effects = tick_sweep(&mut registry, NOW, &SettingsConfig::default(), &mut economy.deps());
        assert_eq!(registry.iter().next().map(|c| c.time_remaining), Some(0));
        assert!(
            effects
                .iter()
                .any(|e| matches!(e, SideEffect::Notify(Notification::Depleted(_))))
        );
        assert!(effects.iter().any(|e| matches!(
            e,
            SideEffect::Effect {
                effect: WorldEffect::DepletionFizzle,
                ..
            }
        )));
        assert!(
            effects
                .iter()
                .any(|e| matches!(e, SideEffect::Persist(PersistOp::SaveOne(_))))
        );
    }

    #[test]
    fn dormant_collector_is_left_alone() {
        let (mut registry, _) = setup(0);
        let mut economy = Economy::new();

        let effects = tick_sweep(&mut registry, NOW, &SettingsConfig::default(), &mut economy.deps());
        assert!(effects.is_empty());
        assert_eq!(registry.iter().next().map(|c| c.time_remaining), Some(0));
    }

    #[test]
    fn settlement_runs_when_the_interval_elapses() {
        let (mut registry, owner) = setup(3600);
        for collector in registry.iter_mut() {
            collector.record_collection(ResourceKind::Wheat, 5);
        }
        let mut economy = Economy::new();
        economy.ledger.set_reachable(owner, true);
        let settings = SettingsConfig::default();

        // Interval not yet elapsed: nothing is sold.
        let effects = tick_sweep(&mut registry, NOW + 30, &settings, &mut economy.deps());
        assert!(!effects.iter().any(|e| matches!(
            e,
            SideEffect::Notify(Notification::AutosellCompleted { .. })
        )));
        assert_eq!(economy.ledger.balance(owner), Decimal::ZERO);

        // Once it elapses the pending wheat is settled.
        let effects = tick_sweep(&mut registry, NOW + 60, &settings, &mut economy.deps());
        assert_eq!(economy.ledger.balance(owner), Decimal::from(10));
        assert!(effects.iter().any(|e| matches!(
            e,
            SideEffect::Notify(Notification::AutosellCompleted { .. })
        )));
        assert_eq!(
            registry.iter().next().map(|c| c.last_autosell_at),
            Some(NOW + 60)
        );
    }

    #[test]
    fn final_tick_settles_before_depletion() {
        let (mut registry, owner) = setup(1);
        for collector in registry.iter_mut() {
            collector.record_collection(ResourceKind::Wheat, 1);
        }
        let mut economy = Economy::new();
        economy.ledger.set_reachable(owner, true);

        tick_sweep(
            &mut registry,
            NOW + 60,
            &SettingsConfig::default(),
            &mut economy.deps(),
        );
        assert_eq!(economy.ledger.balance(owner), Decimal::from(2));
        assert_eq!(registry.iter().next().map(|c| c.pending.is_empty()), Some(true));
        assert_eq!(registry.iter().next().map(|c| c.time_remaining), Some(0));
    }
}
