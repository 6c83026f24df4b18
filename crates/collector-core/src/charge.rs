//! Charge purchases: topping up a collector's remaining runtime.
//!
//! A purchase always tries to add one full default increment, clipped to
//! the headroom left under the actor's maximum duration. Cost is
//! prorated per minute with exact decimal arithmetic. Every check runs
//! before any mutation, so a failed purchase leaves both the collector
//! and the ledger untouched.

use rust_decimal::Decimal;

use collector_economy::LedgerAdapter;
use collector_types::{
    ActorAuth, Collector, Notification, OwnerId, SideEffect, WorldEffect,
};

use crate::config::SettingsConfig;
use crate::error::ChargeError;

/// Seconds of extra headroom granted by the unlimited-charge grant.
const UNLIMITED_BONUS_SECS: i64 = 24 * 60 * 60;

/// The outcome of a successful charge purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChargeReceipt {
    /// Seconds of runtime added.
    pub seconds_added: i64,
    /// Amount withdrawn from the actor's balance.
    pub cost: Decimal,
    /// Runtime remaining after the purchase.
    pub time_remaining: i64,
}

/// The maximum runtime an actor may charge a collector up to.
///
/// The base is the default charge increment; grants extend it, with the
/// unlimited grant adding a flat 24 hours and tier grants adding one
/// hour per tier rank of the strongest tier held.
pub fn max_duration_secs(auth: &ActorAuth, default_charge_secs: i64) -> i64 {
    let bonus = if auth.unlimited_charge {
        UNLIMITED_BONUS_SECS
    } else {
        auth.strongest_charge_tier()
            .map_or(0, |tier| i64::from(tier).saturating_mul(3600))
    };
    default_charge_secs.saturating_add(bonus)
}

/// Purchase one charge increment for a collector.
///
/// # Errors
///
/// Returns [`ChargeError`] for the first failed check: authorization,
/// a full collector, no headroom, insufficient funds, or a ledger
/// withdrawal that fails after the balance check.
pub fn add_charge<L: LedgerAdapter + ?Sized>(
    collector: &mut Collector,
    actor_id: OwnerId,
    auth: &ActorAuth,
    ledger: &mut L,
    settings: &SettingsConfig,
) -> Result<(ChargeReceipt, Vec<SideEffect>), ChargeError> {
    if actor_id != collector.owner_id && !auth.admin {
        return Err(ChargeError::NotAuthorized);
    }

    let default_charge_secs = settings.default_charge_secs();
    let max_duration = max_duration_secs(auth, default_charge_secs);
    if collector.time_remaining >= max_duration {
        return Err(ChargeError::AlreadyFull);
    }

    let headroom = max_duration.saturating_sub(collector.time_remaining);
    let seconds_added = default_charge_secs.min(headroom);
    if seconds_added <= 0 {
        return Err(ChargeError::NoHeadroom);
    }

    let cost = Decimal::from(seconds_added)
        .checked_div(Decimal::from(60))
        .unwrap_or(Decimal::ZERO)
        .saturating_mul(settings.recharge_cost_per_minute);

    let available = ledger.balance(actor_id);
    if available < cost {
        return Err(ChargeError::InsufficientFunds {
            needed: cost,
            available,
        });
    }
    if !ledger.withdraw(actor_id, cost) {
        return Err(ChargeError::LedgerError);
    }

    collector.time_remaining = collector.time_remaining.saturating_add(seconds_added);
    collector.max_charge_observed = collector.max_charge_observed.max(collector.time_remaining);

    tracing::info!(
        id = %collector.id,
        actor = %actor_id,
        seconds_added,
        %cost,
        time_remaining = collector.time_remaining,
        "Collector charged"
    );

    let effects = vec![
        SideEffect::save(collector.id),
        SideEffect::Notify(Notification::Refreshed(collector.id)),
        SideEffect::Effect {
            position: collector.position.clone(),
            effect: WorldEffect::RechargeChime,
        },
    ];

    let receipt = ChargeReceipt {
        seconds_added,
        cost,
        time_remaining: collector.time_remaining,
    };
    Ok((receipt, effects))
}

#[cfg(test)]
mod tests {
    use collector_economy::InMemoryLedger;
    use collector_types::Position;

    use super::*;

    fn make_collector(owner: OwnerId) -> Collector {
        let position = Position::new("overworld".to_owned(), 0.0, 64.0, 0.0);
        Collector::new(owner, "steve".to_owned(), position, 1_700_000_000)
    }

    fn settings() -> SettingsConfig {
        SettingsConfig::default()
    }

    #[test]
    fn owner_charges_empty_collector_fully() {
        let owner = OwnerId::new();
        let mut collector = make_collector(owner);
        let mut ledger = InMemoryLedger::default();
        ledger.set_balance(owner, Decimal::from(10_000));

        let result = add_charge(&mut collector, owner, &ActorAuth::none(), &mut ledger, &settings());
        let receipt = result.map(|(r, _)| r).ok();
        assert_eq!(
            receipt,
            Some(ChargeReceipt {
                seconds_added: 3600,
                cost: Decimal::from(6000),
                time_remaining: 3600,
            })
        );
        assert_eq!(ledger.balance(owner), Decimal::from(4000));
        assert_eq!(collector.max_charge_observed, 3600);
    }

    #[test]
    fn stranger_without_admin_is_rejected() {
        let owner = OwnerId::new();
        let stranger = OwnerId::new();
        let mut collector = make_collector(owner);
        let mut ledger = InMemoryLedger::default();
        ledger.set_balance(stranger, Decimal::from(10_000));

        let err = add_charge(&mut collector, stranger, &ActorAuth::none(), &mut ledger, &settings());
        assert_eq!(err.err(), Some(ChargeError::NotAuthorized));
        assert_eq!(collector.time_remaining, 0);
        assert_eq!(ledger.balance(stranger), Decimal::from(10_000));
    }

    #[test]
    fn admin_may_charge_someone_elses_collector() {
        let owner = OwnerId::new();
        let admin = OwnerId::new();
        let mut collector = make_collector(owner);
        let mut ledger = InMemoryLedger::default();
        ledger.set_balance(admin, Decimal::from(10_000));
        let mut auth = ActorAuth::none();
        auth.admin = true;

        let result = add_charge(&mut collector, admin, &auth, &mut ledger, &settings());
        assert!(result.is_ok());
        assert_eq!(collector.time_remaining, 3600);
    }

    #[test]
    fn full_collector_rejects_another_purchase() {
        let owner = OwnerId::new();
        let mut collector = make_collector(owner);
        collector.time_remaining = settings().default_charge_secs();
        let mut ledger = InMemoryLedger::default();
        ledger.set_balance(owner, Decimal::from(10_000));

        let err = add_charge(&mut collector, owner, &ActorAuth::none(), &mut ledger, &settings());
        assert_eq!(err.err(), Some(ChargeError::AlreadyFull));
    }

    #[test]
    fn partial_topup_is_clipped_and_prorated() {
        let owner = OwnerId::new();
        let mut collector = make_collector(owner);
        collector.time_remaining = 3000; // 600s of headroom left
        let mut ledger = InMemoryLedger::default();
        ledger.set_balance(owner, Decimal::from(10_000));

        let result = add_charge(&mut collector, owner, &ActorAuth::none(), &mut ledger, &settings());
        let receipt = result.map(|(r, _)| r).ok();
        // 600 seconds = 10 minutes at 100/minute.
        assert_eq!(
            receipt,
            Some(ChargeReceipt {
                seconds_added: 600,
                cost: Decimal::from(1000),
                time_remaining: 3600,
            })
        );
    }

    #[test]
    fn insufficient_funds_leaves_everything_untouched() {
        let owner = OwnerId::new();
        let mut collector = make_collector(owner);
        let mut ledger = InMemoryLedger::default();
        ledger.set_balance(owner, Decimal::from(100));

        let err = add_charge(&mut collector, owner, &ActorAuth::none(), &mut ledger, &settings());
        assert_eq!(
            err.err(),
            Some(ChargeError::InsufficientFunds {
                needed: Decimal::from(6000),
                available: Decimal::from(100),
            })
        );
        assert_eq!(collector.time_remaining, 0);
        assert_eq!(ledger.balance(owner), Decimal::from(100));
    }

    #[test]
    fn failed_withdrawal_after_balance_check_aborts_untouched() {
        let owner = OwnerId::new();
        let mut collector = make_collector(owner);
        let mut ledger = InMemoryLedger::default();
        ledger.set_balance(owner, Decimal::from(10_000));
        ledger.fail_withdrawals(true);

        let err = add_charge(&mut collector, owner, &ActorAuth::none(), &mut ledger, &settings());
        assert_eq!(err.err(), Some(ChargeError::LedgerError));
        assert_eq!(collector.time_remaining, 0);
        assert_eq!(collector.max_charge_observed, 0);
        assert_eq!(ledger.balance(owner), Decimal::from(10_000));
    }

    #[test]
    fn tier_grant_extends_the_ceiling() {
        let owner = OwnerId::new();
        let mut collector = make_collector(owner);
        collector.time_remaining = settings().default_charge_secs();
        let mut ledger = InMemoryLedger::default();
        ledger.set_balance(owner, Decimal::from(1_000_000));
        let mut auth = ActorAuth::none();
        auth.charge_tiers.insert(2);

        // Ceiling is now 3600 + 2*3600; a full increment fits.
        let result = add_charge(&mut collector, owner, &auth, &mut ledger, &settings());
        let receipt = result.map(|(r, _)| r).ok();
        assert_eq!(receipt.map(|r| r.seconds_added), Some(3600));
        assert_eq!(collector.time_remaining, 7200);
    }

    #[test]
    fn one_hour_at_one_per_minute_costs_exactly_sixty() {
        let owner = OwnerId::new();
        let mut collector = make_collector(owner);
        let mut ledger = InMemoryLedger::default();
        ledger.set_balance(owner, Decimal::from(60));
        let settings = SettingsConfig {
            recharge_cost_per_minute: Decimal::ONE,
            ..SettingsConfig::default()
        };

        let result = add_charge(&mut collector, owner, &ActorAuth::none(), &mut ledger, &settings);
        let receipt = result.map(|(r, _)| r).ok();
        assert_eq!(receipt.map(|r| r.cost), Some(Decimal::from(60)));
        assert_eq!(ledger.balance(owner), Decimal::ZERO);
    }

    #[test]
    fn unlimited_grant_adds_a_day_of_headroom() {
        let auth = ActorAuth {
            unlimited_charge: true,
            ..ActorAuth::none()
        };
        assert_eq!(max_duration_secs(&auth, 3600), 3600 + 86_400);
    }

    #[test]
    fn charge_emits_save_refresh_and_chime() {
        let owner = OwnerId::new();
        let mut collector = make_collector(owner);
        let mut ledger = InMemoryLedger::default();
        ledger.set_balance(owner, Decimal::from(10_000));

        let result = add_charge(&mut collector, owner, &ActorAuth::none(), &mut ledger, &settings());
        let effects = result.map(|(_, e)| e).unwrap_or_default();
        assert_eq!(effects.len(), 3);
        assert!(
            effects
                .iter()
                .any(|e| matches!(e, SideEffect::Notify(Notification::Refreshed(_))))
        );
        assert!(effects.iter().any(|e| matches!(
            e,
            SideEffect::Effect {
                effect: WorldEffect::RechargeChime,
                ..
            }
        )));
    }
}
