//! The currency ledger seam.
//!
//! The service never owns balances; it debits and credits an external
//! ledger through [`LedgerAdapter`]. Adapter answers are definitive: a
//! `false` from [`LedgerAdapter::withdraw`] means the funds did not move.
//!
//! [`InMemoryLedger`] is the stock implementation used by tests and the
//! default wiring.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;

use collector_types::OwnerId;

/// External currency ledger.
pub trait LedgerAdapter {
    /// Current balance of an owner. Unknown owners have a zero balance.
    fn balance(&self, owner: OwnerId) -> Decimal;

    /// Withdraw `amount` from an owner. Returns whether the funds moved.
    ///
    /// A `false` return leaves the balance untouched.
    fn withdraw(&mut self, owner: OwnerId, amount: Decimal) -> bool;

    /// Deposit `amount` to an owner. Returns whether the funds moved.
    fn deposit(&mut self, owner: OwnerId, amount: Decimal) -> bool;

    /// Whether the owner can currently receive a settlement deposit
    /// (online, for the stock wiring).
    fn is_reachable(&self, owner: OwnerId) -> bool;
}

/// In-memory ledger for tests and default wiring.
///
/// Balances live in a map; reachability is an explicit set so tests can
/// exercise the offline settlement branch.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    balances: BTreeMap<OwnerId, Decimal>,
    reachable: BTreeSet<OwnerId>,
    fail_deposits: bool,
    fail_withdrawals: bool,
}

impl InMemoryLedger {
    /// Create an empty ledger.
    pub const fn new() -> Self {
        Self {
            balances: BTreeMap::new(),
            reachable: BTreeSet::new(),
            fail_deposits: false,
            fail_withdrawals: false,
        }
    }

    /// Set an owner's balance directly.
    pub fn set_balance(&mut self, owner: OwnerId, amount: Decimal) {
        self.balances.insert(owner, amount);
    }

    /// Mark an owner reachable or unreachable.
    pub fn set_reachable(&mut self, owner: OwnerId, reachable: bool) {
        if reachable {
            self.reachable.insert(owner);
        } else {
            self.reachable.remove(&owner);
        }
    }

    /// Make every subsequent deposit fail, for exercising retry paths.
    pub const fn fail_deposits(&mut self, fail: bool) {
        self.fail_deposits = fail;
    }

    /// Make every subsequent withdrawal fail even when the balance
    /// suffices, for exercising abort paths.
    pub const fn fail_withdrawals(&mut self, fail: bool) {
        self.fail_withdrawals = fail;
    }
}

impl LedgerAdapter for InMemoryLedger {
    fn balance(&self, owner: OwnerId) -> Decimal {
        self.balances.get(&owner).copied().unwrap_or(Decimal::ZERO)
    }

    fn withdraw(&mut self, owner: OwnerId, amount: Decimal) -> bool {
        if self.fail_withdrawals || amount < Decimal::ZERO {
            return false;
        }
        let current = self.balance(owner);
        if current < amount {
            return false;
        }
        self.balances.insert(owner, current.saturating_sub(amount));
        true
    }

    fn deposit(&mut self, owner: OwnerId, amount: Decimal) -> bool {
        if self.fail_deposits || amount < Decimal::ZERO {
            return false;
        }
        let current = self.balance(owner);
        self.balances.insert(owner, current.saturating_add(amount));
        true
    }

    fn is_reachable(&self, owner: OwnerId) -> bool {
        self.reachable.contains(&owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_owner_has_zero_balance() {
        let ledger = InMemoryLedger::new();
        assert_eq!(ledger.balance(OwnerId::new()), Decimal::ZERO);
    }

    #[test]
    fn withdraw_requires_sufficient_funds() {
        let mut ledger = InMemoryLedger::new();
        let owner = OwnerId::new();
        ledger.set_balance(owner, Decimal::from(50));

        assert!(!ledger.withdraw(owner, Decimal::from(51)));
        assert_eq!(ledger.balance(owner), Decimal::from(50));

        assert!(ledger.withdraw(owner, Decimal::from(50)));
        assert_eq!(ledger.balance(owner), Decimal::ZERO);
    }

    #[test]
    fn deposit_accumulates() {
        let mut ledger = InMemoryLedger::new();
        let owner = OwnerId::new();
        assert!(ledger.deposit(owner, Decimal::from(10)));
        assert!(ledger.deposit(owner, Decimal::new(25, 1)));
        assert_eq!(ledger.balance(owner), Decimal::new(125, 1));
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let mut ledger = InMemoryLedger::new();
        let owner = OwnerId::new();
        assert!(!ledger.withdraw(owner, Decimal::from(-1)));
        assert!(!ledger.deposit(owner, Decimal::from(-1)));
    }

    #[test]
    fn reachability_toggles() {
        let mut ledger = InMemoryLedger::new();
        let owner = OwnerId::new();
        assert!(!ledger.is_reachable(owner));
        ledger.set_reachable(owner, true);
        assert!(ledger.is_reachable(owner));
        ledger.set_reachable(owner, false);
        assert!(!ledger.is_reachable(owner));
    }
}
