//! Settlement: converting a collector's pending items into money.
//!
//! Settlement is all-or-nothing. If the deposit cannot be completed the
//! pending buffer is left intact and the next interval retries it; the
//! buffer is only cleared once its value has actually been credited (or
//! deliberately forfeited under the offline policy).

use rust_decimal::Decimal;

use collector_economy::{Appraiser, LedgerAdapter, PriceOracle};
use collector_types::{Collector, Notification, SideEffect};

use crate::config::OfflineEarnings;

/// Settle one collector's pending buffer against the ledger.
///
/// Effects are appended to `effects`; callers batch them across a full
/// settlement pass.
pub fn settle_collector<L, O>(
    collector: &mut Collector,
    ledger: &mut L,
    oracle: &O,
    appraiser: &Appraiser,
    policy: OfflineEarnings,
    effects: &mut Vec<SideEffect>,
) where
    L: LedgerAdapter + ?Sized,
    O: PriceOracle + ?Sized,
{
    if collector.pending.is_empty() {
        return;
    }

    let total = appraiser.appraise(oracle, &collector.pending);
    if total <= Decimal::ZERO {
        // Worthless under the current prices; hold the items for a later
        // cycle rather than destroying them.
        return;
    }

    let owner = collector.owner_id;
    if ledger.is_reachable(owner) {
        if !ledger.deposit(owner, total) {
            tracing::warn!(
                id = %collector.id,
                %owner,
                amount = %total,
                "Settlement deposit failed, retrying next interval"
            );
            return;
        }
        effects.push(SideEffect::Notify(Notification::AutosellCompleted {
            owner,
            amount: total,
        }));
    } else {
        match policy {
            OfflineEarnings::Forfeit => {
                tracing::warn!(
                    id = %collector.id,
                    %owner,
                    amount = %total,
                    "Owner unreachable, forfeiting pending earnings"
                );
            }
            OfflineEarnings::Credit => {
                if !ledger.deposit(owner, total) {
                    tracing::warn!(
                        id = %collector.id,
                        %owner,
                        amount = %total,
                        "Offline credit failed, retrying next interval"
                    );
                    return;
                }
            }
        }
    }

    collector.total_earned = collector.total_earned.saturating_add(total);
    collector.pending.clear();
    effects.push(SideEffect::Notify(Notification::Refreshed(collector.id)));
}
