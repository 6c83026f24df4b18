//! Economic seam for the chunk collector service.
//!
//! Two traits decouple the registry from money: [`LedgerAdapter`] for
//! balances and transfers, [`PriceOracle`] for unit prices. The
//! [`Appraiser`] converts a pending-resource map into a settlement total.
//! All amounts are [`rust_decimal::Decimal`]; floating point never enters
//! a currency calculation.

pub mod ledger;
pub mod price;

pub use ledger::{InMemoryLedger, LedgerAdapter};
pub use price::{Appraiser, PriceOracle, StaticPriceOracle};
