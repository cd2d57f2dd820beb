//! Fee-bearing, role-gated token ledger.
//!
//! The ledger tracks per-holder balances, splits a configurable fraction of
//! minted value into two fee sinks, and gates privileged operations behind
//! owner/minter/redeemer/releaser roles. In the lock-then-release variant,
//! minted units stay locked until a releaser unlocks them, and fees are taken
//! at release time.
//!
//! Every operation is a single atomic step: it either commits and emits one
//! [`LedgerEvent`], or fails with a typed [`LedgerError`] and changes nothing.

pub mod access;
pub mod accounts;
pub mod blacklist;
pub mod call;
pub mod error;
pub mod events;
pub mod fees;
pub mod genesis;
pub mod ledger;
pub mod summary;

pub use access::{AccessControl, Authorization, OwnershipState};
pub use accounts::{Account, AccountBook};
pub use blacklist::Blacklist;
pub use call::Call;
pub use error::LedgerError;
pub use events::{EventBus, LedgerEvent};
pub use fees::{FeeKind, FeeSchedule, FeeSplit};
pub use genesis::GenesisConfig;
pub use ledger::Ledger;
pub use summary::LedgerSummary;
