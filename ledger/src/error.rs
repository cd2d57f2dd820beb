//! Ledger rejection kinds. Every error aborts the whole call with no state change.

use gbt_types::{Address, Role};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("unauthorized: {caller} does not hold the {role} role")]
    Unauthorized { caller: Address, role: Role },

    #[error("no ownership transfer is pending")]
    NoPendingOwner,

    #[error("zero address not allowed for {0}")]
    ZeroAddress(&'static str),

    #[error("fee too large: {fee} bps exceeds maximum of {max} bps")]
    FeeTooLarge { fee: u32, max: u32 },

    #[error("insufficient locked balance: need {needed}, locked {available}")]
    InsufficientLockedBalance { needed: u128, available: u128 },

    #[error("insufficient unlocked balance: need {needed}, unlocked {available}")]
    InsufficientUnlockedBalance { needed: u128, available: u128 },

    #[error("account {0} is blacklisted")]
    AccountBlacklisted(Address),

    #[error("account {0} is not blacklisted")]
    NotBlacklisted(Address),

    #[error("allowance exceeded: need {needed}, allowed {available}")]
    AllowanceExceeded { needed: u128, available: u128 },

    #[error("locking is disabled on immediate-fee ledgers")]
    LockingDisabled,

    #[error("arithmetic overflow")]
    Overflow,

    #[error("invalid genesis config: {0}")]
    Config(String),

    #[error("ledger invariant violated: {0}")]
    InvariantViolated(String),
}
