//! Ledger parameters: fee bounds, token metadata and the deployment variant.

use crate::amount::DECIMALS;
use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fees are expressed in basis points of this denominator (100%).
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Upper bound for any single fee (10%).
pub const MAX_FEE_BPS: u32 = 1_000;

/// DAO fee applied by a freshly initialized ledger (0.1%).
pub const DEFAULT_DAO_FEE_BPS: u32 = 10;

/// Secondary fee applied by a freshly initialized ledger.
pub const DEFAULT_SECONDARY_FEE_BPS: u32 = 0;

/// Which fee/lock mechanics a ledger runs with.
///
/// Both variants share accounting, access control and blacklisting. They
/// differ only in when fees are taken from minted units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerVariant {
    /// Fees are deducted at mint time; minted units are immediately spendable.
    ImmediateFee,
    /// Minted units are locked in full; fees are deducted on release.
    #[default]
    LockThenRelease,
}

impl LedgerVariant {
    /// Whether minted units start out locked.
    pub fn locks_on_mint(&self) -> bool {
        matches!(self, Self::LockThenRelease)
    }
}

impl fmt::Display for LedgerVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImmediateFee => write!(f, "immediate_fee"),
            Self::LockThenRelease => write!(f, "lock_then_release"),
        }
    }
}

impl FromStr for LedgerVariant {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "immediate_fee" | "a" => Ok(Self::ImmediateFee),
            "lock_then_release" | "b" => Ok(Self::LockThenRelease),
            _ => Err(TypesError::UnknownVariant(s.to_string())),
        }
    }
}

/// Descriptive token metadata. Read-only after initialization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl Default for TokenMetadata {
    fn default() -> Self {
        Self {
            name: "Gold Backed Token".to_string(),
            symbol: "GBT".to_string(),
            decimals: DECIMALS,
        }
    }
}
