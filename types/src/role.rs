//! Capabilities required by privileged ledger operations.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Configures roles, fees, wallets and the blacklist.
    Owner,
    /// May mint new units.
    Minter,
    /// May redeem units on behalf of holders that granted an allowance.
    Redeemer,
    /// May release locked units (lock-then-release ledgers only).
    Releaser,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owner => write!(f, "owner"),
            Self::Minter => write!(f, "minter"),
            Self::Redeemer => write!(f, "redeemer"),
            Self::Releaser => write!(f, "releaser"),
        }
    }
}
