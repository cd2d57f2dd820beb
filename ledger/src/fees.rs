//! Fee schedule and the two-sink fee split.

use crate::error::LedgerError;
use gbt_types::{
    Address, BPS_DENOMINATOR, DEFAULT_DAO_FEE_BPS, DEFAULT_SECONDARY_FEE_BPS, MAX_FEE_BPS,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two fee sinks a setting applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeKind {
    Dao,
    Secondary,
}

impl fmt::Display for FeeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dao => write!(f, "dao"),
            Self::Secondary => write!(f, "secondary"),
        }
    }
}

/// Fees taken from one value-moving operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSplit {
    pub dao: u128,
    pub secondary: u128,
}

impl FeeSplit {
    pub fn total(&self) -> u128 {
        // Each part is at most 10% of the same amount, so this cannot overflow.
        self.dao + self.secondary
    }

    /// What is left of `amount` once both fees are taken.
    pub fn net_of(&self, amount: u128) -> u128 {
        amount - self.total()
    }
}

/// Fee rates (basis points) and the wallets that receive them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub dao_fee_bps: u32,
    pub secondary_fee_bps: u32,
    pub dao_wallet: Address,
    pub secondary_wallet: Address,
}

impl FeeSchedule {
    /// Default rates with both sinks pointing at `wallet`.
    pub fn new(wallet: Address) -> Self {
        Self {
            dao_fee_bps: DEFAULT_DAO_FEE_BPS,
            secondary_fee_bps: DEFAULT_SECONDARY_FEE_BPS,
            dao_wallet: wallet,
            secondary_wallet: wallet,
        }
    }

    pub fn fee_bps(&self, kind: FeeKind) -> u32 {
        match kind {
            FeeKind::Dao => self.dao_fee_bps,
            FeeKind::Secondary => self.secondary_fee_bps,
        }
    }

    pub fn wallet(&self, kind: FeeKind) -> Address {
        match kind {
            FeeKind::Dao => self.dao_wallet,
            FeeKind::Secondary => self.secondary_wallet,
        }
    }

    /// Compute both fees for `amount`.
    ///
    /// Formula: `amount * bps / 10_000`, truncated toward zero. The remainder
    /// stays with the payer.
    pub fn split(&self, amount: u128) -> Result<FeeSplit, LedgerError> {
        Ok(FeeSplit {
            dao: bps_of(amount, self.dao_fee_bps)?,
            secondary: bps_of(amount, self.secondary_fee_bps)?,
        })
    }

    /// Replace a fee rate. Returns the previous rate.
    pub fn set_fee(&mut self, kind: FeeKind, bps: u32) -> Result<u32, LedgerError> {
        validate_fee_bps(bps)?;
        let slot = match kind {
            FeeKind::Dao => &mut self.dao_fee_bps,
            FeeKind::Secondary => &mut self.secondary_fee_bps,
        };
        Ok(std::mem::replace(slot, bps))
    }

    /// Replace a fee wallet. Returns the previous wallet.
    pub fn set_wallet(&mut self, kind: FeeKind, wallet: Address) -> Result<Address, LedgerError> {
        if wallet.is_zero() {
            return Err(LedgerError::ZeroAddress(match kind {
                FeeKind::Dao => "dao wallet",
                FeeKind::Secondary => "secondary wallet",
            }));
        }
        let slot = match kind {
            FeeKind::Dao => &mut self.dao_wallet,
            FeeKind::Secondary => &mut self.secondary_wallet,
        };
        Ok(std::mem::replace(slot, wallet))
    }
}

pub fn validate_fee_bps(bps: u32) -> Result<(), LedgerError> {
    if bps > MAX_FEE_BPS {
        return Err(LedgerError::FeeTooLarge {
            fee: bps,
            max: MAX_FEE_BPS,
        });
    }
    Ok(())
}

/// `amount * bps / 10_000` truncated, without forming the full product.
fn bps_of(amount: u128, bps: u32) -> Result<u128, LedgerError> {
    let bps = u128::from(bps);
    let whole = (amount / BPS_DENOMINATOR)
        .checked_mul(bps)
        .ok_or(LedgerError::Overflow)?;
    // remainder < 10_000 and bps <= u32::MAX, so this product fits.
    let part = (amount % BPS_DENOMINATOR) * bps / BPS_DENOMINATOR;
    whole.checked_add(part).ok_or(LedgerError::Overflow)
}
