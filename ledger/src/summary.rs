//! Read-only snapshot of the ledger configuration for administration tooling.

use gbt_types::{format_units, Address, LedgerVariant};
use serde::Serialize;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LedgerSummary {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub variant: LedgerVariant,
    pub owner: Address,
    pub pending_owner: Option<Address>,
    pub minter: Address,
    pub redeemer: Address,
    pub releaser: Address,
    pub dao_fee_bps: u32,
    pub secondary_fee_bps: u32,
    pub dao_wallet: Address,
    pub secondary_wallet: Address,
    pub total_supply: u128,
    /// Number of accounts ever credited.
    pub accounts: usize,
    pub blacklisted: Vec<Address>,
}

/// Render basis points as a percentage, e.g. `10` -> `0.1000%`.
pub fn bps_percent(bps: u32) -> String {
    format!("{}.{:04}%", bps / 100, (bps % 100) * 100)
}

impl fmt::Display for LedgerSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Token:            {} ({})", self.name, self.symbol)?;
        writeln!(f, "Decimals:         {}", self.decimals)?;
        writeln!(f, "Variant:          {}", self.variant)?;
        writeln!(f, "Total supply:     {}", format_units(self.total_supply))?;
        writeln!(f, "Accounts:         {}", self.accounts)?;
        writeln!(f)?;
        writeln!(f, "Roles")?;
        writeln!(f, "  Owner:          {}", self.owner)?;
        match self.pending_owner {
            Some(pending) => writeln!(f, "  Pending owner:  {pending}")?,
            None => writeln!(f, "  Pending owner:  none")?,
        }
        writeln!(f, "  Minter:         {}", self.minter)?;
        writeln!(f, "  Redeemer:       {}", self.redeemer)?;
        writeln!(f, "  Releaser:       {}", self.releaser)?;
        writeln!(f)?;
        writeln!(f, "Fees")?;
        writeln!(
            f,
            "  DAO:            {} bps ({}) -> {}",
            self.dao_fee_bps,
            bps_percent(self.dao_fee_bps),
            self.dao_wallet
        )?;
        writeln!(
            f,
            "  Secondary:      {} bps ({}) -> {}",
            self.secondary_fee_bps,
            bps_percent(self.secondary_fee_bps),
            self.secondary_wallet
        )?;
        write!(f, "Blacklisted:      {}", self.blacklisted.len())
    }
}
