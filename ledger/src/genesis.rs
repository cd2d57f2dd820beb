//! Genesis configuration with TOML file support.
//!
//! Describes the state a ledger starts from: deployment variant, token
//! metadata, role holders and fee settings. Unset role and wallet fields
//! fall back to the owner.

use crate::error::LedgerError;
use crate::fees::validate_fee_bps;
use gbt_types::{
    Address, LedgerVariant, TokenMetadata, DECIMALS, DEFAULT_DAO_FEE_BPS, DEFAULT_SECONDARY_FEE_BPS,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisConfig {
    #[serde(default)]
    pub variant: LedgerVariant,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_symbol")]
    pub symbol: String,

    #[serde(default = "default_decimals")]
    pub decimals: u8,

    /// Initial owner; also the default for every other role and wallet.
    pub owner: Address,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minter: Option<Address>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redeemer: Option<Address>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub releaser: Option<Address>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dao_wallet: Option<Address>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_wallet: Option<Address>,

    #[serde(default = "default_dao_fee_bps")]
    pub dao_fee_bps: u32,

    #[serde(default = "default_secondary_fee_bps")]
    pub secondary_fee_bps: u32,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_name() -> String {
    TokenMetadata::default().name
}

fn default_symbol() -> String {
    TokenMetadata::default().symbol
}

fn default_decimals() -> u8 {
    DECIMALS
}

fn default_dao_fee_bps() -> u32 {
    DEFAULT_DAO_FEE_BPS
}

fn default_secondary_fee_bps() -> u32 {
    DEFAULT_SECONDARY_FEE_BPS
}

// ── Impl ───────────────────────────────────────────────────────────────

impl GenesisConfig {
    /// Defaults for `owner`: every role and wallet on the owner, default fees.
    pub fn new(variant: LedgerVariant, owner: Address) -> Self {
        Self {
            variant,
            name: default_name(),
            symbol: default_symbol(),
            decimals: default_decimals(),
            owner,
            minter: None,
            redeemer: None,
            releaser: None,
            dao_wallet: None,
            secondary_wallet: None,
            dao_fee_bps: default_dao_fee_bps(),
            secondary_fee_bps: default_secondary_fee_bps(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| LedgerError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, LedgerError> {
        toml::from_str(s).map_err(|e| LedgerError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, LedgerError> {
        toml::to_string_pretty(self).map_err(|e| LedgerError::Config(e.to_string()))
    }

    pub fn metadata(&self) -> TokenMetadata {
        TokenMetadata {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            decimals: self.decimals,
        }
    }

    /// Reject zero addresses and fees above the cap.
    pub fn validate(&self) -> Result<(), LedgerError> {
        let addresses = [
            ("owner", Some(self.owner)),
            ("minter", self.minter),
            ("redeemer", self.redeemer),
            ("releaser", self.releaser),
            ("dao wallet", self.dao_wallet),
            ("secondary wallet", self.secondary_wallet),
        ];
        for (field, address) in addresses {
            if address.is_some_and(|a| a.is_zero()) {
                return Err(LedgerError::ZeroAddress(field));
            }
        }
        validate_fee_bps(self.dao_fee_bps)?;
        validate_fee_bps(self.secondary_fee_bps)?;
        Ok(())
    }
}
