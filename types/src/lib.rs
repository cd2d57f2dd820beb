//! Fundamental types for the gold-backed token ledger.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! account addresses, amount units, basis-point constants, roles, and the
//! deployment variant.

pub mod address;
pub mod amount;
pub mod error;
pub mod params;
pub mod role;

pub use address::Address;
pub use amount::{format_units, parse_units, DECIMALS, UNIT};
pub use error::TypesError;
pub use params::{
    LedgerVariant, TokenMetadata, BPS_DENOMINATOR, DEFAULT_DAO_FEE_BPS,
    DEFAULT_SECONDARY_FEE_BPS, MAX_FEE_BPS,
};
pub use role::Role;
