//! Token amount units.
//!
//! Amounts are raw `u128` integers to avoid floating-point errors. One whole
//! token is `10^DECIMALS` raw units.

use crate::error::TypesError;

/// Number of fractional digits of one token.
pub const DECIMALS: u8 = 6;

/// Raw units per whole token.
pub const UNIT: u128 = 1_000_000;

/// Parse a decimal token string (e.g. `"499.825"`) into raw units.
pub fn parse_units(s: &str) -> Result<u128, TypesError> {
    let invalid = || TypesError::InvalidAmount(s.to_string());
    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if frac.len() > DECIMALS as usize {
        return Err(invalid());
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let whole: u128 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    let mut frac_raw: u128 = if frac.is_empty() {
        0
    } else {
        frac.parse().map_err(|_| invalid())?
    };
    for _ in frac.len()..DECIMALS as usize {
        frac_raw *= 10;
    }

    whole
        .checked_mul(UNIT)
        .and_then(|w| w.checked_add(frac_raw))
        .ok_or_else(invalid)
}

/// Render raw units as a decimal string with all fractional digits.
pub fn format_units(raw: u128) -> String {
    format!(
        "{}.{:0width$}",
        raw / UNIT,
        raw % UNIT,
        width = DECIMALS as usize
    )
}
