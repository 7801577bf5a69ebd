//! Amount and address normalization.
//!
//! The custom-amount field is filtered keystroke by keystroke: an edit that
//! would leave the field outside `digits [. digits]` is dropped and the
//! previous text is kept. Positivity is only checked at submit time.

use anyhow::{anyhow, Result};
use ethers::types::U256;
use std::fmt;

use crate::error::DonationError;

/// Hex prefix every normalized address carries.
pub const ADDRESS_PREFIX: &str = "0x";

/// True if `text` is zero or more digits, an optional single `.`, then zero or more digits.
pub fn is_amount_text(text: &str) -> bool {
    let mut seen_dot = false;
    for c in text.chars() {
        match c {
            '0'..='9' => {}
            '.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }
    true
}

/// Keystroke filter for the custom amount field.
///
/// Returns `proposed` if it is valid amount text, otherwise `previous`.
pub fn apply_amount_edit(previous: &str, proposed: &str) -> String {
    if is_amount_text(proposed) {
        proposed.to_string()
    } else {
        previous.to_string()
    }
}

/// A strictly positive decimal amount in canonical text form.
///
/// Canonical means: at least one integer digit (`.5` becomes `0.5`) and no
/// trailing bare dot (`12.` becomes `12`).
#[derive(Clone, Debug, PartialEq)]
pub struct PositiveAmount {
    text: String,
    value: f64,
}

impl PositiveAmount {
    /// Build from a preset tier value.
    pub fn from_value(value: f64) -> Result<Self, DonationError> {
        if !(value.is_finite() && value > 0.0) {
            return Err(DonationError::InvalidAmount);
        }
        validate_amount_text(&value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl fmt::Display for PositiveAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Final check applied to the custom amount at submit.
///
/// `""`, `"."` and any text that parses to zero are rejected.
pub fn validate_amount_text(text: &str) -> Result<PositiveAmount, DonationError> {
    let trimmed = text.trim();
    if !is_amount_text(trimmed) {
        return Err(DonationError::InvalidAmount);
    }
    let value: f64 = trimmed.parse().map_err(|_| DonationError::InvalidAmount)?;
    if !(value.is_finite() && value > 0.0) {
        return Err(DonationError::InvalidAmount);
    }

    let (int_part, frac_part) = match trimmed.split_once('.') {
        Some((i, f)) => (i, f),
        None => (trimmed, ""),
    };
    let int_part = if int_part.is_empty() { "0" } else { int_part };
    let text = if frac_part.is_empty() {
        int_part.to_string()
    } else {
        format!("{}.{}", int_part, frac_part)
    };
    Ok(PositiveAmount { text, value })
}

/// Prefix `0x` when missing. No checksum or length validation.
pub fn normalize_address(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.starts_with(ADDRESS_PREFIX) {
        trimmed.to_string()
    } else {
        format!("{}{}", ADDRESS_PREFIX, trimmed)
    }
}

/// Scale a decimal amount to base units (`amount * 10^decimals`).
///
/// Fractional digits beyond `decimals` are truncated.
pub fn to_base_units(amount: &PositiveAmount, decimals: u8) -> Result<U256> {
    let text = amount.as_str();
    let scaled_text = match text.split_once('.') {
        Some((int_part, frac_part)) => {
            let keep = frac_part.len().min(decimals as usize);
            if keep == 0 {
                int_part.to_string()
            } else {
                format!("{}.{}", int_part, &frac_part[..keep])
            }
        }
        None => text.to_string(),
    };
    ethers::utils::parse_units(&scaled_text, decimals as u32)
        .map(|pu| pu.into())
        .map_err(|e| anyhow!("Failed to scale {} to {} decimals: {}", text, decimals, e))
}
