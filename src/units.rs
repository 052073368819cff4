// src/units.rs
//! Ether / wei conversion and display formatting.
//!
//! Amounts typed by the user go through [`EtherAmount::parse`], which works on
//! the exact decimal text so `"2.5"` becomes exactly `2.5 * 10^18` wei.

use crate::error::{Result, StakingError};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;

pub const ETHER_DECIMALS: u32 = 18;
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

// en-US toLocaleString default
const LOCALE_FRACTION_DIGITS: u32 = 3;

/// A strictly positive ether amount held in wei
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EtherAmount {
    wei: u128,
}

impl EtherAmount {
    /// Parse a decimal ether string typed by the user
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(StakingError::InvalidAmount("amount is empty".to_string()));
        }

        let value = Decimal::from_str_exact(trimmed)
            .map_err(|_| StakingError::InvalidAmount(format!("'{}' is not a number", trimmed)))?;

        if value.is_sign_negative() && !value.is_zero() {
            return Err(StakingError::InvalidAmount("amount cannot be negative".to_string()));
        }
        if value.is_zero() {
            return Err(StakingError::InvalidAmount("amount must be greater than zero".to_string()));
        }
        if value.scale() > ETHER_DECIMALS {
            return Err(StakingError::InvalidAmount(format!(
                "at most {} decimal places are supported",
                ETHER_DECIMALS
            )));
        }

        let mantissa = u128::try_from(value.mantissa())
            .map_err(|_| StakingError::InvalidAmount("amount out of range".to_string()))?;
        let factor = 10u128.pow(ETHER_DECIMALS - value.scale());
        let wei = mantissa
            .checked_mul(factor)
            .ok_or_else(|| StakingError::InvalidAmount("amount out of range".to_string()))?;

        Ok(Self { wei })
    }

    pub fn wei(&self) -> u128 {
        self.wei
    }
}

impl fmt::Display for EtherAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ETH", format_ether(self.wei))
    }
}

/// Render wei the way ethers' `formatEther` does: `1.0`, `2.5`, `0.000001`
pub fn format_ether(wei: u128) -> String {
    let whole = wei / WEI_PER_ETHER;
    let frac = wei % WEI_PER_ETHER;
    let frac_digits = format!("{:018}", frac);
    let trimmed = frac_digits.trim_end_matches('0');
    if trimmed.is_empty() {
        format!("{}.0", whole)
    } else {
        format!("{}.{}", whole, trimmed)
    }
}

/// Wei as an ether-denominated decimal, if it fits in a `Decimal`
pub fn wei_to_ether(wei: u128) -> Option<Decimal> {
    let signed = i128::try_from(wei).ok()?;
    Decimal::try_from_i128_with_scale(signed, ETHER_DECIMALS).ok()
}

/// Group digits and cap fraction digits like `Number.prototype.toLocaleString` in en-US
pub fn format_locale(value: Decimal) -> String {
    let rounded = value
        .round_dp_with_strategy(LOCALE_FRACTION_DIGITS, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (text, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// Wallet balance as shown in the stake tab
pub fn format_balance(wei: u128) -> String {
    match wei_to_ether(wei) {
        Some(ether) => format_locale(ether),
        None => format_ether(wei),
    }
}

/// `0x`-prefixed hex quantity as used by JSON-RPC
pub fn to_quantity(value: u128) -> String {
    format!("{:#x}", value)
}
