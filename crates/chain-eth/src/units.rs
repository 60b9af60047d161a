//! Conversion between smallest units (wei) and whole-token decimal strings.

use alloy_primitives::U256;

use crate::error::EthError;

/// Decimals of ether and of every EVM native currency we know.
pub const ETHER_DECIMALS: u8 = 18;

/// `10^decimals`, or `None` when it does not fit in 256 bits (decimals > 77).
fn unit(decimals: u8) -> Option<U256> {
    U256::from(10u64).checked_pow(U256::from(decimals))
}

/// Renders a smallest-unit amount as a whole-token decimal string.
///
/// Trailing fractional zeros are dropped and whole amounts carry no decimal
/// point, so 1.5 ether renders as `"1.5"` and zero as `"0"`.
pub fn format_units(amount: U256, decimals: u8) -> String {
    if decimals == 0 {
        return amount.to_string();
    }

    let (whole, fraction) = match unit(decimals) {
        Some(base) => amount.div_rem(base),
        // Every U256 is below 10^78, so the whole part is zero.
        None => (U256::ZERO, amount),
    };

    if fraction.is_zero() {
        return whole.to_string();
    }

    let fraction = format!(
        "{:0>width$}",
        fraction.to_string(),
        width = decimals as usize
    );
    format!("{whole}.{}", fraction.trim_end_matches('0'))
}

/// Parses a whole-token decimal string (`"1.5"`, `".25"`, `"3"`) into
/// smallest units.
pub fn parse_units(value: &str, decimals: u8) -> Result<U256, EthError> {
    let value = value.trim();
    let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));

    if whole.is_empty() && fraction.is_empty() {
        return Err(EthError::InvalidAmount(format!("'{value}' has no digits")));
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(EthError::InvalidAmount(format!(
            "'{value}' is not an unsigned decimal number"
        )));
    }
    if fraction.len() > decimals as usize {
        return Err(EthError::InvalidAmount(format!(
            "'{value}' has more than {decimals} fractional digits"
        )));
    }

    let base = unit(decimals).ok_or(EthError::Overflow)?;
    let whole = if whole.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(whole, 10).map_err(|_| EthError::Overflow)?
    };

    let padded = format!("{fraction:0<width$}", width = decimals as usize);
    let fraction = if padded.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(&padded, 10).map_err(|_| EthError::Overflow)?
    };

    whole
        .checked_mul(base)
        .and_then(|w| w.checked_add(fraction))
        .ok_or(EthError::Overflow)
}

/// [`format_units`] at 18 decimals.
pub fn format_ether(wei: U256) -> String {
    format_units(wei, ETHER_DECIMALS)
}

/// [`parse_units`] at 18 decimals.
pub fn parse_ether(value: &str) -> Result<U256, EthError> {
    parse_units(value, ETHER_DECIMALS)
}

/// Decodes a JSON-RPC QUANTITY (`"0x14d1120d7b160000"`).
pub fn parse_quantity(quantity: &str) -> Result<U256, EthError> {
    let hex_part = quantity
        .strip_prefix("0x")
        .or_else(|| quantity.strip_prefix("0X"))
        .filter(|h| !h.is_empty())
        .ok_or_else(|| EthError::InvalidQuantity(quantity.to_string()))?;

    U256::from_str_radix(hex_part, 16).map_err(|_| EthError::InvalidQuantity(quantity.to_string()))
}
