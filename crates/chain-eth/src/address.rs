use std::str::FromStr;

use alloy_primitives::Address;

use crate::error::EthError;

/// Splits off the 0x prefix and checks the 40-hex-digit body.
fn hex_body(address: &str) -> Result<&str, EthError> {
    let hex_part = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or_else(|| EthError::InvalidAddress("address must start with 0x".into()))?;

    if hex_part.len() != 40 {
        return Err(EthError::InvalidAddress(format!(
            "expected 40 hex characters, got {}",
            hex_part.len()
        )));
    }

    if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(EthError::InvalidAddress(
            "address contains non-hex characters".into(),
        ));
    }

    Ok(hex_part)
}

/// Parses a 0x-prefixed address without checking its checksum.
pub fn parse_address(address: &str) -> Result<Address, EthError> {
    let hex_part = hex_body(address)?;
    Address::from_str(hex_part).map_err(|e| EthError::InvalidAddress(e.to_string()))
}

/// Validates an Ethereum address string.
///
/// Format errors (prefix, length, non-hex characters) are returned as `Err`.
/// All-lowercase and all-uppercase addresses carry no checksum and are valid;
/// mixed case must match the EIP-55 checksum, otherwise `Ok(false)`.
pub fn validate_address(address: &str) -> Result<bool, EthError> {
    let hex_part = hex_body(address)?;

    let is_all_lower = hex_part.chars().all(|c| !c.is_ascii_uppercase());
    let is_all_upper = hex_part.chars().all(|c| !c.is_ascii_lowercase());
    if is_all_lower || is_all_upper {
        return Ok(true);
    }

    Ok(checksum_address(address)? == format!("0x{hex_part}"))
}

/// Applies EIP-55 mixed-case checksum encoding to an address of any case.
pub fn checksum_address(address: &str) -> Result<String, EthError> {
    Ok(parse_address(address)?.to_checksum(None))
}

/// Lowercase canonical form used in every outbound message.
pub fn normalize_address(address: &str) -> Result<String, EthError> {
    let parsed = parse_address(address)?;
    Ok(format!("0x{}", hex::encode(parsed.as_slice())))
}

/// Abbreviated form for display, e.g. `0x5aAe...eAed`.
pub fn short_address(address: &str) -> String {
    if address.len() <= 10 {
        return address.to_string();
    }
    match (address.get(..6), address.get(address.len() - 4..)) {
        (Some(head), Some(tail)) => format!("{head}...{tail}"),
        _ => address.to_string(),
    }
}
