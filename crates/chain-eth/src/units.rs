//! Conversions between on-chain base units and human-readable amounts.
//!
//! Display values are `f64` and therefore lossy beyond ~15 significant digits.
//! They are for showing balances only; never turn one back into an amount
//! that goes on chain. Use [`parse_units`] for exact input conversion.

use alloy_primitives::U256;

use crate::error::EthError;

/// Decimals of every EVM native currency (1 ether = 10^18 wei).
pub const ETHER_DECIMALS: u8 = 18;

/// Converts a base-unit integer into a display amount by dividing by
/// `10^decimals`.
pub fn format_units(value: U256, decimals: u8) -> f64 {
    let as_float: f64 = value.to_string().parse().unwrap_or(f64::INFINITY);
    as_float / 10f64.powi(i32::from(decimals))
}

/// Converts wei into ether for display.
pub fn format_ether(wei: U256) -> f64 {
    format_units(wei, ETHER_DECIMALS)
}

/// Parses a decimal string such as `"1.5"` into base units, exactly.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256, EthError> {
    let amount = amount.trim();
    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (amount, ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(EthError::InvalidAmount(format!("{amount:?} is empty")));
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(EthError::InvalidAmount(format!(
            "{amount:?} is not a non-negative decimal number"
        )));
    }
    if fraction.len() > usize::from(decimals) {
        return Err(EthError::InvalidAmount(format!(
            "{amount:?} has more than {decimals} decimal places"
        )));
    }

    let mut digits = String::with_capacity(whole.len() + usize::from(decimals));
    digits.push_str(whole);
    digits.push_str(fraction);
    for _ in fraction.len()..usize::from(decimals) {
        digits.push('0');
    }

    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }

    U256::from_str_radix(digits, 10)
        .map_err(|e| EthError::InvalidAmount(format!("{amount:?} is out of range: {e}")))
}

/// Parses an ether amount into wei.
pub fn parse_ether(amount: &str) -> Result<U256, EthError> {
    parse_units(amount, ETHER_DECIMALS)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_ETHER: u128 = 1_000_000_000_000_000_000;

    #[test]
    fn format_one_ether() {
        assert_eq!(format_ether(U256::from(ONE_ETHER)), 1.0);
    }

    #[test]
    fn format_six_decimal_token() {
        assert_eq!(format_units(U256::from(2_500_000u64), 6), 2.5);
    }

    #[test]
    fn format_zero_decimals_is_identity() {
        assert_eq!(format_units(U256::from(42u64), 0), 42.0);
    }

    #[test]
    fn parse_whole_and_fraction() {
        assert_eq!(parse_ether("1").unwrap(), U256::from(ONE_ETHER));
        assert_eq!(parse_ether("0.001").unwrap(), U256::from(ONE_ETHER / 1000));
        assert_eq!(parse_units("2.5", 6).unwrap(), U256::from(2_500_000u64));
        assert_eq!(parse_units(".5", 1).unwrap(), U256::from(5u64));
    }

    #[test]
    fn parse_zero() {
        assert_eq!(parse_ether("0").unwrap(), U256::ZERO);
        assert_eq!(parse_ether("0.0").unwrap(), U256::ZERO);
    }

    #[test]
    fn parse_rejects_excess_precision() {
        assert!(parse_units("1.234", 2).is_err());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_ether("").is_err());
        assert!(parse_ether(".").is_err());
        assert!(parse_ether("-1").is_err());
        assert!(parse_ether("1.2.3").is_err());
        assert!(parse_ether("abc").is_err());
    }
}
