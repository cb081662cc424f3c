//! Decimal string ⇄ fixed-point unit conversion
//!
//! The only place where user-entered decimal text meets integer token units.
//! Everything past this boundary is `U256` arithmetic.

use alloy_primitives::U256;

/// Why a user-entered amount could not be encoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("amount must not be negative")]
    Negative,
    #[error("not a decimal number: {0}")]
    NotANumber(String),
    #[error("more than {0} decimal places")]
    TooPrecise(u8),
    #[error("amount must be greater than zero")]
    Zero,
    #[error("amount does not fit in 256 bits")]
    Overflow,
}

/// Scale a decimal string to integer units at `decimals` precision.
///
/// Rejects anything that is not a plain non-negative decimal with at most
/// `decimals` fractional digits; zero is rejected as well, so a successful
/// encode always yields a spendable amount.
pub fn encode(raw: &str, decimals: u8) -> Result<U256, AmountError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AmountError::Empty);
    }
    if raw.starts_with('-') {
        return Err(AmountError::Negative);
    }
    if !raw.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(AmountError::NotANumber(raw.to_string()));
    }

    let (int_part, frac_part) = match raw.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (raw, ""),
    };
    if frac_part.contains('.') {
        return Err(AmountError::NotANumber(raw.to_string()));
    }
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(AmountError::NotANumber(raw.to_string()));
    }
    if frac_part.len() > decimals as usize {
        return Err(AmountError::TooPrecise(decimals));
    }

    let scale = scale_for(decimals).ok_or(AmountError::Overflow)?;
    let int_units = if int_part.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(int_part, 10).map_err(|_| AmountError::Overflow)?
    };
    let frac_units = if frac_part.is_empty() {
        U256::ZERO
    } else {
        let padded = format!("{:0<width$}", frac_part, width = decimals as usize);
        U256::from_str_radix(&padded, 10).map_err(|_| AmountError::Overflow)?
    };

    let units = int_units
        .checked_mul(scale)
        .and_then(|v| v.checked_add(frac_units))
        .ok_or(AmountError::Overflow)?;
    if units.is_zero() {
        return Err(AmountError::Zero);
    }
    Ok(units)
}

/// Render integer units back as a decimal string, trailing zeros trimmed.
pub fn decode(units: U256, decimals: u8) -> String {
    let Some(scale) = scale_for(decimals) else {
        return units.to_string();
    };
    if decimals == 0 {
        return units.to_string();
    }
    let whole = units / scale;
    let frac = units % scale;
    if frac.is_zero() {
        return whole.to_string();
    }
    let frac_str = format!("{:0>width$}", frac, width = decimals as usize);
    format!("{}.{}", whole, frac_str.trim_end_matches('0'))
}

fn scale_for(decimals: u8) -> Option<U256> {
    U256::from(10u64).checked_pow(U256::from(decimals))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_plain_amounts() {
        assert_eq!(
            encode("1", 18).unwrap(),
            U256::from(1_000_000_000_000_000_000u128)
        );
        assert_eq!(
            encode("1.5", 18).unwrap(),
            U256::from(1_500_000_000_000_000_000u128)
        );
        assert_eq!(encode("10", 6).unwrap(), U256::from(10_000_000u64));
        assert_eq!(encode(".5", 1).unwrap(), U256::from(5u64));
        assert_eq!(encode("2.", 0).unwrap(), U256::from(2u64));
    }

    #[test]
    fn rejects_invalid_amounts() {
        assert_eq!(encode("", 18), Err(AmountError::Empty));
        assert_eq!(encode("   ", 18), Err(AmountError::Empty));
        assert_eq!(encode("-1", 18), Err(AmountError::Negative));
        assert_eq!(
            encode("abc", 18),
            Err(AmountError::NotANumber("abc".to_string()))
        );
        assert_eq!(
            encode("1.2.3", 18),
            Err(AmountError::NotANumber("1.2.3".to_string()))
        );
        assert_eq!(
            encode(".", 18),
            Err(AmountError::NotANumber(".".to_string()))
        );
        assert_eq!(
            encode("1.123456789012345678901", 18),
            Err(AmountError::TooPrecise(18))
        );
        assert_eq!(encode("0", 18), Err(AmountError::Zero));
        assert_eq!(encode("0.000", 18), Err(AmountError::Zero));
    }

    #[test]
    fn decode_inverts_encode_up_to_normalization() {
        for (raw, normalized) in [
            ("1", "1"),
            ("1.5", "1.5"),
            ("1.500", "1.5"),
            ("0.1", "0.1"),
            (".25", "0.25"),
            ("10", "10"),
            ("123.000000000000000001", "123.000000000000000001"),
        ] {
            let units = encode(raw, 18).unwrap();
            assert_eq!(decode(units, 18), normalized, "raw input {raw:?}");
        }
    }

    #[test]
    fn decode_zero_decimals() {
        assert_eq!(decode(U256::from(42u64), 0), "42");
    }
}
