use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const ETHER_DECIMALS: u32 = 18;
const WEI_PER_ETHER: u128 = 10u128.pow(ETHER_DECIMALS);

/// Amount in wei (10^-18 ETH).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Wei(pub u128);

impl Wei {
    pub const ZERO: Wei = Wei(0);

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn as_u128(self) -> u128 {
        self.0
    }
}

impl std::fmt::Display for Wei {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse a numeric amount as typed into the form: plain decimals with an
/// optional sign (`"0.5"`, `".25"`, `"+1"`, `"-1"`) or scientific notation
/// (`"1e3"`, `"2.5E-2"`). Surrounding whitespace is ignored.
pub fn parse_decimal(input: &str) -> Result<Decimal> {
    let s = input.trim();
    // Digit separators are not part of a numeric literal here.
    if s.is_empty() || s.contains('_') {
        return Err(Error::InvalidAmount(input.to_string()));
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .map_err(|_| Error::InvalidAmount(input.to_string()))
}

/// Rescale an ether amount to wei. Negative amounts and amounts finer than
/// one wei are rejected.
pub fn to_wei(amount: Decimal) -> Result<Wei> {
    let amount = amount.normalize();
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(Error::InvalidAmount(amount.to_string()));
    }
    let scale = amount.scale();
    if scale > ETHER_DECIMALS {
        return Err(Error::InvalidAmount(amount.to_string()));
    }
    let mantissa = amount.mantissa().unsigned_abs();
    let factor = 10u128
        .checked_pow(ETHER_DECIMALS - scale)
        .ok_or(Error::AmountOverflow)?;
    mantissa
        .checked_mul(factor)
        .map(Wei)
        .ok_or(Error::AmountOverflow)
}

/// Parse an ether amount into wei. See [`parse_decimal`] for the accepted
/// forms and [`to_wei`] for the range rules.
pub fn parse_ether(input: &str) -> Result<Wei> {
    to_wei(parse_decimal(input)?)
}

/// Render wei as a decimal ether string with trailing zeros trimmed.
pub fn format_ether(amount: Wei) -> String {
    let whole = amount.0 / WEI_PER_ETHER;
    let frac = amount.0 % WEI_PER_ETHER;
    if frac == 0 {
        return whole.to_string();
    }
    let digits = format!("{frac:018}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_and_fraction() {
        assert_eq!(parse_ether("1").unwrap(), Wei(WEI_PER_ETHER));
        assert_eq!(parse_ether("0.5").unwrap(), Wei(WEI_PER_ETHER / 2));
        assert_eq!(parse_ether(".25").unwrap(), Wei(WEI_PER_ETHER / 4));
        assert_eq!(parse_ether(" 0.1 ").unwrap(), Wei(100_000_000_000_000_000));
        assert_eq!(parse_ether("1.500").unwrap(), Wei(3 * WEI_PER_ETHER / 2));
    }

    #[test]
    fn parses_sign_and_exponent() {
        assert_eq!(parse_ether("+1").unwrap(), Wei(WEI_PER_ETHER));
        assert_eq!(parse_ether("1e3").unwrap(), Wei(1000 * WEI_PER_ETHER));
        assert_eq!(parse_ether("2.5E-2").unwrap(), Wei(25 * WEI_PER_ETHER / 1000));
    }

    #[test]
    fn smallest_unit() {
        assert_eq!(parse_ether("0.000000000000000001").unwrap(), Wei(1));
        assert_eq!(parse_ether("1e-18").unwrap(), Wei(1));
        assert!(matches!(
            parse_ether("0.0000000000000000001"),
            Err(Error::InvalidAmount(_))
        ));
    }

    #[test]
    fn rejects_malformed() {
        for bad in ["", " ", "abc", "1.2.3", "0x10", "1,000", "1_000", "e3"] {
            assert!(parse_decimal(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn negative_is_rejected_after_parsing() {
        let amount = parse_decimal("-1").unwrap();
        assert!(amount.is_sign_negative());
        assert!(matches!(to_wei(amount), Err(Error::InvalidAmount(_))));
    }

    #[test]
    fn zero_parses_as_zero() {
        assert!(parse_ether("0").unwrap().is_zero());
        assert!(parse_ether("0.000").unwrap().is_zero());
        assert!(parse_ether("-0").unwrap().is_zero());
    }

    #[test]
    fn overflow_is_reported() {
        // Fits a Decimal, but not 128-bit wei.
        assert!(matches!(
            parse_ether("79000000000000000000000000000"),
            Err(Error::AmountOverflow)
        ));
        assert!(parse_decimal(&"9".repeat(40)).is_err());
    }

    #[test]
    fn format_trims_trailing_zeros() {
        assert_eq!(format_ether(Wei(WEI_PER_ETHER / 2)), "0.5");
        assert_eq!(format_ether(Wei(2 * WEI_PER_ETHER)), "2");
        assert_eq!(format_ether(Wei(1)), "0.000000000000000001");
        assert_eq!(format_ether(Wei::ZERO), "0");
    }
}
