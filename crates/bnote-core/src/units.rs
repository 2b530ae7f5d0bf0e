//! Exact conversion between human decimal strings and base units.
//!
//! Display only; the estimators never see a decimal string.

use crate::error::BnoteError;
use crate::math::pow10;
use crate::types::Balance;

/// Format base units as a decimal string with at least one fractional digit
/// and no trailing zeros beyond it: `1000.0`, `0.25`, `12.000001`.
pub fn format_units(amount: Balance, decimals: u8) -> String {
    if decimals == 0 {
        return format!("{amount}.0");
    }
    let scale = match pow10(decimals) {
        Ok(s) => s,
        Err(_) => return amount.to_string(),
    };
    let whole = amount / scale;
    let frac = amount % scale;
    let mut frac_str = format!("{:0width$}", frac, width = decimals as usize);
    while frac_str.len() > 1 && frac_str.ends_with('0') {
        frac_str.pop();
    }
    format!("{whole}.{frac_str}")
}

/// Parse a non-negative decimal string into base units. Rejects signs,
/// exponents, and more fractional digits than the token has.
pub fn parse_units(input: &str, decimals: u8) -> Result<Balance, BnoteError> {
    let s = input.trim();
    let invalid = || BnoteError::InvalidAmount(input.to_string());

    if s.is_empty() {
        return Err(invalid());
    }
    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    if frac.len() > decimals as usize {
        return Err(BnoteError::InvalidAmount(format!(
            "{input} has more than {decimals} fractional digits"
        )));
    }

    let scale = pow10(decimals)?;
    let whole_units: Balance = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    let frac_units: Balance = if frac.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", frac, width = decimals as usize);
        padded.parse().map_err(|_| invalid())?
    };

    whole_units
        .checked_mul(scale)
        .and_then(|w| w.checked_add(frac_units))
        .ok_or(BnoteError::ArithmeticOverflow("parse_units"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE: Balance = 1_000_000_000_000_000_000;

    #[test]
    fn formats_whole_and_fractional_amounts() {
        assert_eq!(format_units(1_000 * ONE, 18), "1000.0");
        assert_eq!(format_units(ONE / 4, 18), "0.25");
        assert_eq!(format_units(0, 18), "0.0");
        assert_eq!(format_units(1, 18), "0.000000000000000001");
        assert_eq!(format_units(42, 0), "42.0");
    }

    #[test]
    fn parses_decimal_strings() {
        assert_eq!(parse_units("1000", 18).unwrap(), 1_000 * ONE);
        assert_eq!(parse_units("0.25", 18).unwrap(), ONE / 4);
        assert_eq!(parse_units(".5", 18).unwrap(), ONE / 2);
        assert_eq!(parse_units("7.", 18).unwrap(), 7 * ONE);
        assert_eq!(parse_units(" 3 ", 0).unwrap(), 3);
    }

    #[test]
    fn rejects_malformed_input() {
        for bad in ["", ".", "-1", "1e3", "1,000", "abc", "1.2.3"] {
            assert!(
                matches!(parse_units(bad, 18), Err(BnoteError::InvalidAmount(_))),
                "{bad:?} should be rejected"
            );
        }
        assert!(parse_units("0.123", 2).is_err());
    }

    #[test]
    fn format_then_parse_is_exact() {
        let amount = 123_456_789 * ONE + 987_654_321;
        let text = format_units(amount, 18);
        assert_eq!(parse_units(&text, 18).unwrap(), amount);
    }
}
