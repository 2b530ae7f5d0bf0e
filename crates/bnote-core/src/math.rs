//! Checked integer helpers shared by every estimator.
//!
//! All ratios that feed a basis-point value or a token amount go through
//! here: multiply first, divide once, truncate toward zero.

use crate::error::BnoteError;
use crate::types::Balance;

/// `floor(a * b / denom)` without an intermediate overflow.
///
/// Splits `a = q * denom + r`, so `a * b / denom = q * b + r * b / denom`.
/// Only fails when the result itself (or `r * b`) does not fit in a u128.
pub fn mul_div_floor(
    a: u128,
    b: u128,
    denom: u128,
    what: &'static str,
) -> Result<u128, BnoteError> {
    if denom == 0 {
        return Err(BnoteError::ArithmeticOverflow(what));
    }
    if let Some(product) = a.checked_mul(b) {
        return Ok(product / denom);
    }
    let q = a / denom;
    let r = a % denom;
    let whole = q.checked_mul(b).ok_or(BnoteError::ArithmeticOverflow(what))?;
    let part = r
        .checked_mul(b)
        .ok_or(BnoteError::ArithmeticOverflow(what))?
        / denom;
    whole
        .checked_add(part)
        .ok_or(BnoteError::ArithmeticOverflow(what))
}

/// 10^decimals as a base-unit scale.
pub fn pow10(decimals: u8) -> Result<Balance, BnoteError> {
    10u128
        .checked_pow(decimals as u32)
        .ok_or(BnoteError::ArithmeticOverflow("10^decimals"))
}

/// Basis points rendered as a percentage for display. Never fed back into
/// integer arithmetic.
pub fn bps_to_percent(bps: u64, basis_denominator: u64) -> f64 {
    if basis_denominator == 0 {
        return 0.0;
    }
    bps as f64 * 100.0 / basis_denominator as f64
}
