use tracing::debug;

use bnote_core::constants::DAYS_PER_YEAR;
use bnote_core::error::BnoteError;
use bnote_core::math::mul_div_floor;
use bnote_core::{Balance, LockDays, ProtocolParameters};

/// Prorated APR yield for a stake held for its full lock.
///
/// `principal × apr_bps × lock_days / (basis × 365)`: numerators are
/// multiplied first and divided once so the result is reproducible.
pub fn estimate(
    principal: Balance,
    lock_days: LockDays,
    params: &ProtocolParameters,
) -> Result<Balance, BnoteError> {
    if principal == 0 {
        return Err(BnoteError::ZeroAmount);
    }
    if lock_days == 0 {
        return Err(BnoteError::ZeroLockDays);
    }
    if params.basis_denominator == 0 {
        return Err(BnoteError::ZeroBasisDenominator);
    }

    let rate_days = params.apr_basis_points as u128 * lock_days as u128;
    let denom = params.basis_denominator as u128 * DAYS_PER_YEAR as u128;
    let amount = mul_div_floor(principal, rate_days, denom, "yield")?;

    debug!(principal = %principal, lock_days, yield_amount = %amount, "yield estimate");
    Ok(amount)
}
