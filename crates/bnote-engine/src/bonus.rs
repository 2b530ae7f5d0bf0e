//! Longer Pays Better / Bigger Pays Better bonus and share projection.
//!
//! ```text
//! lpb_bps   = min(lock_days / 365, lpb_max_years) × lpb_bps_per_year
//! bpb_bps   = floor(bpb_max_bps × min(principal, cap) / cap)
//! effective = principal × (basis + lpb_bps + bpb_bps) / basis
//! shares    = effective × 10^decimals / share_rate
//! ```
//!
//! Each division truncates toward zero, once, after all multiplications.

use serde::Serialize;
use tracing::debug;

use bnote_core::constants::DAYS_PER_YEAR;
use bnote_core::error::BnoteError;
use bnote_core::math::{bps_to_percent, mul_div_floor};
use bnote_core::{Balance, BasisPoints, LockDays, ProtocolParameters};

/// Bonus breakdown and projected shares for a prospective stake.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BonusEstimate {
    /// Full years that count toward the time bonus.
    pub lpb_years: u32,
    pub lpb_bonus_bps: BasisPoints,
    pub bpb_bonus_bps: BasisPoints,
    /// `basis + lpb + bpb`, the numerator applied to the principal.
    pub bonus_factor_numerator: BasisPoints,
    pub effective_principal: Balance,
    pub projected_shares: Balance,
}

impl BonusEstimate {
    pub fn lpb_bonus_percent(&self, params: &ProtocolParameters) -> f64 {
        bps_to_percent(self.lpb_bonus_bps, params.basis_denominator)
    }

    pub fn bpb_bonus_percent(&self, params: &ProtocolParameters) -> f64 {
        bps_to_percent(self.bpb_bonus_bps, params.basis_denominator)
    }
}

/// Estimate the bonus for a stake the user is about to open.
///
/// A lock length outside `[min_lock_days, max_lock_days]` is reported as
/// `LockDaysOutOfRange`; callers that only want to warn can fall back to
/// [`project`].
pub fn estimate(
    principal: Balance,
    lock_days: LockDays,
    params: &ProtocolParameters,
) -> Result<BonusEstimate, BnoteError> {
    check_inputs(principal, lock_days)?;
    if !params.lock_days_in_range(lock_days) {
        return Err(BnoteError::LockDaysOutOfRange {
            min: params.min_lock_days,
            max: params.max_lock_days,
            got: lock_days,
        });
    }
    project(principal, lock_days, params)
}

/// Same computation as [`estimate`] without the lock-range check.
pub fn project(
    principal: Balance,
    lock_days: LockDays,
    params: &ProtocolParameters,
) -> Result<BonusEstimate, BnoteError> {
    check_inputs(principal, lock_days)?;
    if params.basis_denominator == 0 {
        return Err(BnoteError::ZeroBasisDenominator);
    }
    if params.share_rate == 0 {
        return Err(BnoteError::ZeroShareRate);
    }

    let lpb_years = (lock_days / DAYS_PER_YEAR).min(params.longer_pays_better_max_years);
    let lpb_bonus_bps = (lpb_years as u64)
        .checked_mul(params.longer_pays_better_bps_per_year)
        .ok_or(BnoteError::ArithmeticOverflow("lpb bonus"))?;
    let bpb_bonus_bps = bpb_bonus_bps(principal, params)?;

    let bonus_factor_numerator = params
        .basis_denominator
        .checked_add(lpb_bonus_bps)
        .and_then(|n| n.checked_add(bpb_bonus_bps))
        .ok_or(BnoteError::ArithmeticOverflow("bonus factor"))?;

    let effective_principal = mul_div_floor(
        principal,
        bonus_factor_numerator as u128,
        params.basis_denominator as u128,
        "effective principal",
    )?;
    let projected_shares = mul_div_floor(
        effective_principal,
        params.unit_scale()?,
        params.share_rate,
        "projected shares",
    )?;

    debug!(
        principal = %principal,
        lock_days,
        lpb_bonus_bps,
        bpb_bonus_bps,
        projected_shares = %projected_shares,
        "bonus estimate"
    );

    Ok(BonusEstimate {
        lpb_years,
        lpb_bonus_bps,
        bpb_bonus_bps,
        bonus_factor_numerator,
        effective_principal,
        projected_shares,
    })
}

/// Size bonus in basis points, using an exact rational comparison against
/// the cap.
pub fn bpb_bonus_bps(principal: Balance, params: &ProtocolParameters) -> Result<BasisPoints, BnoteError> {
    let max_bps = params.bigger_pays_better_max_bps;
    let cap = params.bigger_pays_better_cap_amount;
    if cap == 0 {
        return if max_bps == 0 {
            Ok(0)
        } else {
            Err(BnoteError::BonusCapMissing { max_bps })
        };
    }
    if principal >= cap {
        return Ok(max_bps);
    }
    // principal < cap, so the quotient is below max_bps and fits in u64.
    let bps = mul_div_floor(max_bps as u128, principal, cap, "bpb bonus")?;
    Ok(bps as BasisPoints)
}

fn check_inputs(principal: Balance, lock_days: LockDays) -> Result<(), BnoteError> {
    if principal == 0 {
        return Err(BnoteError::ZeroAmount);
    }
    if lock_days == 0 {
        return Err(BnoteError::ZeroLockDays);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{example_params, ONE};

    #[test]
    fn worked_example_one_year() {
        let p = example_params();
        let est = estimate(1_000, 365, &p).unwrap();
        assert_eq!(est.lpb_years, 1);
        assert_eq!(est.lpb_bonus_bps, 2_000);
        assert_eq!(est.bpb_bonus_bps, 4);
        assert_eq!(est.bonus_factor_numerator, 12_004);
        assert_eq!(est.effective_principal, 1_200);
        assert_eq!(est.projected_shares, 1_200);
    }

    #[test]
    fn partial_years_do_not_count() {
        let p = example_params();
        assert_eq!(estimate(1_000, 364, &p).unwrap().lpb_bonus_bps, 0);
        assert_eq!(estimate(1_000, 729, &p).unwrap().lpb_bonus_bps, 2_000);
        assert_eq!(estimate(1_000, 730, &p).unwrap().lpb_bonus_bps, 4_000);
    }

    #[test]
    fn lpb_caps_at_max_years() {
        let p = example_params();
        let est = estimate(1_000, 3_690, &p).unwrap();
        assert_eq!(est.lpb_years, 10);
        assert_eq!(est.lpb_bonus_bps, 20_000);
    }

    #[test]
    fn bpb_exact_at_and_above_cap() {
        let p = example_params();
        assert_eq!(bpb_bonus_bps(210_000, &p).unwrap(), 1_000);
        assert_eq!(bpb_bonus_bps(10_000_000, &p).unwrap(), 1_000);
        // One unit below the cap truncates to 999 instead of rounding up.
        assert_eq!(bpb_bonus_bps(209_999, &p).unwrap(), 999);
        assert_eq!(bpb_bonus_bps(209, &p).unwrap(), 0);
        assert_eq!(bpb_bonus_bps(210, &p).unwrap(), 1);
    }

    #[test]
    fn share_rate_scales_shares() {
        let mut p = example_params();
        p.share_rate = 2 * ONE;
        let est = estimate(1_000, 365, &p).unwrap();
        assert_eq!(est.effective_principal, 1_200);
        assert_eq!(est.projected_shares, 600);

        p.share_rate = 3 * ONE / 2;
        assert_eq!(project(1_000, 365, &p).unwrap().projected_shares, 800);

        // 1200 / 0.7 = 1714.28… truncates.
        p.share_rate = 7 * ONE / 10;
        assert_eq!(project(1_000, 365, &p).unwrap().projected_shares, 1_714);
    }

    #[test]
    fn large_stakes_do_not_overflow() {
        let mut p = example_params();
        p.bigger_pays_better_cap_amount = 210_000 * ONE;
        let est = estimate(1_000_000_000 * ONE, 3_650, &p).unwrap();
        assert_eq!(est.bpb_bonus_bps, 1_000);
        // 10000 + 20000 + 1000 = 31000 → 3.1×
        assert_eq!(est.projected_shares, 3_100_000_000 * ONE);
    }

    #[test]
    fn out_of_range_is_flagged_but_projectable() {
        let p = example_params();
        let err = estimate(1_000, 4_000, &p).unwrap_err();
        assert!(err.is_range_violation());
        assert!(project(1_000, 4_000, &p).is_ok());
    }

    #[test]
    fn invalid_inputs_and_configuration() {
        let mut p = example_params();
        assert!(matches!(estimate(0, 10, &p), Err(BnoteError::ZeroAmount)));
        assert!(matches!(estimate(10, 0, &p), Err(BnoteError::ZeroLockDays)));

        p.share_rate = 0;
        assert!(matches!(estimate(10, 10, &p), Err(BnoteError::ZeroShareRate)));

        let mut p = example_params();
        p.bigger_pays_better_cap_amount = 0;
        assert!(matches!(
            estimate(10, 10, &p),
            Err(BnoteError::BonusCapMissing { max_bps: 1_000 })
        ));
        p.bigger_pays_better_max_bps = 0;
        assert_eq!(estimate(10, 10, &p).unwrap().bpb_bonus_bps, 0);
    }

    #[test]
    fn percent_views() {
        let p = example_params();
        let est = estimate(1_000, 365, &p).unwrap();
        assert_eq!(est.lpb_bonus_percent(&p), 20.0);
        assert!((est.bpb_bonus_percent(&p) - 0.04).abs() < 1e-12);
    }
}
