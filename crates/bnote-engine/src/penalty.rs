//! Early/late end-stake penalty mirror.
//!
//! A stake is `Early` while whole days remain, `UnlockDay` on the day the
//! lock elapses, and `Late` afterwards. The penalty scales linearly with the
//! distance from the unlock day, relative to the lock length, and is capped
//! at the configured maximum on each side:
//!
//! ```text
//! early: min(early_bps × days_remaining / lock_days, early_bps)
//! late:  min(late_bps  × late_days      / lock_days, late_bps)
//! ```

use serde::Serialize;
use tracing::debug;

use bnote_core::constants::SECONDS_PER_DAY;
use bnote_core::error::BnoteError;
use bnote_core::math::{bps_to_percent, mul_div_floor};
use bnote_core::{Balance, BasisPoints, LockDays, ProtocolParameters, StakeRecord, Timestamp};

/// Where a stake sits relative to its unlock day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StakeStatus {
    Early,
    #[serde(rename = "unlock_today")]
    UnlockDay,
    Late,
}

impl StakeStatus {
    pub fn from_days_remaining(days_remaining: i64) -> Self {
        match days_remaining {
            d if d > 0 => Self::Early,
            0 => Self::UnlockDay,
            _ => Self::Late,
        }
    }

    /// Status label used in tables and CSV exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Early => "early",
            Self::UnlockDay => "unlock_today",
            Self::Late => "late",
        }
    }
}

/// Penalty state of one stake at one moment.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PenaltyAssessment {
    pub status: StakeStatus,
    pub days_elapsed: i64,
    /// Negative once the stake is late.
    pub days_remaining: i64,
    pub penalty_bps: BasisPoints,
    pub penalty_percent: f64,
}

/// One point of the penalty-vs-offset chart.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CurvePoint {
    /// Days remaining until unlock; negative offsets are days late.
    pub offset: i64,
    pub penalty_bps: BasisPoints,
    pub penalty_percent: f64,
}

/// Whole days since `start`, never negative. Saturates for timestamps at the
/// edges of the `i64` range.
pub fn days_elapsed(start: Timestamp, now: Timestamp) -> i64 {
    now.saturating_sub(start).div_euclid(SECONDS_PER_DAY).max(0)
}

/// Penalty in basis points for a stake `days_remaining` days from unlock.
///
/// `lock_days` must be non-zero; callers translate a zero lock into the
/// appropriate error before getting here.
fn penalty_bps_at(days_remaining: i64, lock_days: LockDays, params: &ProtocolParameters) -> BasisPoints {
    let (cap, distance) = match StakeStatus::from_days_remaining(days_remaining) {
        StakeStatus::UnlockDay => return 0,
        StakeStatus::Early => (params.early_penalty_basis_points, days_remaining),
        StakeStatus::Late => (params.late_penalty_basis_points, -days_remaining),
    };
    // cap ≤ u64::MAX and distance ≤ i64::MAX: the product fits in a u128.
    let scaled = (cap as u128 * distance as u128) / lock_days as u128;
    scaled.min(cap as u128) as BasisPoints
}

/// Classify a stake and estimate the penalty for ending it at `now`.
pub fn assess(
    stake: &StakeRecord,
    now: Timestamp,
    params: &ProtocolParameters,
) -> Result<PenaltyAssessment, BnoteError> {
    if stake.lock_days == 0 {
        return Err(BnoteError::ZeroLockDaysRecord { index: stake.index });
    }
    if params.basis_denominator == 0 {
        return Err(BnoteError::ZeroBasisDenominator);
    }

    let days_elapsed = days_elapsed(stake.start_timestamp, now);
    let days_remaining = stake.lock_days as i64 - days_elapsed;
    let penalty_bps = penalty_bps_at(days_remaining, stake.lock_days, params);

    Ok(PenaltyAssessment {
        status: StakeStatus::from_days_remaining(days_remaining),
        days_elapsed,
        days_remaining,
        penalty_bps,
        penalty_percent: bps_to_percent(penalty_bps, params.basis_denominator),
    })
}

/// Penalty across `-lock_days..=lock_days` offsets, ascending.
pub fn curve(lock_days: LockDays, params: &ProtocolParameters) -> Result<Vec<CurvePoint>, BnoteError> {
    if lock_days == 0 {
        return Err(BnoteError::ZeroLockDays);
    }
    if params.basis_denominator == 0 {
        return Err(BnoteError::ZeroBasisDenominator);
    }
    let span = lock_days as i64;
    debug!(lock_days, "penalty curve");

    Ok((-span..=span)
        .map(|offset| {
            let penalty_bps = penalty_bps_at(offset, lock_days, params);
            CurvePoint {
                offset,
                penalty_bps,
                penalty_percent: bps_to_percent(penalty_bps, params.basis_denominator),
            }
        })
        .collect())
}

/// Principal forfeited at `penalty_bps`, truncated toward zero.
pub fn penalty_amount(
    principal: Balance,
    penalty_bps: BasisPoints,
    params: &ProtocolParameters,
) -> Result<Balance, BnoteError> {
    if params.basis_denominator == 0 {
        return Err(BnoteError::ZeroBasisDenominator);
    }
    mul_div_floor(
        principal,
        penalty_bps as u128,
        params.basis_denominator as u128,
        "penalty amount",
    )
}
