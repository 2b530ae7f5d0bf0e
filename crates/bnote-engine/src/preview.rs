//! Pre-transaction previews for opening and closing a stake.

use serde::Serialize;
use tracing::warn;

use bnote_core::constants::SECONDS_PER_DAY;
use bnote_core::error::BnoteError;
use bnote_core::stake::find_stake;
use bnote_core::{Balance, LockDays, ProtocolParameters, StakeIndex, StakeRecord, Timestamp};

use crate::bonus::{self, BonusEstimate};
use crate::penalty::{self, PenaltyAssessment, StakeStatus};
use crate::yields;

/// Check a stake request before anything is sent to the ledger.
pub fn validate_request(
    amount: Balance,
    lock_days: LockDays,
    params: &ProtocolParameters,
) -> Result<(), BnoteError> {
    if amount == 0 {
        return Err(BnoteError::ZeroAmount);
    }
    if lock_days == 0 {
        return Err(BnoteError::ZeroLockDays);
    }
    if !params.lock_days_in_range(lock_days) {
        return Err(BnoteError::LockDaysOutOfRange {
            min: params.min_lock_days,
            max: params.max_lock_days,
            got: lock_days,
        });
    }
    Ok(())
}

/// Everything shown before a stake is opened.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StakePreview {
    pub amount: Balance,
    pub lock_days: LockDays,
    pub bonus: BonusEstimate,
    pub yield_amount: Balance,
    pub unlock_timestamp: Timestamp,
    pub max_early_penalty_percent: f64,
    pub max_late_penalty_percent: f64,
    /// Set when the lock length is outside the contract's range; the figures
    /// are still projected but the ledger would reject the request.
    pub range_warning: Option<String>,
}

/// Preview a stake of `amount` locked for `lock_days`, starting at `now`.
pub fn preview_stake(
    amount: Balance,
    lock_days: LockDays,
    now: Timestamp,
    params: &ProtocolParameters,
) -> Result<StakePreview, BnoteError> {
    let (bonus, range_warning) = match bonus::estimate(amount, lock_days, params) {
        Ok(b) => (b, None),
        Err(e) if e.is_range_violation() => {
            warn!(lock_days, error = %e, "lock length outside contract range, projecting anyway");
            (bonus::project(amount, lock_days, params)?, Some(e.to_string()))
        }
        Err(e) => return Err(e),
    };
    let yield_amount = yields::estimate(amount, lock_days, params)?;

    Ok(StakePreview {
        amount,
        lock_days,
        bonus,
        yield_amount,
        unlock_timestamp: now.saturating_add(lock_days as i64 * SECONDS_PER_DAY),
        max_early_penalty_percent: params.max_early_penalty_percent(),
        max_late_penalty_percent: params.max_late_penalty_percent(),
        range_warning,
    })
}

/// Penalty preview for ending an existing stake.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClosePreview {
    pub index: StakeIndex,
    pub principal_amount: Balance,
    pub assessment: PenaltyAssessment,
    pub penalty_amount: Balance,
}

impl ClosePreview {
    /// Confirmation text shown before submitting the close.
    pub fn message(&self) -> String {
        let a = &self.assessment;
        match a.status {
            StakeStatus::Early => {
                let days = a.days_remaining;
                format!(
                    "Early by {days} day{}. Estimated penalty ~{:.2}% of principal.",
                    plural(days),
                    a.penalty_percent
                )
            }
            StakeStatus::Late => {
                let days = -a.days_remaining;
                format!(
                    "Late by {days} day{}. Estimated penalty ~{:.2}% of principal (grows with lateness).",
                    plural(days),
                    a.penalty_percent
                )
            }
            StakeStatus::UnlockDay => "It's the unlock day. No late penalty expected.".to_string(),
        }
    }
}

fn plural(n: i64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Preview closing the stake at `index` at `now`.
pub fn close_preview(
    stakes: &[StakeRecord],
    index: StakeIndex,
    now: Timestamp,
    params: &ProtocolParameters,
) -> Result<ClosePreview, BnoteError> {
    let stake = find_stake(stakes, index).ok_or(BnoteError::UnknownStakeIndex(index))?;
    let assessment = penalty::assess(stake, now, params)?;
    let penalty_amount = penalty::penalty_amount(stake.principal_amount, assessment.penalty_bps, params)?;
    Ok(ClosePreview {
        index,
        principal_amount: stake.principal_amount,
        assessment,
        penalty_amount,
    })
}
