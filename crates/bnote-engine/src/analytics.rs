//! Aggregate, chart-ready views over an owner's stakes.
//!
//! All functions take the full stake list plus `now` and recompute from
//! scratch; nothing is cached between calls.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use bnote_core::constants::{MATURITY_BUCKETS, SECONDS_PER_DAY, UNLOCK_CALENDAR_HORIZON_DAYS};
use bnote_core::error::BnoteError;
use bnote_core::types::day_index;
use bnote_core::{
    Balance, BasisPoints, DayIndex, LockDays, ProtocolParameters, StakeIndex, StakeRecord,
    Timestamp,
};

use crate::penalty::{self, StakeStatus};

// ── Supply split ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SupplySlice {
    pub label: &'static str,
    pub amount: Balance,
}

/// Locked vs circulating supply. Staking burns tokens, so the locked amount
/// is whatever is missing from the initial supply.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SupplySplit {
    pub staked_amount: Balance,
    pub circulating_amount: Balance,
    pub staked_percent: f64,
    pub slices: Vec<SupplySlice>,
}

pub fn supply_split(params: &ProtocolParameters) -> SupplySplit {
    let staked_amount = params.initial_supply.saturating_sub(params.total_supply);
    let staked_percent = if params.initial_supply > 0 {
        staked_amount as f64 / params.initial_supply as f64 * 100.0
    } else {
        0.0
    };
    SupplySplit {
        staked_amount,
        circulating_amount: params.total_supply,
        staked_percent,
        slices: vec![
            SupplySlice { label: "Locked", amount: staked_amount },
            SupplySlice { label: "Circulating", amount: params.total_supply },
        ],
    }
}

// ── Maturity histogram ────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MaturityBucket {
    pub label: String,
    pub min_days: LockDays,
    /// `None` for the open-ended last bucket.
    pub max_days: Option<LockDays>,
    pub amount: Balance,
    pub count: u64,
}

/// Principal grouped by lock length into the fixed buckets
/// `1-7, 8-30, 31-90, 91-365, 366+`.
pub fn maturity_histogram(stakes: &[StakeRecord]) -> Vec<MaturityBucket> {
    let mut buckets: Vec<MaturityBucket> = MATURITY_BUCKETS
        .iter()
        .map(|&(min_days, max_days)| MaturityBucket {
            label: match max_days {
                Some(max) => format!("{min_days}-{max}d"),
                None => format!("{min_days}d+"),
            },
            min_days,
            max_days,
            amount: 0,
            count: 0,
        })
        .collect();

    for stake in stakes {
        // Buckets are ascending and contiguous, so the first upper bound that
        // admits the lock length is its bucket. A zero-day lock (never valid
        // upstream) lands in the first bucket rather than vanishing.
        let slot = buckets
            .iter()
            .position(|b| b.max_days.map_or(true, |max| stake.lock_days <= max))
            .unwrap_or(buckets.len() - 1);
        let bucket = &mut buckets[slot];
        bucket.amount = bucket.amount.saturating_add(stake.principal_amount);
        bucket.count += 1;
    }
    buckets
}

// ── Unlock calendar ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CalendarEntry {
    pub day: DayIndex,
    /// `YYYY-MM-DD` (UTC) for chart labels.
    pub date: String,
    pub amount: Balance,
    pub count: u64,
}

/// Principal unlocking on each day from today through today + 90.
///
/// Always 91 entries, including days with nothing unlocking.
pub fn unlock_calendar(stakes: &[StakeRecord], now: Timestamp) -> Vec<CalendarEntry> {
    let today = day_index(now);
    let mut entries: Vec<CalendarEntry> = (0..=UNLOCK_CALENDAR_HORIZON_DAYS)
        .map(|offset| {
            let day = today + offset;
            CalendarEntry {
                day,
                date: day_label(day),
                amount: 0,
                count: 0,
            }
        })
        .collect();

    for stake in stakes {
        let offset = stake.unlock_day() - today;
        if (0..=UNLOCK_CALENDAR_HORIZON_DAYS).contains(&offset) {
            let entry = &mut entries[offset as usize];
            entry.amount = entry.amount.saturating_add(stake.principal_amount);
            entry.count += 1;
        }
    }
    entries
}

/// Stakes the unlock calendar leaves out, so callers can show them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CalendarOverflow {
    /// Unlocking more than 90 days from today.
    pub beyond_count: u64,
    pub beyond_amount: Balance,
    /// Unlock day already passed and not yet ended.
    pub past_count: u64,
    pub past_amount: Balance,
}

pub fn unlock_calendar_overflow(stakes: &[StakeRecord], now: Timestamp) -> CalendarOverflow {
    let today = day_index(now);
    let mut overflow = CalendarOverflow::default();
    for stake in stakes {
        let offset = stake.unlock_day() - today;
        if offset > UNLOCK_CALENDAR_HORIZON_DAYS {
            overflow.beyond_count += 1;
            overflow.beyond_amount = overflow.beyond_amount.saturating_add(stake.principal_amount);
        } else if offset < 0 {
            overflow.past_count += 1;
            overflow.past_amount = overflow.past_amount.saturating_add(stake.principal_amount);
        }
    }
    overflow
}

fn day_label(day: DayIndex) -> String {
    DateTime::<Utc>::from_timestamp(day * SECONDS_PER_DAY, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

// ── Ladder ────────────────────────────────────────────────────────────────────

/// One bar of the stake ladder: where it starts and how long it runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LadderRung {
    pub index: StakeIndex,
    /// Days after the earliest stake's start day.
    pub offset: i64,
    pub duration: LockDays,
}

pub fn ladder(stakes: &[StakeRecord]) -> Vec<LadderRung> {
    let Some(min_start_day) = stakes.iter().map(StakeRecord::start_day).min() else {
        return Vec::new();
    };
    stakes
        .iter()
        .map(|s| LadderRung {
            index: s.index,
            offset: s.start_day() - min_start_day,
            duration: s.lock_days,
        })
        .collect()
}

// ── Per-stake rows ────────────────────────────────────────────────────────────

/// One stake as shown in the table and written to CSV.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StakeRow {
    pub index: StakeIndex,
    pub principal_amount: Balance,
    pub lock_days: LockDays,
    pub start_timestamp: Timestamp,
    pub unlock_timestamp: Timestamp,
    pub status: StakeStatus,
    pub days_remaining: i64,
    pub estimated_penalty_bps: BasisPoints,
    pub estimated_penalty_percent: f64,
}

/// Rows for every stake, in input order.
///
/// A stake with a zero-day lock has no penalty to estimate; it is logged and
/// left out while the remaining rows are still produced.
pub fn stake_rows(
    stakes: &[StakeRecord],
    params: &ProtocolParameters,
    now: Timestamp,
) -> Result<Vec<StakeRow>, BnoteError> {
    debug!(stakes = stakes.len(), now, "projecting stake rows");
    let mut rows = Vec::with_capacity(stakes.len());
    for s in stakes {
        let a = match penalty::assess(s, now, params) {
            Ok(a) => a,
            Err(e @ BnoteError::ZeroLockDaysRecord { .. }) => {
                warn!(index = s.index, error = %e, "skipping stake row");
                continue;
            }
            Err(e) => return Err(e),
        };
        rows.push(StakeRow {
            index: s.index,
            principal_amount: s.principal_amount,
            lock_days: s.lock_days,
            start_timestamp: s.start_timestamp,
            unlock_timestamp: s.unlock_timestamp(),
            status: a.status,
            days_remaining: a.days_remaining,
            estimated_penalty_bps: a.penalty_bps,
            estimated_penalty_percent: a.penalty_percent,
        });
    }
    Ok(rows)
}

// ── Wallet totals ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WalletTotals {
    pub stake_count: u64,
    pub principal: Balance,
    pub shares: Balance,
}

pub fn wallet_totals(stakes: &[StakeRecord]) -> WalletTotals {
    stakes.iter().fold(WalletTotals::default(), |mut acc, s| {
        acc.stake_count += 1;
        acc.principal = acc.principal.saturating_add(s.principal_amount);
        acc.shares = acc.shares.saturating_add(s.shares);
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{days_after, example_params, stake, T0};

    #[test]
    fn supply_split_example() {
        let p = example_params();
        let split = supply_split(&p);
        assert_eq!(split.staked_amount, 1_000);
        assert_eq!(split.circulating_amount, 9_000);
        assert_eq!(split.staked_percent, 10.0);
        assert_eq!(split.slices[0].label, "Locked");
        assert_eq!(split.slices[1].amount, 9_000);
    }

    #[test]
    fn supply_split_guards() {
        let mut p = example_params();
        p.total_supply = 20_000;
        assert_eq!(supply_split(&p).staked_amount, 0);
        p.initial_supply = 0;
        assert_eq!(supply_split(&p).staked_percent, 0.0);
    }

    #[test]
    fn histogram_bucket_edges() {
        let stakes = vec![
            stake(0, 1, 1, T0),
            stake(1, 2, 7, T0),
            stake(2, 4, 8, T0),
            stake(3, 8, 30, T0),
            stake(4, 16, 31, T0),
            stake(5, 32, 90, T0),
            stake(6, 64, 91, T0),
            stake(7, 128, 365, T0),
            stake(8, 256, 366, T0),
            stake(9, 512, 5_555, T0),
        ];
        let h = maturity_histogram(&stakes);
        let amounts: Vec<Balance> = h.iter().map(|b| b.amount).collect();
        assert_eq!(amounts, vec![3, 12, 48, 192, 768]);
        assert!(h.iter().all(|b| b.count == 2));
        assert_eq!(h[0].label, "1-7d");
        assert_eq!(h[4].label, "366d+");
    }

    #[test]
    fn histogram_of_nothing_is_five_empty_buckets() {
        let h = maturity_histogram(&[]);
        assert_eq!(h.len(), 5);
        assert!(h.iter().all(|b| b.amount == 0 && b.count == 0));
    }

    #[test]
    fn calendar_is_dense() {
        let now = days_after(T0, 0);
        let cal = unlock_calendar(&[], now);
        assert_eq!(cal.len(), 91);
        assert_eq!(cal[0].day, day_index(now));
        assert_eq!(cal[0].date, "2024-01-01");
        assert_eq!(cal[90].day, day_index(now) + 90);
        assert!(cal.iter().all(|e| e.amount == 0));
    }

    #[test]
    fn calendar_sums_per_day_and_reports_overflow() {
        let now = T0 + 600;
        let stakes = vec![
            stake(0, 100, 5, T0),
            stake(1, 50, 5, T0 + 3_600),
            stake(2, 7, 90, T0),
            stake(3, 9, 91, T0),
            stake(4, 11, 1, T0 - 10 * 86_400),
            stake(5, 13, 1, T0 - 86_400),
        ];
        let cal = unlock_calendar(&stakes, now);
        assert_eq!(cal[5].amount, 150);
        assert_eq!(cal[5].count, 2);
        assert_eq!(cal[90].amount, 7);
        // Unlocking today (started yesterday for one day).
        assert_eq!(cal[0].amount, 13);

        let overflow = unlock_calendar_overflow(&stakes, now);
        assert_eq!(overflow.beyond_count, 1);
        assert_eq!(overflow.beyond_amount, 9);
        assert_eq!(overflow.past_count, 1);
        assert_eq!(overflow.past_amount, 11);
    }

    #[test]
    fn ladder_offsets_from_earliest_start() {
        assert!(ladder(&[]).is_empty());
        let stakes = vec![
            stake(0, 1, 30, T0 + 3 * 86_400),
            stake(1, 1, 10, T0 + 100),
            stake(2, 1, 365, T0 + 10 * 86_400 + 5),
        ];
        let rungs = ladder(&stakes);
        assert_eq!(
            rungs,
            vec![
                LadderRung { index: 0, offset: 3, duration: 30 },
                LadderRung { index: 1, offset: 0, duration: 10 },
                LadderRung { index: 2, offset: 10, duration: 365 },
            ]
        );
    }

    #[test]
    fn rows_follow_penalty_rules() {
        let p = example_params();
        let stakes = vec![stake(0, 1_000, 100, T0), stake(1, 500, 10, T0)];
        let rows = stake_rows(&stakes, &p, days_after(T0, 40)).unwrap();
        assert_eq!(rows[0].status, StakeStatus::Early);
        assert_eq!(rows[0].days_remaining, 60);
        assert_eq!(rows[0].estimated_penalty_bps, 1_500);
        assert_eq!(rows[0].unlock_timestamp, T0 + 100 * 86_400);
        assert_eq!(rows[1].status, StakeStatus::Late);
        assert_eq!(rows[1].days_remaining, -30);
        assert_eq!(rows[1].estimated_penalty_bps, 2_500);
    }

    #[test]
    fn zero_day_record_leaves_other_rows_intact() {
        let p = example_params();
        let stakes = vec![stake(0, 1_000, 100, T0), stake(1, 500, 0, T0)];
        let rows = stake_rows(&stakes, &p, days_after(T0, 40)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].index, 0);
        assert_eq!(rows[0].estimated_penalty_bps, 1_500);

        let mut broken = p.clone();
        broken.basis_denominator = 0;
        assert!(stake_rows(&stakes, &broken, T0).is_err());
    }

    #[test]
    fn extreme_start_timestamps_do_not_overflow() {
        let p = example_params();
        let stakes = vec![
            stake(0, 7, 100, i64::MAX - 10),
            stake(1, 9, 100, i64::MIN + 10),
            stake(2, 11, 5, T0),
        ];
        let cal = unlock_calendar(&stakes, T0);
        assert_eq!(cal.len(), 91);
        assert_eq!(cal[5].amount, 11);
        let overflow = unlock_calendar_overflow(&stakes, T0);
        assert_eq!(overflow.beyond_count, 1);
        assert_eq!(overflow.past_count, 1);

        let rows = stake_rows(&stakes, &p, T0).unwrap();
        assert_eq!(rows[0].status, StakeStatus::Early);
        assert_eq!(rows[0].unlock_timestamp, i64::MAX);
        assert_eq!(rows[1].status, StakeStatus::Late);
        assert_eq!(rows[1].estimated_penalty_bps, 2_500);
        assert_eq!(ladder(&stakes).len(), 3);
    }

    #[test]
    fn wallet_totals_sum_records() {
        let mut a = stake(0, 1_000, 100, T0);
        a.shares = 1_200;
        let b = stake(1, 500, 10, T0);
        let totals = wallet_totals(&[a, b]);
        assert_eq!(totals.stake_count, 2);
        assert_eq!(totals.principal, 1_500);
        assert_eq!(totals.shares, 1_700);
    }
}
