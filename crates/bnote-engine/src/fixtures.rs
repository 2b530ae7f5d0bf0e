use bnote_core::{Balance, ProtocolParameters, StakeRecord, Timestamp};

/// 10^18, one whole token and the unit share rate.
pub const ONE: Balance = 1_000_000_000_000_000_000;

/// Midnight UTC, 2024-01-01.
pub const T0: Timestamp = 1_704_067_200;

/// The reference configuration used in the worked examples: amounts are
/// plain base units and the share rate is exactly one.
pub fn example_params() -> ProtocolParameters {
    ProtocolParameters {
        basis_denominator: 10_000,
        min_lock_days: 1,
        max_lock_days: 3_690,
        apr_basis_points: 369,
        share_rate: ONE,
        token_decimals: 18,
        total_shares: 0,
        total_supply: 9_000,
        initial_supply: 10_000,
        longer_pays_better_bps_per_year: 2_000,
        longer_pays_better_max_years: 10,
        bigger_pays_better_max_bps: 1_000,
        bigger_pays_better_cap_amount: 210_000,
        early_penalty_basis_points: 2_500,
        late_penalty_basis_points: 2_500,
    }
}

pub fn stake(index: u64, principal_amount: Balance, lock_days: u32, start: Timestamp) -> StakeRecord {
    StakeRecord {
        index,
        principal_amount,
        lock_days,
        start_timestamp: start,
        shares: principal_amount,
        auto_renew: false,
    }
}

/// `now` that is `days` whole days (plus a little) after `start`.
pub fn days_after(start: Timestamp, days: i64) -> Timestamp {
    start + days * 86_400 + 3_600
}
