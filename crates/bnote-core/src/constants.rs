/// ─── bNote Engine Constants ─────────────────────────────────────────────────
///
/// Time units, fallback contract constants and engine limits.
///
/// Contract constants below are only ever used through
/// `RawParameters::resolve`, which tags each one as an assumed default.

// ── Time ─────────────────────────────────────────────────────────────────────

/// Seconds in one staking day. The contract counts whole UTC days.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Days per year used by the LPB schedule and the APR proration.
pub const DAYS_PER_YEAR: u32 = 365;

/// Recommended period of the caller-owned recomputation tick (seconds).
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30;

// ── Token ────────────────────────────────────────────────────────────────────

pub const TICKER: &str = "bNote";

/// Decimals of the staking token (ERC-20 style, same as the native coin).
pub const DEFAULT_TOKEN_DECIMALS: u8 = 18;

/// 10^38 is the largest power of ten that fits in a u128.
pub const MAX_TOKEN_DECIMALS: u8 = 38;

// ── Contract fallbacks ───────────────────────────────────────────────────────

pub const DEFAULT_BASIS_DENOMINATOR: u64 = 10_000;

pub const DEFAULT_MIN_LOCK_DAYS: u32 = 1;
pub const DEFAULT_MAX_LOCK_DAYS: u32 = 5_555;

/// Longer Pays Better: 20% per full year locked, up to 10 years.
pub const DEFAULT_LPB_BPS_PER_YEAR: u64 = 2_000;
pub const DEFAULT_LPB_MAX_YEARS: u32 = 10;

/// Bigger Pays Better: up to 10%, reached at 210,000 tokens.
pub const DEFAULT_BPB_MAX_BPS: u64 = 1_000;
pub const DEFAULT_BPB_CAP_TOKENS: u128 = 210_000;

pub const DEFAULT_EARLY_PENALTY_BPS: u64 = 2_500;
pub const DEFAULT_LATE_PENALTY_BPS: u64 = 2_500;

// ── Analytics ────────────────────────────────────────────────────────────────

/// The unlock calendar covers today plus this many days (91 entries).
pub const UNLOCK_CALENDAR_HORIZON_DAYS: i64 = 90;

/// Inclusive lock-day ranges of the maturity histogram. `None` = unbounded.
pub const MATURITY_BUCKETS: [(u32, Option<u32>); 5] = [
    (1, Some(7)),
    (8, Some(30)),
    (31, Some(90)),
    (91, Some(365)),
    (366, None),
];

// ── Session series ───────────────────────────────────────────────────────────

/// Maximum number of samples retained per session metric.
pub const SESSION_SERIES_MAX_LEN: usize = 200;
