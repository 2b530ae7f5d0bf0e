use crate::constants::SECONDS_PER_DAY;

/// Token amount in base units (10^-decimals of one token). u128 holds any
/// 18-decimal supply below ~3.4 × 10^20 tokens.
pub type Balance = u128;

/// Unix timestamp (seconds, UTC).
pub type Timestamp = i64;

/// Unix timestamp (milliseconds, UTC). Session samples only.
pub type TimestampMillis = i64;

/// Ratio numerator over `ProtocolParameters::basis_denominator`.
pub type BasisPoints = u64;

/// Whole days a stake is locked for.
pub type LockDays = u32;

/// Position of a stake in its owner's list, as reported by the ledger.
pub type StakeIndex = u64;

/// Whole UTC days since the Unix epoch.
pub type DayIndex = i64;

/// Day index containing `ts`. Floors toward negative infinity so
/// pre-epoch timestamps still land on the correct day.
pub fn day_index(ts: Timestamp) -> DayIndex {
    ts.div_euclid(SECONDS_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_index_floors() {
        assert_eq!(day_index(0), 0);
        assert_eq!(day_index(86_399), 0);
        assert_eq!(day_index(86_400), 1);
        assert_eq!(day_index(-1), -1);
    }
}
