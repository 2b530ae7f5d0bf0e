use serde::{Deserialize, Serialize};

use crate::constants::SECONDS_PER_DAY;
use crate::types::{day_index, Balance, DayIndex, LockDays, StakeIndex, Timestamp, TimestampMillis};

/// One open stake, as reported by the ledger for its owner.
///
/// Created when a stake-open is confirmed and dropped when a stake-close is
/// confirmed. The engine only reads it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeRecord {
    /// Position in the owner's list. The ledger may reassign it after a close.
    pub index: StakeIndex,
    pub principal_amount: Balance,
    pub lock_days: LockDays,
    pub start_timestamp: Timestamp,
    /// Shares credited at open time.
    pub shares: Balance,
    pub auto_renew: bool,
}

impl StakeRecord {
    /// Moment the full lock period has elapsed, clamped to `Timestamp::MAX`.
    pub fn unlock_timestamp(&self) -> Timestamp {
        self.start_timestamp
            .saturating_add(self.lock_days as i64 * SECONDS_PER_DAY)
    }

    pub fn start_day(&self) -> DayIndex {
        day_index(self.start_timestamp)
    }

    /// The single day on which closing carries no penalty.
    pub fn unlock_day(&self) -> DayIndex {
        day_index(self.unlock_timestamp())
    }
}

/// Find a stake by its ledger index.
pub fn find_stake(stakes: &[StakeRecord], index: StakeIndex) -> Option<&StakeRecord> {
    stakes.iter().find(|s| s.index == index)
}

/// One observation of a session metric.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSamplePoint {
    pub timestamp: TimestampMillis,
    pub value: f64,
}
