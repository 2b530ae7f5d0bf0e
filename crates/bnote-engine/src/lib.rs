//! bnote-engine
//!
//! Client-side mirror of the staking contract's economics. Every function
//! here is a pure computation over a `ProtocolParameters` snapshot, the
//! owner's `StakeRecord`s and the current time; callers re-run them on each
//! clock tick or refresh.
//!
//! Integer/basis-point arithmetic throughout. Floating point appears only in
//! display percentages and market valuations.

pub mod analytics;
pub mod bonus;
pub mod export;
pub mod penalty;
pub mod preview;
pub mod valuation;
pub mod yields;

#[cfg(test)]
mod fixtures;

pub use analytics::{
    ladder, maturity_histogram, stake_rows, supply_split, unlock_calendar,
    unlock_calendar_overflow, wallet_totals, CalendarEntry, CalendarOverflow, LadderRung,
    MaturityBucket, StakeRow, SupplySlice, SupplySplit, WalletTotals,
};
pub use bonus::BonusEstimate;
pub use export::{stakes_csv, CSV_HEADERS};
pub use penalty::{CurvePoint, PenaltyAssessment, StakeStatus};
pub use preview::{ClosePreview, StakePreview};
pub use valuation::Valuation;
