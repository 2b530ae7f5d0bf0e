//! bnote-session
//!
//! Bounded per-metric sample series recorded while a session is running,
//! plus a sled-backed store that keeps them between runs.

pub mod series;
pub mod store;

pub use series::{record, ChangeGate};
pub use store::{Metric, SeriesStore};
