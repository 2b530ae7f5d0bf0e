pub mod constants;
pub mod error;
pub mod market;
pub mod math;
pub mod params;
pub mod stake;
pub mod types;
pub mod units;

pub use constants::*;
pub use error::{BnoteError, ErrorKind};
pub use market::MarketSnapshot;
pub use params::*;
pub use stake::*;
pub use types::*;
