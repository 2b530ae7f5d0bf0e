use serde::{Deserialize, Serialize};

/// Spot market view of the token's most liquid trading pair.
///
/// Every figure is optional: market data is display-only and any of it may
/// be missing upstream.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub pair_address: String,
    pub price_usd: Option<f64>,
    /// Price quoted in the chain's native coin.
    pub price_native: Option<f64>,
    pub liquidity_usd: Option<f64>,
    pub fdv_usd: Option<f64>,
    pub volume_24h_usd: Option<f64>,
    pub price_change_1h: Option<f64>,
    pub price_change_24h: Option<f64>,
    pub buys_24h: Option<u64>,
    pub sells_24h: Option<u64>,
}
