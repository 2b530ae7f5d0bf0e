use anyhow::Context;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use bnote_core::error::BnoteError;
use bnote_core::MarketSnapshot;

use crate::client::upstream;

/// Source of spot market data for the token.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn snapshot(&self) -> Result<MarketSnapshot, BnoteError>;
}

/// DexScreener public API client.
///
/// Fetches every pair for the token, keeps those on the configured chain and
/// reports the one with the deepest USD liquidity.
pub struct DexScreenerClient {
    base_url: String,
    token: String,
    chain: String,
    client: reqwest::Client,
}

impl DexScreenerClient {
    pub fn new(base_url: &str, token: &str, chain: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            chain: chain.to_lowercase(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self) -> String {
        format!("{}/latest/dex/tokens/{}", self.base_url, self.token)
    }

    async fn fetch(&self) -> anyhow::Result<MarketSnapshot> {
        let url = self.url();
        debug!(url = %url, "fetching market data");
        let json: Value = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("requesting {url}"))?
            .error_for_status()
            .context("market data request failed")?
            .json()
            .await
            .context("parsing market data")?;
        select_top_pair(&json, &self.chain)
            .with_context(|| format!("no {} pair listed for {}", self.chain, self.token))
    }
}

#[async_trait]
impl MarketDataProvider for DexScreenerClient {
    async fn snapshot(&self) -> Result<MarketSnapshot, BnoteError> {
        self.fetch().await.map_err(|e| {
            warn!(error = %format!("{e:#}"), "market data unavailable");
            upstream(e)
        })
    }
}

/// Numbers arrive as JSON numbers or decimal strings depending on the field.
fn number(v: Option<&Value>) -> Option<f64> {
    let parsed = match v? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

fn count(v: Option<&Value>) -> Option<u64> {
    v?.as_u64()
}

/// Highest-liquidity pair on `chain` (matched as a substring of `chainId`).
pub fn select_top_pair(response: &Value, chain: &str) -> Option<MarketSnapshot> {
    let chain = chain.to_lowercase();
    let pair = response
        .get("pairs")?
        .as_array()?
        .iter()
        .filter(|p| {
            p.get("chainId")
                .and_then(Value::as_str)
                .is_some_and(|id| id.to_lowercase().contains(&chain))
        })
        .max_by(|a, b| {
            let la = number(a.pointer("/liquidity/usd")).unwrap_or(0.0);
            let lb = number(b.pointer("/liquidity/usd")).unwrap_or(0.0);
            la.total_cmp(&lb)
        })?;

    Some(MarketSnapshot {
        pair_address: pair
            .get("pairAddress")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        price_usd: number(pair.get("priceUsd")),
        price_native: number(pair.get("priceNative")),
        liquidity_usd: number(pair.pointer("/liquidity/usd")),
        fdv_usd: number(pair.get("fdv")),
        volume_24h_usd: number(pair.pointer("/volume/h24")),
        price_change_1h: number(pair.pointer("/priceChange/h1")),
        price_change_24h: number(pair.pointer("/priceChange/h24")),
        buys_24h: count(pair.pointer("/txns/h24/buys")),
        sells_24h: count(pair.pointer("/txns/h24/sells")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response() -> Value {
        json!({
            "pairs": [
                {
                    "chainId": "pulsechain",
                    "pairAddress": "0xshallow",
                    "priceUsd": "0.010",
                    "liquidity": { "usd": 1000.0 }
                },
                {
                    "chainId": "ethereum",
                    "pairAddress": "0xeth",
                    "priceUsd": "0.020",
                    "liquidity": { "usd": 999999.0 }
                },
                {
                    "chainId": "pulsechain",
                    "pairAddress": "0xdeep",
                    "priceUsd": "0.012",
                    "priceNative": "0.35",
                    "liquidity": { "usd": 50000.5 },
                    "fdv": 120000,
                    "volume": { "h24": 3400.25 },
                    "priceChange": { "h1": -1.2, "h24": 4.5 },
                    "txns": { "h24": { "buys": 17, "sells": 9 } }
                }
            ]
        })
    }

    #[test]
    fn picks_deepest_pair_on_chain() {
        let m = select_top_pair(&response(), "pulse").unwrap();
        assert_eq!(m.pair_address, "0xdeep");
        assert_eq!(m.price_usd, Some(0.012));
        assert_eq!(m.price_native, Some(0.35));
        assert_eq!(m.fdv_usd, Some(120_000.0));
        assert_eq!(m.price_change_1h, Some(-1.2));
        assert_eq!(m.buys_24h, Some(17));
        assert_eq!(m.sells_24h, Some(9));
    }

    #[test]
    fn missing_fields_stay_none() {
        let m = select_top_pair(&response(), "ethereum").unwrap();
        assert_eq!(m.pair_address, "0xeth");
        assert_eq!(m.price_native, None);
        assert_eq!(m.volume_24h_usd, None);
    }

    #[test]
    fn no_matching_pair() {
        assert!(select_top_pair(&response(), "bsc").is_none());
        assert!(select_top_pair(&json!({ "pairs": null }), "pulse").is_none());
        assert!(select_top_pair(&json!({}), "pulse").is_none());
    }

    #[test]
    fn endpoint_layout() {
        let c = DexScreenerClient::new("https://api.dexscreener.com/", "0xtoken", "Pulse");
        assert_eq!(c.url(), "https://api.dexscreener.com/latest/dex/tokens/0xtoken");
        assert_eq!(c.chain, "pulse");
    }
}
