use anyhow::{bail, Context};
use async_trait::async_trait;
use tracing::{debug, info};

use bnote_core::error::BnoteError;
use bnote_core::{Balance, LockDays, RawParameters, StakeIndex, StakeRecord};

use crate::client::{upstream, ConfigurationSource, LedgerClient, TxReceipt};
use crate::wire::{into_records, WireParameters, WireStake};

/// JSON-RPC 2.0 client for the staking gateway.
///
/// Raw HTTP POST with serde_json. Read calls are stateless; stake open and
/// close are signed by the gateway on behalf of `owner`.
pub struct RpcLedgerClient {
    url: String,
    owner: Option<String>,
    client: reqwest::Client,
}

impl RpcLedgerClient {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            owner: None,
            client: reqwest::Client::new(),
        }
    }

    /// Account used for `bnote_stakeStart` / `bnote_stakeEnd`.
    pub fn with_owner(mut self, owner: &str) -> Self {
        self.owner = Some(owner.to_string());
        self
    }

    /// Call a JSON-RPC method and return the `result` field.
    async fn call(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> anyhow::Result<serde_json::Value> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1
        });
        debug!(method, url = %self.url, "rpc call");

        let resp = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("connecting to gateway at {}", self.url))?;

        let json: serde_json::Value = resp.json().await.context("parsing RPC response")?;
        parse_response(json)
    }

    fn owner(&self) -> anyhow::Result<&str> {
        self.owner
            .as_deref()
            .context("no owner account configured for transactions")
    }

    fn receipt(result: serde_json::Value) -> anyhow::Result<TxReceipt> {
        let tx_hash = result
            .as_str()
            .context("expected tx hash string")?
            .to_string();
        Ok(TxReceipt { tx_hash })
    }

    async fn fetch_parameters(&self) -> anyhow::Result<RawParameters> {
        let result = self.call("bnote_getParameters", serde_json::json!([])).await?;
        let wire: WireParameters = serde_json::from_value(result).context("parsing parameters")?;
        wire.into_raw()
    }

    async fn fetch_stakes(&self, owner: &str) -> anyhow::Result<Vec<StakeRecord>> {
        let result = self
            .call("bnote_stakesOf", serde_json::json!([owner]))
            .await?;
        let stakes: Vec<WireStake> = serde_json::from_value(result).context("parsing stakes")?;
        into_records(stakes)
    }

    async fn fetch_balance(&self, owner: &str) -> anyhow::Result<Balance> {
        let result = self
            .call("bnote_balanceOf", serde_json::json!([owner]))
            .await?;
        let bal_str = result.as_str().context("expected string balance")?;
        let bal: Balance = bal_str.parse().context("parsing balance")?;
        Ok(bal)
    }

    async fn submit_stake_start(
        &self,
        amount: Balance,
        lock_days: LockDays,
        auto_renew: bool,
    ) -> anyhow::Result<TxReceipt> {
        let owner = self.owner()?;
        let result = self
            .call(
                "bnote_stakeStart",
                serde_json::json!([owner, amount.to_string(), lock_days, auto_renew]),
            )
            .await?;
        let receipt = Self::receipt(result)?;
        info!(owner, amount = %amount, lock_days, tx = %receipt.tx_hash, "stake submitted");
        Ok(receipt)
    }

    async fn submit_stake_end(&self, index: StakeIndex) -> anyhow::Result<TxReceipt> {
        let owner = self.owner()?;
        let result = self
            .call("bnote_stakeEnd", serde_json::json!([owner, index]))
            .await?;
        let receipt = Self::receipt(result)?;
        info!(owner, index, tx = %receipt.tx_hash, "stake close submitted");
        Ok(receipt)
    }
}

/// Extract `result` from a JSON-RPC response body, turning `error` into Err.
pub fn parse_response(json: serde_json::Value) -> anyhow::Result<serde_json::Value> {
    if let Some(err) = json.get("error") {
        bail!("RPC error: {}", err);
    }
    match json.get("result") {
        Some(result) => Ok(result.clone()),
        None => bail!("RPC response has neither result nor error"),
    }
}

#[async_trait]
impl ConfigurationSource for RpcLedgerClient {
    async fn raw_parameters(&self) -> Result<RawParameters, BnoteError> {
        self.fetch_parameters().await.map_err(upstream)
    }
}

#[async_trait]
impl LedgerClient for RpcLedgerClient {
    async fn stakes_of(&self, owner: &str) -> Result<Vec<StakeRecord>, BnoteError> {
        self.fetch_stakes(owner).await.map_err(upstream)
    }

    async fn balance_of(&self, owner: &str) -> Result<Balance, BnoteError> {
        self.fetch_balance(owner).await.map_err(upstream)
    }

    async fn open_stake(
        &self,
        amount: Balance,
        lock_days: LockDays,
        auto_renew: bool,
    ) -> Result<TxReceipt, BnoteError> {
        self.submit_stake_start(amount, lock_days, auto_renew)
            .await
            .map_err(upstream)
    }

    async fn close_stake(&self, index: StakeIndex) -> Result<TxReceipt, BnoteError> {
        self.submit_stake_end(index).await.map_err(upstream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bnote_core::ErrorKind;

    #[test]
    fn response_error_is_surfaced() {
        let err = parse_response(serde_json::json!({
            "jsonrpc": "2.0", "id": 1,
            "error": {"code": -32000, "message": "execution reverted"}
        }))
        .unwrap_err();
        assert!(err.to_string().contains("execution reverted"));
    }

    #[test]
    fn response_result_is_returned() {
        let v = parse_response(serde_json::json!({"jsonrpc": "2.0", "id": 1, "result": "42"}))
            .unwrap();
        assert_eq!(v, serde_json::json!("42"));
        assert!(parse_response(serde_json::json!({"id": 1})).is_err());
    }

    #[tokio::test]
    async fn unreachable_gateway_is_upstream_unavailable() {
        let client = RpcLedgerClient::new("http://127.0.0.1:9");
        let err = client.balance_of("0xabc").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);
    }

    #[tokio::test]
    async fn transactions_need_an_owner() {
        let client = RpcLedgerClient::new("http://127.0.0.1:9");
        let err = client.close_stake(0).await.unwrap_err();
        assert!(err.to_string().contains("no owner"));
    }
}
