use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use bnote_core::error::BnoteError;
use bnote_core::{Balance, LockDays, RawParameters, StakeIndex, StakeRecord};

use crate::client::{upstream, ConfigurationSource, LedgerClient, TxReceipt};
use crate::wire::{into_records, WireParameters, WireStake};

/// On-disk layout of a ledger snapshot.
///
/// ```json
/// {
///   "parameters": { "apr_basis_points": 369, "share_rate": "1000000000000000000", ... },
///   "balances":   { "0xowner": "123000000000000000000" },
///   "stakes":     { "0xowner": [ { "start_timestamp": 1704067200, "lock_days": 30,
///                                  "amount": "5", "shares": "6" } ] }
/// }
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SnapshotFile {
    pub parameters: WireParameters,
    #[serde(default)]
    pub balances: HashMap<String, String>,
    #[serde(default)]
    pub stakes: HashMap<String, Vec<WireStake>>,
}

/// Read-only ledger served from a JSON snapshot, for offline analysis.
pub struct SnapshotLedger {
    file: SnapshotFile,
}

impl SnapshotLedger {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, BnoteError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading snapshot {}", path.display()))
            .map_err(upstream)?;
        let ledger = Self::from_json(&text)?;
        info!(path = %path.display(), owners = ledger.file.stakes.len(), "snapshot loaded");
        Ok(ledger)
    }

    pub fn from_json(text: &str) -> Result<Self, BnoteError> {
        let file: SnapshotFile = serde_json::from_str(text)
            .context("parsing snapshot")
            .map_err(upstream)?;
        Ok(Self { file })
    }

    fn read_only() -> BnoteError {
        BnoteError::UpstreamUnavailable("snapshot ledger is read-only".into())
    }
}

#[async_trait]
impl ConfigurationSource for SnapshotLedger {
    async fn raw_parameters(&self) -> Result<RawParameters, BnoteError> {
        self.file.parameters.clone().into_raw().map_err(upstream)
    }
}

#[async_trait]
impl LedgerClient for SnapshotLedger {
    async fn stakes_of(&self, owner: &str) -> Result<Vec<StakeRecord>, BnoteError> {
        let stakes = self.file.stakes.get(owner).cloned().unwrap_or_default();
        into_records(stakes).map_err(upstream)
    }

    async fn balance_of(&self, owner: &str) -> Result<Balance, BnoteError> {
        match self.file.balances.get(owner) {
            Some(s) => s
                .parse::<Balance>()
                .with_context(|| format!("parsing balance of {owner}"))
                .map_err(upstream),
            None => Ok(0),
        }
    }

    async fn open_stake(
        &self,
        _amount: Balance,
        _lock_days: LockDays,
        _auto_renew: bool,
    ) -> Result<TxReceipt, BnoteError> {
        Err(Self::read_only())
    }

    async fn close_stake(&self, _index: StakeIndex) -> Result<TxReceipt, BnoteError> {
        Err(Self::read_only())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bnote_core::ErrorKind;

    const SNAPSHOT: &str = r#"{
        "parameters": {
            "basis_denominator": 10000,
            "apr_basis_points": 369,
            "share_rate": "1000000000000000000",
            "total_shares": "1200",
            "total_supply": "9000",
            "initial_supply": "10000"
        },
        "balances": { "0xa11ce": "2500" },
        "stakes": {
            "0xa11ce": [
                { "start_timestamp": 1704067200, "lock_days": 100, "amount": "1000", "shares": "1200" }
            ]
        }
    }"#;

    #[tokio::test]
    async fn reads_owner_state() {
        let ledger = SnapshotLedger::from_json(SNAPSHOT).unwrap();
        let stakes = ledger.stakes_of("0xa11ce").await.unwrap();
        assert_eq!(stakes.len(), 1);
        assert_eq!(stakes[0].shares, 1_200);
        assert_eq!(ledger.balance_of("0xa11ce").await.unwrap(), 2_500);
        assert!(ledger.stakes_of("0xb0b").await.unwrap().is_empty());
        assert_eq!(ledger.balance_of("0xb0b").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn parameters_resolve_with_defaults() {
        let ledger = SnapshotLedger::from_json(SNAPSHOT).unwrap();
        let resolved = ledger.resolved_parameters().await.unwrap();
        assert_eq!(resolved.params.basis_denominator, 10_000);
        assert_eq!(resolved.params.max_lock_days, 5_555);
        assert!(!resolved.is_fully_verified());
    }

    #[tokio::test]
    async fn mutations_are_refused() {
        let ledger = SnapshotLedger::from_json(SNAPSHOT).unwrap();
        let err = ledger.open_stake(1, 1, false).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);
        assert!(ledger.close_stake(0).await.is_err());
    }

    #[test]
    fn malformed_snapshot_is_rejected() {
        assert!(SnapshotLedger::from_json("{ not json").is_err());
        assert!(SnapshotLedger::open("/nonexistent/bnote-snapshot.json").is_err());
    }
}
