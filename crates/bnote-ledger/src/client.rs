use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use bnote_core::error::BnoteError;
use bnote_core::{Balance, LockDays, RawParameters, ResolvedParameters, StakeIndex, StakeRecord};

/// Acknowledgement for a submitted stake transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub tx_hash: String,
}

/// The only way protocol parameters enter the system.
///
/// `raw_parameters` reports whatever getters exist; `resolved_parameters`
/// fills the gaps with tagged defaults so callers can tell verified values
/// from assumed ones.
#[async_trait]
pub trait ConfigurationSource: Send + Sync {
    async fn raw_parameters(&self) -> Result<RawParameters, BnoteError>;

    async fn resolved_parameters(&self) -> Result<ResolvedParameters, BnoteError> {
        self.raw_parameters().await?.resolve()
    }
}

/// Read and write access to the staking contract for one owner.
#[async_trait]
pub trait LedgerClient: ConfigurationSource {
    async fn stakes_of(&self, owner: &str) -> Result<Vec<StakeRecord>, BnoteError>;

    async fn balance_of(&self, owner: &str) -> Result<Balance, BnoteError>;

    async fn open_stake(
        &self,
        amount: Balance,
        lock_days: LockDays,
        auto_renew: bool,
    ) -> Result<TxReceipt, BnoteError>;

    async fn close_stake(&self, index: StakeIndex) -> Result<TxReceipt, BnoteError>;
}

/// Collapse a transport error chain into the upstream error kind.
pub(crate) fn upstream(e: anyhow::Error) -> BnoteError {
    BnoteError::UpstreamUnavailable(format!("{e:#}"))
}
