//! JSON shapes exchanged with the ledger gateway and stored in snapshot
//! files. Every u128 travels as a decimal string.

use anyhow::Context;
use serde::{Deserialize, Serialize};

use bnote_core::{Balance, RawParameters, StakeRecord};

/// Contract getters as reported by the gateway. A missing key means the
/// getter is not available on the deployed contract.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WireParameters {
    pub basis_denominator: Option<u64>,
    pub min_lock_days: Option<u32>,
    pub max_lock_days: Option<u32>,
    pub apr_basis_points: Option<u64>,
    pub share_rate: Option<String>,
    pub token_decimals: Option<u8>,
    pub total_shares: Option<String>,
    pub total_supply: Option<String>,
    pub initial_supply: Option<String>,
    pub longer_pays_better_bps_per_year: Option<u64>,
    pub longer_pays_better_max_years: Option<u32>,
    pub bigger_pays_better_max_bps: Option<u64>,
    pub bigger_pays_better_cap_amount: Option<String>,
    pub early_penalty_basis_points: Option<u64>,
    pub late_penalty_basis_points: Option<u64>,
}

fn amount(field: &str, value: Option<&String>) -> anyhow::Result<Option<Balance>> {
    value
        .map(|s| s.parse::<Balance>().with_context(|| format!("parsing {field}")))
        .transpose()
}

impl WireParameters {
    pub fn into_raw(self) -> anyhow::Result<RawParameters> {
        Ok(RawParameters {
            basis_denominator: self.basis_denominator,
            min_lock_days: self.min_lock_days,
            max_lock_days: self.max_lock_days,
            apr_basis_points: self.apr_basis_points,
            share_rate: amount("share_rate", self.share_rate.as_ref())?,
            token_decimals: self.token_decimals,
            total_shares: amount("total_shares", self.total_shares.as_ref())?,
            total_supply: amount("total_supply", self.total_supply.as_ref())?,
            initial_supply: amount("initial_supply", self.initial_supply.as_ref())?,
            longer_pays_better_bps_per_year: self.longer_pays_better_bps_per_year,
            longer_pays_better_max_years: self.longer_pays_better_max_years,
            bigger_pays_better_max_bps: self.bigger_pays_better_max_bps,
            bigger_pays_better_cap_amount: amount(
                "bigger_pays_better_cap_amount",
                self.bigger_pays_better_cap_amount.as_ref(),
            )?,
            early_penalty_basis_points: self.early_penalty_basis_points,
            late_penalty_basis_points: self.late_penalty_basis_points,
        })
    }
}

/// One entry of `stakesOf(owner)`. The list position is the stake index.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WireStake {
    pub start_timestamp: i64,
    pub lock_days: u32,
    pub amount: String,
    pub shares: String,
    #[serde(default)]
    pub auto_renew: bool,
}

impl WireStake {
    pub fn into_record(self, index: u64) -> anyhow::Result<StakeRecord> {
        Ok(StakeRecord {
            index,
            principal_amount: self.amount.parse().context("parsing stake amount")?,
            lock_days: self.lock_days,
            start_timestamp: self.start_timestamp,
            shares: self.shares.parse().context("parsing stake shares")?,
            auto_renew: self.auto_renew,
        })
    }
}

pub fn into_records(stakes: Vec<WireStake>) -> anyhow::Result<Vec<StakeRecord>> {
    stakes
        .into_iter()
        .enumerate()
        .map(|(i, s)| s.into_record(i as u64))
        .collect()
}
