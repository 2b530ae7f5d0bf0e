use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::*;
use crate::error::BnoteError;
use crate::math::{bps_to_percent, pow10};
use crate::types::{Balance, BasisPoints, LockDays};

// ── ProtocolParameters ────────────────────────────────────────────────────────

/// Snapshot of the staking contract's constants and state, taken on refresh.
///
/// Owned by the caller and passed into every computation; nothing in the
/// engine caches or mutates it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolParameters {
    /// Denominator for every basis-point ratio (typically 10_000).
    pub basis_denominator: BasisPoints,
    pub min_lock_days: LockDays,
    pub max_lock_days: LockDays,
    /// Annual rate numerator over `basis_denominator`.
    pub apr_basis_points: BasisPoints,
    /// Principal-to-shares conversion ratio, scaled by 10^token_decimals.
    pub share_rate: Balance,
    pub token_decimals: u8,
    pub total_shares: Balance,
    pub total_supply: Balance,
    pub initial_supply: Balance,
    pub longer_pays_better_bps_per_year: BasisPoints,
    pub longer_pays_better_max_years: u32,
    pub bigger_pays_better_max_bps: BasisPoints,
    /// Principal (base units) at which the size bonus is maxed out.
    pub bigger_pays_better_cap_amount: Balance,
    pub early_penalty_basis_points: BasisPoints,
    pub late_penalty_basis_points: BasisPoints,
}

impl ProtocolParameters {
    /// Structural checks that make every estimator well defined.
    pub fn validate(&self) -> Result<(), BnoteError> {
        if self.basis_denominator == 0 {
            return Err(BnoteError::ZeroBasisDenominator);
        }
        if self.min_lock_days == 0 {
            return Err(BnoteError::InvalidParameters(
                "min_lock_days must be at least 1".into(),
            ));
        }
        if self.min_lock_days > self.max_lock_days {
            return Err(BnoteError::InvalidParameters(format!(
                "min_lock_days {} exceeds max_lock_days {}",
                self.min_lock_days, self.max_lock_days
            )));
        }
        if self.early_penalty_basis_points > self.basis_denominator
            || self.late_penalty_basis_points > self.basis_denominator
        {
            return Err(BnoteError::InvalidParameters(
                "penalty basis points exceed the basis denominator".into(),
            ));
        }
        if self.token_decimals > MAX_TOKEN_DECIMALS {
            return Err(BnoteError::InvalidParameters(format!(
                "token_decimals {} exceeds {}",
                self.token_decimals, MAX_TOKEN_DECIMALS
            )));
        }
        Ok(())
    }

    /// One whole token in base units; also `scaleOf(share_rate)`.
    pub fn unit_scale(&self) -> Result<Balance, BnoteError> {
        pow10(self.token_decimals)
    }

    pub fn lock_days_in_range(&self, lock_days: LockDays) -> bool {
        (self.min_lock_days..=self.max_lock_days).contains(&lock_days)
    }

    pub fn apr_percent(&self) -> f64 {
        bps_to_percent(self.apr_basis_points, self.basis_denominator)
    }

    pub fn max_early_penalty_percent(&self) -> f64 {
        bps_to_percent(self.early_penalty_basis_points, self.basis_denominator)
    }

    pub fn max_late_penalty_percent(&self) -> f64 {
        bps_to_percent(self.late_penalty_basis_points, self.basis_denominator)
    }
}

// ── Provenance ────────────────────────────────────────────────────────────────

/// Where a parameter value came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Read from the contract.
    Verified,
    /// The contract getter was absent; a documented fallback was used.
    AssumedDefault,
}

/// Contract constants that may fall back to a default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterField {
    BasisDenominator,
    MinLockDays,
    MaxLockDays,
    TokenDecimals,
    LongerPaysBetterBpsPerYear,
    LongerPaysBetterMaxYears,
    BiggerPaysBetterMaxBps,
    BiggerPaysBetterCapAmount,
    EarlyPenaltyBasisPoints,
    LatePenaltyBasisPoints,
}

impl ParameterField {
    pub fn name(&self) -> &'static str {
        match self {
            Self::BasisDenominator => "basis_denominator",
            Self::MinLockDays => "min_lock_days",
            Self::MaxLockDays => "max_lock_days",
            Self::TokenDecimals => "token_decimals",
            Self::LongerPaysBetterBpsPerYear => "longer_pays_better_bps_per_year",
            Self::LongerPaysBetterMaxYears => "longer_pays_better_max_years",
            Self::BiggerPaysBetterMaxBps => "bigger_pays_better_max_bps",
            Self::BiggerPaysBetterCapAmount => "bigger_pays_better_cap_amount",
            Self::EarlyPenaltyBasisPoints => "early_penalty_basis_points",
            Self::LatePenaltyBasisPoints => "late_penalty_basis_points",
        }
    }
}

/// Parameters exactly as the contract getters returned them. `None` means
/// the getter does not exist on the deployed contract (or failed).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawParameters {
    pub basis_denominator: Option<BasisPoints>,
    pub min_lock_days: Option<LockDays>,
    pub max_lock_days: Option<LockDays>,
    pub apr_basis_points: Option<BasisPoints>,
    pub share_rate: Option<Balance>,
    pub token_decimals: Option<u8>,
    pub total_shares: Option<Balance>,
    pub total_supply: Option<Balance>,
    pub initial_supply: Option<Balance>,
    pub longer_pays_better_bps_per_year: Option<BasisPoints>,
    pub longer_pays_better_max_years: Option<u32>,
    pub bigger_pays_better_max_bps: Option<BasisPoints>,
    pub bigger_pays_better_cap_amount: Option<Balance>,
    pub early_penalty_basis_points: Option<BasisPoints>,
    pub late_penalty_basis_points: Option<BasisPoints>,
}

/// Validated parameters plus the list of fields that were not read from
/// the contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedParameters {
    pub params: ProtocolParameters,
    pub assumed_defaults: Vec<ParameterField>,
}

impl ResolvedParameters {
    pub fn provenance(&self, field: ParameterField) -> Provenance {
        if self.assumed_defaults.contains(&field) {
            Provenance::AssumedDefault
        } else {
            Provenance::Verified
        }
    }

    pub fn is_fully_verified(&self) -> bool {
        self.assumed_defaults.is_empty()
    }
}

impl RawParameters {
    /// Fill absent contract constants with tagged defaults and validate.
    ///
    /// Live state (supplies, shares, APR, share rate) has no meaningful
    /// default and must be present.
    pub fn resolve(self) -> Result<ResolvedParameters, BnoteError> {
        let mut assumed = Vec::new();

        let total_supply = require(self.total_supply, "total_supply")?;
        let initial_supply = require(self.initial_supply, "initial_supply")?;
        let total_shares = require(self.total_shares, "total_shares")?;
        let apr_basis_points = require(self.apr_basis_points, "apr_basis_points")?;
        let share_rate = require(self.share_rate, "share_rate")?;

        let token_decimals = or_default(
            self.token_decimals,
            DEFAULT_TOKEN_DECIMALS,
            ParameterField::TokenDecimals,
            &mut assumed,
        );
        let bpb_cap = match self.bigger_pays_better_cap_amount {
            Some(v) => v,
            None => {
                assumed.push(ParameterField::BiggerPaysBetterCapAmount);
                let cap = DEFAULT_BPB_CAP_TOKENS
                    .checked_mul(pow10(token_decimals)?)
                    .ok_or(BnoteError::ArithmeticOverflow("default bpb cap"))?;
                warn!(field = "bigger_pays_better_cap_amount", value = %cap, "using assumed default");
                cap
            }
        };

        let params = ProtocolParameters {
            basis_denominator: or_default(
                self.basis_denominator,
                DEFAULT_BASIS_DENOMINATOR,
                ParameterField::BasisDenominator,
                &mut assumed,
            ),
            min_lock_days: or_default(
                self.min_lock_days,
                DEFAULT_MIN_LOCK_DAYS,
                ParameterField::MinLockDays,
                &mut assumed,
            ),
            max_lock_days: or_default(
                self.max_lock_days,
                DEFAULT_MAX_LOCK_DAYS,
                ParameterField::MaxLockDays,
                &mut assumed,
            ),
            apr_basis_points,
            share_rate,
            token_decimals,
            total_shares,
            total_supply,
            initial_supply,
            longer_pays_better_bps_per_year: or_default(
                self.longer_pays_better_bps_per_year,
                DEFAULT_LPB_BPS_PER_YEAR,
                ParameterField::LongerPaysBetterBpsPerYear,
                &mut assumed,
            ),
            longer_pays_better_max_years: or_default(
                self.longer_pays_better_max_years,
                DEFAULT_LPB_MAX_YEARS,
                ParameterField::LongerPaysBetterMaxYears,
                &mut assumed,
            ),
            bigger_pays_better_max_bps: or_default(
                self.bigger_pays_better_max_bps,
                DEFAULT_BPB_MAX_BPS,
                ParameterField::BiggerPaysBetterMaxBps,
                &mut assumed,
            ),
            bigger_pays_better_cap_amount: bpb_cap,
            early_penalty_basis_points: or_default(
                self.early_penalty_basis_points,
                DEFAULT_EARLY_PENALTY_BPS,
                ParameterField::EarlyPenaltyBasisPoints,
                &mut assumed,
            ),
            late_penalty_basis_points: or_default(
                self.late_penalty_basis_points,
                DEFAULT_LATE_PENALTY_BPS,
                ParameterField::LatePenaltyBasisPoints,
                &mut assumed,
            ),
        };
        params.validate()?;

        Ok(ResolvedParameters {
            params,
            assumed_defaults: assumed,
        })
    }
}

fn require<T>(value: Option<T>, name: &str) -> Result<T, BnoteError> {
    value.ok_or_else(|| BnoteError::UpstreamUnavailable(format!("ledger did not report {name}")))
}

fn or_default<T: std::fmt::Display>(
    value: Option<T>,
    default: T,
    field: ParameterField,
    assumed: &mut Vec<ParameterField>,
) -> T {
    match value {
        Some(v) => v,
        None => {
            warn!(field = field.name(), value = %default, "using assumed default");
            assumed.push(field);
            default
        }
    }
}
