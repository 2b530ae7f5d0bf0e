use thiserror::Error;

/// Broad class of a [`BnoteError`], used by callers to decide whether to
/// block a submission, blank a derived field, or report a broken setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad user input. Surfaced before any chain interaction.
    Validation,
    /// Parameters or records that make a computation meaningless.
    Configuration,
    /// A collaborator (ledger, market data) could not be reached.
    UpstreamUnavailable,
    Storage,
    Arithmetic,
}

#[derive(Debug, Error)]
pub enum BnoteError {
    // ── Validation errors ────────────────────────────────────────────────────
    #[error("amount must be greater than zero")]
    ZeroAmount,

    #[error("lock days must be a positive integer")]
    ZeroLockDays,

    #[error("lock days out of range: must be between {min} and {max}, got {got}")]
    LockDaysOutOfRange { min: u32, max: u32, got: u32 },

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("no stake at index {0}")]
    UnknownStakeIndex(u64),

    // ── Configuration errors ─────────────────────────────────────────────────
    #[error("share rate is zero; shares cannot be estimated")]
    ZeroShareRate,

    #[error("basis denominator is zero")]
    ZeroBasisDenominator,

    #[error("bigger-pays-better cap is zero while the bonus is {max_bps} bps")]
    BonusCapMissing { max_bps: u64 },

    #[error("stake {index} has a zero-day lock")]
    ZeroLockDaysRecord { index: u64 },

    #[error("invalid protocol parameters: {0}")]
    InvalidParameters(String),

    // ── Upstream ─────────────────────────────────────────────────────────────
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    // ── Serialization / storage ──────────────────────────────────────────────
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage error: {0}")]
    Storage(String),

    // ── Arithmetic ───────────────────────────────────────────────────────────
    #[error("arithmetic overflow in {0}")]
    ArithmeticOverflow(&'static str),
}

impl BnoteError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ZeroAmount
            | Self::ZeroLockDays
            | Self::LockDaysOutOfRange { .. }
            | Self::InvalidAmount(_)
            | Self::UnknownStakeIndex(_) => ErrorKind::Validation,

            Self::ZeroShareRate
            | Self::ZeroBasisDenominator
            | Self::BonusCapMissing { .. }
            | Self::ZeroLockDaysRecord { .. }
            | Self::InvalidParameters(_) => ErrorKind::Configuration,

            Self::UpstreamUnavailable(_) => ErrorKind::UpstreamUnavailable,

            Self::Serialization(_) | Self::Storage(_) => ErrorKind::Storage,

            Self::ArithmeticOverflow(_) => ErrorKind::Arithmetic,
        }
    }

    /// True for the out-of-range lock length the caller may choose to only
    /// warn about.
    pub fn is_range_violation(&self) -> bool {
        matches!(self, Self::LockDaysOutOfRange { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_sections() {
        assert_eq!(BnoteError::ZeroAmount.kind(), ErrorKind::Validation);
        assert_eq!(BnoteError::ZeroShareRate.kind(), ErrorKind::Configuration);
        assert_eq!(
            BnoteError::UpstreamUnavailable("dexscreener 503".into()).kind(),
            ErrorKind::UpstreamUnavailable
        );
        assert_eq!(
            BnoteError::ArithmeticOverflow("shares").kind(),
            ErrorKind::Arithmetic
        );
    }

    #[test]
    fn range_violation_message_names_bounds() {
        let err = BnoteError::LockDaysOutOfRange { min: 1, max: 5555, got: 6000 };
        assert!(err.is_range_violation());
        assert_eq!(
            err.to_string(),
            "lock days out of range: must be between 1 and 5555, got 6000"
        );
    }
}
