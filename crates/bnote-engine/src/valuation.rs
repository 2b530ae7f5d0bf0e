use serde::Serialize;

use bnote_core::math::pow10;
use bnote_core::{Balance, MarketSnapshot};

/// Token amount as a float, for display math against market prices only.
pub fn to_display_tokens(amount: Balance, decimals: u8) -> f64 {
    match pow10(decimals) {
        Ok(scale) => {
            let whole = (amount / scale) as f64;
            let frac = (amount % scale) as f64 / scale as f64;
            whole + frac
        }
        Err(_) => amount as f64,
    }
}

fn priced(amount: Balance, decimals: u8, price: Option<f64>) -> Option<f64> {
    price
        .filter(|p| p.is_finite())
        .map(|p| to_display_tokens(amount, decimals) * p)
}

/// Wallet balance × price, `None` when no price is available.
pub fn wallet_value(balance: Balance, decimals: u8, price: Option<f64>) -> Option<f64> {
    priced(balance, decimals, price)
}

/// Total supply × USD price, `None` when no price is available.
pub fn market_cap(total_supply: Balance, decimals: u8, price_usd: Option<f64>) -> Option<f64> {
    priced(total_supply, decimals, price_usd)
}

/// Derived market figures for the connected wallet.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Valuation {
    pub wallet_value_usd: Option<f64>,
    pub wallet_value_native: Option<f64>,
    pub market_cap_usd: Option<f64>,
}

impl Valuation {
    /// Everything is `None` when the market snapshot is missing. A missing
    /// balance blanks the wallet values and a missing supply blanks the
    /// market cap; the other figures are still derived.
    pub fn derive(
        balance: Option<Balance>,
        total_supply: Option<Balance>,
        decimals: u8,
        market: Option<&MarketSnapshot>,
    ) -> Self {
        let Some(m) = market else {
            return Self::default();
        };
        Self {
            wallet_value_usd: balance.and_then(|b| wallet_value(b, decimals, m.price_usd)),
            wallet_value_native: balance.and_then(|b| wallet_value(b, decimals, m.price_native)),
            market_cap_usd: total_supply.and_then(|t| market_cap(t, decimals, m.price_usd)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::ONE;

    #[test]
    fn display_tokens_keeps_fraction() {
        assert_eq!(to_display_tokens(5 * ONE / 2, 18), 2.5);
        assert_eq!(to_display_tokens(42, 0), 42.0);
    }

    #[test]
    fn values_scale_with_price() {
        assert_eq!(wallet_value(10 * ONE, 18, Some(0.5)), Some(5.0));
        assert_eq!(market_cap(1_000 * ONE, 18, Some(2.0)), Some(2_000.0));
        assert_eq!(wallet_value(10 * ONE, 18, None), None);
        assert_eq!(wallet_value(10 * ONE, 18, Some(f64::NAN)), None);
    }

    #[test]
    fn derive_without_market_is_blank() {
        assert_eq!(
            Valuation::derive(Some(ONE), Some(ONE), 18, None),
            Valuation::default()
        );

        let m = MarketSnapshot {
            price_usd: Some(0.25),
            ..Default::default()
        };
        let v = Valuation::derive(Some(4 * ONE), Some(100 * ONE), 18, Some(&m));
        assert_eq!(v.wallet_value_usd, Some(1.0));
        assert_eq!(v.wallet_value_native, None);
        assert_eq!(v.market_cap_usd, Some(25.0));
    }

    #[test]
    fn missing_ledger_values_blank_only_their_fields() {
        let m = MarketSnapshot {
            price_usd: Some(0.25),
            price_native: Some(2.0),
            ..Default::default()
        };
        let no_balance = Valuation::derive(None, Some(100 * ONE), 18, Some(&m));
        assert_eq!(no_balance.wallet_value_usd, None);
        assert_eq!(no_balance.wallet_value_native, None);
        assert_eq!(no_balance.market_cap_usd, Some(25.0));

        let no_supply = Valuation::derive(Some(4 * ONE), None, 18, Some(&m));
        assert_eq!(no_supply.wallet_value_usd, Some(1.0));
        assert_eq!(no_supply.wallet_value_native, Some(8.0));
        assert_eq!(no_supply.market_cap_usd, None);
    }
}
