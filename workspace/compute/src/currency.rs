//! Static currency registry and exchange-rate arithmetic.
//!
//! Rates map one unit of a currency to the base currency. Conversion between
//! two non-base currencies always routes through the base with two
//! multiplications; a direct cross-rate is never derived, so results match the
//! reference behavior bit for bit. Full floating precision is carried here;
//! rounding for display is a presentation concern.

use std::collections::HashMap;

use crate::error::{LedgerError, Result};

/// A supported currency with its display attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Currency {
    pub code: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
}

/// The fixed set of currencies the tracker understands.
pub const CURRENCIES: &[Currency] = &[
    Currency {
        code: "TRY",
        symbol: "₺",
        name: "Türk Lirası",
    },
    Currency {
        code: "USD",
        symbol: "$",
        name: "Amerikan Doları",
    },
    Currency {
        code: "EUR",
        symbol: "€",
        name: "Euro",
    },
];

/// Look up a currency's display attributes by code.
pub fn currency_info(code: &str) -> Option<&'static Currency> {
    CURRENCIES.iter().find(|c| c.code == code)
}

/// Process-wide exchange-rate table, fixed at startup.
#[derive(Debug, Clone)]
pub struct ExchangeRates {
    base: String,
    rates: HashMap<String, f64>,
}

impl ExchangeRates {
    /// Build a rate table. The base currency must be present and map to
    /// exactly 1.0.
    pub fn new(base: impl Into<String>, rates: HashMap<String, f64>) -> Result<Self> {
        let base = base.into();
        match rates.get(&base) {
            Some(rate) if *rate == 1.0 => Ok(Self { base, rates }),
            Some(rate) => Err(LedgerError::Validation(format!(
                "base currency {base} must have rate 1.0, got {rate}"
            ))),
            None => Err(LedgerError::Validation(format!(
                "base currency {base} missing from rate table"
            ))),
        }
    }

    /// The currency all cross-account aggregates are normalized to.
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn is_supported(&self, code: &str) -> bool {
        self.rates.contains_key(code)
    }

    fn rate(&self, code: &str) -> Result<f64> {
        self.rates
            .get(code)
            .copied()
            .ok_or_else(|| LedgerError::InvalidCurrency(code.to_string()))
    }

    /// Convert an amount into the base currency.
    pub fn convert_to_base(&self, amount: f64, from: &str) -> Result<f64> {
        Ok(amount * self.rate(from)?)
    }

    /// Convert between two supported currencies through the base currency.
    /// Identity conversions return the amount untouched.
    pub fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64> {
        if from == to {
            return Ok(amount);
        }
        let base_amount = self.convert_to_base(amount, from)?;
        Ok(base_amount / self.rate(to)?)
    }
}

impl Default for ExchangeRates {
    /// The reference rate table: TRY base, USD 43.50, EUR 51.70.
    fn default() -> Self {
        let rates = HashMap::from([
            ("TRY".to_string(), 1.0),
            ("USD".to_string(), 43.50),
            ("EUR".to_string(), 51.70),
        ]);
        Self {
            base: "TRY".to_string(),
            rates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_maps_to_itself() {
        let rates = ExchangeRates::default();
        assert_eq!(rates.base(), "TRY");
        assert_eq!(rates.convert_to_base(250.0, "TRY").unwrap(), 250.0);
    }

    #[test]
    fn dollars_to_base() {
        let rates = ExchangeRates::default();
        assert_eq!(rates.convert_to_base(10.0, "USD").unwrap(), 435.0);
    }

    #[test]
    fn identity_conversion_is_exact() {
        let rates = ExchangeRates::default();
        let odd_amount = 123.456789012345;
        for code in ["TRY", "USD", "EUR"] {
            assert_eq!(rates.convert(odd_amount, code, code).unwrap(), odd_amount);
        }
    }

    #[test]
    fn cross_conversion_goes_through_base() {
        let rates = ExchangeRates::default();
        let eur = rates.convert(100.0, "USD", "EUR").unwrap();
        assert_eq!(eur, 100.0 * 43.50 / 51.70);
        assert!((eur - 84.139).abs() < 0.001);
    }

    #[test]
    fn round_trip_is_close_but_not_necessarily_exact() {
        let rates = ExchangeRates::default();
        for (from, to) in [("USD", "EUR"), ("EUR", "USD"), ("USD", "TRY"), ("EUR", "TRY")] {
            let amount = 987.654321;
            let there = rates.convert(amount, from, to).unwrap();
            let back = rates.convert(there, to, from).unwrap();
            let relative = ((back - amount) / amount).abs();
            assert!(relative < 1e-9, "{from}->{to} drifted by {relative}");
        }
    }

    #[test]
    fn unknown_currency_is_rejected() {
        let rates = ExchangeRates::default();
        assert!(matches!(
            rates.convert_to_base(1.0, "GBP"),
            Err(LedgerError::InvalidCurrency(_))
        ));
        assert!(matches!(
            rates.convert(1.0, "USD", "GBP"),
            Err(LedgerError::InvalidCurrency(_))
        ));
    }

    #[test]
    fn base_rate_must_be_one() {
        let rates = HashMap::from([("TRY".to_string(), 2.0)]);
        assert!(matches!(
            ExchangeRates::new("TRY", rates),
            Err(LedgerError::Validation(_))
        ));

        let missing = HashMap::from([("USD".to_string(), 43.5)]);
        assert!(matches!(
            ExchangeRates::new("TRY", missing),
            Err(LedgerError::Validation(_))
        ));
    }

    #[test]
    fn registry_knows_display_attributes() {
        let lira = currency_info("TRY").unwrap();
        assert_eq!(lira.symbol, "₺");
        assert!(currency_info("GBP").is_none());
    }
}
