use std::collections::HashMap;

use anyhow::{Context, Result};
use compute::currency::ExchangeRates;
use sea_orm::{ConnectionTrait, Database};
use tracing::{debug, info};

use crate::schemas::AppState;

/// Days ahead the upcoming-payments report looks by default.
pub const DEFAULT_UPCOMING_DAYS: i64 = 7;

/// Build the exchange-rate table from the environment.
///
/// `BASE_CURRENCY` picks the base (default TRY) and `EXCHANGE_RATES` overrides
/// the rate table as comma-separated `CODE=RATE` pairs, e.g.
/// `USD=43.50,EUR=51.70`. Each rate is units of base per one unit of the
/// listed currency. Without `EXCHANGE_RATES` the built-in table is used.
pub fn exchange_rates_from_env() -> Result<ExchangeRates> {
    let base = std::env::var("BASE_CURRENCY").unwrap_or_else(|_| "TRY".to_string());

    let Ok(spec) = std::env::var("EXCHANGE_RATES") else {
        return Ok(ExchangeRates::default());
    };

    let mut rates = HashMap::new();
    rates.insert(base.clone(), 1.0);
    for pair in spec.split(',').filter(|p| !p.trim().is_empty()) {
        let (code, rate) = pair
            .split_once('=')
            .with_context(|| format!("malformed EXCHANGE_RATES entry: {pair}"))?;
        let rate: f64 = rate
            .trim()
            .parse()
            .with_context(|| format!("malformed rate value in EXCHANGE_RATES entry: {pair}"))?;
        rates.insert(code.trim().to_string(), rate);
    }

    Ok(ExchangeRates::new(base, rates)?)
}

fn upcoming_days_from_env() -> Result<i64> {
    match std::env::var("UPCOMING_DAYS") {
        Ok(value) => value
            .parse()
            .with_context(|| format!("malformed UPCOMING_DAYS value: {value}")),
        Err(_) => Ok(DEFAULT_UPCOMING_DAYS),
    }
}

/// Initialize application state against an explicit database URL.
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;

    // Cascade deletes depend on foreign keys being enforced.
    if database_url.starts_with("sqlite") {
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;
    }

    let rates = exchange_rates_from_env()?;
    let upcoming_days = upcoming_days_from_env()?;
    debug!(
        base = rates.base(),
        upcoming_days, "application state configured"
    );

    Ok(AppState {
        db,
        rates,
        upcoming_days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env-var tests mutate process state; keep them in one test so they
    // cannot race each other.
    #[test]
    fn rate_table_parsing() {
        unsafe {
            std::env::remove_var("BASE_CURRENCY");
            std::env::remove_var("EXCHANGE_RATES");
        }
        let rates = exchange_rates_from_env().unwrap();
        assert_eq!(rates.base(), "TRY");
        assert_eq!(rates.convert_to_base(10.0, "USD").unwrap(), 435.0);

        unsafe {
            std::env::set_var("EXCHANGE_RATES", "USD=40.0, EUR=50.0");
        }
        let rates = exchange_rates_from_env().unwrap();
        assert_eq!(rates.convert_to_base(2.0, "USD").unwrap(), 80.0);
        assert_eq!(rates.convert_to_base(1.0, "TRY").unwrap(), 1.0);

        unsafe {
            std::env::set_var("EXCHANGE_RATES", "USD-40.0");
        }
        assert!(exchange_rates_from_env().is_err());

        unsafe {
            std::env::remove_var("EXCHANGE_RATES");
        }
    }
}
