//! Core engines of the finance tracker.
//!
//! Everything here is driven through an explicitly injected database handle
//! and an [`currency::ExchangeRates`] table; there is no global state. The
//! modules line up with the system's responsibilities:
//!
//! - [`currency`]: the static exchange-rate table and conversion arithmetic.
//! - [`ledger`]: account/transaction mutations that keep balances consistent.
//! - [`planning`]: planned items and their one-way realization into
//!   transactions.
//! - [`recurring`]: recurring income/expense expectations and payment-delay
//!   statistics, decoupled from the ledger.
//! - [`reporting`]: read-only, currency-normalized aggregations.

pub mod currency;
pub mod error;
pub mod ledger;
pub mod planning;
pub mod recurring;
pub mod reporting;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{LedgerError, Result};
