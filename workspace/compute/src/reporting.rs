//! Read-only aggregations over the ledger.
//!
//! Every figure here is normalized into the base currency as `f64` before
//! summation, so mixed-currency accounts and transactions aggregate cleanly.
//! Nothing in this module writes.

use chrono::{Datelike, Duration, NaiveDate};
use common::{TransactionSummary, WeeklySpending};
use model::entities::planned_item;
use model::entities::prelude::*;
use model::entities::transaction::{self, TransactionKind};
use rust_decimal::prelude::*;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::instrument;

use crate::currency::ExchangeRates;
use crate::error::{LedgerError, Result};
use crate::planning;

fn to_f64(amount: Decimal) -> Result<f64> {
    amount
        .to_f64()
        .ok_or_else(|| LedgerError::Validation(format!("amount {amount} is not representable")))
}

/// Sum of all account balances, expressed in the base currency.
#[instrument(skip(db, rates))]
pub async fn total_assets_in_base(
    db: &DatabaseConnection,
    rates: &ExchangeRates,
) -> Result<f64> {
    let accounts = Account::find().all(db).await?;

    let mut total = 0.0;
    for account in accounts {
        let balance = to_f64(account.balance)?;
        total += rates.convert_to_base(balance, &account.currency_code)?;
    }
    Ok(total)
}

/// Lifetime income and expense totals across all accounts, in the base
/// currency.
#[instrument(skip(db, rates))]
pub async fn transaction_summary(
    db: &DatabaseConnection,
    rates: &ExchangeRates,
) -> Result<TransactionSummary> {
    let transactions = Transaction::find().all(db).await?;

    let mut summary = TransactionSummary {
        income: 0.0,
        expense: 0.0,
    };
    for tx in transactions {
        let amount = rates.convert_to_base(to_f64(tx.amount)?, &tx.currency_code)?;
        match tx.kind {
            TransactionKind::Income => summary.income += amount,
            TransactionKind::Expense => summary.expense += amount,
        }
    }
    Ok(summary)
}

/// Expense totals for the week starting at `week_start`, bucketed by calendar
/// weekday (index 0 = Monday) and expressed in the base currency. The bucket
/// follows the transaction's own weekday, so a week starting mid-week still
/// files a Friday expense under the Friday bucket.
///
/// The daily average divides by the days of the week that have elapsed as of
/// `today`, not by a flat seven, so a half-finished week is not diluted by
/// days that have not happened yet. A week entirely in the future reports an
/// average of zero.
#[instrument(skip(db, rates))]
pub async fn weekly_spending(
    db: &DatabaseConnection,
    rates: &ExchangeRates,
    week_start: NaiveDate,
    today: NaiveDate,
) -> Result<WeeklySpending> {
    let week_end = week_start + Duration::days(6);

    let expenses = Transaction::find()
        .filter(transaction::Column::Kind.eq(TransactionKind::Expense))
        .filter(transaction::Column::TransactionDate.gte(week_start))
        .filter(transaction::Column::TransactionDate.lte(week_end))
        .all(db)
        .await?;

    let mut daily_totals = [0.0f64; 7];
    for expense in expenses {
        let amount = rates.convert_to_base(to_f64(expense.amount)?, &expense.currency_code)?;
        let weekday = expense.transaction_date.weekday().num_days_from_monday() as usize;
        daily_totals[weekday] += amount;
    }

    let weekly_total: f64 = daily_totals.iter().sum();
    let days_passed = if today > week_end {
        7
    } else if today < week_start {
        0
    } else {
        today.weekday().num_days_from_monday() as i64 + 1
    };
    let daily_average = if days_passed == 0 {
        0.0
    } else {
        weekly_total / days_passed as f64
    };

    Ok(WeeklySpending {
        week_start,
        week_end,
        daily_totals: daily_totals.to_vec(),
        weekly_total,
        daily_average,
    })
}

/// Planned items due within the threshold, overdue ones included.
pub async fn upcoming_payments(
    db: &DatabaseConnection,
    today: NaiveDate,
    threshold_days: i64,
) -> Result<Vec<planned_item::Model>> {
    planning::upcoming(db, today, threshold_days).await
}
