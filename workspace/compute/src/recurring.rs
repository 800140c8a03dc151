//! Recurring income/expense expectations and their recorded payments.
//!
//! This family is deliberately decoupled from the transaction ledger:
//! recording a payment is statistical bookkeeping and never creates a
//! transaction or touches an account balance. Delay days are computed once at
//! record time and stored with the payment so history stays stable.

use chrono::{Datelike, NaiveDate};
use common::PaymentStats;
use model::entities::expense_payment;
use model::entities::income_payment::{self, delay_between};
use model::entities::prelude::*;
use model::entities::regular_expense::{self, ExpenseCategory};
use model::entities::regular_income::{self, IncomeCategory};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::{debug, instrument};

use crate::currency::ExchangeRates;
use crate::error::{LedgerError, Result};

/// How many payments a history listing returns unless the caller asks for
/// more.
pub const DEFAULT_PAYMENT_HISTORY: u64 = 12;

/// A recurring income definition as entered by the caller.
#[derive(Debug, Clone)]
pub struct RegularIncomeDraft {
    pub account_id: i32,
    pub name: String,
    pub category: IncomeCategory,
    pub amount: Decimal,
    pub currency_code: String,
    pub expected_day: i32,
    pub description: String,
    pub is_active: bool,
}

/// A recurring expense definition as entered by the caller.
#[derive(Debug, Clone)]
pub struct RegularExpenseDraft {
    pub account_id: i32,
    pub name: String,
    pub category: ExpenseCategory,
    pub amount: Decimal,
    pub currency_code: String,
    pub expected_day: i32,
    pub description: String,
    pub is_active: bool,
}

/// A payment being recorded against a recurring definition.
#[derive(Debug, Clone)]
pub struct PaymentDraft {
    pub expected_date: NaiveDate,
    pub actual_date: NaiveDate,
    pub amount: Decimal,
    pub currency_code: String,
    pub notes: String,
}

fn validate_definition(
    name: &str,
    amount: Decimal,
    expected_day: i32,
    currency_code: &str,
    rates: &ExchangeRates,
) -> Result<()> {
    if name.trim().is_empty() {
        return Err(LedgerError::Validation(
            "recurring definition name must not be empty".to_string(),
        ));
    }
    if amount <= Decimal::ZERO {
        return Err(LedgerError::Validation(
            "expected amount must be positive".to_string(),
        ));
    }
    if !(1..=31).contains(&expected_day) {
        return Err(LedgerError::Validation(format!(
            "expected day must be within 1..=31, got {expected_day}"
        )));
    }
    if !rates.is_supported(currency_code) {
        return Err(LedgerError::Validation(format!(
            "unsupported currency code: {currency_code}"
        )));
    }
    Ok(())
}

impl RegularIncomeDraft {
    pub fn validate(&self, rates: &ExchangeRates) -> Result<()> {
        validate_definition(
            &self.name,
            self.amount,
            self.expected_day,
            &self.currency_code,
            rates,
        )
    }
}

impl RegularExpenseDraft {
    pub fn validate(&self, rates: &ExchangeRates) -> Result<()> {
        validate_definition(
            &self.name,
            self.amount,
            self.expected_day,
            &self.currency_code,
            rates,
        )
    }
}

impl PaymentDraft {
    pub fn validate(&self, rates: &ExchangeRates) -> Result<()> {
        if self.amount <= Decimal::ZERO {
            return Err(LedgerError::Validation(
                "payment amount must be positive".to_string(),
            ));
        }
        if !rates.is_supported(&self.currency_code) {
            return Err(LedgerError::Validation(format!(
                "unsupported currency code: {}",
                self.currency_code
            )));
        }
        Ok(())
    }
}

fn first_of_month(today: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(today.year(), today.month(), 1).expect("first of month is valid")
}

// ----- regular incomes ------------------------------------------------------

#[instrument(skip(db, rates))]
pub async fn create_regular_income(
    db: &DatabaseConnection,
    rates: &ExchangeRates,
    draft: RegularIncomeDraft,
) -> Result<regular_income::Model> {
    draft.validate(rates)?;

    Account::find_by_id(draft.account_id)
        .one(db)
        .await?
        .ok_or_else(|| LedgerError::NotFound(format!("account {}", draft.account_id)))?;

    let created = regular_income::ActiveModel {
        account_id: Set(draft.account_id),
        name: Set(draft.name),
        category: Set(draft.category),
        amount: Set(draft.amount),
        currency_code: Set(draft.currency_code),
        expected_day: Set(draft.expected_day),
        description: Set(draft.description),
        is_active: Set(draft.is_active),
        ..Default::default()
    }
    .insert(db)
    .await?;

    debug!(regular_income_id = created.id, "regular income created");
    Ok(created)
}

#[instrument(skip(db, rates))]
pub async fn update_regular_income(
    db: &DatabaseConnection,
    rates: &ExchangeRates,
    income_id: i32,
    draft: RegularIncomeDraft,
) -> Result<regular_income::Model> {
    draft.validate(rates)?;

    let existing = RegularIncome::find_by_id(income_id)
        .one(db)
        .await?
        .ok_or_else(|| LedgerError::NotFound(format!("regular income {income_id}")))?;

    let mut active: regular_income::ActiveModel = existing.into();
    active.account_id = Set(draft.account_id);
    active.name = Set(draft.name);
    active.category = Set(draft.category);
    active.amount = Set(draft.amount);
    active.currency_code = Set(draft.currency_code);
    active.expected_day = Set(draft.expected_day);
    active.description = Set(draft.description);
    active.is_active = Set(draft.is_active);

    Ok(active.update(db).await?)
}

/// Delete a recurring income; its payment history goes with it.
#[instrument(skip(db))]
pub async fn delete_regular_income(db: &DatabaseConnection, income_id: i32) -> Result<()> {
    let result = RegularIncome::delete_by_id(income_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(LedgerError::NotFound(format!("regular income {income_id}")));
    }
    Ok(())
}

/// Record a received payment. Statistics only: no transaction is created and
/// no balance moves.
#[instrument(skip(db, rates))]
pub async fn record_income_payment(
    db: &DatabaseConnection,
    rates: &ExchangeRates,
    income_id: i32,
    draft: PaymentDraft,
) -> Result<income_payment::Model> {
    draft.validate(rates)?;

    RegularIncome::find_by_id(income_id)
        .one(db)
        .await?
        .ok_or_else(|| LedgerError::NotFound(format!("regular income {income_id}")))?;

    let created = income_payment::ActiveModel {
        regular_income_id: Set(income_id),
        expected_date: Set(draft.expected_date),
        actual_date: Set(draft.actual_date),
        amount: Set(draft.amount),
        currency_code: Set(draft.currency_code),
        delay_days: Set(delay_between(draft.expected_date, draft.actual_date)),
        notes: Set(draft.notes),
        ..Default::default()
    }
    .insert(db)
    .await?;

    debug!(
        income_payment_id = created.id,
        delay_days = created.delay_days,
        "income payment recorded"
    );
    Ok(created)
}

/// Payment history for a recurring income, most recent first.
pub async fn income_payments(
    db: &DatabaseConnection,
    income_id: i32,
    limit: u64,
) -> Result<Vec<income_payment::Model>> {
    let payments = IncomePayment::find()
        .filter(income_payment::Column::RegularIncomeId.eq(income_id))
        .order_by_desc(income_payment::Column::ActualDate)
        .limit(limit)
        .all(db)
        .await?;
    Ok(payments)
}

/// Delay statistics across all stored payments of a recurring income.
/// An empty history yields an average of exactly 0, not an error.
pub async fn income_delay_stats(
    db: &DatabaseConnection,
    income_id: i32,
) -> Result<PaymentStats> {
    RegularIncome::find_by_id(income_id)
        .one(db)
        .await?
        .ok_or_else(|| LedgerError::NotFound(format!("regular income {income_id}")))?;

    let payments = IncomePayment::find()
        .filter(income_payment::Column::RegularIncomeId.eq(income_id))
        .all(db)
        .await?;

    Ok(delay_stats(payments.iter().map(|p| p.delay_days)))
}

/// Active recurring incomes with no payment expected in the current month
/// yet. A pure set-difference query; nothing is created automatically.
pub async fn pending_incomes_this_month(
    db: &DatabaseConnection,
    today: NaiveDate,
) -> Result<Vec<regular_income::Model>> {
    let first_day = first_of_month(today);

    let paid: Vec<i32> = IncomePayment::find()
        .filter(income_payment::Column::ExpectedDate.gte(first_day))
        .all(db)
        .await?
        .into_iter()
        .map(|p| p.regular_income_id)
        .collect();

    let pending = RegularIncome::find()
        .filter(regular_income::Column::IsActive.eq(true))
        .order_by_asc(regular_income::Column::ExpectedDay)
        .all(db)
        .await?
        .into_iter()
        .filter(|income| !paid.contains(&income.id))
        .collect();

    Ok(pending)
}

// ----- regular expenses -----------------------------------------------------

#[instrument(skip(db, rates))]
pub async fn create_regular_expense(
    db: &DatabaseConnection,
    rates: &ExchangeRates,
    draft: RegularExpenseDraft,
) -> Result<regular_expense::Model> {
    draft.validate(rates)?;

    Account::find_by_id(draft.account_id)
        .one(db)
        .await?
        .ok_or_else(|| LedgerError::NotFound(format!("account {}", draft.account_id)))?;

    let created = regular_expense::ActiveModel {
        account_id: Set(draft.account_id),
        name: Set(draft.name),
        category: Set(draft.category),
        amount: Set(draft.amount),
        currency_code: Set(draft.currency_code),
        expected_day: Set(draft.expected_day),
        description: Set(draft.description),
        is_active: Set(draft.is_active),
        ..Default::default()
    }
    .insert(db)
    .await?;

    debug!(regular_expense_id = created.id, "regular expense created");
    Ok(created)
}

#[instrument(skip(db, rates))]
pub async fn update_regular_expense(
    db: &DatabaseConnection,
    rates: &ExchangeRates,
    expense_id: i32,
    draft: RegularExpenseDraft,
) -> Result<regular_expense::Model> {
    draft.validate(rates)?;

    let existing = RegularExpense::find_by_id(expense_id)
        .one(db)
        .await?
        .ok_or_else(|| LedgerError::NotFound(format!("regular expense {expense_id}")))?;

    let mut active: regular_expense::ActiveModel = existing.into();
    active.account_id = Set(draft.account_id);
    active.name = Set(draft.name);
    active.category = Set(draft.category);
    active.amount = Set(draft.amount);
    active.currency_code = Set(draft.currency_code);
    active.expected_day = Set(draft.expected_day);
    active.description = Set(draft.description);
    active.is_active = Set(draft.is_active);

    Ok(active.update(db).await?)
}

/// Delete a recurring expense; its payment history goes with it.
#[instrument(skip(db))]
pub async fn delete_regular_expense(db: &DatabaseConnection, expense_id: i32) -> Result<()> {
    let result = RegularExpense::delete_by_id(expense_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(LedgerError::NotFound(format!(
            "regular expense {expense_id}"
        )));
    }
    Ok(())
}

/// Record a completed payment. Statistics only, same as the income side.
#[instrument(skip(db, rates))]
pub async fn record_expense_payment(
    db: &DatabaseConnection,
    rates: &ExchangeRates,
    expense_id: i32,
    draft: PaymentDraft,
) -> Result<expense_payment::Model> {
    draft.validate(rates)?;

    RegularExpense::find_by_id(expense_id)
        .one(db)
        .await?
        .ok_or_else(|| LedgerError::NotFound(format!("regular expense {expense_id}")))?;

    let created = expense_payment::ActiveModel {
        regular_expense_id: Set(expense_id),
        expected_date: Set(draft.expected_date),
        actual_date: Set(draft.actual_date),
        amount: Set(draft.amount),
        currency_code: Set(draft.currency_code),
        delay_days: Set(delay_between(draft.expected_date, draft.actual_date)),
        notes: Set(draft.notes),
        ..Default::default()
    }
    .insert(db)
    .await?;

    debug!(
        expense_payment_id = created.id,
        delay_days = created.delay_days,
        "expense payment recorded"
    );
    Ok(created)
}

/// Payment history for a recurring expense, most recent first.
pub async fn expense_payments(
    db: &DatabaseConnection,
    expense_id: i32,
    limit: u64,
) -> Result<Vec<expense_payment::Model>> {
    let payments = ExpensePayment::find()
        .filter(expense_payment::Column::RegularExpenseId.eq(expense_id))
        .order_by_desc(expense_payment::Column::ActualDate)
        .limit(limit)
        .all(db)
        .await?;
    Ok(payments)
}

/// Delay statistics across all stored payments of a recurring expense.
pub async fn expense_delay_stats(
    db: &DatabaseConnection,
    expense_id: i32,
) -> Result<PaymentStats> {
    RegularExpense::find_by_id(expense_id)
        .one(db)
        .await?
        .ok_or_else(|| LedgerError::NotFound(format!("regular expense {expense_id}")))?;

    let payments = ExpensePayment::find()
        .filter(expense_payment::Column::RegularExpenseId.eq(expense_id))
        .all(db)
        .await?;

    Ok(delay_stats(payments.iter().map(|p| p.delay_days)))
}

/// Active recurring expenses with no payment expected in the current month.
pub async fn pending_expenses_this_month(
    db: &DatabaseConnection,
    today: NaiveDate,
) -> Result<Vec<regular_expense::Model>> {
    let first_day = first_of_month(today);

    let paid: Vec<i32> = ExpensePayment::find()
        .filter(expense_payment::Column::ExpectedDate.gte(first_day))
        .all(db)
        .await?
        .into_iter()
        .map(|p| p.regular_expense_id)
        .collect();

    let pending = RegularExpense::find()
        .filter(regular_expense::Column::IsActive.eq(true))
        .order_by_asc(regular_expense::Column::ExpectedDay)
        .all(db)
        .await?
        .into_iter()
        .filter(|expense| !paid.contains(&expense.id))
        .collect();

    Ok(pending)
}

fn delay_stats(delays: impl Iterator<Item = i32>) -> PaymentStats {
    let delays: Vec<i32> = delays.collect();
    let payment_count = delays.len() as u64;
    let average_delay_days = if delays.is_empty() {
        0.0
    } else {
        delays.iter().map(|d| *d as f64).sum::<f64>() / delays.len() as f64
    };
    PaymentStats {
        payment_count,
        average_delay_days,
    }
}
