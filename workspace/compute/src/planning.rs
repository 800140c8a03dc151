//! Planned items and their one-way realization into transactions.
//!
//! A planned item is pending from creation until it is either deleted or
//! realized. Realization copies the item into a real transaction dated today,
//! applies the balance effect, and deletes the item, all in one unit of work:
//! when any step fails the item survives so the user can retry. Nothing here
//! ever fires on its own; overdue status is informational only.

use chrono::{Duration, NaiveDate};
use model::entities::planned_item::{self, RecurrencePeriod};
use model::entities::prelude::*;
use model::entities::transaction::{self, TransactionKind};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::{debug, instrument};

use crate::currency::ExchangeRates;
use crate::error::{LedgerError, Result};
use crate::ledger::{self, TransactionDraft};

/// A planned item as entered by the caller, before it has an identity.
#[derive(Debug, Clone)]
pub struct PlannedItemDraft {
    pub account_id: i32,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub currency_code: String,
    pub category: String,
    pub description: String,
    pub planned_date: NaiveDate,
    pub is_recurring: bool,
    pub recurrence_period: Option<RecurrencePeriod>,
}

impl PlannedItemDraft {
    pub fn validate(&self, rates: &ExchangeRates) -> Result<()> {
        if self.amount <= Decimal::ZERO {
            return Err(LedgerError::Validation(
                "planned amount must be positive".to_string(),
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

/// Create a planned item. No balance is touched while it stays pending.
#[instrument(skip(db, rates))]
pub async fn create_planned_item(
    db: &DatabaseConnection,
    rates: &ExchangeRates,
    draft: PlannedItemDraft,
) -> Result<planned_item::Model> {
    draft.validate(rates)?;

    Account::find_by_id(draft.account_id)
        .one(db)
        .await?
        .ok_or_else(|| LedgerError::NotFound(format!("account {}", draft.account_id)))?;

    let created = planned_item::ActiveModel {
        account_id: Set(draft.account_id),
        kind: Set(draft.kind),
        amount: Set(draft.amount),
        currency_code: Set(draft.currency_code),
        category: Set(draft.category),
        description: Set(draft.description),
        planned_date: Set(draft.planned_date),
        is_recurring: Set(draft.is_recurring),
        recurrence_period: Set(draft.recurrence_period),
        ..Default::default()
    }
    .insert(db)
    .await?;

    debug!(planned_item_id = created.id, "planned item created");
    Ok(created)
}

/// Edit a pending planned item in place.
#[instrument(skip(db, rates))]
pub async fn update_planned_item(
    db: &DatabaseConnection,
    rates: &ExchangeRates,
    item_id: i32,
    draft: PlannedItemDraft,
) -> Result<planned_item::Model> {
    draft.validate(rates)?;

    let existing = PlannedItem::find_by_id(item_id)
        .one(db)
        .await?
        .ok_or_else(|| LedgerError::NotFound(format!("planned item {item_id}")))?;

    let mut active: planned_item::ActiveModel = existing.into();
    active.account_id = Set(draft.account_id);
    active.kind = Set(draft.kind);
    active.amount = Set(draft.amount);
    active.currency_code = Set(draft.currency_code);
    active.category = Set(draft.category);
    active.description = Set(draft.description);
    active.planned_date = Set(draft.planned_date);
    active.is_recurring = Set(draft.is_recurring);
    active.recurrence_period = Set(draft.recurrence_period);

    Ok(active.update(db).await?)
}

/// Cancel a planned item. Never touches any account balance.
#[instrument(skip(db))]
pub async fn delete_planned_item(db: &DatabaseConnection, item_id: i32) -> Result<()> {
    let result = PlannedItem::delete_by_id(item_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(LedgerError::NotFound(format!("planned item {item_id}")));
    }
    Ok(())
}

/// Convert a planned item into a real transaction dated `today`.
///
/// Transaction insert, balance effect, and item deletion commit together.
/// Realizing an id that no longer exists fails with `NotFound` and creates
/// nothing, which makes realization exactly-once.
#[instrument(skip(db))]
pub async fn realize(
    db: &DatabaseConnection,
    item_id: i32,
    today: NaiveDate,
) -> Result<transaction::Model> {
    let item = PlannedItem::find_by_id(item_id)
        .one(db)
        .await?
        .ok_or_else(|| LedgerError::NotFound(format!("planned item {item_id}")))?;

    let created = db
        .transaction::<_, transaction::Model, LedgerError>(move |txn| {
            Box::pin(async move {
                let draft = TransactionDraft {
                    account_id: item.account_id,
                    kind: item.kind,
                    amount: item.amount,
                    currency_code: item.currency_code.clone(),
                    category: item.category.clone(),
                    description: item.description.clone(),
                    // The realization date, not the originally planned one.
                    transaction_date: today,
                };
                let created = ledger::post_transaction(txn, &draft).await?;
                PlannedItem::delete_by_id(item.id).exec(txn).await?;
                Ok(created)
            })
        })
        .await?;

    debug!(
        planned_item_id = item_id,
        transaction_id = created.id,
        "planned item realized"
    );
    Ok(created)
}

/// Planned items due within `threshold_days` of `today`, soonest first.
/// Overdue items qualify as well, since their planned date is already past.
pub async fn upcoming(
    db: &DatabaseConnection,
    today: NaiveDate,
    threshold_days: i64,
) -> Result<Vec<planned_item::Model>> {
    let horizon = today + Duration::days(threshold_days);
    let items = PlannedItem::find()
        .filter(planned_item::Column::PlannedDate.lte(horizon))
        .order_by_asc(planned_item::Column::PlannedDate)
        .all(db)
        .await?;
    Ok(items)
}

/// Planned items whose date has already passed, oldest first.
pub async fn overdue(db: &DatabaseConnection, today: NaiveDate) -> Result<Vec<planned_item::Model>> {
    let items = PlannedItem::find()
        .filter(planned_item::Column::PlannedDate.lt(today))
        .order_by_asc(planned_item::Column::PlannedDate)
        .all(db)
        .await?;
    Ok(items)
}
