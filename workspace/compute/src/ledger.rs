//! Balance mutation engine.
//!
//! Keeps every account balance equal to its initial value plus the signed
//! amounts of all transactions applied to it. Balances are adjusted
//! incrementally, never recomputed by re-summing rows, and every mutating
//! operation runs as a single database transaction so a transaction row and
//! its balance effect land together or not at all.

use chrono::{NaiveDate, Utc};
use model::entities::account::{self, AccountKind};
use model::entities::prelude::*;
use model::entities::transaction::{self, TransactionKind};
use rust_decimal::prelude::*;
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Set, TransactionTrait};
use tracing::{debug, instrument};

use crate::currency::ExchangeRates;
use crate::error::{LedgerError, Result};

/// A validated-on-entry account, before it has an identity.
#[derive(Debug, Clone)]
pub struct AccountDraft {
    pub name: String,
    pub kind: AccountKind,
    pub currency_code: String,
    pub balance: Decimal,
    pub description: Option<String>,
}

impl AccountDraft {
    pub fn validate(&self, rates: &ExchangeRates) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::Validation(
                "account name must not be empty".to_string(),
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

/// A transaction as entered by the caller, before it has an identity.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub account_id: i32,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub currency_code: String,
    pub category: String,
    pub description: String,
    pub transaction_date: NaiveDate,
}

impl TransactionDraft {
    /// Construction-time validation, before any persistence attempt.
    pub fn validate(&self, rates: &ExchangeRates) -> Result<()> {
        if self.amount <= Decimal::ZERO {
            return Err(LedgerError::Validation(
                "transaction amount must be positive".to_string(),
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

    /// The amount with sign applied by kind; the only value ever added to a
    /// balance.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }
}

/// Convert a draft's amount into the owning account's currency before entry.
///
/// Entry-time normalization is part of the core contract, not something left
/// to UI code: after this call the draft is denominated in the account's
/// currency. Drafts already matching the account are returned untouched.
pub fn normalize_transaction_to_account_currency(
    draft: &mut TransactionDraft,
    account: &account::Model,
    rates: &ExchangeRates,
) -> Result<()> {
    if draft.currency_code == account.currency_code {
        return Ok(());
    }

    let amount = draft.amount.to_f64().ok_or_else(|| {
        LedgerError::Validation(format!("amount {} is not representable", draft.amount))
    })?;
    let converted = rates.convert(amount, &draft.currency_code, &account.currency_code)?;
    draft.amount = Decimal::from_f64(converted).ok_or_else(|| {
        LedgerError::Validation(format!("converted amount {converted} is not representable"))
    })?;
    draft.currency_code = account.currency_code.clone();
    Ok(())
}

/// Create an account with an explicit initial balance.
#[instrument(skip(db, rates))]
pub async fn create_account(
    db: &DatabaseConnection,
    rates: &ExchangeRates,
    draft: AccountDraft,
) -> Result<account::Model> {
    draft.validate(rates)?;

    let created = account::ActiveModel {
        name: Set(draft.name),
        kind: Set(draft.kind),
        currency_code: Set(draft.currency_code),
        balance: Set(draft.balance),
        description: Set(draft.description),
        ..Default::default()
    }
    .insert(db)
    .await?;

    debug!(account_id = created.id, "account created");
    Ok(created)
}

/// Update an account's descriptive fields and balance.
///
/// Changing the currency relabels the account only: the stored balance and
/// historical transaction amounts keep their old units. This matches the
/// reference system; an explicit convert-on-change operation would be a
/// separate, documented extension.
#[instrument(skip(db, rates))]
pub async fn update_account(
    db: &DatabaseConnection,
    rates: &ExchangeRates,
    account_id: i32,
    draft: AccountDraft,
) -> Result<account::Model> {
    draft.validate(rates)?;

    let existing = Account::find_by_id(account_id)
        .one(db)
        .await?
        .ok_or_else(|| LedgerError::NotFound(format!("account {account_id}")))?;

    let mut active: account::ActiveModel = existing.into();
    active.name = Set(draft.name);
    active.kind = Set(draft.kind);
    active.currency_code = Set(draft.currency_code);
    active.balance = Set(draft.balance);
    active.description = Set(draft.description);
    active.updated_at = Set(Utc::now().naive_utc());

    Ok(active.update(db).await?)
}

/// Delete an account. Owned transactions and planned items go with it.
#[instrument(skip(db))]
pub async fn delete_account(db: &DatabaseConnection, account_id: i32) -> Result<()> {
    let result = Account::delete_by_id(account_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(LedgerError::NotFound(format!("account {account_id}")));
    }
    debug!(account_id, "account deleted with cascade");
    Ok(())
}

/// Persist a transaction and apply its signed amount to the owning account.
#[instrument(skip(db, rates))]
pub async fn create_transaction(
    db: &DatabaseConnection,
    rates: &ExchangeRates,
    draft: TransactionDraft,
) -> Result<transaction::Model> {
    draft.validate(rates)?;

    let created = db
        .transaction::<_, transaction::Model, LedgerError>(move |txn| {
            Box::pin(async move { post_transaction(txn, &draft).await })
        })
        .await?;

    debug!(transaction_id = created.id, "transaction created");
    Ok(created)
}

/// Replace a transaction's fields, reversing the old balance effect before
/// applying the new one. Works when the transaction moves between accounts:
/// both accounts end up adjusted.
#[instrument(skip(db, rates))]
pub async fn update_transaction(
    db: &DatabaseConnection,
    rates: &ExchangeRates,
    transaction_id: i32,
    draft: TransactionDraft,
) -> Result<transaction::Model> {
    draft.validate(rates)?;

    let updated = db
        .transaction::<_, transaction::Model, LedgerError>(move |txn| {
            Box::pin(async move {
                let old = Transaction::find_by_id(transaction_id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| {
                        LedgerError::NotFound(format!("transaction {transaction_id}"))
                    })?;

                let old_account = Account::find_by_id(old.account_id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| LedgerError::NotFound(format!("account {}", old.account_id)))?;
                apply_balance_delta(txn, old_account, -old.signed_amount()).await?;

                let mut active: transaction::ActiveModel = old.into();
                active.account_id = Set(draft.account_id);
                active.kind = Set(draft.kind);
                active.amount = Set(draft.amount);
                active.currency_code = Set(draft.currency_code.clone());
                active.category = Set(draft.category.clone());
                active.description = Set(draft.description.clone());
                active.transaction_date = Set(draft.transaction_date);
                let updated = active.update(txn).await?;

                // Re-fetch the target so a same-account update sees the
                // balance as already reversed above.
                let target = Account::find_by_id(updated.account_id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| {
                        LedgerError::NotFound(format!("account {}", updated.account_id))
                    })?;
                apply_balance_delta(txn, target, updated.signed_amount()).await?;

                Ok(updated)
            })
        })
        .await?;

    Ok(updated)
}

/// Remove a transaction and back its signed amount out of the account.
#[instrument(skip(db))]
pub async fn delete_transaction(
    db: &DatabaseConnection,
    transaction_id: i32,
) -> Result<()> {
    db.transaction::<_, (), LedgerError>(move |txn| {
        Box::pin(async move {
            let existing = Transaction::find_by_id(transaction_id)
                .one(txn)
                .await?
                .ok_or_else(|| LedgerError::NotFound(format!("transaction {transaction_id}")))?;

            let account = Account::find_by_id(existing.account_id)
                .one(txn)
                .await?
                .ok_or_else(|| {
                    LedgerError::NotFound(format!("account {}", existing.account_id))
                })?;
            apply_balance_delta(txn, account, -existing.signed_amount()).await?;

            Transaction::delete_by_id(transaction_id).exec(txn).await?;
            Ok(())
        })
    })
    .await?;

    debug!(transaction_id, "transaction deleted");
    Ok(())
}

/// Insert a transaction row and apply its balance effect on one connection,
/// which the callers wrap in a database transaction.
pub(crate) async fn post_transaction<C: ConnectionTrait>(
    conn: &C,
    draft: &TransactionDraft,
) -> Result<transaction::Model> {
    let account = Account::find_by_id(draft.account_id)
        .one(conn)
        .await?
        .ok_or_else(|| LedgerError::NotFound(format!("account {}", draft.account_id)))?;

    let inserted = transaction::ActiveModel {
        account_id: Set(draft.account_id),
        kind: Set(draft.kind),
        amount: Set(draft.amount),
        currency_code: Set(draft.currency_code.clone()),
        category: Set(draft.category.clone()),
        description: Set(draft.description.clone()),
        transaction_date: Set(draft.transaction_date),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    apply_balance_delta(conn, account, inserted.signed_amount()).await?;
    Ok(inserted)
}

/// Shift an account balance by a signed delta and touch its update stamp.
pub(crate) async fn apply_balance_delta<C: ConnectionTrait>(
    conn: &C,
    account: account::Model,
    delta: Decimal,
) -> Result<account::Model> {
    let new_balance = account.balance + delta;
    let mut active: account::ActiveModel = account.into();
    active.balance = Set(new_balance);
    active.updated_at = Set(Utc::now().naive_utc());
    Ok(active.update(conn).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{insert_account, setup_db};
    use rust_decimal::Decimal;

    fn dec(value: i64) -> Decimal {
        Decimal::new(value, 0)
    }

    fn expense(account_id: i32, amount: Decimal) -> TransactionDraft {
        TransactionDraft {
            account_id,
            kind: TransactionKind::Expense,
            amount,
            currency_code: "TRY".to_string(),
            category: "test".to_string(),
            description: String::new(),
            transaction_date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
        }
    }

    fn income(account_id: i32, amount: Decimal) -> TransactionDraft {
        TransactionDraft {
            kind: TransactionKind::Income,
            ..expense(account_id, amount)
        }
    }

    async fn balance_of(db: &DatabaseConnection, account_id: i32) -> Decimal {
        Account::find_by_id(account_id)
            .one(db)
            .await
            .unwrap()
            .unwrap()
            .balance
    }

    #[tokio::test]
    async fn create_update_delete_scenario() {
        let db = setup_db().await;
        let rates = ExchangeRates::default();
        let account = insert_account(&db, "Cash", "TRY", dec(1000)).await;

        // Expense of 150 brings the balance to 850.
        let tx = create_transaction(&db, &rates, expense(account.id, dec(150)))
            .await
            .unwrap();
        assert_eq!(balance_of(&db, account.id).await, dec(850));

        // Raising the expense to 200 reverses the 150 first.
        update_transaction(&db, &rates, tx.id, expense(account.id, dec(200)))
            .await
            .unwrap();
        assert_eq!(balance_of(&db, account.id).await, dec(800));

        // Deleting it restores the initial balance.
        delete_transaction(&db, tx.id).await.unwrap();
        assert_eq!(balance_of(&db, account.id).await, dec(1000));
    }

    #[tokio::test]
    async fn moving_a_transaction_adjusts_both_accounts() {
        let db = setup_db().await;
        let rates = ExchangeRates::default();
        let first = insert_account(&db, "First", "TRY", dec(500)).await;
        let second = insert_account(&db, "Second", "TRY", dec(500)).await;

        let tx = create_transaction(&db, &rates, income(first.id, dec(100)))
            .await
            .unwrap();
        assert_eq!(balance_of(&db, first.id).await, dec(600));

        update_transaction(&db, &rates, tx.id, income(second.id, dec(100)))
            .await
            .unwrap();
        assert_eq!(balance_of(&db, first.id).await, dec(500));
        assert_eq!(balance_of(&db, second.id).await, dec(600));
    }

    #[tokio::test]
    async fn final_balance_depends_only_on_surviving_transactions() {
        let db = setup_db().await;
        let rates = ExchangeRates::default();
        let account = insert_account(&db, "Cash", "TRY", dec(1000)).await;

        let keep_a = create_transaction(&db, &rates, income(account.id, dec(300)))
            .await
            .unwrap();
        let drop_me = create_transaction(&db, &rates, expense(account.id, dec(120)))
            .await
            .unwrap();
        let keep_b = create_transaction(&db, &rates, expense(account.id, dec(50)))
            .await
            .unwrap();

        update_transaction(&db, &rates, keep_a.id, income(account.id, dec(400)))
            .await
            .unwrap();
        delete_transaction(&db, drop_me.id).await.unwrap();

        // Survivors: +400 income and -50 expense.
        assert_eq!(balance_of(&db, account.id).await, dec(1350));
        let _ = keep_b;
    }

    #[tokio::test]
    async fn non_positive_amounts_fail_validation() {
        let db = setup_db().await;
        let rates = ExchangeRates::default();
        let account = insert_account(&db, "Cash", "TRY", dec(0)).await;

        let zero = create_transaction(&db, &rates, expense(account.id, Decimal::ZERO)).await;
        assert!(matches!(zero, Err(LedgerError::Validation(_))));

        let negative = create_transaction(&db, &rates, expense(account.id, dec(-5))).await;
        assert!(matches!(negative, Err(LedgerError::Validation(_))));

        // Nothing was persisted and the balance is untouched.
        assert_eq!(balance_of(&db, account.id).await, dec(0));
        assert!(Transaction::find().all(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_currency_fails_validation() {
        let db = setup_db().await;
        let rates = ExchangeRates::default();
        let account = insert_account(&db, "Cash", "TRY", dec(0)).await;

        let mut draft = expense(account.id, dec(10));
        draft.currency_code = "GBP".to_string();
        assert!(matches!(
            create_transaction(&db, &rates, draft).await,
            Err(LedgerError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn missing_ids_surface_not_found() {
        let db = setup_db().await;
        let rates = ExchangeRates::default();

        let orphan = create_transaction(&db, &rates, expense(999, dec(10))).await;
        assert!(matches!(orphan, Err(LedgerError::NotFound(_))));
        // The failed create left no transaction row behind.
        assert!(Transaction::find().all(&db).await.unwrap().is_empty());

        assert!(matches!(
            delete_transaction(&db, 999).await,
            Err(LedgerError::NotFound(_))
        ));
        assert!(matches!(
            delete_account(&db, 999).await,
            Err(LedgerError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn normalization_converts_into_account_currency() {
        let db = setup_db().await;
        let rates = ExchangeRates::default();
        let account = insert_account(&db, "Cash", "TRY", dec(0)).await;
        let account = Account::find_by_id(account.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();

        let mut draft = expense(account.id, dec(10));
        draft.currency_code = "USD".to_string();
        normalize_transaction_to_account_currency(&mut draft, &account, &rates).unwrap();

        assert_eq!(draft.currency_code, "TRY");
        assert_eq!(draft.amount, dec(435));

        // Already-matching drafts are untouched.
        let mut same = expense(account.id, dec(42));
        normalize_transaction_to_account_currency(&mut same, &account, &rates).unwrap();
        assert_eq!(same.amount, dec(42));
    }

    #[tokio::test]
    async fn account_validation_and_currency_relabel() {
        let db = setup_db().await;
        let rates = ExchangeRates::default();

        let nameless = AccountDraft {
            name: "  ".to_string(),
            kind: AccountKind::Bank,
            currency_code: "TRY".to_string(),
            balance: dec(0),
            description: None,
        };
        assert!(matches!(
            create_account(&db, &rates, nameless).await,
            Err(LedgerError::Validation(_))
        ));

        let account = create_account(
            &db,
            &rates,
            AccountDraft {
                name: "Savings".to_string(),
                kind: AccountKind::Bank,
                currency_code: "TRY".to_string(),
                balance: dec(1000),
                description: None,
            },
        )
        .await
        .unwrap();

        // Switching the currency keeps the stored balance value as-is.
        let relabeled = update_account(
            &db,
            &rates,
            account.id,
            AccountDraft {
                name: "Savings".to_string(),
                kind: AccountKind::Bank,
                currency_code: "USD".to_string(),
                balance: account.balance,
                description: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(relabeled.currency_code, "USD");
        assert_eq!(relabeled.balance, dec(1000));
    }
}
