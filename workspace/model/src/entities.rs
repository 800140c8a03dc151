//! This file serves as the root for all SeaORM entity modules.
//! The schema is a small personal-finance ledger: wallet accounts own their
//! transactions and planned items, and recurring income/expense definitions
//! own their recorded payments. All ownership edges cascade on delete.

pub mod account;
pub mod expense_payment;
pub mod income_payment;
pub mod planned_item;
pub mod regular_expense;
pub mod regular_income;
pub mod transaction;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::account::Entity as Account;
    pub use super::expense_payment::Entity as ExpensePayment;
    pub use super::income_payment::Entity as IncomePayment;
    pub use super::planned_item::Entity as PlannedItem;
    pub use super::regular_expense::Entity as RegularExpense;
    pub use super::regular_income::Entity as RegularIncome;
    pub use super::transaction::Entity as Transaction;
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;
    use migration::{Migrator, MigratorTrait};
    use rust_decimal::Decimal;
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, QueryFilter, Set,
    };

    use super::account::AccountKind;
    use super::regular_income::IncomeCategory;
    use super::transaction::TransactionKind;
    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        // Connect to the SQLite database
        let db = Database::connect("sqlite::memory:").await?;

        // Enable foreign keys
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

        // Try to apply migrations first
        Migrator::up(&db, None).await.expect("Migrations failed.");
        Ok(db)
    }

    #[tokio::test]
    async fn test_entity_integration() -> Result<(), DbErr> {
        let db = setup_db().await?;

        // Create accounts
        let cash = account::ActiveModel {
            name: Set("Cash Wallet".to_string()),
            kind: Set(AccountKind::Cash),
            currency_code: Set("TRY".to_string()),
            balance: Set(Decimal::new(10000, 1)), // 1000.0
            description: Set(Some("Pocket money".to_string())),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let bank = account::ActiveModel {
            name: Set("Checking".to_string()),
            kind: Set(AccountKind::Bank),
            currency_code: Set("USD".to_string()),
            balance: Set(Decimal::ZERO),
            description: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Record a transaction against the cash account
        let groceries = transaction::ActiveModel {
            account_id: Set(cash.id),
            kind: Set(TransactionKind::Expense),
            amount: Set(Decimal::new(1500, 1)), // 150.0
            currency_code: Set("TRY".to_string()),
            category: Set("groceries".to_string()),
            description: Set("Weekly shopping".to_string()),
            transaction_date: Set(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // And a planned item
        let planned_rent = planned_item::ActiveModel {
            account_id: Set(cash.id),
            kind: Set(TransactionKind::Expense),
            amount: Set(Decimal::new(50000, 1)), // 5000.0
            currency_code: Set("TRY".to_string()),
            category: Set("rent".to_string()),
            description: Set(String::new()),
            planned_date: Set(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()),
            is_recurring: Set(false),
            recurrence_period: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Recurring income with one recorded payment
        let salary = regular_income::ActiveModel {
            account_id: Set(bank.id),
            name: Set("Salary".to_string()),
            category: Set(IncomeCategory::Salary),
            amount: Set(Decimal::new(30000, 1)), // 3000.0
            currency_code: Set("USD".to_string()),
            expected_day: Set(15),
            description: Set(String::new()),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let payment = income_payment::ActiveModel {
            regular_income_id: Set(salary.id),
            expected_date: Set(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()),
            actual_date: Set(NaiveDate::from_ymd_opt(2024, 6, 17).unwrap()),
            amount: Set(Decimal::new(30000, 1)),
            currency_code: Set("USD".to_string()),
            delay_days: Set(2),
            notes: Set(String::new()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        // Read back and verify data
        let accounts = Account::find().all(&db).await?;
        assert_eq!(accounts.len(), 2);
        assert!(accounts.iter().any(|a| a.name == "Cash Wallet"));
        assert!(accounts.iter().any(|a| a.name == "Checking"));

        let cash_transactions = Transaction::find()
            .filter(transaction::Column::AccountId.eq(cash.id))
            .all(&db)
            .await?;
        assert_eq!(cash_transactions.len(), 1);
        assert_eq!(cash_transactions[0].id, groceries.id);
        assert_eq!(
            cash_transactions[0].signed_amount(),
            Decimal::new(-1500, 1)
        );

        let payments = IncomePayment::find()
            .filter(income_payment::Column::RegularIncomeId.eq(salary.id))
            .all(&db)
            .await?;
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].id, payment.id);
        assert!(payments[0].is_late());

        // Deleting the cash account cascades to its transactions and
        // planned items; nothing with a dangling account_id survives.
        Account::delete_by_id(cash.id).exec(&db).await?;

        let orphaned_transactions = Transaction::find()
            .filter(transaction::Column::AccountId.eq(cash.id))
            .all(&db)
            .await?;
        assert!(orphaned_transactions.is_empty());

        let orphaned_items = PlannedItem::find_by_id(planned_rent.id).one(&db).await?;
        assert!(orphaned_items.is_none());

        // Deleting a recurring income cascades to its payments.
        RegularIncome::delete_by_id(salary.id).exec(&db).await?;

        let orphaned_payments = IncomePayment::find()
            .filter(income_payment::Column::RegularIncomeId.eq(salary.id))
            .all(&db)
            .await?;
        assert!(orphaned_payments.is_empty());

        Ok(())
    }
}
