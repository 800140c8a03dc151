//! Shared fixtures for the engine tests: an in-memory database with the full
//! schema applied, plus builders for the entities most tests need.

use migration::{Migrator, MigratorTrait};
use model::entities::account::{self, AccountKind};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Database, DatabaseConnection, Set};

pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    db.execute_unprepared("PRAGMA foreign_keys = ON;")
        .await
        .expect("Failed to enable foreign keys");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

pub async fn insert_account(
    db: &DatabaseConnection,
    name: &str,
    currency: &str,
    balance: Decimal,
) -> account::Model {
    account::ActiveModel {
        name: Set(name.to_string()),
        kind: Set(AccountKind::Cash),
        currency_code: Set(currency.to_string()),
        balance: Set(balance),
        description: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert account")
}
