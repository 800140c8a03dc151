use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The kind of wallet an account represents.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "bank")]
    Bank,
}

/// A cash or bank wallet holding a single currency.
///
/// The balance is maintained incrementally by the ledger engine: it equals the
/// initial balance plus the signed amounts of every transaction ever applied,
/// and is never recomputed by re-summing transaction rows.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub kind: AccountKind,
    /// Currency code from the supported set, e.g. "TRY", "USD".
    pub currency_code: String,
    /// Current balance in `currency_code` units. Any sign is allowed.
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub balance: Decimal,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Transactions applied to this account; removed together with it.
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transaction,
    /// Planned items targeting this account; removed together with it.
    #[sea_orm(has_many = "super::planned_item::Entity")]
    PlannedItem,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
    }
}

impl Related<super::planned_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlannedItem.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
