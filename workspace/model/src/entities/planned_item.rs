use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{account, transaction::TransactionKind};

/// How often a recurring planned item is expected to repeat.
///
/// Recorded for display only; the planning engine never auto-expands a
/// recurring item into multiple occurrences.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "lowercase")]
pub enum RecurrencePeriod {
    #[sea_orm(string_value = "daily")]
    Daily,
    #[sea_orm(string_value = "weekly")]
    Weekly,
    #[sea_orm(string_value = "monthly")]
    Monthly,
    #[sea_orm(string_value = "yearly")]
    Yearly,
}

/// A future income or expense the user expects to happen.
///
/// A planned item never affects an account balance while pending. It leaves
/// the system either by explicit deletion or by realization, which converts
/// it into a real transaction and deletes it.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "planned_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub account_id: i32,
    pub kind: TransactionKind,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub amount: Decimal,
    pub currency_code: String,
    pub category: String,
    pub description: String,
    /// May lie in the past; such items are overdue but are never acted on
    /// automatically.
    pub planned_date: NaiveDate,
    #[sea_orm(default_value = "false")]
    pub is_recurring: bool,
    pub recurrence_period: Option<RecurrencePeriod>,
    pub created_at: NaiveDateTime,
}

impl Model {
    /// Whether the planned date has passed. Informational only.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.planned_date < today
    }

    /// Days from `today` until the planned date; negative when overdue.
    pub fn days_until(&self, today: NaiveDate) -> i64 {
        (self.planned_date - today).num_days()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "account::Entity",
        from = "Column::AccountId",
        to = "account::Column::Id",
        on_delete = "Cascade"
    )]
    Account,
}

impl Related<account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
