use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{account, regular_income::clamped_day_of_month};

/// Category of a recurring expense expectation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(15))")]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    #[sea_orm(string_value = "rent")]
    Rent,
    #[sea_orm(string_value = "utilities")]
    Utilities,
    #[sea_orm(string_value = "subscription")]
    Subscription,
    #[sea_orm(string_value = "insurance")]
    Insurance,
    #[sea_orm(string_value = "other")]
    Other,
}

/// A recurring expense expectation, like rent or a subscription.
/// Structurally parallel to `regular_income` but tracked separately.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "regular_expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub account_id: i32,
    pub name: String,
    pub category: ExpenseCategory,
    /// Expected value of each occurrence. Positive.
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub amount: Decimal,
    pub currency_code: String,
    /// Day of month the expense is due on, 1 to 31.
    pub expected_day: i32,
    pub description: String,
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

impl Model {
    /// Due date within a given month, with the day clamped to the month's
    /// last day.
    pub fn expected_date_for_month(&self, year: i32, month: u32) -> NaiveDate {
        clamped_day_of_month(year, month, self.expected_day as u32)
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
    /// Recorded payments; removed together with their definition.
    #[sea_orm(has_many = "super::expense_payment::Entity")]
    ExpensePayment,
}

impl Related<account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::expense_payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpensePayment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
