use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::regular_expense;

/// A payment actually made against a recurring expense.
/// Structurally parallel to `income_payment`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expense_payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub regular_expense_id: i32,
    pub expected_date: NaiveDate,
    pub actual_date: NaiveDate,
    /// Amount actually paid; may differ from the expected amount.
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub amount: Decimal,
    pub currency_code: String,
    /// actual_date - expected_date; negative = early, positive = late.
    pub delay_days: i32,
    pub notes: String,
    pub created_at: NaiveDateTime,
}

impl Model {
    pub fn is_early(&self) -> bool {
        self.delay_days < 0
    }

    pub fn is_on_time(&self) -> bool {
        self.delay_days == 0
    }

    pub fn is_late(&self) -> bool {
        self.delay_days > 0
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "regular_expense::Entity",
        from = "Column::RegularExpenseId",
        to = "regular_expense::Column::Id",
        on_delete = "Cascade"
    )]
    RegularExpense,
}

impl Related<regular_expense::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RegularExpense.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
