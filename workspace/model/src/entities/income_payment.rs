use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::regular_income;

/// A payment actually received against a recurring income.
///
/// `delay_days` is computed once at record time and stored, so the history
/// stays stable even if the date arithmetic ever changes.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "income_payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub regular_income_id: i32,
    pub expected_date: NaiveDate,
    pub actual_date: NaiveDate,
    /// Amount actually received; may differ from the expected amount.
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

/// Delay in days between an expected and an actual payment date.
pub fn delay_between(expected: NaiveDate, actual: NaiveDate) -> i32 {
    (actual - expected).num_days() as i32
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "regular_income::Entity",
        from = "Column::RegularIncomeId",
        to = "regular_income::Column::Id",
        on_delete = "Cascade"
    )]
    RegularIncome,
}

impl Related<regular_income::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RegularIncome.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
