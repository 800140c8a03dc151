use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::account;

/// Category of a recurring income expectation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(15))")]
#[serde(rename_all = "lowercase")]
pub enum IncomeCategory {
    #[sea_orm(string_value = "salary")]
    Salary,
    #[sea_orm(string_value = "scholarship")]
    Scholarship,
    #[sea_orm(string_value = "allowance")]
    Allowance,
    #[sea_orm(string_value = "rental")]
    Rental,
    #[sea_orm(string_value = "other")]
    Other,
}

/// A recurring income expectation, like a salary or a scholarship.
///
/// This is an expectation, not a scheduled transaction: recording a payment
/// against it is statistics-only and never touches the ledger.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "regular_incomes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub account_id: i32,
    pub name: String,
    pub category: IncomeCategory,
    /// Expected value of each occurrence. Positive.
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub amount: Decimal,
    pub currency_code: String,
    /// Day of month the income is expected on, 1 to 31.
    pub expected_day: i32,
    pub description: String,
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

impl Model {
    /// Expected date within a given month, with the day clamped to the
    /// month's last day (expected_day 31 resolves to Feb 28/29).
    pub fn expected_date_for_month(&self, year: i32, month: u32) -> NaiveDate {
        clamped_day_of_month(year, month, self.expected_day as u32)
    }
}

/// Resolve a day-of-month against a concrete month, clamping past its end.
pub fn clamped_day_of_month(year: i32, month: u32, day: u32) -> NaiveDate {
    let day = day.min(days_in_month(year, month));
    // Unreachable fallback: day >= 1 is validated at construction time.
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 1).expect("valid month"))
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1).expect("valid month");
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1).expect("valid month")
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1).expect("valid month")
    };
    next.signed_duration_since(first).num_days() as u32
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
    #[sea_orm(has_many = "super::income_payment::Entity")]
    IncomePayment,
}

impl Related<account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::income_payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IncomePayment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    fn salary(expected_day: i32) -> Model {
        Model {
            id: 1,
            account_id: 1,
            name: "Salary".to_string(),
            category: IncomeCategory::Salary,
            amount: Decimal::new(300000, 1), // 30000.0
            currency_code: "TRY".to_string(),
            expected_day,
            description: String::new(),
            is_active: true,
            created_at: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    #[test]
    fn expected_day_is_clamped_to_leap_february() {
        let date = salary(31).expected_date_for_month(2024, 2);
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn expected_day_is_clamped_to_short_february() {
        let date = salary(31).expected_date_for_month(2023, 2);
        assert_eq!(date, NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
    }

    #[test]
    fn expected_day_within_month_is_untouched() {
        let date = salary(15).expected_date_for_month(2024, 2);
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 15).unwrap());
    }

    #[test]
    fn december_rolls_into_next_year_when_counting_days() {
        let date = salary(31).expected_date_for_month(2024, 12);
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }
}
