//! Request/response shapes shared by the income and expense payment
//! endpoints.

use chrono::{NaiveDate, Utc};
use common::PaymentStats;
use compute::recurring::PaymentDraft;
use model::entities::{expense_payment, income_payment};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for recording a payment against a recurring definition
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PaymentRequest {
    /// The date the payment was expected
    pub expected_date: NaiveDate,
    /// The date it actually happened; defaults to today
    pub actual_date: Option<NaiveDate>,
    /// Amount actually paid or received
    pub amount: Decimal,
    /// Currency of the amount
    pub currency_code: String,
    /// Free-text notes
    pub notes: Option<String>,
}

impl PaymentRequest {
    pub fn into_draft(self) -> PaymentDraft {
        PaymentDraft {
            expected_date: self.expected_date,
            actual_date: self.actual_date.unwrap_or_else(|| Utc::now().date_naive()),
            amount: self.amount,
            currency_code: self.currency_code,
            notes: self.notes.unwrap_or_default(),
        }
    }
}

/// Recorded payment response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    pub id: i32,
    pub expected_date: NaiveDate,
    pub actual_date: NaiveDate,
    pub amount: Decimal,
    pub currency_code: String,
    /// actual_date - expected_date; negative = early, positive = late
    pub delay_days: i32,
    pub notes: String,
}

impl From<income_payment::Model> for PaymentResponse {
    fn from(model: income_payment::Model) -> Self {
        Self {
            id: model.id,
            expected_date: model.expected_date,
            actual_date: model.actual_date,
            amount: model.amount,
            currency_code: model.currency_code,
            delay_days: model.delay_days,
            notes: model.notes,
        }
    }
}

impl From<expense_payment::Model> for PaymentResponse {
    fn from(model: expense_payment::Model) -> Self {
        Self {
            id: model.id,
            expected_date: model.expected_date,
            actual_date: model.actual_date,
            amount: model.amount,
            currency_code: model.currency_code,
            delay_days: model.delay_days,
            notes: model.notes,
        }
    }
}

/// Payment delay statistics response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentStatsResponse {
    /// Number of recorded payments
    pub payment_count: u64,
    /// Arithmetic mean of the stored delays; 0 when no payments exist
    pub average_delay_days: f64,
}

impl From<PaymentStats> for PaymentStatsResponse {
    fn from(stats: PaymentStats) -> Self {
        Self {
            payment_count: stats.payment_count,
            average_delay_days: stats.average_delay_days,
        }
    }
}
