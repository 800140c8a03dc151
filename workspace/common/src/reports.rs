use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Income and expense totals over the full ledger, normalized to the base
/// currency. Amounts are carried as `f64` end to end; display rounding is a
/// presentation concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TransactionSummary {
    /// Sum of all income transactions in base currency.
    pub income: f64,
    /// Sum of all expense transactions in base currency.
    pub expense: f64,
}

impl TransactionSummary {
    /// Net cash flow over the whole ledger (income minus expense).
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

/// Expense breakdown for one calendar week, bucketed by weekday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WeeklySpending {
    /// Monday of the reported week.
    pub week_start: NaiveDate,
    /// Sunday of the reported week.
    pub week_end: NaiveDate,
    /// Expense totals per weekday in base currency, index 0 = Monday.
    pub daily_totals: Vec<f64>,
    /// Sum of `daily_totals`.
    pub weekly_total: f64,
    /// `weekly_total` divided by the number of elapsed days in the week;
    /// 0.0 for a week entirely in the future.
    pub daily_average: f64,
}

/// Payment-delay statistics for one recurring income or expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PaymentStats {
    /// Number of recorded payments.
    pub payment_count: u64,
    /// Arithmetic mean of delay days; negative means payments tend to arrive
    /// early. 0.0 when no payments have been recorded.
    pub average_delay_days: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_net() {
        let summary = TransactionSummary {
            income: 5000.0,
            expense: 1200.5,
        };
        assert_eq!(summary.net(), 3799.5);
    }

    #[test]
    fn weekly_spending_round_trips_through_json() {
        let spending = WeeklySpending {
            week_start: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            week_end: NaiveDate::from_ymd_opt(2024, 6, 9).unwrap(),
            daily_totals: vec![0.0, 150.0, 0.0, 42.5, 0.0, 0.0, 0.0],
            weekly_total: 192.5,
            daily_average: 27.5,
        };

        let json = serde_json::to_string(&spending).unwrap();
        let back: WeeklySpending = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spending);
    }
}
