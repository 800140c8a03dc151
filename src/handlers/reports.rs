use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{Datelike, Duration, NaiveDate, Utc};
use compute::reporting;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};
use utoipa::{IntoParams, ToSchema};

use super::error_status;
use super::planned_items::PlannedItemResponse;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Total assets response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TotalAssetsResponse {
    /// Sum of all account balances in the base currency
    pub total: f64,
    /// The base currency the total is expressed in
    pub currency_code: String,
}

/// Income/expense summary response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SummaryResponse {
    /// Lifetime income total in the base currency
    pub income: f64,
    /// Lifetime expense total in the base currency
    pub expense: f64,
    /// income - expense
    pub net: f64,
    /// The base currency the totals are expressed in
    pub currency_code: String,
}

/// Weekly spending response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WeeklySpendingResponse {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    /// Expense totals per weekday, Monday first
    pub daily_totals: Vec<f64>,
    pub weekly_total: f64,
    /// Weekly total divided by the elapsed days of the week; 0 for a week
    /// entirely in the future
    pub daily_average: f64,
    /// The base currency the totals are expressed in
    pub currency_code: String,
}

/// Query parameters for the weekly spending report
#[derive(Debug, Deserialize, IntoParams)]
pub struct WeeklySpendingQuery {
    /// Monday of the week to report on; defaults to the current week
    pub week_start: Option<NaiveDate>,
}

/// Query parameters for the upcoming payments report
#[derive(Debug, Deserialize, IntoParams)]
pub struct UpcomingPaymentsQuery {
    /// How many days ahead to look; defaults to the configured horizon
    pub days: Option<i64>,
}

/// Get total assets across all accounts in the base currency
#[utoipa::path(
    get,
    path = "/api/v1/reports/total-assets",
    tag = "reports",
    responses(
        (status = 200, description = "Total assets computed successfully", body = ApiResponse<TotalAssetsResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_total_assets(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<TotalAssetsResponse>>, StatusCode> {
    trace!("Entering get_total_assets function");

    match reporting::total_assets_in_base(&state.db, &state.rates).await {
        Ok(total) => {
            debug!("Total assets: {} {}", total, state.rates.base());
            let response = ApiResponse {
                data: TotalAssetsResponse {
                    total,
                    currency_code: state.rates.base().to_string(),
                },
                message: "Total assets computed successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(err) => Err(error_status("get_total_assets", &err)),
    }
}

/// Get lifetime income and expense totals in the base currency
#[utoipa::path(
    get,
    path = "/api/v1/reports/summary",
    tag = "reports",
    responses(
        (status = 200, description = "Summary computed successfully", body = ApiResponse<SummaryResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_summary(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SummaryResponse>>, StatusCode> {
    trace!("Entering get_summary function");

    match reporting::transaction_summary(&state.db, &state.rates).await {
        Ok(summary) => {
            let response = ApiResponse {
                data: SummaryResponse {
                    income: summary.income,
                    expense: summary.expense,
                    net: summary.net(),
                    currency_code: state.rates.base().to_string(),
                },
                message: "Summary computed successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(err) => Err(error_status("get_summary", &err)),
    }
}

/// Get expense totals for one week, bucketed by weekday
#[utoipa::path(
    get,
    path = "/api/v1/reports/weekly-spending",
    tag = "reports",
    params(WeeklySpendingQuery),
    responses(
        (status = 200, description = "Weekly spending computed successfully", body = ApiResponse<WeeklySpendingResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_weekly_spending(
    Query(query): Query<WeeklySpendingQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<WeeklySpendingResponse>>, StatusCode> {
    trace!("Entering get_weekly_spending function");

    let today = Utc::now().date_naive();
    let week_start = query.week_start.unwrap_or_else(|| {
        today - Duration::days(today.weekday().num_days_from_monday() as i64)
    });

    match reporting::weekly_spending(&state.db, &state.rates, week_start, today).await {
        Ok(report) => {
            let response = ApiResponse {
                data: WeeklySpendingResponse {
                    week_start: report.week_start,
                    week_end: report.week_end,
                    daily_totals: report.daily_totals,
                    weekly_total: report.weekly_total,
                    daily_average: report.daily_average,
                    currency_code: state.rates.base().to_string(),
                },
                message: "Weekly spending computed successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(err) => Err(error_status("get_weekly_spending", &err)),
    }
}

/// Get planned items due within the horizon, overdue ones included
#[utoipa::path(
    get,
    path = "/api/v1/reports/upcoming-payments",
    tag = "reports",
    params(UpcomingPaymentsQuery),
    responses(
        (status = 200, description = "Upcoming payments retrieved successfully", body = ApiResponse<Vec<PlannedItemResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_upcoming_payments(
    Query(query): Query<UpcomingPaymentsQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PlannedItemResponse>>>, StatusCode> {
    trace!("Entering get_upcoming_payments function");

    let today = Utc::now().date_naive();
    let days = query.days.unwrap_or(state.upcoming_days);

    match reporting::upcoming_payments(&state.db, today, days).await {
        Ok(items) => {
            debug!("{} planned items due within {} days", items.len(), days);
            let response = ApiResponse {
                data: items
                    .into_iter()
                    .map(|item| PlannedItemResponse::new(item, today))
                    .collect(),
                message: "Upcoming payments retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(err) => Err(error_status("get_upcoming_payments", &err)),
    }
}
