use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{Datelike, NaiveDate, Utc};
use compute::recurring::{self, RegularIncomeDraft, DEFAULT_PAYMENT_HISTORY};
use model::entities::regular_income::{self, IncomeCategory};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};

use super::error_status;
use super::payments::{PaymentRequest, PaymentResponse, PaymentStatsResponse};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for creating or replacing a recurring income
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegularIncomeRequest {
    /// Receiving account ID
    pub account_id: i32,
    /// Definition name, e.g. "Salary"
    pub name: String,
    /// Category: "salary", "scholarship", "allowance", "rental" or "other"
    #[schema(value_type = String)]
    pub category: IncomeCategory,
    /// Expected amount per occurrence
    pub amount: Decimal,
    /// Currency of the expected amount
    pub currency_code: String,
    /// Day of month the income is expected on (1-31, clamped to month end)
    pub expected_day: i32,
    /// Definition description
    pub description: Option<String>,
    /// Whether the definition is active (default: true)
    pub is_active: Option<bool>,
}

impl RegularIncomeRequest {
    fn into_draft(self) -> RegularIncomeDraft {
        RegularIncomeDraft {
            account_id: self.account_id,
            name: self.name,
            category: self.category,
            amount: self.amount,
            currency_code: self.currency_code,
            expected_day: self.expected_day,
            description: self.description.unwrap_or_default(),
            is_active: self.is_active.unwrap_or(true),
        }
    }
}

/// Recurring income response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegularIncomeResponse {
    pub id: i32,
    pub account_id: i32,
    pub name: String,
    #[schema(value_type = String)]
    pub category: IncomeCategory,
    pub amount: Decimal,
    pub currency_code: String,
    pub expected_day: i32,
    pub description: String,
    pub is_active: bool,
    /// Concrete expected date within the current month, day clamped to
    /// month end
    pub expected_date_this_month: NaiveDate,
}

impl RegularIncomeResponse {
    fn new(model: regular_income::Model, today: NaiveDate) -> Self {
        Self {
            expected_date_this_month: model.expected_date_for_month(today.year(), today.month()),
            id: model.id,
            account_id: model.account_id,
            name: model.name,
            category: model.category,
            amount: model.amount,
            currency_code: model.currency_code,
            expected_day: model.expected_day,
            description: model.description,
            is_active: model.is_active,
        }
    }
}

/// Query parameters for listing recurring incomes
#[derive(Debug, Deserialize, IntoParams)]
pub struct RegularIncomeListQuery {
    /// Only active definitions
    pub active_only: Option<bool>,
}

/// Query parameters for payment history
#[derive(Debug, Deserialize, IntoParams)]
pub struct PaymentHistoryQuery {
    /// Maximum number of payments to return (default: 12)
    pub limit: Option<u64>,
}

/// Create a new recurring income definition
#[utoipa::path(
    post,
    path = "/api/v1/regular-incomes",
    tag = "regular-incomes",
    request_body = RegularIncomeRequest,
    responses(
        (status = 201, description = "Recurring income created successfully", body = ApiResponse<RegularIncomeResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_regular_income(
    State(state): State<AppState>,
    Json(request): Json<RegularIncomeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RegularIncomeResponse>>), StatusCode> {
    trace!("Entering create_regular_income function");
    debug!(
        "Creating recurring income '{}' for account {}",
        request.name, request.account_id
    );

    match recurring::create_regular_income(&state.db, &state.rates, request.into_draft()).await {
        Ok(income) => {
            info!("Recurring income created successfully with ID: {}", income.id);
            let response = ApiResponse {
                data: RegularIncomeResponse::new(income, Utc::now().date_naive()),
                message: "Recurring income created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(err) => Err(error_status("create_regular_income", &err)),
    }
}

/// Get recurring income definitions, ordered by expected day
#[utoipa::path(
    get,
    path = "/api/v1/regular-incomes",
    tag = "regular-incomes",
    params(RegularIncomeListQuery),
    responses(
        (status = 200, description = "Recurring incomes retrieved successfully", body = ApiResponse<Vec<RegularIncomeResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_regular_incomes(
    Query(query): Query<RegularIncomeListQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RegularIncomeResponse>>>, StatusCode> {
    trace!("Entering get_regular_incomes function");

    let mut select =
        regular_income::Entity::find().order_by_asc(regular_income::Column::ExpectedDay);
    if query.active_only.unwrap_or(false) {
        select = select.filter(regular_income::Column::IsActive.eq(true));
    }

    match select.all(&state.db).await {
        Ok(incomes) => {
            debug!("Retrieved {} recurring incomes", incomes.len());
            let today = Utc::now().date_naive();
            let response = ApiResponse {
                data: incomes
                    .into_iter()
                    .map(|income| RegularIncomeResponse::new(income, today))
                    .collect(),
                message: "Recurring incomes retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to retrieve recurring incomes: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get active recurring incomes without a payment expected this month
#[utoipa::path(
    get,
    path = "/api/v1/regular-incomes/pending",
    tag = "regular-incomes",
    responses(
        (status = 200, description = "Pending recurring incomes retrieved successfully", body = ApiResponse<Vec<RegularIncomeResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_pending_incomes(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RegularIncomeResponse>>>, StatusCode> {
    trace!("Entering get_pending_incomes function");
    let today = Utc::now().date_naive();

    match recurring::pending_incomes_this_month(&state.db, today).await {
        Ok(incomes) => {
            debug!("{} recurring incomes pending this month", incomes.len());
            let response = ApiResponse {
                data: incomes
                    .into_iter()
                    .map(|income| RegularIncomeResponse::new(income, today))
                    .collect(),
                message: "Pending recurring incomes retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(err) => Err(error_status("get_pending_incomes", &err)),
    }
}

/// Get a specific recurring income by ID
#[utoipa::path(
    get,
    path = "/api/v1/regular-incomes/{income_id}",
    tag = "regular-incomes",
    params(
        ("income_id" = i32, Path, description = "Recurring income ID"),
    ),
    responses(
        (status = 200, description = "Recurring income retrieved successfully", body = ApiResponse<RegularIncomeResponse>),
        (status = 404, description = "Recurring income not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_regular_income(
    Path(income_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<RegularIncomeResponse>>, StatusCode> {
    trace!("Entering get_regular_income function for income_id: {}", income_id);

    match regular_income::Entity::find_by_id(income_id).one(&state.db).await {
        Ok(Some(income)) => {
            let response = ApiResponse {
                data: RegularIncomeResponse::new(income, Utc::now().date_naive()),
                message: "Recurring income retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("Recurring income with ID {} not found", income_id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(db_error) => {
            error!("Failed to retrieve recurring income {}: {}", income_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Replace a recurring income definition
#[utoipa::path(
    put,
    path = "/api/v1/regular-incomes/{income_id}",
    tag = "regular-incomes",
    params(
        ("income_id" = i32, Path, description = "Recurring income ID"),
    ),
    request_body = RegularIncomeRequest,
    responses(
        (status = 200, description = "Recurring income updated successfully", body = ApiResponse<RegularIncomeResponse>),
        (status = 404, description = "Recurring income not found", body = ErrorResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_regular_income(
    Path(income_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<RegularIncomeRequest>,
) -> Result<Json<ApiResponse<RegularIncomeResponse>>, StatusCode> {
    trace!("Entering update_regular_income function for income_id: {}", income_id);

    match recurring::update_regular_income(&state.db, &state.rates, income_id, request.into_draft())
        .await
    {
        Ok(income) => {
            info!("Recurring income with ID {} updated successfully", income_id);
            let response = ApiResponse {
                data: RegularIncomeResponse::new(income, Utc::now().date_naive()),
                message: "Recurring income updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(err) => Err(error_status("update_regular_income", &err)),
    }
}

/// Delete a recurring income and its payment history
#[utoipa::path(
    delete,
    path = "/api/v1/regular-incomes/{income_id}",
    tag = "regular-incomes",
    params(
        ("income_id" = i32, Path, description = "Recurring income ID"),
    ),
    responses(
        (status = 200, description = "Recurring income deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Recurring income not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_regular_income(
    Path(income_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    trace!("Entering delete_regular_income function for income_id: {}", income_id);

    match recurring::delete_regular_income(&state.db, income_id).await {
        Ok(()) => {
            info!("Recurring income with ID {} deleted successfully", income_id);
            let response = ApiResponse {
                data: format!("Recurring income {} deleted", income_id),
                message: "Recurring income deleted successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(err) => Err(error_status("delete_regular_income", &err)),
    }
}

/// Record a received payment; statistics only, the ledger is untouched
#[utoipa::path(
    post,
    path = "/api/v1/regular-incomes/{income_id}/payments",
    tag = "regular-incomes",
    params(
        ("income_id" = i32, Path, description = "Recurring income ID"),
    ),
    request_body = PaymentRequest,
    responses(
        (status = 201, description = "Payment recorded successfully", body = ApiResponse<PaymentResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Recurring income not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn record_income_payment(
    Path(income_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<PaymentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PaymentResponse>>), StatusCode> {
    trace!("Entering record_income_payment function for income_id: {}", income_id);

    match recurring::record_income_payment(&state.db, &state.rates, income_id, request.into_draft())
        .await
    {
        Ok(payment) => {
            info!(
                "Payment recorded for recurring income {} with delay {} days",
                income_id, payment.delay_days
            );
            let response = ApiResponse {
                data: PaymentResponse::from(payment),
                message: "Payment recorded successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(err) => Err(error_status("record_income_payment", &err)),
    }
}

/// Get a recurring income's payment history, most recent first
#[utoipa::path(
    get,
    path = "/api/v1/regular-incomes/{income_id}/payments",
    tag = "regular-incomes",
    params(
        ("income_id" = i32, Path, description = "Recurring income ID"),
        PaymentHistoryQuery,
    ),
    responses(
        (status = 200, description = "Payments retrieved successfully", body = ApiResponse<Vec<PaymentResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_income_payments(
    Path(income_id): Path<i32>,
    Query(query): Query<PaymentHistoryQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PaymentResponse>>>, StatusCode> {
    trace!("Entering get_income_payments function for income_id: {}", income_id);

    let limit = query.limit.unwrap_or(DEFAULT_PAYMENT_HISTORY);
    match recurring::income_payments(&state.db, income_id, limit).await {
        Ok(payments) => {
            debug!("Retrieved {} payments for recurring income {}", payments.len(), income_id);
            let response = ApiResponse {
                data: payments.into_iter().map(PaymentResponse::from).collect(),
                message: "Payments retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(err) => Err(error_status("get_income_payments", &err)),
    }
}

/// Get delay statistics for a recurring income
#[utoipa::path(
    get,
    path = "/api/v1/regular-incomes/{income_id}/stats",
    tag = "regular-incomes",
    params(
        ("income_id" = i32, Path, description = "Recurring income ID"),
    ),
    responses(
        (status = 200, description = "Statistics retrieved successfully", body = ApiResponse<PaymentStatsResponse>),
        (status = 404, description = "Recurring income not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_income_stats(
    Path(income_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PaymentStatsResponse>>, StatusCode> {
    trace!("Entering get_income_stats function for income_id: {}", income_id);

    match recurring::income_delay_stats(&state.db, income_id).await {
        Ok(stats) => {
            let response = ApiResponse {
                data: PaymentStatsResponse::from(stats),
                message: "Statistics retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(err) => Err(error_status("get_income_stats", &err)),
    }
}
