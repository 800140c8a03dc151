use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{Datelike, NaiveDate, Utc};
use compute::recurring::{self, RegularExpenseDraft, DEFAULT_PAYMENT_HISTORY};
use model::entities::regular_expense::{self, ExpenseCategory};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};

use super::error_status;
use super::payments::{PaymentRequest, PaymentResponse, PaymentStatsResponse};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for creating or replacing a recurring expense
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegularExpenseRequest {
    /// Paying account ID
    pub account_id: i32,
    /// Definition name, e.g. "Rent"
    pub name: String,
    /// Category: "rent", "utilities", "subscription", "insurance" or "other"
    #[schema(value_type = String)]
    pub category: ExpenseCategory,
    /// Expected amount per occurrence
    pub amount: Decimal,
    /// Currency of the expected amount
    pub currency_code: String,
    /// Day of month the expense is due on (1-31, clamped to month end)
    pub expected_day: i32,
    /// Definition description
    pub description: Option<String>,
    /// Whether the definition is active (default: true)
    pub is_active: Option<bool>,
}

impl RegularExpenseRequest {
    fn into_draft(self) -> RegularExpenseDraft {
        RegularExpenseDraft {
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

/// Recurring expense response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegularExpenseResponse {
    pub id: i32,
    pub account_id: i32,
    pub name: String,
    #[schema(value_type = String)]
    pub category: ExpenseCategory,
    pub amount: Decimal,
    pub currency_code: String,
    pub expected_day: i32,
    pub description: String,
    pub is_active: bool,
    /// Concrete due date within the current month, day clamped to month end
    pub expected_date_this_month: NaiveDate,
}

impl RegularExpenseResponse {
    fn new(model: regular_expense::Model, today: NaiveDate) -> Self {
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

/// Query parameters for listing recurring expenses
#[derive(Debug, Deserialize, IntoParams)]
pub struct RegularExpenseListQuery {
    /// Only active definitions
    pub active_only: Option<bool>,
}

/// Query parameters for payment history
#[derive(Debug, Deserialize, IntoParams)]
pub struct ExpensePaymentHistoryQuery {
    /// Maximum number of payments to return (default: 12)
    pub limit: Option<u64>,
}

/// Create a new recurring expense definition
#[utoipa::path(
    post,
    path = "/api/v1/regular-expenses",
    tag = "regular-expenses",
    request_body = RegularExpenseRequest,
    responses(
        (status = 201, description = "Recurring expense created successfully", body = ApiResponse<RegularExpenseResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_regular_expense(
    State(state): State<AppState>,
    Json(request): Json<RegularExpenseRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RegularExpenseResponse>>), StatusCode> {
    trace!("Entering create_regular_expense function");
    debug!(
        "Creating recurring expense '{}' for account {}",
        request.name, request.account_id
    );

    match recurring::create_regular_expense(&state.db, &state.rates, request.into_draft()).await {
        Ok(expense) => {
            info!("Recurring expense created successfully with ID: {}", expense.id);
            let response = ApiResponse {
                data: RegularExpenseResponse::new(expense, Utc::now().date_naive()),
                message: "Recurring expense created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(err) => Err(error_status("create_regular_expense", &err)),
    }
}

/// Get recurring expense definitions, ordered by expected day
#[utoipa::path(
    get,
    path = "/api/v1/regular-expenses",
    tag = "regular-expenses",
    params(RegularExpenseListQuery),
    responses(
        (status = 200, description = "Recurring expenses retrieved successfully", body = ApiResponse<Vec<RegularExpenseResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_regular_expenses(
    Query(query): Query<RegularExpenseListQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RegularExpenseResponse>>>, StatusCode> {
    trace!("Entering get_regular_expenses function");

    let mut select =
        regular_expense::Entity::find().order_by_asc(regular_expense::Column::ExpectedDay);
    if query.active_only.unwrap_or(false) {
        select = select.filter(regular_expense::Column::IsActive.eq(true));
    }

    match select.all(&state.db).await {
        Ok(expenses) => {
            debug!("Retrieved {} recurring expenses", expenses.len());
            let today = Utc::now().date_naive();
            let response = ApiResponse {
                data: expenses
                    .into_iter()
                    .map(|expense| RegularExpenseResponse::new(expense, today))
                    .collect(),
                message: "Recurring expenses retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to retrieve recurring expenses: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get active recurring expenses without a payment expected this month
#[utoipa::path(
    get,
    path = "/api/v1/regular-expenses/pending",
    tag = "regular-expenses",
    responses(
        (status = 200, description = "Pending recurring expenses retrieved successfully", body = ApiResponse<Vec<RegularExpenseResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_pending_expenses(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RegularExpenseResponse>>>, StatusCode> {
    trace!("Entering get_pending_expenses function");
    let today = Utc::now().date_naive();

    match recurring::pending_expenses_this_month(&state.db, today).await {
        Ok(expenses) => {
            debug!("{} recurring expenses pending this month", expenses.len());
            let response = ApiResponse {
                data: expenses
                    .into_iter()
                    .map(|expense| RegularExpenseResponse::new(expense, today))
                    .collect(),
                message: "Pending recurring expenses retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(err) => Err(error_status("get_pending_expenses", &err)),
    }
}

/// Get a specific recurring expense by ID
#[utoipa::path(
    get,
    path = "/api/v1/regular-expenses/{expense_id}",
    tag = "regular-expenses",
    params(
        ("expense_id" = i32, Path, description = "Recurring expense ID"),
    ),
    responses(
        (status = 200, description = "Recurring expense retrieved successfully", body = ApiResponse<RegularExpenseResponse>),
        (status = 404, description = "Recurring expense not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_regular_expense(
    Path(expense_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<RegularExpenseResponse>>, StatusCode> {
    trace!("Entering get_regular_expense function for expense_id: {}", expense_id);

    match regular_expense::Entity::find_by_id(expense_id).one(&state.db).await {
        Ok(Some(expense)) => {
            let response = ApiResponse {
                data: RegularExpenseResponse::new(expense, Utc::now().date_naive()),
                message: "Recurring expense retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("Recurring expense with ID {} not found", expense_id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(db_error) => {
            error!("Failed to retrieve recurring expense {}: {}", expense_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Replace a recurring expense definition
#[utoipa::path(
    put,
    path = "/api/v1/regular-expenses/{expense_id}",
    tag = "regular-expenses",
    params(
        ("expense_id" = i32, Path, description = "Recurring expense ID"),
    ),
    request_body = RegularExpenseRequest,
    responses(
        (status = 200, description = "Recurring expense updated successfully", body = ApiResponse<RegularExpenseResponse>),
        (status = 404, description = "Recurring expense not found", body = ErrorResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_regular_expense(
    Path(expense_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<RegularExpenseRequest>,
) -> Result<Json<ApiResponse<RegularExpenseResponse>>, StatusCode> {
    trace!("Entering update_regular_expense function for expense_id: {}", expense_id);

    match recurring::update_regular_expense(
        &state.db,
        &state.rates,
        expense_id,
        request.into_draft(),
    )
    .await
    {
        Ok(expense) => {
            info!("Recurring expense with ID {} updated successfully", expense_id);
            let response = ApiResponse {
                data: RegularExpenseResponse::new(expense, Utc::now().date_naive()),
                message: "Recurring expense updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(err) => Err(error_status("update_regular_expense", &err)),
    }
}

/// Delete a recurring expense and its payment history
#[utoipa::path(
    delete,
    path = "/api/v1/regular-expenses/{expense_id}",
    tag = "regular-expenses",
    params(
        ("expense_id" = i32, Path, description = "Recurring expense ID"),
    ),
    responses(
        (status = 200, description = "Recurring expense deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Recurring expense not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_regular_expense(
    Path(expense_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    trace!("Entering delete_regular_expense function for expense_id: {}", expense_id);

    match recurring::delete_regular_expense(&state.db, expense_id).await {
        Ok(()) => {
            info!("Recurring expense with ID {} deleted successfully", expense_id);
            let response = ApiResponse {
                data: format!("Recurring expense {} deleted", expense_id),
                message: "Recurring expense deleted successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(err) => Err(error_status("delete_regular_expense", &err)),
    }
}

/// Record a completed payment; statistics only, the ledger is untouched
#[utoipa::path(
    post,
    path = "/api/v1/regular-expenses/{expense_id}/payments",
    tag = "regular-expenses",
    params(
        ("expense_id" = i32, Path, description = "Recurring expense ID"),
    ),
    request_body = PaymentRequest,
    responses(
        (status = 201, description = "Payment recorded successfully", body = ApiResponse<PaymentResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Recurring expense not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn record_expense_payment(
    Path(expense_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<PaymentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PaymentResponse>>), StatusCode> {
    trace!("Entering record_expense_payment function for expense_id: {}", expense_id);

    match recurring::record_expense_payment(
        &state.db,
        &state.rates,
        expense_id,
        request.into_draft(),
    )
    .await
    {
        Ok(payment) => {
            info!(
                "Payment recorded for recurring expense {} with delay {} days",
                expense_id, payment.delay_days
            );
            let response = ApiResponse {
                data: PaymentResponse::from(payment),
                message: "Payment recorded successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(err) => Err(error_status("record_expense_payment", &err)),
    }
}

/// Get a recurring expense's payment history, most recent first
#[utoipa::path(
    get,
    path = "/api/v1/regular-expenses/{expense_id}/payments",
    tag = "regular-expenses",
    params(
        ("expense_id" = i32, Path, description = "Recurring expense ID"),
        ExpensePaymentHistoryQuery,
    ),
    responses(
        (status = 200, description = "Payments retrieved successfully", body = ApiResponse<Vec<PaymentResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_expense_payments(
    Path(expense_id): Path<i32>,
    Query(query): Query<ExpensePaymentHistoryQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PaymentResponse>>>, StatusCode> {
    trace!("Entering get_expense_payments function for expense_id: {}", expense_id);

    let limit = query.limit.unwrap_or(DEFAULT_PAYMENT_HISTORY);
    match recurring::expense_payments(&state.db, expense_id, limit).await {
        Ok(payments) => {
            debug!("Retrieved {} payments for recurring expense {}", payments.len(), expense_id);
            let response = ApiResponse {
                data: payments.into_iter().map(PaymentResponse::from).collect(),
                message: "Payments retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(err) => Err(error_status("get_expense_payments", &err)),
    }
}

/// Get delay statistics for a recurring expense
#[utoipa::path(
    get,
    path = "/api/v1/regular-expenses/{expense_id}/stats",
    tag = "regular-expenses",
    params(
        ("expense_id" = i32, Path, description = "Recurring expense ID"),
    ),
    responses(
        (status = 200, description = "Statistics retrieved successfully", body = ApiResponse<PaymentStatsResponse>),
        (status = 404, description = "Recurring expense not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_expense_stats(
    Path(expense_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PaymentStatsResponse>>, StatusCode> {
    trace!("Entering get_expense_stats function for expense_id: {}", expense_id);

    match recurring::expense_delay_stats(&state.db, expense_id).await {
        Ok(stats) => {
            let response = ApiResponse {
                data: PaymentStatsResponse::from(stats),
                message: "Statistics retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(err) => Err(error_status("get_expense_stats", &err)),
    }
}
