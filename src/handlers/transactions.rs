use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDate, NaiveDateTime};
use compute::ledger::{self, normalize_transaction_to_account_currency, TransactionDraft};
use model::entities::account;
use model::entities::transaction::{self, TransactionKind};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};

use super::error_status;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for creating or replacing a transaction
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct TransactionRequest {
    /// Owning account ID
    pub account_id: i32,
    /// Transaction kind: "income" or "expense"
    #[schema(value_type = String)]
    pub kind: TransactionKind,
    /// Positive amount; the sign is derived from the kind
    pub amount: Decimal,
    /// Currency of the entered amount; defaults to the account's currency.
    /// When it differs, the amount is converted on entry.
    pub currency_code: Option<String>,
    /// Free-text category
    pub category: Option<String>,
    /// Transaction description
    pub description: Option<String>,
    /// Calendar date of the transaction
    pub transaction_date: NaiveDate,
}

/// Transaction response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransactionResponse {
    pub id: i32,
    pub account_id: i32,
    #[schema(value_type = String)]
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub currency_code: String,
    pub category: String,
    pub description: String,
    pub transaction_date: NaiveDate,
    #[schema(value_type = String)]
    pub created_at: NaiveDateTime,
}

impl From<transaction::Model> for TransactionResponse {
    fn from(model: transaction::Model) -> Self {
        Self {
            id: model.id,
            account_id: model.account_id,
            kind: model.kind,
            amount: model.amount,
            currency_code: model.currency_code,
            category: model.category,
            description: model.description,
            transaction_date: model.transaction_date,
            created_at: model.created_at,
        }
    }
}

/// Query parameters for listing transactions
#[derive(Debug, Deserialize, IntoParams)]
pub struct TransactionListQuery {
    /// Restrict to one account
    pub account_id: Option<i32>,
    /// Restrict to one kind: "income" or "expense"
    #[param(value_type = Option<String>)]
    pub kind: Option<TransactionKind>,
    /// Earliest transaction date to include
    pub start_date: Option<NaiveDate>,
    /// Latest transaction date to include
    pub end_date: Option<NaiveDate>,
    /// Return only the N most recent transactions
    pub limit: Option<u64>,
}

async fn prepare_draft(
    state: &AppState,
    request: TransactionRequest,
) -> Result<TransactionDraft, StatusCode> {
    let account = match account::Entity::find_by_id(request.account_id)
        .one(&state.db)
        .await
    {
        Ok(Some(account)) => account,
        Ok(None) => {
            warn!("Account with ID {} not found", request.account_id);
            return Err(StatusCode::NOT_FOUND);
        }
        Err(db_error) => {
            error!(
                "Failed to lookup account with ID {}: {}",
                request.account_id, db_error
            );
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let mut draft = TransactionDraft {
        account_id: request.account_id,
        kind: request.kind,
        amount: request.amount,
        currency_code: request
            .currency_code
            .unwrap_or_else(|| account.currency_code.clone()),
        category: request.category.unwrap_or_default(),
        description: request.description.unwrap_or_default(),
        transaction_date: request.transaction_date,
    };

    // Entry-time normalization into the account's currency.
    if let Err(err) = normalize_transaction_to_account_currency(&mut draft, &account, &state.rates)
    {
        return Err(error_status("normalize_transaction", &err));
    }
    Ok(draft)
}

/// Create a new transaction and apply it to the account balance
#[utoipa::path(
    post,
    path = "/api/v1/transactions",
    tag = "transactions",
    request_body = TransactionRequest,
    responses(
        (status = 201, description = "Transaction created successfully", body = ApiResponse<TransactionResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_transaction(
    State(state): State<AppState>,
    Json(request): Json<TransactionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionResponse>>), StatusCode> {
    trace!("Entering create_transaction function");
    debug!(
        "Creating {:?} transaction of {} for account {}",
        request.kind, request.amount, request.account_id
    );

    let draft = prepare_draft(&state, request).await?;

    match ledger::create_transaction(&state.db, &state.rates, draft).await {
        Ok(transaction_model) => {
            info!(
                "Transaction created successfully with ID: {}",
                transaction_model.id
            );
            let response = ApiResponse {
                data: TransactionResponse::from(transaction_model),
                message: "Transaction created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(err) => Err(error_status("create_transaction", &err)),
    }
}

/// Get transactions, most recent first
#[utoipa::path(
    get,
    path = "/api/v1/transactions",
    tag = "transactions",
    params(TransactionListQuery),
    responses(
        (status = 200, description = "Transactions retrieved successfully", body = ApiResponse<Vec<TransactionResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_transactions(
    Query(query): Query<TransactionListQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TransactionResponse>>>, StatusCode> {
    trace!("Entering get_transactions function");

    let mut select = transaction::Entity::find()
        .order_by_desc(transaction::Column::TransactionDate)
        .order_by_desc(transaction::Column::Id);

    if let Some(account_id) = query.account_id {
        select = select.filter(transaction::Column::AccountId.eq(account_id));
    }
    if let Some(kind) = query.kind {
        select = select.filter(transaction::Column::Kind.eq(kind));
    }
    if let Some(start) = query.start_date {
        select = select.filter(transaction::Column::TransactionDate.gte(start));
    }
    if let Some(end) = query.end_date {
        select = select.filter(transaction::Column::TransactionDate.lte(end));
    }
    if let Some(limit) = query.limit {
        select = select.limit(limit);
    }

    match select.all(&state.db).await {
        Ok(transactions) => {
            debug!("Retrieved {} transactions", transactions.len());
            let response = ApiResponse {
                data: transactions
                    .into_iter()
                    .map(TransactionResponse::from)
                    .collect(),
                message: "Transactions retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to retrieve transactions: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get a specific transaction by ID
#[utoipa::path(
    get,
    path = "/api/v1/transactions/{transaction_id}",
    tag = "transactions",
    params(
        ("transaction_id" = i32, Path, description = "Transaction ID"),
    ),
    responses(
        (status = 200, description = "Transaction retrieved successfully", body = ApiResponse<TransactionResponse>),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_transaction(
    Path(transaction_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<TransactionResponse>>, StatusCode> {
    trace!(
        "Entering get_transaction function for transaction_id: {}",
        transaction_id
    );

    match transaction::Entity::find_by_id(transaction_id)
        .one(&state.db)
        .await
    {
        Ok(Some(transaction_model)) => {
            let response = ApiResponse {
                data: TransactionResponse::from(transaction_model),
                message: "Transaction retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("Transaction with ID {} not found", transaction_id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(db_error) => {
            error!(
                "Failed to retrieve transaction with ID {}: {}",
                transaction_id, db_error
            );
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Replace a transaction; the old balance effect is reversed first
#[utoipa::path(
    put,
    path = "/api/v1/transactions/{transaction_id}",
    tag = "transactions",
    params(
        ("transaction_id" = i32, Path, description = "Transaction ID"),
    ),
    request_body = TransactionRequest,
    responses(
        (status = 200, description = "Transaction updated successfully", body = ApiResponse<TransactionResponse>),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_transaction(
    Path(transaction_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<TransactionRequest>,
) -> Result<Json<ApiResponse<TransactionResponse>>, StatusCode> {
    trace!(
        "Entering update_transaction function for transaction_id: {}",
        transaction_id
    );

    let draft = prepare_draft(&state, request).await?;

    match ledger::update_transaction(&state.db, &state.rates, transaction_id, draft).await {
        Ok(transaction_model) => {
            info!("Transaction with ID {} updated successfully", transaction_id);
            let response = ApiResponse {
                data: TransactionResponse::from(transaction_model),
                message: "Transaction updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(err) => Err(error_status("update_transaction", &err)),
    }
}

/// Delete a transaction and back its effect out of the balance
#[utoipa::path(
    delete,
    path = "/api/v1/transactions/{transaction_id}",
    tag = "transactions",
    params(
        ("transaction_id" = i32, Path, description = "Transaction ID"),
    ),
    responses(
        (status = 200, description = "Transaction deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_transaction(
    Path(transaction_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    trace!(
        "Entering delete_transaction function for transaction_id: {}",
        transaction_id
    );

    match ledger::delete_transaction(&state.db, transaction_id).await {
        Ok(()) => {
            info!("Transaction with ID {} deleted successfully", transaction_id);
            let response = ApiResponse {
                data: format!("Transaction {} deleted", transaction_id),
                message: "Transaction deleted successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(err) => Err(error_status("delete_transaction", &err)),
    }
}

/// Get all transactions of one account, most recent first
#[utoipa::path(
    get,
    path = "/api/v1/accounts/{account_id}/transactions",
    tag = "transactions",
    params(
        ("account_id" = i32, Path, description = "Account ID"),
    ),
    responses(
        (status = 200, description = "Transactions retrieved successfully", body = ApiResponse<Vec<TransactionResponse>>),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_account_transactions(
    Path(account_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TransactionResponse>>>, StatusCode> {
    trace!(
        "Entering get_account_transactions function for account_id: {}",
        account_id
    );

    match account::Entity::find_by_id(account_id).one(&state.db).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            warn!("Account with ID {} not found", account_id);
            return Err(StatusCode::NOT_FOUND);
        }
        Err(db_error) => {
            error!("Failed to lookup account with ID {}: {}", account_id, db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    match transaction::Entity::find()
        .filter(transaction::Column::AccountId.eq(account_id))
        .order_by_desc(transaction::Column::TransactionDate)
        .order_by_desc(transaction::Column::Id)
        .all(&state.db)
        .await
    {
        Ok(transactions) => {
            let response = ApiResponse {
                data: transactions
                    .into_iter()
                    .map(TransactionResponse::from)
                    .collect(),
                message: "Transactions retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!(
                "Failed to retrieve transactions for account {}: {}",
                account_id, db_error
            );
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
