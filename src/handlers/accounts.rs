use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::NaiveDateTime;
use compute::ledger::{self, AccountDraft};
use model::entities::account::{self, AccountKind};
use rust_decimal::Decimal;
use sea_orm::EntityTrait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

use super::error_status;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for creating a new account
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateAccountRequest {
    /// Account name
    pub name: String,
    /// Account kind: "cash" or "bank"
    #[schema(value_type = String)]
    pub kind: AccountKind,
    /// Currency code from the supported set (e.g., "TRY", "USD", "EUR")
    pub currency_code: String,
    /// Opening balance (default: 0)
    pub initial_balance: Option<Decimal>,
    /// Account description
    pub description: Option<String>,
}

/// Request body for updating an account; omitted fields keep their value
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateAccountRequest {
    /// Account name
    pub name: Option<String>,
    /// Account kind: "cash" or "bank"
    #[schema(value_type = Option<String>)]
    pub kind: Option<AccountKind>,
    /// Currency code; changing it relabels the account without converting
    /// the stored balance
    pub currency_code: Option<String>,
    /// Balance override
    pub balance: Option<Decimal>,
    /// Account description
    pub description: Option<String>,
}

/// Account response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountResponse {
    pub id: i32,
    pub name: String,
    #[schema(value_type = String)]
    pub kind: AccountKind,
    pub currency_code: String,
    pub balance: Decimal,
    pub description: Option<String>,
    #[schema(value_type = String)]
    pub created_at: NaiveDateTime,
    #[schema(value_type = String)]
    pub updated_at: NaiveDateTime,
}

impl From<account::Model> for AccountResponse {
    fn from(model: account::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            kind: model.kind,
            currency_code: model.currency_code,
            balance: model.balance,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Create a new account
#[utoipa::path(
    post,
    path = "/api/v1/accounts",
    tag = "accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created successfully", body = ApiResponse<AccountResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_account(
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AccountResponse>>), StatusCode> {
    trace!("Entering create_account function");
    debug!(
        "Creating account with name: {}, currency: {}",
        request.name, request.currency_code
    );

    let draft = AccountDraft {
        name: request.name,
        kind: request.kind,
        currency_code: request.currency_code,
        balance: request.initial_balance.unwrap_or(Decimal::ZERO),
        description: request.description,
    };

    match ledger::create_account(&state.db, &state.rates, draft).await {
        Ok(account_model) => {
            info!(
                "Account created successfully with ID: {}, name: {}",
                account_model.id, account_model.name
            );
            let response = ApiResponse {
                data: AccountResponse::from(account_model),
                message: "Account created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(err) => Err(error_status("create_account", &err)),
    }
}

/// Get all accounts
#[utoipa::path(
    get,
    path = "/api/v1/accounts",
    tag = "accounts",
    responses(
        (status = 200, description = "Accounts retrieved successfully", body = ApiResponse<Vec<AccountResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_accounts(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<AccountResponse>>>, StatusCode> {
    trace!("Entering get_accounts function");

    match account::Entity::find().all(&state.db).await {
        Ok(accounts) => {
            debug!("Retrieved {} accounts from database", accounts.len());
            let account_responses: Vec<AccountResponse> =
                accounts.into_iter().map(AccountResponse::from).collect();

            let response = ApiResponse {
                data: account_responses,
                message: "Accounts retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to retrieve accounts from database: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get a specific account by ID
#[utoipa::path(
    get,
    path = "/api/v1/accounts/{account_id}",
    tag = "accounts",
    params(
        ("account_id" = i32, Path, description = "Account ID"),
    ),
    responses(
        (status = 200, description = "Account retrieved successfully", body = ApiResponse<AccountResponse>),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_account(
    Path(account_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<AccountResponse>>, StatusCode> {
    trace!("Entering get_account function for account_id: {}", account_id);

    match account::Entity::find_by_id(account_id).one(&state.db).await {
        Ok(Some(account_model)) => {
            let response = ApiResponse {
                data: AccountResponse::from(account_model),
                message: "Account retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("Account with ID {} not found", account_id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(db_error) => {
            error!("Failed to retrieve account with ID {}: {}", account_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Update an account
#[utoipa::path(
    put,
    path = "/api/v1/accounts/{account_id}",
    tag = "accounts",
    params(
        ("account_id" = i32, Path, description = "Account ID"),
    ),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Account updated successfully", body = ApiResponse<AccountResponse>),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_account(
    Path(account_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateAccountRequest>,
) -> Result<Json<ApiResponse<AccountResponse>>, StatusCode> {
    trace!("Entering update_account function for account_id: {}", account_id);

    let existing = match account::Entity::find_by_id(account_id).one(&state.db).await {
        Ok(Some(account)) => account,
        Ok(None) => {
            warn!("Account with ID {} not found for update", account_id);
            return Err(StatusCode::NOT_FOUND);
        }
        Err(db_error) => {
            error!("Failed to lookup account with ID {}: {}", account_id, db_error);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let draft = AccountDraft {
        name: request.name.unwrap_or(existing.name),
        kind: request.kind.unwrap_or(existing.kind),
        currency_code: request.currency_code.unwrap_or(existing.currency_code),
        balance: request.balance.unwrap_or(existing.balance),
        description: request.description.or(existing.description),
    };

    match ledger::update_account(&state.db, &state.rates, account_id, draft).await {
        Ok(updated_account) => {
            info!("Account with ID {} updated successfully", account_id);
            let response = ApiResponse {
                data: AccountResponse::from(updated_account),
                message: "Account updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(err) => Err(error_status("update_account", &err)),
    }
}

/// Delete an account and everything it owns
#[utoipa::path(
    delete,
    path = "/api/v1/accounts/{account_id}",
    tag = "accounts",
    params(
        ("account_id" = i32, Path, description = "Account ID"),
    ),
    responses(
        (status = 200, description = "Account deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_account(
    Path(account_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    trace!("Entering delete_account function for account_id: {}", account_id);

    match ledger::delete_account(&state.db, account_id).await {
        Ok(()) => {
            info!("Account with ID {} deleted successfully", account_id);
            let response = ApiResponse {
                data: format!("Account {} deleted", account_id),
                message: "Account deleted successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(err) => Err(error_status("delete_account", &err)),
    }
}
