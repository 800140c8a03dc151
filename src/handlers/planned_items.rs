use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{NaiveDate, Utc};
use compute::planning::{self, PlannedItemDraft};
use model::entities::planned_item::{self, RecurrencePeriod};
use model::entities::transaction::TransactionKind;
use rust_decimal::Decimal;
use sea_orm::{EntityTrait, QueryOrder};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};

use super::error_status;
use super::transactions::TransactionResponse;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Request body for creating or replacing a planned item
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct PlannedItemRequest {
    /// Owning account ID
    pub account_id: i32,
    /// Item kind: "income" or "expense"
    #[schema(value_type = String)]
    pub kind: TransactionKind,
    /// Positive amount; the sign is derived from the kind
    pub amount: Decimal,
    /// Currency of the amount; carried unconverted until realization
    pub currency_code: String,
    /// Free-text category
    pub category: Option<String>,
    /// Item description
    pub description: Option<String>,
    /// The date the item is expected to happen; may lie in the past
    pub planned_date: NaiveDate,
    /// Whether the item represents a repeating expectation
    pub is_recurring: Option<bool>,
    /// Display-only recurrence period: "daily", "weekly", "monthly" or
    /// "yearly"
    #[schema(value_type = Option<String>)]
    pub recurrence_period: Option<RecurrencePeriod>,
}

impl PlannedItemRequest {
    fn into_draft(self) -> PlannedItemDraft {
        PlannedItemDraft {
            account_id: self.account_id,
            kind: self.kind,
            amount: self.amount,
            currency_code: self.currency_code,
            category: self.category.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            planned_date: self.planned_date,
            is_recurring: self.is_recurring.unwrap_or(false),
            recurrence_period: self.recurrence_period,
        }
    }
}

/// Planned item response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlannedItemResponse {
    pub id: i32,
    pub account_id: i32,
    #[schema(value_type = String)]
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub currency_code: String,
    pub category: String,
    pub description: String,
    pub planned_date: NaiveDate,
    pub is_recurring: bool,
    #[schema(value_type = Option<String>)]
    pub recurrence_period: Option<RecurrencePeriod>,
    /// Days from today until the planned date; negative when overdue
    pub days_until: i64,
    pub is_overdue: bool,
}

impl PlannedItemResponse {
    pub(crate) fn new(model: planned_item::Model, today: NaiveDate) -> Self {
        Self {
            days_until: model.days_until(today),
            is_overdue: model.is_overdue(today),
            id: model.id,
            account_id: model.account_id,
            kind: model.kind,
            amount: model.amount,
            currency_code: model.currency_code,
            category: model.category,
            description: model.description,
            planned_date: model.planned_date,
            is_recurring: model.is_recurring,
            recurrence_period: model.recurrence_period,
        }
    }
}

/// Query parameters for listing planned items
#[derive(Debug, Deserialize, IntoParams)]
pub struct PlannedItemListQuery {
    /// Only items due within this many days (overdue ones included)
    pub upcoming_days: Option<i64>,
    /// Only items whose planned date has passed
    pub overdue: Option<bool>,
}

/// Create a new planned item; no balance is touched
#[utoipa::path(
    post,
    path = "/api/v1/planned-items",
    tag = "planned-items",
    request_body = PlannedItemRequest,
    responses(
        (status = 201, description = "Planned item created successfully", body = ApiResponse<PlannedItemResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Account not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_planned_item(
    State(state): State<AppState>,
    Json(request): Json<PlannedItemRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PlannedItemResponse>>), StatusCode> {
    trace!("Entering create_planned_item function");
    debug!(
        "Creating planned {:?} of {} for account {}",
        request.kind, request.amount, request.account_id
    );

    match planning::create_planned_item(&state.db, &state.rates, request.into_draft()).await {
        Ok(item) => {
            info!("Planned item created successfully with ID: {}", item.id);
            let today = Utc::now().date_naive();
            let response = ApiResponse {
                data: PlannedItemResponse::new(item, today),
                message: "Planned item created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(err) => Err(error_status("create_planned_item", &err)),
    }
}

/// Get planned items, soonest first
#[utoipa::path(
    get,
    path = "/api/v1/planned-items",
    tag = "planned-items",
    params(PlannedItemListQuery),
    responses(
        (status = 200, description = "Planned items retrieved successfully", body = ApiResponse<Vec<PlannedItemResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_planned_items(
    Query(query): Query<PlannedItemListQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PlannedItemResponse>>>, StatusCode> {
    trace!("Entering get_planned_items function");
    let today = Utc::now().date_naive();

    let items = if let Some(days) = query.upcoming_days {
        planning::upcoming(&state.db, today, days)
            .await
            .map_err(|err| error_status("get_planned_items", &err))?
    } else if query.overdue.unwrap_or(false) {
        planning::overdue(&state.db, today)
            .await
            .map_err(|err| error_status("get_planned_items", &err))?
    } else {
        match planned_item::Entity::find()
            .order_by_asc(planned_item::Column::PlannedDate)
            .all(&state.db)
            .await
        {
            Ok(items) => items,
            Err(db_error) => {
                error!("Failed to retrieve planned items: {}", db_error);
                return Err(StatusCode::INTERNAL_SERVER_ERROR);
            }
        }
    };

    debug!("Retrieved {} planned items", items.len());
    let response = ApiResponse {
        data: items
            .into_iter()
            .map(|item| PlannedItemResponse::new(item, today))
            .collect(),
        message: "Planned items retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a specific planned item by ID
#[utoipa::path(
    get,
    path = "/api/v1/planned-items/{item_id}",
    tag = "planned-items",
    params(
        ("item_id" = i32, Path, description = "Planned item ID"),
    ),
    responses(
        (status = 200, description = "Planned item retrieved successfully", body = ApiResponse<PlannedItemResponse>),
        (status = 404, description = "Planned item not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_planned_item(
    Path(item_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PlannedItemResponse>>, StatusCode> {
    trace!("Entering get_planned_item function for item_id: {}", item_id);

    match planned_item::Entity::find_by_id(item_id).one(&state.db).await {
        Ok(Some(item)) => {
            let response = ApiResponse {
                data: PlannedItemResponse::new(item, Utc::now().date_naive()),
                message: "Planned item retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("Planned item with ID {} not found", item_id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(db_error) => {
            error!("Failed to retrieve planned item {}: {}", item_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Replace a planned item
#[utoipa::path(
    put,
    path = "/api/v1/planned-items/{item_id}",
    tag = "planned-items",
    params(
        ("item_id" = i32, Path, description = "Planned item ID"),
    ),
    request_body = PlannedItemRequest,
    responses(
        (status = 200, description = "Planned item updated successfully", body = ApiResponse<PlannedItemResponse>),
        (status = 404, description = "Planned item not found", body = ErrorResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_planned_item(
    Path(item_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<PlannedItemRequest>,
) -> Result<Json<ApiResponse<PlannedItemResponse>>, StatusCode> {
    trace!("Entering update_planned_item function for item_id: {}", item_id);

    match planning::update_planned_item(&state.db, &state.rates, item_id, request.into_draft())
        .await
    {
        Ok(item) => {
            info!("Planned item with ID {} updated successfully", item_id);
            let response = ApiResponse {
                data: PlannedItemResponse::new(item, Utc::now().date_naive()),
                message: "Planned item updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(err) => Err(error_status("update_planned_item", &err)),
    }
}

/// Delete a planned item; balances stay untouched
#[utoipa::path(
    delete,
    path = "/api/v1/planned-items/{item_id}",
    tag = "planned-items",
    params(
        ("item_id" = i32, Path, description = "Planned item ID"),
    ),
    responses(
        (status = 200, description = "Planned item deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Planned item not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_planned_item(
    Path(item_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    trace!("Entering delete_planned_item function for item_id: {}", item_id);

    match planning::delete_planned_item(&state.db, item_id).await {
        Ok(()) => {
            info!("Planned item with ID {} deleted successfully", item_id);
            let response = ApiResponse {
                data: format!("Planned item {} deleted", item_id),
                message: "Planned item deleted successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(err) => Err(error_status("delete_planned_item", &err)),
    }
}

/// Realize a planned item into a transaction dated today
///
/// The transaction insert, the balance effect and the item deletion commit
/// together; a second realize of the same item returns 404.
#[utoipa::path(
    post,
    path = "/api/v1/planned-items/{item_id}/realize",
    tag = "planned-items",
    params(
        ("item_id" = i32, Path, description = "Planned item ID"),
    ),
    responses(
        (status = 201, description = "Planned item realized successfully", body = ApiResponse<TransactionResponse>),
        (status = 404, description = "Planned item not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn realize_planned_item(
    Path(item_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionResponse>>), StatusCode> {
    trace!("Entering realize_planned_item function for item_id: {}", item_id);

    let today = Utc::now().date_naive();
    match planning::realize(&state.db, item_id, today).await {
        Ok(transaction_model) => {
            info!(
                "Planned item {} realized into transaction {}",
                item_id, transaction_model.id
            );
            let response = ApiResponse {
                data: TransactionResponse::from(transaction_model),
                message: "Planned item realized successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(err) => Err(error_status("realize_planned_item", &err)),
    }
}
