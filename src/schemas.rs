use compute::currency::ExchangeRates;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Exchange-rate table, fixed at startup
    pub rates: ExchangeRates,
    /// Default horizon for the upcoming-payments report
    pub upcoming_days: i64,
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::accounts::create_account,
        crate::handlers::accounts::get_accounts,
        crate::handlers::accounts::get_account,
        crate::handlers::accounts::update_account,
        crate::handlers::accounts::delete_account,
        crate::handlers::transactions::create_transaction,
        crate::handlers::transactions::get_transactions,
        crate::handlers::transactions::get_transaction,
        crate::handlers::transactions::update_transaction,
        crate::handlers::transactions::delete_transaction,
        crate::handlers::transactions::get_account_transactions,
        crate::handlers::planned_items::create_planned_item,
        crate::handlers::planned_items::get_planned_items,
        crate::handlers::planned_items::get_planned_item,
        crate::handlers::planned_items::update_planned_item,
        crate::handlers::planned_items::delete_planned_item,
        crate::handlers::planned_items::realize_planned_item,
        crate::handlers::regular_incomes::create_regular_income,
        crate::handlers::regular_incomes::get_regular_incomes,
        crate::handlers::regular_incomes::get_regular_income,
        crate::handlers::regular_incomes::update_regular_income,
        crate::handlers::regular_incomes::delete_regular_income,
        crate::handlers::regular_incomes::get_pending_incomes,
        crate::handlers::regular_incomes::record_income_payment,
        crate::handlers::regular_incomes::get_income_payments,
        crate::handlers::regular_incomes::get_income_stats,
        crate::handlers::regular_expenses::create_regular_expense,
        crate::handlers::regular_expenses::get_regular_expenses,
        crate::handlers::regular_expenses::get_regular_expense,
        crate::handlers::regular_expenses::update_regular_expense,
        crate::handlers::regular_expenses::delete_regular_expense,
        crate::handlers::regular_expenses::get_pending_expenses,
        crate::handlers::regular_expenses::record_expense_payment,
        crate::handlers::regular_expenses::get_expense_payments,
        crate::handlers::regular_expenses::get_expense_stats,
        crate::handlers::reports::get_total_assets,
        crate::handlers::reports::get_summary,
        crate::handlers::reports::get_weekly_spending,
        crate::handlers::reports::get_upcoming_payments,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            crate::handlers::accounts::CreateAccountRequest,
            crate::handlers::accounts::UpdateAccountRequest,
            crate::handlers::accounts::AccountResponse,
            crate::handlers::transactions::TransactionRequest,
            crate::handlers::transactions::TransactionResponse,
            crate::handlers::planned_items::PlannedItemRequest,
            crate::handlers::planned_items::PlannedItemResponse,
            crate::handlers::regular_incomes::RegularIncomeRequest,
            crate::handlers::regular_incomes::RegularIncomeResponse,
            crate::handlers::regular_expenses::RegularExpenseRequest,
            crate::handlers::regular_expenses::RegularExpenseResponse,
            crate::handlers::payments::PaymentRequest,
            crate::handlers::payments::PaymentResponse,
            crate::handlers::payments::PaymentStatsResponse,
            crate::handlers::reports::TotalAssetsResponse,
            crate::handlers::reports::SummaryResponse,
            crate::handlers::reports::WeeklySpendingResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "accounts", description = "Account management endpoints"),
        (name = "transactions", description = "Transaction ledger endpoints"),
        (name = "planned-items", description = "Planned item endpoints"),
        (name = "regular-incomes", description = "Recurring income endpoints"),
        (name = "regular-expenses", description = "Recurring expense endpoints"),
        (name = "reports", description = "Reporting and aggregation endpoints"),
    ),
    info(
        title = "Fintrack API",
        description = "Multi-currency personal finance tracker API",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
