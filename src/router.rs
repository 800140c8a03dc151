use crate::handlers::{
    accounts::{create_account, delete_account, get_account, get_accounts, update_account},
    health::health_check,
    planned_items::{
        create_planned_item, delete_planned_item, get_planned_item, get_planned_items,
        realize_planned_item, update_planned_item,
    },
    regular_expenses::{
        create_regular_expense, delete_regular_expense, get_expense_payments, get_expense_stats,
        get_pending_expenses, get_regular_expense, get_regular_expenses, record_expense_payment,
        update_regular_expense,
    },
    regular_incomes::{
        create_regular_income, delete_regular_income, get_income_payments, get_income_stats,
        get_pending_incomes, get_regular_income, get_regular_incomes, record_income_payment,
        update_regular_income,
    },
    reports::{get_summary, get_total_assets, get_upcoming_payments, get_weekly_spending},
    transactions::{
        create_transaction, delete_transaction, get_account_transactions, get_transaction,
        get_transactions, update_transaction,
    },
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Account CRUD routes
        .route("/api/v1/accounts", post(create_account))
        .route("/api/v1/accounts", get(get_accounts))
        .route("/api/v1/accounts/:account_id", get(get_account))
        .route("/api/v1/accounts/:account_id", put(update_account))
        .route("/api/v1/accounts/:account_id", delete(delete_account))
        .route(
            "/api/v1/accounts/:account_id/transactions",
            get(get_account_transactions),
        )
        // Transaction CRUD routes
        .route("/api/v1/transactions", post(create_transaction))
        .route("/api/v1/transactions", get(get_transactions))
        .route("/api/v1/transactions/:transaction_id", get(get_transaction))
        .route("/api/v1/transactions/:transaction_id", put(update_transaction))
        .route("/api/v1/transactions/:transaction_id", delete(delete_transaction))
        // Planned item routes
        .route("/api/v1/planned-items", post(create_planned_item))
        .route("/api/v1/planned-items", get(get_planned_items))
        .route("/api/v1/planned-items/:item_id", get(get_planned_item))
        .route("/api/v1/planned-items/:item_id", put(update_planned_item))
        .route("/api/v1/planned-items/:item_id", delete(delete_planned_item))
        .route(
            "/api/v1/planned-items/:item_id/realize",
            post(realize_planned_item),
        )
        // Recurring income routes
        .route("/api/v1/regular-incomes", post(create_regular_income))
        .route("/api/v1/regular-incomes", get(get_regular_incomes))
        .route("/api/v1/regular-incomes/pending", get(get_pending_incomes))
        .route("/api/v1/regular-incomes/:income_id", get(get_regular_income))
        .route("/api/v1/regular-incomes/:income_id", put(update_regular_income))
        .route("/api/v1/regular-incomes/:income_id", delete(delete_regular_income))
        .route(
            "/api/v1/regular-incomes/:income_id/payments",
            post(record_income_payment),
        )
        .route(
            "/api/v1/regular-incomes/:income_id/payments",
            get(get_income_payments),
        )
        .route("/api/v1/regular-incomes/:income_id/stats", get(get_income_stats))
        // Recurring expense routes
        .route("/api/v1/regular-expenses", post(create_regular_expense))
        .route("/api/v1/regular-expenses", get(get_regular_expenses))
        .route("/api/v1/regular-expenses/pending", get(get_pending_expenses))
        .route("/api/v1/regular-expenses/:expense_id", get(get_regular_expense))
        .route("/api/v1/regular-expenses/:expense_id", put(update_regular_expense))
        .route(
            "/api/v1/regular-expenses/:expense_id",
            delete(delete_regular_expense),
        )
        .route(
            "/api/v1/regular-expenses/:expense_id/payments",
            post(record_expense_payment),
        )
        .route(
            "/api/v1/regular-expenses/:expense_id/payments",
            get(get_expense_payments),
        )
        .route(
            "/api/v1/regular-expenses/:expense_id/stats",
            get(get_expense_stats),
        )
        // Report routes
        .route("/api/v1/reports/total-assets", get(get_total_assets))
        .route("/api/v1/reports/summary", get(get_summary))
        .route("/api/v1/reports/weekly-spending", get(get_weekly_spending))
        .route("/api/v1/reports/upcoming-payments", get(get_upcoming_payments))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
