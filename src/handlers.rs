pub mod accounts;
pub mod health;
pub mod payments;
pub mod planned_items;
pub mod regular_expenses;
pub mod regular_incomes;
pub mod reports;
pub mod transactions;

use axum::http::StatusCode;
use compute::LedgerError;
use tracing::{error, warn};

/// Map a core error onto an HTTP status, logging at the matching level.
pub fn error_status(operation: &str, err: &LedgerError) -> StatusCode {
    match err {
        LedgerError::Validation(_) | LedgerError::InvalidCurrency(_) => {
            warn!("{} rejected: {}", operation, err);
            StatusCode::BAD_REQUEST
        }
        LedgerError::NotFound(_) => {
            warn!("{} target missing: {}", operation, err);
            StatusCode::NOT_FOUND
        }
        LedgerError::Database(_) => {
            error!("{} failed: {}", operation, err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
