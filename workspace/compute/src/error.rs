use sea_orm::TransactionError;
use thiserror::Error;
use tracing::error;

/// Error taxonomy for the core engines.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Invalid entity data, rejected before any persistence attempt.
    /// Retrying with the same input will fail again.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An operation referenced an id that is not in storage.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conversion requested for a currency code outside the exchange-rate
    /// table. Distinct from `Validation` because it can surface deep inside
    /// aggregation code, not just at entity construction.
    #[error("Invalid currency: {0}")]
    InvalidCurrency(String),

    /// Underlying storage failure. Fatal to the current operation only;
    /// multi-step mutations roll back before propagating this.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl From<TransactionError<LedgerError>> for LedgerError {
    fn from(err: TransactionError<LedgerError>) -> Self {
        match err {
            TransactionError::Connection(db_err) => {
                error!(?db_err, "database transaction failed to open");
                LedgerError::Database(db_err)
            }
            TransactionError::Transaction(inner) => inner,
        }
    }
}

/// Type alias for Result with LedgerError
pub type Result<T> = std::result::Result<T, LedgerError>;
