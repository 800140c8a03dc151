//! Transport-layer types shared between the compute engines and the API.
//! The report payloads are produced by `compute::reporting` and serialized
//! verbatim by the backend handlers, so any frontend can deserialize them
//! without duplicating shapes.

mod reports;

pub use reports::{PaymentStats, TransactionSummary, WeeklySpending};
