//! Database entities for the ledger: accounts, transactions, planned
//! items, recurring definitions and their payment history.

pub mod entities;
