//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying, and managing transactions
//! - JSON route handlers for the transaction CRUD API

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod get_endpoint;
mod state;

pub use core::{
    DEFAULT_CATEGORY, Transaction, TransactionBuilder, TransactionChanges, create_transaction,
    create_transaction_table, delete_transaction, get_transaction, list_transactions,
    map_transaction_row, update_transaction,
};
pub use create_endpoint::{CreateTransactionRequest, create_transaction_endpoint};
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use get_endpoint::{get_transaction_endpoint, list_transactions_endpoint};
pub use state::TransactionState;

#[cfg(test)]
pub(crate) use core::count_transactions;
