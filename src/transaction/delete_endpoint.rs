use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};

use crate::{
    Error,
    database_id::TransactionId,
    transaction::{Transaction, core::delete_transaction, state::TransactionState},
};

/// A route handler for deleting a transaction, responds with the deleted transaction.
///
/// Responds with 404 if the transaction does not exist, e.g. it was already deleted.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    transaction_id: Result<Path<TransactionId>, PathRejection>,
) -> Result<Json<Transaction>, Error> {
    let Path(transaction_id) = transaction_id
        .inspect_err(|rejection| tracing::warn!("Rejected transaction ID: {rejection}"))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = delete_transaction(transaction_id, &connection)?;
    tracing::debug!("Deleted transaction {transaction_id}");

    Ok(Json(transaction))
}
