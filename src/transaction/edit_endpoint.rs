use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};

use crate::{
    Error,
    database_id::TransactionId,
    transaction::{
        Transaction, TransactionChanges, core::update_transaction, state::TransactionState,
    },
};

/// A route handler for updating some or all of a transaction's fields.
///
/// Fields missing from the request body are left unchanged and a `null`
/// category or note clears it. Responds with the updated transaction, or 404
/// if the transaction does not exist.
pub async fn edit_transaction_endpoint(
    State(state): State<TransactionState>,
    transaction_id: Result<Path<TransactionId>, PathRejection>,
    payload: Result<Json<TransactionChanges>, JsonRejection>,
) -> Result<Json<Transaction>, Error> {
    let Path(transaction_id) = transaction_id
        .inspect_err(|rejection| tracing::warn!("Rejected transaction ID: {rejection}"))?;

    let Json(changes) = payload.inspect_err(|rejection| {
        tracing::warn!("Rejected changes to transaction {transaction_id}: {rejection}")
    })?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    update_transaction(transaction_id, changes, &connection)
        .inspect_err(|error| tracing::error!("Could not update transaction {transaction_id}: {error}"))
        .map(Json)
}
