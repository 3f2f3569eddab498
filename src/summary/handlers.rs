//! Financial summary HTTP handlers.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use time_tz::Tz;

use crate::{
    AppState, Error,
    summary::aggregation::{FinancialSummary, summarize},
    timezone::{get_timezone, to_local_time},
    transaction::{Transaction, list_transactions},
};

/// The state needed for summarizing transactions.
#[derive(Debug, Clone)]
pub struct SummaryState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for SummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler for the summary of every stored transaction.
///
/// Transactions are bucketed into months using the server's local timezone,
/// with the UTC offset that applied when each transaction was created.
pub async fn get_financial_summary(
    State(state): State<SummaryState>,
) -> Result<Json<FinancialSummary>, Error> {
    let local_timezone = get_timezone(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;

    let transactions = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        list_transactions(&connection)
            .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?
    };

    let transactions = in_local_time(transactions, local_timezone);
    tracing::debug!("Summarizing {} transactions", transactions.len());

    Ok(Json(summarize(&transactions)))
}

/// Converts the creation timestamps of `transactions` to the local time in
/// `local_timezone` when each transaction was created.
fn in_local_time(transactions: Vec<Transaction>, local_timezone: &Tz) -> Vec<Transaction> {
    transactions
        .into_iter()
        .map(|transaction| Transaction {
            created_at: to_local_time(transaction.created_at, local_timezone),
            ..transaction
        })
        .collect()
}
