use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    Error,
    endpoints::{self, format_endpoint},
    transaction::{Transaction, core::create_transaction, state::TransactionState},
};

/// The JSON body for creating a transaction.
///
/// Some clients also send a `month` field. It is ignored because the month
/// is derived from `createdAt` when transactions are summarized.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    /// The ID of the email the transaction was recorded from.
    pub email_id: String,
    /// What the money was spent on or earned from.
    pub expense: String,
    /// Positive for income, negative for expenses.
    pub price: f64,
    /// The category of the transaction.
    pub category: Option<String>,
    /// Free text notes.
    pub note: Option<String>,
    /// When the transaction happened, defaults to now.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

/// A route handler for creating a new transaction.
///
/// Responds with 201 Created, the new transaction as JSON and its URI in the
/// `Location` header.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    payload: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> Result<Response, Error> {
    let Json(request) = payload
        .inspect_err(|rejection| tracing::warn!("Rejected new transaction: {rejection}"))?;

    let mut builder = Transaction::build(&request.email_id, &request.expense, request.price)
        .category(request.category)
        .note(request.note);

    if let Some(created_at) = request.created_at {
        builder = builder.created_at(created_at);
    }

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = create_transaction(builder, &connection)?;
    tracing::debug!("Created transaction {}", transaction.id);

    let location = format_endpoint(endpoints::TRANSACTION, transaction.id);

    Ok((StatusCode::CREATED, [(LOCATION, location)], Json(transaction)).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, extract::State, http::StatusCode};
    use time::macros::datetime;

    use crate::{
        Error,
        test_utils::{get_header, must_create_test_connection, parse_json_body},
        transaction::{
            Transaction,
            core::get_transaction,
            create_endpoint::{CreateTransactionRequest, create_transaction_endpoint},
            state::TransactionState,
        },
    };

    fn get_test_state() -> TransactionState {
        TransactionState {
            db_connection: Arc::new(Mutex::new(must_create_test_connection())),
        }
    }

    fn coffee_request() -> CreateTransactionRequest {
        CreateTransactionRequest {
            email_id: "email-1".to_owned(),
            expense: "Coffee".to_owned(),
            price: -45000.0,
            category: Some("Food".to_owned()),
            note: None,
            created_at: Some(datetime!(2025-01-20 08:15 UTC)),
        }
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let state = get_test_state();

        let response = create_transaction_endpoint(State(state.clone()), Ok(Json(coffee_request())))
            .await
            .expect("could not create transaction");

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(get_header(&response, "location"), "/api/transactions/1");
        let got: Transaction = parse_json_body(response).await;
        let want = get_transaction(1, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(got, want);
        assert_eq!(got.expense, "Coffee");
        assert_eq!(got.price, -45000.0);
        assert_eq!(got.category.as_deref(), Some("Food"));
        assert_eq!(got.created_at, datetime!(2025-01-20 08:15 UTC));
        assert!(!got.is_read);
    }

    #[tokio::test]
    async fn rejects_blank_description() {
        let state = get_test_state();
        let request = CreateTransactionRequest {
            expense: "  ".to_owned(),
            ..coffee_request()
        };

        let result = create_transaction_endpoint(State(state.clone()), Ok(Json(request))).await;

        assert_eq!(result.err(), Some(Error::EmptyField("expense")));
    }

    #[test]
    fn optional_fields_may_be_omitted() {
        let request: CreateTransactionRequest = serde_json::from_str(
            r#"{"emailId": "email-1", "expense": "Pay", "price": 1000000, "month": 1}"#,
        )
        .expect("could not parse request");

        assert_eq!(request.price, 1_000_000.0);
        assert_eq!(request.category, None);
        assert_eq!(request.note, None);
        assert_eq!(request.created_at, None);
    }
}
