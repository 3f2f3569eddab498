//! Application router configuration.

use axum::{
    Router, middleware,
    routing::{MethodRouter, get},
};

use crate::{
    AppState, Error, endpoints,
    logging::logging_middleware,
    summary::get_financial_summary,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_transaction_endpoint, list_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::TRANSACTIONS_API, transactions_routes())
        .route(endpoints::TRANSACTION, transaction_routes())
        .route(endpoints::EMAILS_API, transactions_routes())
        .route(endpoints::EMAIL, transaction_routes())
        .route(endpoints::FINANCIAL_SUMMARY_API, get(get_financial_summary))
        .fallback(get_404_not_found)
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

/// The routes for the transaction collection.
fn transactions_routes() -> MethodRouter<AppState> {
    get(list_transactions_endpoint).post(create_transaction_endpoint)
}

/// The routes for a single transaction.
fn transaction_routes() -> MethodRouter<AppState> {
    get(get_transaction_endpoint)
        .put(edit_transaction_endpoint)
        .delete(delete_transaction_endpoint)
}

async fn get_404_not_found() -> Error {
    Error::NotFound
}
