//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/transactions/{transaction_id}', use [format_endpoint].

/// The route to access transactions.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route the dashboard client uses to access transactions.
///
/// Transactions are recorded from emails and the client still calls them by that name.
pub const EMAILS_API: &str = "/api/emails";
/// The route the dashboard client uses to access a single transaction.
pub const EMAIL: &str = "/api/emails/{transaction_id}";
/// The route for the summary of all transactions.
pub const FINANCIAL_SUMMARY_API: &str = "/api/financial-summary";

/// Replace the path parameter in `endpoint_path` with `id`.
///
/// A parameter is the text between a left brace and the next right brace,
/// e.g. '{transaction_id}' in '/api/transactions/{transaction_id}'. Only the
/// first parameter is replaced.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map_or(endpoint_path.len(), |offset| param_start + offset + 1);

    format!(
        "{}{id}{}",
        &endpoint_path[..param_start],
        &endpoint_path[param_end..]
    )
}
