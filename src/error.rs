//! Defines the app level error type and its conversion to JSON error responses.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::ffi::ErrorCode;
use serde::{Deserialize, Serialize};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request could not be parsed, e.g. the body was not valid JSON, a
    /// required field was missing, or the ID in the URL was not a number.
    ///
    /// Callers should pass in a description of what was wrong with the request.
    #[error("invalid request: {0}")]
    InvalidPayload(String),

    /// A price that is not a finite number was used for a transaction.
    #[error("{0} is not a valid price, prices must be finite numbers")]
    InvalidPrice(f64),

    /// A required text field was empty or only contained whitespace.
    #[error("the field \"{0}\" cannot be empty")]
    EmptyField(&'static str),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The database could not be reached, e.g. the file could not be opened
    /// or it is locked by another process.
    #[error("the transaction store is unavailable: {0}")]
    StoreUnavailable(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            rusqlite::Error::SqliteFailure(sql_error, _)
                if matches!(
                    sql_error.code,
                    ErrorCode::DatabaseBusy
                        | ErrorCode::DatabaseLocked
                        | ErrorCode::CannotOpen
                        | ErrorCode::NotADatabase
                ) =>
            {
                tracing::error!("the database is unavailable: {}", sql_error);
                Error::StoreUnavailable(sql_error.to_string())
            }
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidPayload(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidPayload(rejection.body_text())
    }
}

/// The JSON body sent to the client when a request fails.
///
/// `error` is the reason phrase of the status code, `message` says what went
/// wrong in a way that can be shown to the user.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    /// A human readable description of the error.
    pub message: String,
    /// The reason phrase of the HTTP status code, e.g. "Not Found".
    pub error: String,
}

fn json_error(status: StatusCode, message: String) -> Response {
    let body = ErrorResponse {
        message,
        error: status.canonical_reason().unwrap_or_default().to_owned(),
    };

    (status, Json(body)).into_response()
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::InvalidPayload(_) | Error::InvalidPrice(_) | Error::EmptyField(_) => {
                json_error(StatusCode::BAD_REQUEST, self.to_string())
            }
            Error::NotFound => json_error(StatusCode::NOT_FOUND, self.to_string()),
            Error::StoreUnavailable(_) | Error::DatabaseLockError => {
                tracing::error!("The transaction store is unavailable: {}", self);
                json_error(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "The transaction store is unavailable, try again later.".to_owned(),
                )
            }
            Error::InvalidTimezoneError(timezone) => json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            ),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                json_error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                )
            }
        }
    }
}
