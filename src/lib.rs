//! An expense tracker web app for logging what you spend.
//!
//! Users register, log in and record dated expenses with a category and a
//! description. The dashboard summarises spending per category and against an
//! optional session budget, and expenses can be exported as CSV.
//!
//! This library provides a REST API that directly serves HTML pages. Accounts
//! and expenses are kept by a [RecordStore], either in flat CSV files
//! ([CsvRecordStore]) or in memory ([InMemoryRecordStore]).

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::response::{IntoResponse, Response};
use axum_server::Handle;
use tokio::signal;

mod app_state;
mod auth;
mod endpoints;
mod expense;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod routing;
mod store;
mod timezone;
mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::PasswordHash;
pub use expense::{Expense, ExpenseId, ExpenseSummary, ExpenseUpdate, NewExpense};
pub use logging::logging_middleware;
pub use routing::build_router;
pub use store::{
    CsvRecordStore, DateRange, InMemoryRecordStore, RecordStore, SharedStore, export_csv,
    verify_credentials,
};
pub use user::{Account, Username};

use crate::{internal_server_error::InternalServerError, not_found::get_404_not_found_response};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The username used to register is already taken.
    #[error("the account \"{0}\" already exists")]
    DuplicateAccount(String),

    /// The username and password combination did not match a registered account.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Expenses that belong to another user are also reported as not found.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A row in a storage file could not be parsed.
    ///
    /// Stores skip these rows when listing records, so this error should only
    /// be logged and never shown to the client.
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    /// A required form field was empty.
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    /// A form field that should hold a number did not.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// An error occurred while reading or writing the storage files.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("storage error: {0}")]
    Storage(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the lock guarding the store.
    #[error("could not acquire the store lock")]
    StoreLockError,

    /// The session cookie is missing from the cookie jar in the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// The session cookie could not be parsed or has expired.
    #[error("the session token is invalid or has expired")]
    InvalidToken,
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        tracing::error!("an unhandled I/O error occurred: {value}");
        Error::Storage(value.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        tracing::error!("an unhandled CSV error occurred: {value}");
        Error::Storage(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::StoreLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}
