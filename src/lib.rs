//! A personal-finance bookkeeping backend.
//!
//! Tracks accounts, categorized income/expense transactions and
//! inter-account transfers, keeps account balances consistent with the
//! ledger, and serves dashboard summaries over a JSON REST API.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use rust_decimal::Decimal;
use serde_json::json;
use tokio::signal;

pub mod account;
mod app_state;
pub mod category;
pub mod dashboard;
pub mod database_id;
pub mod datetime;
pub mod db;
mod endpoints;
mod routing;
pub mod timezone;
pub mod transaction;
pub mod transfer;

pub use app_state::AppState;
pub use routing::build_router;

use crate::database_id::{AccountId, CategoryId, TransactionId};

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
    /// The requested account, transaction, transfer or category does not
    /// exist.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A transaction was modified or deleted after its edit window closed.
    ///
    /// Transactions freeze twelve hours after creation and stay frozen
    /// forever, so this error is never worth retrying.
    #[error("transaction {0} can no longer be edited or deleted")]
    NotEditable(TransactionId),

    /// A transfer named the same account as both source and destination.
    #[error("cannot transfer money from an account to itself")]
    InvalidTransfer,

    /// A transaction or transfer amount was zero or negative.
    ///
    /// Amounts are stored positive; the direction of money comes from the
    /// transaction type or the transfer's account pair.
    #[error("{0} is not a valid amount, amounts must be positive")]
    NonPositiveAmount(Decimal),

    /// A date query parameter could not be parsed.
    #[error("{0} is not a valid date, expected e.g. 2024-01-15")]
    InvalidDate(String),

    /// Tried to delete an account that transactions or transfers still
    /// reference.
    #[error("account {0} is still referenced by the ledger and cannot be deleted")]
    AccountInUse(AccountId),

    /// Tried to delete a category that transactions still reference.
    #[error("category \"{0}\" is still referenced by transactions and cannot be deleted")]
    CategoryInUse(CategoryId),

    /// The configured timezone is not a canonical timezone name.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// Could not acquire the lock for the database connection.
    #[error("an error occurred while trying to acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = match self {
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::NotEditable(_) | Error::AccountInUse(_) | Error::CategoryInUse(_) => {
                StatusCode::CONFLICT
            }
            Error::InvalidTransfer | Error::NonPositiveAmount(_) | Error::InvalidDate(_) => {
                StatusCode::BAD_REQUEST
            }
            // Errors that are not the client's fault are not detailed to the
            // client.
            Error::InvalidTimezone(_) | Error::DatabaseLockError | Error::SqlError(_) => {
                tracing::error!("An unexpected error occurred: {}", self);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "internal server error" })),
                )
                    .into_response();
            }
        };

        (status_code, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
