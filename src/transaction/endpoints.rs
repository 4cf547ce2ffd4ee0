//! Defines the JSON endpoints for managing transactions.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use time::{PrimitiveDateTime, macros::time};

use crate::{
    AppState, Error,
    database_id::TransactionId,
    datetime, timezone,
    transaction::{
        Transaction, TransactionData, TransactionFilter, create_transaction, delete_transaction,
        get_transaction, get_transactions, is_editable, update_transaction,
    },
};

/// A [Transaction] decorated with whether its edit window is still open.
///
/// Editability is computed fresh on every read rather than stored.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    /// The transaction itself.
    #[serde(flatten)]
    pub transaction: Transaction,
    /// Whether the transaction may still be updated or deleted.
    pub editable: bool,
}

impl TransactionResponse {
    fn new(transaction: Transaction, now: PrimitiveDateTime) -> Self {
        let editable = is_editable(transaction.created_at, now);

        Self {
            transaction,
            editable,
        }
    }
}

/// The query parameters for listing transactions, e.g.
/// `GET /api/transactions?division=Personal&startDate=2024-01-01&endDate=2024-01-31`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQuery {
    /// Only include transactions with this division tag.
    pub division: Option<String>,
    /// Only include transactions in this category.
    pub category: Option<String>,
    /// Only include transactions on or after this date.
    pub start_date: Option<String>,
    /// Only include transactions on or before this date.
    pub end_date: Option<String>,
}

impl TransactionQuery {
    /// Convert the raw query parameters into a [TransactionFilter].
    ///
    /// Date parameters cover their whole day: `startDate` becomes midnight
    /// and `endDate` becomes one second before the following midnight.
    fn into_filter(self) -> Result<TransactionFilter, Error> {
        let start = match self.start_date {
            Some(text) => Some(
                datetime::parse_date(&text)
                    .map_err(|_| Error::InvalidDate(text))?
                    .midnight(),
            ),
            None => None,
        };
        let end = match self.end_date {
            Some(text) => Some(
                datetime::parse_date(&text)
                    .map_err(|_| Error::InvalidDate(text))?
                    .with_time(time!(23:59:59)),
            ),
            None => None,
        };

        Ok(TransactionFilter {
            division: self.division,
            category_id: self.category,
            start,
            end,
        })
    }
}

/// A route handler for recording a new transaction.
///
/// # Errors
/// Returns an error if the amount is not positive or if the account does
/// not exist.
pub async fn create_transaction_endpoint(
    State(state): State<AppState>,
    Json(data): Json<TransactionData>,
) -> Result<(StatusCode, Json<TransactionResponse>), Error> {
    let now = timezone::local_now(&state.local_timezone)?;
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = create_transaction(data, now, &connection)?;

    Ok((
        StatusCode::CREATED,
        Json(TransactionResponse::new(transaction, now)),
    ))
}

/// A route handler for getting a transaction by its ID.
///
/// # Errors
/// Returns an error if the transaction does not exist.
pub async fn get_transaction_endpoint(
    State(state): State<AppState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Json<TransactionResponse>, Error> {
    let now = timezone::local_now(&state.local_timezone)?;
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = get_transaction(transaction_id, &connection)?;

    Ok(Json(TransactionResponse::new(transaction, now)))
}

/// A route handler for listing transactions, with optional division,
/// category and date-range filters.
pub async fn get_transactions_endpoint(
    State(state): State<AppState>,
    Query(query): Query<TransactionQuery>,
) -> Result<Json<Vec<TransactionResponse>>, Error> {
    let now = timezone::local_now(&state.local_timezone)?;
    let filter = query.into_filter()?;
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_transactions(&filter, &connection)?
        .into_iter()
        .map(|transaction| TransactionResponse::new(transaction, now))
        .collect();

    Ok(Json(transactions))
}

/// A route handler for overwriting a transaction's fields.
///
/// # Errors
/// Returns an error if the transaction does not exist or its edit window
/// has closed.
pub async fn update_transaction_endpoint(
    State(state): State<AppState>,
    Path(transaction_id): Path<TransactionId>,
    Json(data): Json<TransactionData>,
) -> Result<Json<TransactionResponse>, Error> {
    let now = timezone::local_now(&state.local_timezone)?;
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = update_transaction(transaction_id, data, now, &connection)?;

    Ok(Json(TransactionResponse::new(transaction, now)))
}

/// A route handler for deleting a transaction.
///
/// # Errors
/// Returns an error if the transaction does not exist or its edit window
/// has closed.
pub async fn delete_transaction_endpoint(
    State(state): State<AppState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<StatusCode, Error> {
    let now = timezone::local_now(&state.local_timezone)?;
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    delete_transaction(transaction_id, now, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}
