//! Defines the JSON endpoints for managing transfers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use time::macros::time;

use crate::{
    AppState, Error,
    database_id::TransferId,
    datetime, timezone,
    transfer::{
        NewTransfer, Transfer, create_transfer, delete_transfer, get_all_transfers, get_transfer,
        get_transfers_by_date_range,
    },
};

/// The query parameters for listing transfers within a date range, e.g.
/// `GET /api/transfers/date-range?startDate=2024-01-01&endDate=2024-01-31`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferDateRange {
    /// The first day to include.
    pub start_date: String,
    /// The last day to include.
    pub end_date: String,
}

/// A route handler for creating a new transfer.
///
/// # Errors
/// Returns an error if the transfer is invalid or either account does not
/// exist.
pub async fn create_transfer_endpoint(
    State(state): State<AppState>,
    Json(new_transfer): Json<NewTransfer>,
) -> Result<(StatusCode, Json<Transfer>), Error> {
    let now = timezone::local_now(&state.local_timezone)?;
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let transfer = create_transfer(new_transfer, now, &connection)?;

    Ok((StatusCode::CREATED, Json(transfer)))
}

/// A route handler for getting a transfer by its ID.
///
/// # Errors
/// Returns an error if the transfer does not exist.
pub async fn get_transfer_endpoint(
    State(state): State<AppState>,
    Path(transfer_id): Path<TransferId>,
) -> Result<Json<Transfer>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_transfer(transfer_id, &connection).map(Json)
}

/// A route handler for listing every transfer, newest first.
pub async fn get_transfers_endpoint(
    State(state): State<AppState>,
) -> Result<Json<Vec<Transfer>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_all_transfers(&connection).map(Json)
}

/// A route handler for listing the transfers within a date range, newest
/// first. Both bounds cover their whole day.
pub async fn get_transfers_by_date_range_endpoint(
    State(state): State<AppState>,
    Query(range): Query<TransferDateRange>,
) -> Result<Json<Vec<Transfer>>, Error> {
    let start = datetime::parse_date(&range.start_date)
        .map_err(|_| Error::InvalidDate(range.start_date.clone()))?
        .midnight();
    let end = datetime::parse_date(&range.end_date)
        .map_err(|_| Error::InvalidDate(range.end_date.clone()))?
        .with_time(time!(23:59:59));
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_transfers_by_date_range(start, end, &connection).map(Json)
}

/// A route handler for deleting a transfer and reverting its balance
/// effects.
///
/// # Errors
/// Returns an error if the transfer does not exist.
pub async fn delete_transfer_endpoint(
    State(state): State<AppState>,
    Path(transfer_id): Path<TransferId>,
) -> Result<StatusCode, Error> {
    let now = timezone::local_now(&state.local_timezone)?;
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    delete_transfer(transfer_id, now, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}
