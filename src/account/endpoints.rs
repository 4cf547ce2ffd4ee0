//! Defines the JSON endpoints for managing accounts.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    account::{
        NewAccount, create_account, delete_account, get_account, get_all_accounts,
        get_total_balance, update_account,
    },
    database_id::AccountId,
    timezone,
};

use super::Account;

/// The data needed to rename or recolor an account.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccount {
    /// The new display name of the account.
    pub name: String,
    /// The new display color of the account.
    pub color: String,
}

/// The total balance across all accounts.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalBalance {
    /// The sum of every account's balance.
    pub total_balance: Decimal,
}

/// A route handler for creating a new account.
///
/// # Errors
/// Returns an error if the account cannot be created.
pub async fn create_account_endpoint(
    State(state): State<AppState>,
    Json(new_account): Json<NewAccount>,
) -> Result<(StatusCode, Json<Account>), Error> {
    let now = timezone::local_now(&state.local_timezone)?;
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let account = create_account(new_account, now, &connection)?;

    Ok((StatusCode::CREATED, Json(account)))
}

/// A route handler for getting an account by its ID.
///
/// # Errors
/// Returns an error if the account does not exist.
pub async fn get_account_endpoint(
    State(state): State<AppState>,
    Path(account_id): Path<AccountId>,
) -> Result<Json<Account>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_account(account_id, &connection).map(Json)
}

/// A route handler for listing every account.
pub async fn get_accounts_endpoint(
    State(state): State<AppState>,
) -> Result<Json<Vec<Account>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_all_accounts(&connection).map(Json)
}

/// A route handler for renaming or recoloring an account.
///
/// # Errors
/// Returns an error if the account does not exist.
pub async fn update_account_endpoint(
    State(state): State<AppState>,
    Path(account_id): Path<AccountId>,
    Json(update): Json<UpdateAccount>,
) -> Result<Json<Account>, Error> {
    let now = timezone::local_now(&state.local_timezone)?;
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    update_account(account_id, &update.name, &update.color, now, &connection).map(Json)
}

/// A route handler for deleting an account.
///
/// # Errors
/// Returns an error if the account does not exist or if the ledger still
/// references it.
pub async fn delete_account_endpoint(
    State(state): State<AppState>,
    Path(account_id): Path<AccountId>,
) -> Result<StatusCode, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    delete_account(account_id, &connection)?;

    Ok(StatusCode::NO_CONTENT)
}

/// A route handler for getting the total balance across all accounts.
pub async fn get_total_balance_endpoint(
    State(state): State<AppState>,
) -> Result<Json<TotalBalance>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let total_balance = get_total_balance(&connection)?;

    Ok(Json(TotalBalance { total_balance }))
}
