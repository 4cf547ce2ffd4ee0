//! Defines the transfer model and the engine that moves money between
//! accounts.
//!
//! Transfers are never updated. They are created, possibly deleted, and a
//! delete exactly reverts the balance effects of the create. Unlike
//! transactions, transfers carry no edit window and stay deletable forever.

use rusqlite::{Connection, Row};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

use crate::{
    Error,
    account::{get_account, update_balance},
    database_id::{AccountId, TransferId},
    datetime,
    db::map_decimal,
};

// ============================================================================
// MODELS
// ============================================================================

/// A movement of money between two distinct accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    /// The ID of the transfer.
    pub id: TransferId,
    /// The account the money left.
    pub from_account_id: AccountId,
    /// The account the money arrived in.
    pub to_account_id: AccountId,
    /// The amount moved. Always positive.
    pub amount: Decimal,
    /// A description of what the transfer was for.
    pub description: String,
    /// When the transfer happened (the business date).
    #[serde(with = "datetime::iso")]
    pub date_time: PrimitiveDateTime,
    /// When the transfer was recorded.
    #[serde(with = "datetime::iso")]
    pub created_at: PrimitiveDateTime,
}

/// The data needed to create a [Transfer].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransfer {
    /// The account to take the money from.
    pub from_account_id: AccountId,
    /// The account to put the money into.
    pub to_account_id: AccountId,
    /// The amount to move. Must be positive.
    pub amount: Decimal,
    /// A description of what the transfer is for.
    pub description: String,
    /// When the transfer happened.
    #[serde(with = "datetime::iso")]
    pub date_time: PrimitiveDateTime,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transfer table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transfer_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transfer (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                from_account_id INTEGER NOT NULL,
                to_account_id INTEGER NOT NULL,
                amount TEXT NOT NULL,
                description TEXT NOT NULL,
                date_time TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY(from_account_id) REFERENCES account(id),
                FOREIGN KEY(to_account_id) REFERENCES account(id)
                )",
        (),
    )?;

    Ok(())
}

const TRANSFER_COLUMNS: &str =
    "id, from_account_id, to_account_id, amount, description, date_time, created_at";

/// Map a database row to a [Transfer].
pub fn map_transfer_row(row: &Row) -> Result<Transfer, rusqlite::Error> {
    Ok(Transfer {
        id: row.get(0)?,
        from_account_id: row.get(1)?,
        to_account_id: row.get(2)?,
        amount: map_decimal(row, 3)?,
        description: row.get(4)?,
        date_time: datetime::map_column(row, 5)?,
        created_at: datetime::map_column(row, 6)?,
    })
}

/// Retrieve a transfer from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transfer,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_transfer(id: TransferId, connection: &Connection) -> Result<Transfer, Error> {
    let transfer = connection
        .prepare(&format!(
            "SELECT {TRANSFER_COLUMNS} FROM transfer WHERE id = :id"
        ))?
        .query_row(&[(":id", &id)], map_transfer_row)?;

    Ok(transfer)
}

/// Retrieve every transfer, newest business date first.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_all_transfers(connection: &Connection) -> Result<Vec<Transfer>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSFER_COLUMNS} FROM transfer ORDER BY date_time DESC"
        ))?
        .query_map([], map_transfer_row)?
        .map(|maybe_transfer| maybe_transfer.map_err(Error::from))
        .collect()
}

/// Retrieve the transfers with a business date in `[start, end]`, newest
/// first.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_transfers_by_date_range(
    start: PrimitiveDateTime,
    end: PrimitiveDateTime,
    connection: &Connection,
) -> Result<Vec<Transfer>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSFER_COLUMNS} FROM transfer
             WHERE date_time >= :start AND date_time <= :end
             ORDER BY date_time DESC"
        ))?
        .query_map(
            &[
                (":start", &datetime::format(start)),
                (":end", &datetime::format(end)),
            ],
            map_transfer_row,
        )?
        .map(|maybe_transfer| maybe_transfer.map_err(Error::from))
        .collect()
}

// ============================================================================
// TRANSFER ENGINE
// ============================================================================

/// Create a transfer and move the amount between the two accounts.
///
/// Both accounts are looked up before anything is written, then the ledger
/// write and both balance updates run inside one SQLite transaction.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidTransfer] if the source and destination are the same
///   account,
/// - [Error::NonPositiveAmount] if `new_transfer.amount` is zero or negative,
/// - [Error::NotFound] if either account does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transfer(
    new_transfer: NewTransfer,
    now: PrimitiveDateTime,
    connection: &Connection,
) -> Result<Transfer, Error> {
    if new_transfer.from_account_id == new_transfer.to_account_id {
        return Err(Error::InvalidTransfer);
    }

    if new_transfer.amount <= Decimal::ZERO {
        return Err(Error::NonPositiveAmount(new_transfer.amount));
    }

    // Using unchecked_transaction because we only have &Connection from the MutexGuard.
    let tx = connection.unchecked_transaction()?;

    get_account(new_transfer.from_account_id, &tx)?;
    get_account(new_transfer.to_account_id, &tx)?;

    let transfer = tx
        .prepare(&format!(
            "INSERT INTO transfer
             (from_account_id, to_account_id, amount, description, date_time, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING {TRANSFER_COLUMNS}"
        ))?
        .query_row(
            (
                new_transfer.from_account_id,
                new_transfer.to_account_id,
                new_transfer.amount.to_string(),
                &new_transfer.description,
                datetime::format(new_transfer.date_time),
                datetime::format(now),
            ),
            map_transfer_row,
        )?;

    update_balance(transfer.from_account_id, -transfer.amount, now, &tx)?;
    update_balance(transfer.to_account_id, transfer.amount, now, &tx)?;

    tx.commit()?;

    tracing::info!(
        "Created transfer {} of {} from account {} to account {}",
        transfer.id,
        transfer.amount,
        transfer.from_account_id,
        transfer.to_account_id
    );

    Ok(transfer)
}

/// Delete a transfer and revert its effect on both accounts.
///
/// Transfers have no edit window, a delete is valid at any age.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transfer,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transfer(
    id: TransferId,
    now: PrimitiveDateTime,
    connection: &Connection,
) -> Result<(), Error> {
    let tx = connection.unchecked_transaction()?;

    let transfer = get_transfer(id, &tx)?;

    update_balance(transfer.from_account_id, transfer.amount, now, &tx)?;
    update_balance(transfer.to_account_id, -transfer.amount, now, &tx)?;

    tx.execute("DELETE FROM transfer WHERE id = :id", &[(":id", &id)])?;

    tx.commit()?;

    tracing::info!("Deleted transfer {}", id);

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
