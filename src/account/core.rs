//! Defines the account model, its database queries, and the balance manager.
//!
//! An account's balance is an incrementally maintained cache of the net sum
//! of all ledger entries touching it. Only [update_balance] may mutate it;
//! the transaction and transfer engines call it with signed deltas and are
//! responsible for the sign and magnitude being correct.

use rusqlite::{Connection, Row};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

use crate::{Error, database_id::AccountId, datetime, db::map_decimal};

// ============================================================================
// MODELS
// ============================================================================

/// A place money is held, e.g. a bank account, credit card or cash wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// The ID of the account.
    pub id: AccountId,
    /// The display name of the account.
    pub name: String,
    /// The current balance, kept in sync with the ledger.
    pub balance: Decimal,
    /// The display color for the account, e.g. "#2dd4bf".
    pub color: String,
    /// When the account was created.
    #[serde(with = "datetime::iso")]
    pub created_at: PrimitiveDateTime,
    /// When the account was last modified, including balance updates.
    #[serde(with = "datetime::iso")]
    pub updated_at: PrimitiveDateTime,
}

/// The data needed to create an [Account].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    /// The display name of the account.
    pub name: String,
    /// The opening balance. Defaults to zero.
    #[serde(default)]
    pub balance: Option<Decimal>,
    /// The display color for the account.
    pub color: String,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the account table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                balance TEXT NOT NULL,
                color TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to an [Account].
pub fn map_account_row(row: &Row) -> Result<Account, rusqlite::Error> {
    Ok(Account {
        id: row.get(0)?,
        name: row.get(1)?,
        balance: map_decimal(row, 2)?,
        color: row.get(3)?,
        created_at: datetime::map_column(row, 4)?,
        updated_at: datetime::map_column(row, 5)?,
    })
}

/// Create a new account in the database.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn create_account(
    new_account: NewAccount,
    now: PrimitiveDateTime,
    connection: &Connection,
) -> Result<Account, Error> {
    let balance = new_account.balance.unwrap_or(Decimal::ZERO);

    let account = connection
        .prepare(
            "INSERT INTO account (name, balance, color, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, name, balance, color, created_at, updated_at",
        )?
        .query_row(
            (
                &new_account.name,
                balance.to_string(),
                &new_account.color,
                datetime::format(now),
                datetime::format(now),
            ),
            map_account_row,
        )?;

    tracing::info!("Created account: {} - {}", account.id, account.name);

    Ok(account)
}

/// Retrieve an account from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_account(id: AccountId, connection: &Connection) -> Result<Account, Error> {
    let account = connection
        .prepare(
            "SELECT id, name, balance, color, created_at, updated_at FROM account WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_account_row)?;

    Ok(account)
}

/// Retrieve every account in the database.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_all_accounts(connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare("SELECT id, name, balance, color, created_at, updated_at FROM account")?
        .query_map([], map_account_row)?
        .map(|maybe_account| maybe_account.map_err(Error::from))
        .collect()
}

/// Rename or recolor an account.
///
/// The balance is deliberately not settable here, it only moves through
/// [update_balance] as ledger entries are written.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_account(
    id: AccountId,
    name: &str,
    color: &str,
    now: PrimitiveDateTime,
    connection: &Connection,
) -> Result<Account, Error> {
    let account = connection
        .prepare(
            "UPDATE account SET name = ?1, color = ?2, updated_at = ?3 WHERE id = ?4
             RETURNING id, name, balance, color, created_at, updated_at",
        )?
        .query_row((name, color, datetime::format(now), id), map_account_row)?;

    tracing::info!("Updated account: {}", account.id);

    Ok(account)
}

/// Count the ledger entries (transactions and transfers) referencing an
/// account.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn count_account_references(id: AccountId, connection: &Connection) -> Result<i64, Error> {
    let transaction_count: i64 = connection.query_row(
        "SELECT COUNT(id) FROM \"transaction\" WHERE account_id = :id",
        &[(":id", &id)],
        |row| row.get(0),
    )?;
    let transfer_count: i64 = connection.query_row(
        "SELECT COUNT(id) FROM transfer WHERE from_account_id = :id OR to_account_id = :id",
        &[(":id", &id)],
        |row| row.get(0),
    )?;

    Ok(transaction_count + transfer_count)
}

/// Delete an account.
///
/// # Errors
/// This function will return a:
/// - [Error::AccountInUse] if transactions or transfers still reference the account,
/// - [Error::NotFound] if `id` does not refer to a valid account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_account(id: AccountId, connection: &Connection) -> Result<(), Error> {
    if count_account_references(id, connection)? > 0 {
        return Err(Error::AccountInUse(id));
    }

    let rows_affected = connection.execute("DELETE FROM account WHERE id = :id", &[(":id", &id)])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    tracing::info!("Deleted account: {}", id);

    Ok(())
}

// ============================================================================
// BALANCE MANAGER
// ============================================================================

/// Apply a signed `delta` to an account's balance and stamp `updated_at`.
///
/// This is a pure accumulator: it does not validate the sign or magnitude
/// of `delta`. Callers must run it inside the same SQLite transaction as
/// the ledger write it accounts for, so either both become visible or
/// neither does.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_balance(
    id: AccountId,
    delta: Decimal,
    now: PrimitiveDateTime,
    connection: &Connection,
) -> Result<(), Error> {
    let balance: Decimal = connection
        .prepare("SELECT balance FROM account WHERE id = :id")?
        .query_row(&[(":id", &id)], |row| map_decimal(row, 0))?;

    let new_balance = balance + delta;

    connection.execute(
        "UPDATE account SET balance = ?1, updated_at = ?2 WHERE id = ?3",
        (new_balance.to_string(), datetime::format(now), id),
    )?;

    tracing::info!(
        "Updated balance for account {}: {} (change: {})",
        id,
        new_balance,
        delta
    );

    Ok(())
}

/// Get the total balance across all accounts.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_total_balance(connection: &Connection) -> Result<Decimal, Error> {
    let balances: Vec<Decimal> = connection
        .prepare("SELECT balance FROM account")?
        .query_map([], |row| map_decimal(row, 0))?
        .collect::<Result<_, _>>()?;

    Ok(balances.iter().sum())
}

// ============================================================================
// TESTS
// ============================================================================
