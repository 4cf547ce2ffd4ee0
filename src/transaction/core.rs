//! Defines the transaction model and the engine that keeps account balances
//! consistent with the ledger.
//!
//! Every mutation runs its ledger write and its balance updates inside one
//! SQLite transaction, so a crash or error can never leave a balance out of
//! step with the ledger.

use rusqlite::{Connection, Row, types::Type};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

use crate::{
    Error,
    account::{get_account, update_balance},
    database_id::{AccountId, CategoryId, TransactionId},
    datetime,
    db::map_decimal,
    transaction::policy::is_editable,
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether a transaction puts money into an account or takes it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming into an account, e.g. a salary payment.
    Income,
    /// Money leaving an account, e.g. a grocery bill.
    Expense,
}

impl TransactionType {
    /// The name of the transaction type as stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// Parse a transaction type from its stored name.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "income" => Some(TransactionType::Income),
            "expense" => Some(TransactionType::Expense),
            _ => None,
        }
    }
}

/// Read a TEXT column as a [TransactionType].
pub fn map_transaction_type(row: &Row, index: usize) -> Result<TransactionType, rusqlite::Error> {
    let text: String = row.get(index)?;

    TransactionType::parse(&text).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            index,
            Type::Text,
            format!("unknown transaction type {text}").into(),
        )
    })
}

/// A single income or expense entry in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// Whether the transaction is income or expense.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// The amount of money that changed hands. Always positive, the
    /// direction comes from the type.
    pub amount: Decimal,
    /// A description of what the transaction was for.
    pub description: String,
    /// The ID of the category the transaction belongs to.
    pub category_id: CategoryId,
    /// An opaque partitioning tag, e.g. "Office" or "Personal".
    pub division: String,
    /// The ID of the account the money moved in or out of.
    pub account_id: AccountId,
    /// When the transaction happened (the business date).
    #[serde(with = "datetime::iso")]
    pub date_time: PrimitiveDateTime,
    /// When the transaction was recorded. The edit window is measured from
    /// this, not from the business date.
    #[serde(with = "datetime::iso")]
    pub created_at: PrimitiveDateTime,
    /// When the transaction was last modified.
    #[serde(with = "datetime::iso")]
    pub updated_at: PrimitiveDateTime,
}

/// The caller-supplied fields of a transaction, used for both create and
/// update.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionData {
    /// Whether the transaction is income or expense.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// The amount of money that changed hands. Must be positive.
    pub amount: Decimal,
    /// A description of what the transaction was for.
    pub description: String,
    /// The ID of the category the transaction belongs to.
    pub category_id: CategoryId,
    /// An opaque partitioning tag, e.g. "Office" or "Personal".
    pub division: String,
    /// The ID of the account the money moved in or out of.
    pub account_id: AccountId,
    /// When the transaction happened.
    #[serde(with = "datetime::iso")]
    pub date_time: PrimitiveDateTime,
}

/// The signed effect a transaction has on its account's balance.
pub fn balance_delta(kind: TransactionType, amount: Decimal) -> Decimal {
    match kind {
        TransactionType::Income => amount,
        TransactionType::Expense => -amount,
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                kind TEXT NOT NULL,
                amount TEXT NOT NULL,
                description TEXT NOT NULL,
                category_id TEXT NOT NULL,
                division TEXT NOT NULL,
                account_id INTEGER NOT NULL,
                date_time TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY(account_id) REFERENCES account(id)
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transaction', 0)",
        (),
    )?;

    Ok(())
}

const TRANSACTION_COLUMNS: &str = "id, kind, amount, description, category_id, division, \
     account_id, date_time, created_at, updated_at";

/// Map a database row to a [Transaction].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        kind: map_transaction_type(row, 1)?,
        amount: map_decimal(row, 2)?,
        description: row.get(3)?,
        category_id: row.get(4)?,
        division: row.get(5)?,
        account_id: row.get(6)?,
        date_time: datetime::map_column(row, 7)?,
        created_at: datetime::map_column(row, 8)?,
        updated_at: datetime::map_column(row, 9)?,
    })
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id"
        ))?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

// ============================================================================
// TRANSACTION ENGINE
// ============================================================================

/// Create a new transaction and apply its effect to the account's balance.
///
/// The ledger write and the balance update happen inside one SQLite
/// transaction, so either both become visible or neither does.
///
/// # Errors
/// This function will return a:
/// - [Error::NonPositiveAmount] if `data.amount` is zero or negative,
/// - [Error::NotFound] if `data.account_id` does not refer to a valid account,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    data: TransactionData,
    now: PrimitiveDateTime,
    connection: &Connection,
) -> Result<Transaction, Error> {
    if data.amount <= Decimal::ZERO {
        return Err(Error::NonPositiveAmount(data.amount));
    }

    // Using unchecked_transaction because we only have &Connection from the MutexGuard.
    let tx = connection.unchecked_transaction()?;

    // Checked up front so a missing account reads as NotFound rather than a
    // foreign key failure on the insert.
    get_account(data.account_id, &tx)?;

    let transaction = tx
        .prepare(&format!(
            "INSERT INTO \"transaction\"
             (kind, amount, description, category_id, division, account_id, date_time,
              created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                data.kind.as_str(),
                data.amount.to_string(),
                &data.description,
                &data.category_id,
                &data.division,
                data.account_id,
                datetime::format(data.date_time),
                datetime::format(now),
                datetime::format(now),
            ),
            map_transaction_row,
        )?;

    update_balance(
        transaction.account_id,
        balance_delta(transaction.kind, transaction.amount),
        now,
        &tx,
    )?;

    tx.commit()?;

    tracing::info!(
        "Created {} transaction {} for account {}",
        transaction.kind.as_str(),
        transaction.id,
        transaction.account_id
    );

    Ok(transaction)
}

/// Overwrite a transaction's fields and move its balance effect accordingly.
///
/// The old effect is reverted on the old account, the row is overwritten,
/// and the new effect is applied to the new account, which may differ from
/// the old one. All three steps share one SQLite transaction.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction, or if
///   the new account does not exist,
/// - [Error::NotEditable] if the transaction's edit window has closed,
/// - [Error::NonPositiveAmount] if `data.amount` is zero or negative,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    data: TransactionData,
    now: PrimitiveDateTime,
    connection: &Connection,
) -> Result<Transaction, Error> {
    if data.amount <= Decimal::ZERO {
        return Err(Error::NonPositiveAmount(data.amount));
    }

    let tx = connection.unchecked_transaction()?;

    let existing = get_transaction(id, &tx)?;

    if !is_editable(existing.created_at, now) {
        return Err(Error::NotEditable(id));
    }

    update_balance(
        existing.account_id,
        -balance_delta(existing.kind, existing.amount),
        now,
        &tx,
    )?;

    // The new account may differ from the old one. Checked before the
    // update so a missing account reads as NotFound rather than a foreign
    // key failure.
    get_account(data.account_id, &tx)?;

    let updated = tx
        .prepare(&format!(
            "UPDATE \"transaction\"
             SET kind = ?1, amount = ?2, description = ?3, category_id = ?4, division = ?5,
                 account_id = ?6, date_time = ?7, updated_at = ?8
             WHERE id = ?9
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                data.kind.as_str(),
                data.amount.to_string(),
                &data.description,
                &data.category_id,
                &data.division,
                data.account_id,
                datetime::format(data.date_time),
                datetime::format(now),
                id,
            ),
            map_transaction_row,
        )?;

    update_balance(
        updated.account_id,
        balance_delta(updated.kind, updated.amount),
        now,
        &tx,
    )?;

    tx.commit()?;

    tracing::info!("Updated transaction {}", updated.id);

    Ok(updated)
}

/// Delete a transaction and revert its effect on the account's balance.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - [Error::NotEditable] if the transaction's edit window has closed,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_transaction(
    id: TransactionId,
    now: PrimitiveDateTime,
    connection: &Connection,
) -> Result<(), Error> {
    let tx = connection.unchecked_transaction()?;

    let existing = get_transaction(id, &tx)?;

    if !is_editable(existing.created_at, now) {
        return Err(Error::NotEditable(id));
    }

    update_balance(
        existing.account_id,
        -balance_delta(existing.kind, existing.amount),
        now,
        &tx,
    )?;

    tx.execute("DELETE FROM \"transaction\" WHERE id = :id", &[(":id", &id)])?;

    tx.commit()?;

    tracing::info!("Deleted transaction {}", id);

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
