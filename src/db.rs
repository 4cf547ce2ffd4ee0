//! Database initialization and shared row-mapping helpers.

use rusqlite::{Connection, Row, Transaction as SqlTransaction, TransactionBehavior, types::Type};
use rust_decimal::Decimal;

use crate::{
    Error, account::create_account_table, category::create_category_table,
    transaction::create_transaction_table, transfer::create_transfer_table,
};

/// Create the tables for the domain models.
///
/// The tables are created within a single SQLite transaction so the schema
/// is either fully set up or not at all.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_account_table(&transaction)?;
    create_category_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_transfer_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Read a TEXT column as a fixed-point [Decimal].
///
/// Money amounts are stored as decimal strings rather than SQLite REALs so
/// repeated balance updates cannot accumulate floating-point drift.
pub fn map_decimal(row: &Row, index: usize) -> Result<Decimal, rusqlite::Error> {
    let text: String = row.get(index)?;

    text.parse::<Decimal>().map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error))
    })
}
