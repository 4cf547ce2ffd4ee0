//! Defines the category model and its database queries.
//!
//! Categories are keyed by caller-chosen string IDs such as "groceries".
//! Transactions store the category ID directly and do not require it to
//! exist, so dashboard code must tolerate IDs with no matching category.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

use crate::{
    Error,
    database_id::CategoryId,
    datetime,
    transaction::{TransactionType, map_transaction_type},
};

/// A label for grouping transactions, e.g. "groceries" or "salary".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// The caller-chosen ID of the category, e.g. "groceries".
    pub id: CategoryId,
    /// The display name of the category.
    pub name: String,
    /// The display icon of the category, e.g. "ShoppingCart".
    pub icon: String,
    /// Whether the category applies to income or expense transactions.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// When the category was created.
    #[serde(with = "datetime::iso")]
    pub created_at: PrimitiveDateTime,
    /// When the category was last modified.
    #[serde(with = "datetime::iso")]
    pub updated_at: PrimitiveDateTime,
}

/// The data needed to create a [Category].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    /// The caller-chosen ID of the category.
    pub id: CategoryId,
    /// The display name of the category.
    pub name: String,
    /// The display icon of the category.
    pub icon: String,
    /// Whether the category applies to income or expense transactions.
    #[serde(rename = "type")]
    pub kind: TransactionType,
}

/// Create the category table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS category (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                icon TEXT NOT NULL,
                kind TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Category].
pub fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
        icon: row.get(2)?,
        kind: map_transaction_type(row, 3)?,
        created_at: datetime::map_column(row, 4)?,
        updated_at: datetime::map_column(row, 5)?,
    })
}

/// Create a new category in the database.
///
/// # Errors
/// Returns an [Error::SqlError] if a category with the same ID already
/// exists or if there is some other SQL error.
pub fn create_category(
    new_category: NewCategory,
    now: PrimitiveDateTime,
    connection: &Connection,
) -> Result<Category, Error> {
    let category = connection
        .prepare(
            "INSERT INTO category (id, name, icon, kind, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, name, icon, kind, created_at, updated_at",
        )?
        .query_row(
            (
                &new_category.id,
                &new_category.name,
                &new_category.icon,
                new_category.kind.as_str(),
                datetime::format(now),
                datetime::format(now),
            ),
            map_category_row,
        )?;

    tracing::info!("Created category: {} - {}", category.id, category.name);

    Ok(category)
}

/// Retrieve a category from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_category(id: &str, connection: &Connection) -> Result<Category, Error> {
    let category = connection
        .prepare(
            "SELECT id, name, icon, kind, created_at, updated_at FROM category WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_category_row)?;

    Ok(category)
}

/// Retrieve every category in the database.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name, icon, kind, created_at, updated_at FROM category")?
        .query_map([], map_category_row)?
        .map(|maybe_category| maybe_category.map_err(Error::from))
        .collect()
}

/// Retrieve the categories of the given type, e.g. all income categories.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_categories_by_type(
    kind: TransactionType,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, name, icon, kind, created_at, updated_at FROM category
             WHERE kind = :kind",
        )?
        .query_map(&[(":kind", &kind.as_str())], map_category_row)?
        .map(|maybe_category| maybe_category.map_err(Error::from))
        .collect()
}

/// Rename a category or change its icon.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_category(
    id: &str,
    name: &str,
    icon: &str,
    now: PrimitiveDateTime,
    connection: &Connection,
) -> Result<Category, Error> {
    let category = connection
        .prepare(
            "UPDATE category SET name = ?1, icon = ?2, updated_at = ?3 WHERE id = ?4
             RETURNING id, name, icon, kind, created_at, updated_at",
        )?
        .query_row((name, icon, datetime::format(now), id), map_category_row)?;

    tracing::info!("Updated category: {}", category.id);

    Ok(category)
}

/// Count the transactions referencing a category.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn count_category_references(id: &str, connection: &Connection) -> Result<i64, Error> {
    let count = connection.query_row(
        "SELECT COUNT(id) FROM \"transaction\" WHERE category_id = :id",
        &[(":id", &id)],
        |row| row.get(0),
    )?;

    Ok(count)
}

/// Delete a category.
///
/// # Errors
/// This function will return a:
/// - [Error::CategoryInUse] if transactions still reference the category,
/// - [Error::NotFound] if `id` does not refer to a valid category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_category(id: &str, connection: &Connection) -> Result<(), Error> {
    if count_category_references(id, connection)? > 0 {
        return Err(Error::CategoryInUse(id.to_owned()));
    }

    let rows_affected =
        connection.execute("DELETE FROM category WHERE id = :id", &[(":id", &id)])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    tracing::info!("Deleted category: {}", id);

    Ok(())
}
