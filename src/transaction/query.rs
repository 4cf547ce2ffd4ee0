//! Filtered queries over the transaction ledger.

use rusqlite::{Connection, types::Value};
use rust_decimal::Decimal;
use time::PrimitiveDateTime;

use crate::{
    Error, datetime,
    db::map_decimal,
    transaction::core::{Transaction, TransactionType, map_transaction_row},
};

/// The optional filters for listing transactions. Absent filters are
/// unconstrained.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Only include transactions with this division tag.
    pub division: Option<String>,
    /// Only include transactions in this category.
    pub category_id: Option<String>,
    /// Only include transactions on or after this date-time.
    pub start: Option<PrimitiveDateTime>,
    /// Only include transactions on or before this date-time.
    pub end: Option<PrimitiveDateTime>,
}

impl TransactionFilter {
    /// A filter that only constrains the business date to `[start, end]`.
    pub fn date_range(start: PrimitiveDateTime, end: PrimitiveDateTime) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            ..Self::default()
        }
    }
}

/// List the transactions matching `filter`, newest business date first.
///
/// The ordering of transactions sharing a `date_time` is unspecified.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_transactions(
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let mut sql = "SELECT id, kind, amount, description, category_id, division, account_id, \
         date_time, created_at, updated_at FROM \"transaction\" WHERE 1 = 1"
        .to_owned();
    let mut params: Vec<Value> = Vec::new();

    if let Some(division) = &filter.division {
        sql.push_str(&format!(" AND division = ?{}", params.len() + 1));
        params.push(Value::Text(division.clone()));
    }

    if let Some(category_id) = &filter.category_id {
        sql.push_str(&format!(" AND category_id = ?{}", params.len() + 1));
        params.push(Value::Text(category_id.clone()));
    }

    if let Some(start) = filter.start {
        sql.push_str(&format!(" AND date_time >= ?{}", params.len() + 1));
        params.push(Value::Text(datetime::format(start)));
    }

    if let Some(end) = filter.end {
        sql.push_str(&format!(" AND date_time <= ?{}", params.len() + 1));
        params.push(Value::Text(datetime::format(end)));
    }

    sql.push_str(" ORDER BY date_time DESC");

    connection
        .prepare(&sql)?
        .query_map(rusqlite::params_from_iter(params), map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Sum the amounts of all transactions of one type, optionally restricted to
/// a business-date range.
///
/// The result is always non-negative since stored amounts are positive.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn sum_amounts(
    kind: TransactionType,
    start: Option<PrimitiveDateTime>,
    end: Option<PrimitiveDateTime>,
    connection: &Connection,
) -> Result<Decimal, Error> {
    let mut sql = "SELECT amount FROM \"transaction\" WHERE kind = ?1".to_owned();
    let mut params: Vec<Value> = vec![Value::Text(kind.as_str().to_owned())];

    // Mirrors the range filter above: both bounds or neither.
    if let (Some(start), Some(end)) = (start, end) {
        sql.push_str(" AND date_time >= ?2 AND date_time <= ?3");
        params.push(Value::Text(datetime::format(start)));
        params.push(Value::Text(datetime::format(end)));
    }

    let amounts: Vec<Decimal> = connection
        .prepare(&sql)?
        .query_map(rusqlite::params_from_iter(params), |row| {
            map_decimal(row, 0)
        })?
        .collect::<Result<_, _>>()?;

    Ok(amounts.iter().sum())
}
