//! Defines the JSON endpoints for the dashboard.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::macros::time;

use crate::{
    AppState, Error,
    dashboard::{
        period::PeriodKind,
        summary::{CategorySummary, DashboardSummary, category_summary, custom_summary,
            dashboard_summary},
    },
    datetime, timezone,
    transaction::{TransactionFilter, TransactionType, sum_amounts},
};

/// The query parameters for a custom dashboard date range, e.g.
/// `GET /api/dashboard/summary/custom?startDate=2024-01-01&endDate=2024-03-31`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomRange {
    /// The first day to include.
    pub start_date: String,
    /// The last day to include.
    pub end_date: String,
}

/// The optional date-range parameters shared by the category-summary and
/// totals endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionalRange {
    /// The first day to include.
    pub start_date: Option<String>,
    /// The last day to include.
    pub end_date: Option<String>,
}

/// Income and expense totals with their difference.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// The sum of income amounts.
    pub total_income: Decimal,
    /// The sum of expense amounts.
    pub total_expense: Decimal,
    /// Income minus expense. A report figure, not an account balance.
    pub balance: Decimal,
}

fn parse_date(text: String) -> Result<time::Date, Error> {
    datetime::parse_date(&text).map_err(|_| Error::InvalidDate(text))
}

/// A route handler for the dashboard summary over trailing weekly, monthly
/// or yearly periods.
pub async fn get_dashboard_summary_endpoint(
    State(state): State<AppState>,
    Path(kind): Path<PeriodKind>,
) -> Result<Json<DashboardSummary>, Error> {
    let today = timezone::local_now(&state.local_timezone)?.date();
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    dashboard_summary(kind, today, &connection).map(Json)
}

/// A route handler for the dashboard summary over an arbitrary date range.
pub async fn get_custom_summary_endpoint(
    State(state): State<AppState>,
    Query(range): Query<CustomRange>,
) -> Result<Json<DashboardSummary>, Error> {
    let start = parse_date(range.start_date)?;
    let end = parse_date(range.end_date)?;
    let today = timezone::local_now(&state.local_timezone)?.date();
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    custom_summary(start, end, today, &connection).map(Json)
}

/// A route handler for the per-category totals, optionally restricted to a
/// date range.
pub async fn get_category_summary_endpoint(
    State(state): State<AppState>,
    Query(range): Query<OptionalRange>,
) -> Result<Json<Vec<CategorySummary>>, Error> {
    let filter = optional_range_filter(range)?;
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    category_summary(&filter, &connection).map(Json)
}

/// A route handler for the income and expense totals, optionally restricted
/// to a date range.
pub async fn get_totals_endpoint(
    State(state): State<AppState>,
    Query(range): Query<OptionalRange>,
) -> Result<Json<Totals>, Error> {
    let filter = optional_range_filter(range)?;
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let total_income = sum_amounts(
        TransactionType::Income,
        filter.start,
        filter.end,
        &connection,
    )?;
    let total_expense = sum_amounts(
        TransactionType::Expense,
        filter.start,
        filter.end,
        &connection,
    )?;

    Ok(Json(Totals {
        total_income,
        total_expense,
        balance: total_income - total_expense,
    }))
}

fn optional_range_filter(range: OptionalRange) -> Result<TransactionFilter, Error> {
    let start = match range.start_date {
        Some(text) => Some(parse_date(text)?.midnight()),
        None => None,
    };
    let end = match range.end_date {
        Some(text) => Some(parse_date(text)?.with_time(time!(23:59:59))),
        None => None,
    };

    Ok(TransactionFilter {
        start,
        end,
        ..TransactionFilter::default()
    })
}
