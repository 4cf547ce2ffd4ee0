//! Folds the transaction ledger into the dashboard's summary figures.

use std::collections::HashMap;

use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use time::Date;
use time::macros::time;

use crate::{
    Error,
    category::get_all_categories,
    dashboard::period::{PeriodKind, trailing_periods},
    database_id::CategoryId,
    transaction::{
        TransactionFilter, TransactionType, get_transactions, sum_amounts,
    },
};

/// The icon used for transactions whose category ID has no matching
/// category.
const FALLBACK_ICON: &str = "Receipt";

/// The accumulated totals for one category of transactions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    /// The category ID the transactions carry.
    pub category_id: CategoryId,
    /// The category's display name, or the raw ID if the category does not
    /// exist.
    pub category_name: String,
    /// The category's display icon, or "Receipt" if the category does not
    /// exist.
    pub icon: String,
    /// The type of the transactions in this bucket.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// The sum of the bucket's transaction amounts.
    pub total_amount: Decimal,
    /// How many transactions are in the bucket.
    pub count: usize,
}

/// The income and expense totals for one calendar period.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodPoint {
    /// A short label for the period, e.g. "Jan 2024".
    pub label: String,
    /// The sum of income amounts within the period.
    pub income: Decimal,
    /// The sum of expense amounts within the period.
    pub expense: Decimal,
}

/// The full dashboard summary for a date range.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// The sum of income amounts within the range.
    pub total_income: Decimal,
    /// The sum of expense amounts within the range.
    pub total_expense: Decimal,
    /// Income minus expense over the range. A report figure only, distinct
    /// from any account's running balance.
    pub balance: Decimal,
    /// Per-category totals within the range, largest first.
    pub category_breakdown: Vec<CategorySummary>,
    /// Trailing per-period income and expense, oldest first.
    pub period_comparison: Vec<PeriodPoint>,
}

/// Partition the transactions in a date range by category and accumulate
/// totals, largest total first.
///
/// A transaction's category ID need not resolve to a stored category; such
/// buckets fall back to the raw ID as the display name and "Receipt" as the
/// icon.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn category_summary(
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<CategorySummary>, Error> {
    let categories: HashMap<CategoryId, _> = get_all_categories(connection)?
        .into_iter()
        .map(|category| (category.id.clone(), category))
        .collect();

    let mut buckets: HashMap<CategoryId, CategorySummary> = HashMap::new();

    for transaction in get_transactions(filter, connection)? {
        let bucket = buckets
            .entry(transaction.category_id.clone())
            .or_insert_with(|| {
                let (category_name, icon) = match categories.get(&transaction.category_id) {
                    Some(category) => (category.name.clone(), category.icon.clone()),
                    None => (transaction.category_id.clone(), FALLBACK_ICON.to_owned()),
                };

                CategorySummary {
                    category_id: transaction.category_id.clone(),
                    category_name,
                    icon,
                    kind: transaction.kind,
                    total_amount: Decimal::ZERO,
                    count: 0,
                }
            });

        bucket.total_amount += transaction.amount;
        bucket.count += 1;
    }

    let mut summaries: Vec<CategorySummary> = buckets.into_values().collect();
    // Hash maps have no iteration order, so impose one for consumers.
    summaries.sort_by(|a, b| b.total_amount.cmp(&a.total_amount));

    Ok(summaries)
}

/// The income and expense totals for each trailing period of `kind`, ending
/// with the period containing `today`, oldest first.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn period_comparison(
    kind: PeriodKind,
    today: Date,
    connection: &Connection,
) -> Result<Vec<PeriodPoint>, Error> {
    trailing_periods(kind, today)
        .into_iter()
        .map(|range| {
            let start = range.start.midnight();
            let end = range.end.with_time(time!(23:59:59));
            let income = sum_amounts(TransactionType::Income, Some(start), Some(end), connection)?;
            let expense =
                sum_amounts(TransactionType::Expense, Some(start), Some(end), connection)?;

            Ok(PeriodPoint {
                label: kind.label(range),
                income,
                expense,
            })
        })
        .collect()
}

/// Build the full dashboard summary for the current calendar period of
/// `kind`.
///
/// The totals and category breakdown cover the current period only; just
/// the embedded comparison series reaches back over the trailing periods.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn dashboard_summary(
    kind: PeriodKind,
    today: Date,
    connection: &Connection,
) -> Result<DashboardSummary, Error> {
    let range = kind.bounds(today);
    let start = range.start.midnight();
    let end = range.end.with_time(time!(23:59:59));

    summarize(start, end, kind, today, connection)
}

/// Build the full dashboard summary for an arbitrary date range.
///
/// The embedded period comparison always uses trailing months ending today,
/// independent of the custom range.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn custom_summary(
    start: Date,
    end: Date,
    today: Date,
    connection: &Connection,
) -> Result<DashboardSummary, Error> {
    summarize(
        start.midnight(),
        end.with_time(time!(23:59:59)),
        PeriodKind::Monthly,
        today,
        connection,
    )
}

fn summarize(
    start: time::PrimitiveDateTime,
    end: time::PrimitiveDateTime,
    kind: PeriodKind,
    today: Date,
    connection: &Connection,
) -> Result<DashboardSummary, Error> {
    let total_income = sum_amounts(TransactionType::Income, Some(start), Some(end), connection)?;
    let total_expense =
        sum_amounts(TransactionType::Expense, Some(start), Some(end), connection)?;
    let category_breakdown =
        category_summary(&TransactionFilter::date_range(start, end), connection)?;
    let period_comparison = period_comparison(kind, today, connection)?;

    Ok(DashboardSummary {
        total_income,
        total_expense,
        balance: total_income - total_expense,
        category_breakdown,
        period_comparison,
    })
}

#[cfg(test)]
mod summary_tests {
    use rusqlite::Connection;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use time::{PrimitiveDateTime, macros::date, macros::datetime};

    use crate::{
        account::{NewAccount, create_account},
        category::{NewCategory, create_category},
        dashboard::period::PeriodKind,
        database_id::AccountId,
        db::initialize,
        transaction::{TransactionData, TransactionFilter, TransactionType, create_transaction},
    };

    use super::{category_summary, dashboard_summary, period_comparison};

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn create_test_account(connection: &Connection) -> AccountId {
        create_account(
            NewAccount {
                name: "Cash".to_owned(),
                balance: Some(dec!(10000)),
                color: "#2dd4bf".to_owned(),
            },
            datetime!(2024-01-01 00:00:00),
            connection,
        )
        .unwrap()
        .id
    }

    fn insert(
        kind: TransactionType,
        amount: Decimal,
        category_id: &str,
        date_time: PrimitiveDateTime,
        account_id: AccountId,
        connection: &Connection,
    ) {
        create_transaction(
            TransactionData {
                kind,
                amount,
                description: "Test".to_owned(),
                category_id: category_id.to_owned(),
                division: "Personal".to_owned(),
                account_id,
                date_time,
            },
            datetime!(2024-01-20 12:00:00),
            connection,
        )
        .unwrap();
    }

    #[test]
    fn groups_by_category_and_resolves_names() {
        let connection = get_test_connection();
        let account = create_test_account(&connection);
        create_category(
            NewCategory {
                id: "groceries".to_owned(),
                name: "Groceries".to_owned(),
                icon: "ShoppingCart".to_owned(),
                kind: TransactionType::Expense,
            },
            datetime!(2024-01-01 00:00:00),
            &connection,
        )
        .unwrap();
        insert(
            TransactionType::Expense,
            dec!(50),
            "groceries",
            datetime!(2024-01-10 09:00:00),
            account,
            &connection,
        );
        insert(
            TransactionType::Expense,
            dec!(30),
            "groceries",
            datetime!(2024-01-11 09:00:00),
            account,
            &connection,
        );

        let summaries =
            category_summary(&TransactionFilter::default(), &connection).unwrap();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].category_name, "Groceries");
        assert_eq!(summaries[0].icon, "ShoppingCart");
        assert_eq!(summaries[0].total_amount, dec!(80));
        assert_eq!(summaries[0].count, 2);
    }

    #[test]
    fn dangling_category_falls_back_to_raw_id() {
        let connection = get_test_connection();
        let account = create_test_account(&connection);
        insert(
            TransactionType::Expense,
            dec!(25),
            "mystery",
            datetime!(2024-01-10 09:00:00),
            account,
            &connection,
        );

        let summaries =
            category_summary(&TransactionFilter::default(), &connection).unwrap();

        assert_eq!(summaries[0].category_name, "mystery");
        assert_eq!(summaries[0].icon, "Receipt");
    }

    #[test]
    fn summaries_are_sorted_largest_first() {
        let connection = get_test_connection();
        let account = create_test_account(&connection);
        insert(
            TransactionType::Expense,
            dec!(10),
            "coffee",
            datetime!(2024-01-10 09:00:00),
            account,
            &connection,
        );
        insert(
            TransactionType::Expense,
            dec!(500),
            "rent",
            datetime!(2024-01-10 10:00:00),
            account,
            &connection,
        );
        insert(
            TransactionType::Expense,
            dec!(80),
            "groceries",
            datetime!(2024-01-10 11:00:00),
            account,
            &connection,
        );

        let summaries =
            category_summary(&TransactionFilter::default(), &connection).unwrap();

        let ids: Vec<&str> = summaries
            .iter()
            .map(|summary| summary.category_id.as_str())
            .collect();
        assert_eq!(ids, vec!["rent", "groceries", "coffee"]);
    }

    #[test]
    fn category_totals_match_type_totals() {
        let connection = get_test_connection();
        let account = create_test_account(&connection);
        insert(
            TransactionType::Income,
            dec!(2000),
            "salary",
            datetime!(2024-01-15 09:00:00),
            account,
            &connection,
        );
        insert(
            TransactionType::Income,
            dec!(150),
            "interest",
            datetime!(2024-01-16 09:00:00),
            account,
            &connection,
        );
        insert(
            TransactionType::Expense,
            dec!(120),
            "rent",
            datetime!(2024-01-12 09:00:00),
            account,
            &connection,
        );

        let summary =
            dashboard_summary(PeriodKind::Monthly, date!(2024 - 01 - 20), &connection).unwrap();

        let income_total: Decimal = summary
            .category_breakdown
            .iter()
            .filter(|bucket| bucket.kind == TransactionType::Income)
            .map(|bucket| bucket.total_amount)
            .sum();
        let expense_total: Decimal = summary
            .category_breakdown
            .iter()
            .filter(|bucket| bucket.kind == TransactionType::Expense)
            .map(|bucket| bucket.total_amount)
            .sum();
        assert_eq!(income_total, summary.total_income);
        assert_eq!(expense_total, summary.total_expense);
        assert_eq!(summary.balance, dec!(2030));
    }

    #[test]
    fn monthly_summary_totals_cover_current_month_only() {
        let connection = get_test_connection();
        let account = create_test_account(&connection);
        insert(
            TransactionType::Expense,
            dec!(500),
            "rent",
            datetime!(2023-10-05 09:00:00),
            account,
            &connection,
        );
        insert(
            TransactionType::Expense,
            dec!(200),
            "rent",
            datetime!(2024-01-05 09:00:00),
            account,
            &connection,
        );

        let summary =
            dashboard_summary(PeriodKind::Monthly, date!(2024 - 01 - 20), &connection).unwrap();

        assert_eq!(summary.total_expense, dec!(200));
        assert_eq!(summary.category_breakdown[0].total_amount, dec!(200));
        // Only the comparison series reaches back past the current month.
        let october = summary
            .period_comparison
            .iter()
            .find(|point| point.label == "Oct 2023")
            .unwrap();
        assert_eq!(october.expense, dec!(500));
    }

    #[test]
    fn period_points_bucket_by_month() {
        let connection = get_test_connection();
        let account = create_test_account(&connection);
        insert(
            TransactionType::Expense,
            dec!(100),
            "rent",
            datetime!(2023-12-05 09:00:00),
            account,
            &connection,
        );
        insert(
            TransactionType::Expense,
            dec!(200),
            "rent",
            datetime!(2024-01-05 09:00:00),
            account,
            &connection,
        );
        insert(
            TransactionType::Income,
            dec!(1000),
            "salary",
            datetime!(2024-01-15 09:00:00),
            account,
            &connection,
        );

        let points =
            period_comparison(PeriodKind::Monthly, date!(2024 - 01 - 20), &connection).unwrap();

        assert_eq!(points.len(), 6);
        assert_eq!(points[5].label, "Jan 2024");
        assert_eq!(points[5].income, dec!(1000));
        assert_eq!(points[5].expense, dec!(200));
        assert_eq!(points[4].label, "Dec 2023");
        assert_eq!(points[4].expense, dec!(100));
        assert_eq!(points[0].label, "Aug 2023");
        assert_eq!(points[0].income, Decimal::ZERO);
    }

    #[test]
    fn empty_ledger_gives_zeroed_summary() {
        let connection = get_test_connection();

        let summary =
            dashboard_summary(PeriodKind::Weekly, date!(2024 - 01 - 20), &connection).unwrap();

        assert_eq!(summary.total_income, Decimal::ZERO);
        assert_eq!(summary.total_expense, Decimal::ZERO);
        assert_eq!(summary.balance, Decimal::ZERO);
        assert!(summary.category_breakdown.is_empty());
        assert_eq!(summary.period_comparison.len(), 4);
    }
}
