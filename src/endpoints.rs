//! The API endpoint URIs.

/// The route to list and create accounts.
pub const ACCOUNTS: &str = "/api/accounts";
/// The route to get, update and delete a single account.
pub const ACCOUNT: &str = "/api/accounts/{account_id}";
/// The route to get the total balance across all accounts.
pub const TOTAL_BALANCE: &str = "/api/accounts/total-balance";

/// The route to list (with filters) and create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to get, update and delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";

/// The route to list and create transfers.
pub const TRANSFERS: &str = "/api/transfers";
/// The route to get and delete a single transfer.
pub const TRANSFER: &str = "/api/transfers/{transfer_id}";
/// The route to list transfers within a date range.
pub const TRANSFERS_DATE_RANGE: &str = "/api/transfers/date-range";

/// The route to list and create categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route to get, update and delete a single category.
pub const CATEGORY: &str = "/api/categories/{category_id}";
/// The route to list the categories of one type.
pub const CATEGORIES_BY_TYPE: &str = "/api/categories/type/{kind}";

/// The route for the dashboard summary over trailing periods.
pub const DASHBOARD_SUMMARY: &str = "/api/dashboard/summary/{kind}";
/// The route for the dashboard summary over a custom date range.
pub const DASHBOARD_CUSTOM_SUMMARY: &str = "/api/dashboard/summary/custom";
/// The route for the per-category totals.
pub const DASHBOARD_CATEGORY_SUMMARY: &str = "/api/dashboard/category-summary";
/// The route for the income and expense totals.
pub const DASHBOARD_TOTALS: &str = "/api/dashboard/totals";
