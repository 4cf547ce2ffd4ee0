//! Application router configuration.

use axum::{Router, routing::get};

use crate::{
    AppState,
    account::{
        create_account_endpoint, delete_account_endpoint, get_account_endpoint,
        get_accounts_endpoint, get_total_balance_endpoint, update_account_endpoint,
    },
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_by_type_endpoint,
        get_categories_endpoint, get_category_endpoint, update_category_endpoint,
    },
    dashboard::{
        get_category_summary_endpoint, get_custom_summary_endpoint,
        get_dashboard_summary_endpoint, get_totals_endpoint,
    },
    endpoints,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
        get_transactions_endpoint, update_transaction_endpoint,
    },
    transfer::{
        create_transfer_endpoint, delete_transfer_endpoint, get_transfer_endpoint,
        get_transfers_by_date_range_endpoint, get_transfers_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::ACCOUNTS,
            get(get_accounts_endpoint).post(create_account_endpoint),
        )
        .route(endpoints::TOTAL_BALANCE, get(get_total_balance_endpoint))
        .route(
            endpoints::ACCOUNT,
            get(get_account_endpoint)
                .put(update_account_endpoint)
                .delete(delete_account_endpoint),
        )
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(update_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::TRANSFERS,
            get(get_transfers_endpoint).post(create_transfer_endpoint),
        )
        .route(
            endpoints::TRANSFERS_DATE_RANGE,
            get(get_transfers_by_date_range_endpoint),
        )
        .route(
            endpoints::TRANSFER,
            get(get_transfer_endpoint).delete(delete_transfer_endpoint),
        )
        .route(
            endpoints::CATEGORIES,
            get(get_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::CATEGORIES_BY_TYPE,
            get(get_categories_by_type_endpoint),
        )
        .route(
            endpoints::CATEGORY,
            get(get_category_endpoint)
                .put(update_category_endpoint)
                .delete(delete_category_endpoint),
        )
        .route(
            endpoints::DASHBOARD_CUSTOM_SUMMARY,
            get(get_custom_summary_endpoint),
        )
        .route(
            endpoints::DASHBOARD_SUMMARY,
            get(get_dashboard_summary_endpoint),
        )
        .route(
            endpoints::DASHBOARD_CATEGORY_SUMMARY,
            get(get_category_summary_endpoint),
        )
        .route(endpoints::DASHBOARD_TOTALS, get(get_totals_endpoint))
        .with_state(state)
}
