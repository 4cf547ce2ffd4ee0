//! Accounts and the balance bookkeeping that keeps them consistent with the
//! ledger of transactions and transfers.

mod core;
mod endpoints;

pub use core::{
    Account, NewAccount, count_account_references, create_account, create_account_table,
    delete_account, get_account, get_all_accounts, get_total_balance, map_account_row,
    update_account, update_balance,
};
pub use endpoints::{
    TotalBalance, UpdateAccount, create_account_endpoint, delete_account_endpoint,
    get_account_endpoint, get_accounts_endpoint, get_total_balance_endpoint,
    update_account_endpoint,
};
