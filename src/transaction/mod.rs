//! Income and expense transactions, the edit-window policy, and the engine
//! that keeps account balances consistent with the ledger.

mod core;
mod endpoints;
mod policy;
mod query;

pub use core::{
    Transaction, TransactionData, TransactionType, balance_delta, create_transaction,
    create_transaction_table, delete_transaction, get_transaction, map_transaction_row,
    map_transaction_type, update_transaction,
};
pub use endpoints::{
    TransactionQuery, TransactionResponse, create_transaction_endpoint,
    delete_transaction_endpoint, get_transaction_endpoint, get_transactions_endpoint,
    update_transaction_endpoint,
};
pub use policy::{EDIT_WINDOW, is_editable};
pub use query::{TransactionFilter, get_transactions, sum_amounts};
