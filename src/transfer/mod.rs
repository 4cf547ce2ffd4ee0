//! Transfers of money between accounts.

mod core;
mod endpoints;

pub use core::{
    NewTransfer, Transfer, create_transfer, create_transfer_table, delete_transfer,
    get_all_transfers, get_transfer, get_transfers_by_date_range, map_transfer_row,
};
pub use endpoints::{
    TransferDateRange, create_transfer_endpoint, delete_transfer_endpoint,
    get_transfer_endpoint, get_transfers_by_date_range_endpoint, get_transfers_endpoint,
};
