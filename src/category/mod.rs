//! Categories for labelling income and expense transactions.

mod core;
mod endpoints;

pub use core::{
    Category, NewCategory, count_category_references, create_category, create_category_table,
    delete_category, get_all_categories, get_categories_by_type, get_category, map_category_row,
    update_category,
};
pub use endpoints::{
    UpdateCategory, create_category_endpoint, delete_category_endpoint,
    get_categories_by_type_endpoint, get_categories_endpoint, get_category_endpoint,
    update_category_endpoint,
};
