//! Expenditures are the purchases a user records, one category each.

mod core;
mod create_endpoint;
mod delete_endpoint;

pub use core::{
    Expenditure, NewExpenditure, create_expenditure, create_expenditure_table, delete_expenditure,
    get_expenditure_by_tracking_number, get_expenditures_for_user, map_expenditure_row,
};
pub use create_endpoint::create_expenditure_endpoint;
pub use delete_endpoint::delete_expenditure_endpoint;

#[cfg(test)]
pub(crate) use core::get_expenditure;
