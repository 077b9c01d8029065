//! Budgets cap how much a user wants to spend in a category between two dates.

mod core;
mod create_endpoint;
mod delete_endpoint;

pub use core::{
    Budget, NewBudget, create_budget_table, delete_budget, get_budget_for_category,
    get_budgets_for_user, replace_budget,
};
pub use create_endpoint::create_budget_endpoint;
pub use delete_endpoint::delete_budget_endpoint;

#[cfg(test)]
pub(crate) use core::get_budget;
