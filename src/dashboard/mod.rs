//! The dashboard: an overview of a user's spending per category, their
//! expenditures and budgets, and the JSON data behind its charts.

mod cards;
mod chart_data;
mod charts;
mod forms;
mod handlers;
mod tables;

pub use chart_data::{get_expenditure_types_json, get_total_spent_json};
pub use handlers::get_dashboard_page;
