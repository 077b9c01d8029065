//! Read-only reporting over a user's expenditures and budgets.
//!
//! Every function here filters by owner in SQL and treats date windows as
//! inclusive on both ends.

use std::ops::RangeInclusive;

use rusqlite::Connection;
use serde::Serialize;
use time::{Date, Duration};

use crate::{
    Error,
    budget::get_budget_for_category,
    category::Category,
    expenditure::{Expenditure, map_expenditure_row},
    user::UserID,
};

/// The number of days before today covered by the default reporting window.
pub const TRAILING_WINDOW_DAYS: i64 = 30;

/// The sum and mean of the prices of a set of expenditures.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct CategoryTotals {
    /// The sum of the prices.
    pub total: f64,
    /// Zero when there are no expenditures.
    pub average: f64,
    /// How many expenditures were summed.
    pub count: i64,
}

/// The figures shown for one category on the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySummary {
    /// The category the figures are for.
    pub category: Category,
    /// The budget's dates, or the trailing window if there is no budget.
    pub window: RangeInclusive<Date>,
    /// The spending in the category over `window`.
    pub totals: CategoryTotals,
    /// `None` when the user has not set a budget for the category.
    pub remaining: Option<f64>,
}

/// The window covering today and the [TRAILING_WINDOW_DAYS] days before it.
pub fn trailing_window(today: Date) -> RangeInclusive<Date> {
    today.saturating_sub(Duration::days(TRAILING_WINDOW_DAYS))..=today
}

/// Sum and average the prices of the user's expenditures in `category` that
/// fall within `window`.
pub fn category_totals(
    category: Category,
    user_id: UserID,
    window: &RangeInclusive<Date>,
    connection: &Connection,
) -> Result<CategoryTotals, Error> {
    let (total, count): (f64, i64) = connection
        .prepare(
            "SELECT COALESCE(SUM(price), 0), COUNT(id) FROM expenditure \
            WHERE user_id = ?1 AND category_id = ?2 AND date BETWEEN ?3 AND ?4",
        )?
        .query_row(
            (user_id.as_i64(), category, window.start(), window.end()),
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

    let average = if count == 0 {
        0.0
    } else {
        total / count as f64
    };

    Ok(CategoryTotals {
        total,
        average,
        count,
    })
}

/// How much of the user's budget for `category` is left after spending
/// `total_spent`.
///
/// Returns `None` if the user has no budget for the category. The result is
/// negative when the user has overspent.
pub fn budget_remaining(
    category: Category,
    user_id: UserID,
    total_spent: f64,
    connection: &Connection,
) -> Result<Option<f64>, Error> {
    let budget = get_budget_for_category(user_id, category, connection)?;

    Ok(budget.map(|budget| budget.amount - total_spent))
}

/// The dates to report `category` over: the budget's dates if the user has
/// a budget, otherwise the [trailing_window] ending `today`.
pub fn effective_budget_window(
    category: Category,
    user_id: UserID,
    today: Date,
    connection: &Connection,
) -> Result<RangeInclusive<Date>, Error> {
    let budget = get_budget_for_category(user_id, category, connection)?;

    Ok(match budget {
        Some(budget) => budget.start_date..=budget.end_date,
        None => trailing_window(today),
    })
}

/// Get the user's expenditures dated within `window`, oldest first.
///
/// Part of the library API for callers that report on a date range; the
/// dashboard itself lists every expenditure the user has recorded.
pub fn get_expenditures_in_window(
    user_id: UserID,
    window: &RangeInclusive<Date>,
    connection: &Connection,
) -> Result<Vec<Expenditure>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, category_id, price, date, where_bought, description, \
            tracking_num, tracking_num_carrier FROM expenditure \
            WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3 \
            ORDER BY date ASC, id ASC",
        )?
        .query_map(
            (user_id.as_i64(), window.start(), window.end()),
            map_expenditure_row,
        )?
        .map(|maybe_expenditure| maybe_expenditure.map_err(Error::from))
        .collect()
}

/// Summarize every category over its own effective budget window.
///
/// The summaries are in [Category::ALL] order.
pub fn summarize_categories(
    user_id: UserID,
    today: Date,
    connection: &Connection,
) -> Result<Vec<CategorySummary>, Error> {
    Category::ALL
        .into_iter()
        .map(|category| {
            let window = effective_budget_window(category, user_id, today, connection)?;
            let totals = category_totals(category, user_id, &window, connection)?;
            let remaining = budget_remaining(category, user_id, totals.total, connection)?;

            Ok(CategorySummary {
                category,
                window,
                totals,
                remaining,
            })
        })
        .collect()
}

/// Total and average every category over the same `window`.
///
/// The totals are in [Category::ALL] order.
pub fn totals_by_category(
    user_id: UserID,
    window: &RangeInclusive<Date>,
    connection: &Connection,
) -> Result<Vec<(Category, CategoryTotals)>, Error> {
    Category::ALL
        .into_iter()
        .map(|category| {
            category_totals(category, user_id, window, connection).map(|totals| (category, totals))
        })
        .collect()
}
