//! JSON endpoints with the trailing-30-day figures for the dashboard charts.
//!
//! The payloads keep the layout of the Chart.js configs the dashboard was
//! first built with, so external scripts that read them keep working.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    aggregation::{CategoryTotals, totals_by_category, trailing_window},
    category::Category,
    timezone::local_today,
    user::UserID,
};

/// The order of the bars in the bar chart.
pub(super) const BAR_CHART_CATEGORIES: [Category; 6] = [
    Category::Food,
    Category::Groceries,
    Category::Clothing,
    Category::Entertainment,
    Category::Travel,
    Category::OnlinePurchase,
];

/// The slices of the donut chart in order, with their colour and highlight colour.
pub(super) const DONUT_CHART_SLICES: [(Category, &str, &str); 6] = [
    (Category::Travel, "#F7464A", "#FF5A5E"),
    (Category::Entertainment, "#46BFBD", "#5AD3D1"),
    (Category::Groceries, "#4dff4d", "#5AD3D1"),
    (Category::Clothing, "#bf80ff", "#5AD3D1"),
    (Category::Food, "#ffcc80", "#5AD3D1"),
    (Category::OnlinePurchase, "blue", "#FFC870"),
];

/// The state needed to compute the chart data.
#[derive(Debug, Clone)]
pub struct ChartDataState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ChartDataState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// One series of the bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarDataset {
    pub label: String,
    pub fill_color: String,
    pub stroke_color: String,
    pub point_color: String,
    pub point_stroke_color: String,
    pub point_highlight_fill: String,
    pub point_highlight_stroke: String,
    pub data: Vec<f64>,
}

impl BarDataset {
    fn new(label: &str, rgb: &str, data: Vec<f64>) -> Self {
        Self {
            label: label.to_owned(),
            fill_color: format!("rgba({rgb},0.2)"),
            stroke_color: format!("rgba({rgb},1)"),
            point_color: format!("rgba({rgb},1)"),
            point_stroke_color: "#fff".to_owned(),
            point_highlight_fill: "#fff".to_owned(),
            point_highlight_stroke: format!("rgba({rgb},1)"),
            data,
        }
    }
}

/// The totals and averages per category for the bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalSpentData {
    pub labels: Vec<String>,
    pub datasets: Vec<BarDataset>,
}

/// One slice of the donut chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonutSlice {
    pub value: f64,
    pub color: String,
    pub highlight: String,
    pub label: String,
}

/// The totals per category for the donut chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenditureTypesData {
    pub expenditures: Vec<DonutSlice>,
}

/// Look up the totals for `category`, zero if it is missing.
pub(super) fn totals_for(
    category: Category,
    totals: &[(Category, CategoryTotals)],
) -> CategoryTotals {
    totals
        .iter()
        .find(|(other, _)| *other == category)
        .map(|(_, totals)| *totals)
        .unwrap_or_default()
}

pub(super) fn total_spent_data(totals: &[(Category, CategoryTotals)]) -> TotalSpentData {
    let labels = BAR_CHART_CATEGORIES
        .iter()
        .map(|category| category.name().to_owned())
        .collect();
    let sums = BAR_CHART_CATEGORIES
        .iter()
        .map(|&category| totals_for(category, totals).total)
        .collect();
    let averages = BAR_CHART_CATEGORIES
        .iter()
        .map(|&category| totals_for(category, totals).average)
        .collect();

    TotalSpentData {
        labels,
        datasets: vec![
            BarDataset::new("Total Spent", "220,220,220", sums),
            BarDataset::new("Average", "151,187,205", averages),
        ],
    }
}

pub(super) fn expenditure_types_data(
    totals: &[(Category, CategoryTotals)],
) -> ExpenditureTypesData {
    let expenditures = DONUT_CHART_SLICES
        .iter()
        .map(|&(category, color, highlight)| DonutSlice {
            value: totals_for(category, totals).total,
            color: color.to_owned(),
            highlight: highlight.to_owned(),
            label: category.name().to_owned(),
        })
        .collect();

    ExpenditureTypesData { expenditures }
}

/// Get the user's totals per category over the 30 days up to today.
fn trailing_totals(
    state: &ChartDataState,
    user_id: UserID,
) -> Result<Vec<(Category, CategoryTotals)>, Error> {
    let today = local_today(&state.local_timezone)?;
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    totals_by_category(user_id, &trailing_window(today), &connection)
}

/// A route handler for the bar chart data of the logged in user.
pub async fn get_total_spent_json(
    State(state): State<ChartDataState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    match trailing_totals(&state, user_id) {
        Ok(totals) => Json(total_spent_data(&totals)).into_response(),
        Err(error) => error.into_json_response(),
    }
}

/// A route handler for the donut chart data of the logged in user.
pub async fn get_expenditure_types_json(
    State(state): State<ChartDataState>,
    Extension(user_id): Extension<UserID>,
) -> Response {
    match trailing_totals(&state, user_id) {
        Ok(totals) => Json(expenditure_types_data(&totals)).into_response(),
        Err(error) => error.into_json_response(),
    }
}
