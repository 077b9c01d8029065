//! Defines the endpoint for recording a new expenditure.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form, Json,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    aggregation::{category_totals, effective_budget_window},
    database_id::ExpenditureId,
    expenditure::{Expenditure, NewExpenditure, create_expenditure},
    form_field::{optional, parse_amount, parse_category, parse_date, required},
    timezone::local_today,
    user::UserID,
};

/// The state needed to create an expenditure.
#[derive(Debug, Clone)]
pub struct CreateExpenditureState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateExpenditureState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw form data for a new expenditure.
#[derive(Debug, Deserialize)]
pub struct ExpenditureForm {
    pub category: Option<String>,
    pub price: Option<String>,
    pub date: Option<String>,
    #[serde(rename = "wherebought")]
    pub where_bought: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "tracking-num")]
    pub tracking_num: Option<String>,
    #[serde(rename = "tracking-num-carrier")]
    pub tracking_num_carrier: Option<String>,
}

impl ExpenditureForm {
    fn validate(&self, user_id: UserID) -> Result<NewExpenditure, Error> {
        let category = parse_category("category", required("category", &self.category)?)?;
        let price = parse_amount("price", required("price", &self.price)?)?;
        let date = parse_date("date", required("date", &self.date)?)?;
        let where_bought = required("wherebought", &self.where_bought)?.to_owned();
        let description = required("description", &self.description)?.to_owned();

        Ok(NewExpenditure {
            user_id,
            category,
            price,
            date,
            where_bought,
            description,
            tracking_num: optional(&self.tracking_num),
            tracking_num_carrier: optional(&self.tracking_num_carrier),
        })
    }
}

/// The new expenditure and the updated figures for its category.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct CreatedExpenditure {
    /// The category's total over its budget window.
    pub total_cat_price: f64,
    /// The category's average over its budget window.
    pub avg_cat_expenditures: f64,
    pub category_id: i64,
    pub expenditure_id: ExpenditureId,
    /// Formatted as YYYY-MM-DD.
    pub date_of_expenditure: String,
    pub where_bought: String,
    pub description: String,
    /// Formatted with two decimal places.
    pub price: String,
    /// The category's display name.
    pub category: String,
    pub tracking_num: Option<String>,
    pub tracking_num_carrier: Option<String>,
}

/// Record the expenditure and recompute the totals for its category.
fn add_expenditure(
    form: &ExpenditureForm,
    user_id: UserID,
    local_timezone: &str,
    connection: &Connection,
) -> Result<CreatedExpenditure, Error> {
    let new_expenditure = form.validate(user_id)?;
    let today = local_today(local_timezone)?;

    let expenditure: Expenditure = create_expenditure(new_expenditure, connection)?;
    let window = effective_budget_window(expenditure.category, user_id, today, connection)?;
    let totals = category_totals(expenditure.category, user_id, &window, connection)?;

    Ok(CreatedExpenditure {
        total_cat_price: totals.total,
        avg_cat_expenditures: totals.average,
        category_id: expenditure.category.id(),
        expenditure_id: expenditure.id,
        date_of_expenditure: expenditure.date.to_string(),
        where_bought: expenditure.where_bought,
        description: expenditure.description,
        price: format!("{:.2}", expenditure.price),
        category: expenditure.category.name().to_owned(),
        tracking_num: expenditure.tracking_num,
        tracking_num_carrier: expenditure.tracking_num_carrier,
    })
}

/// A route handler for recording an expenditure for the logged in user.
///
/// Responds with the new expenditure and its category's updated totals as
/// JSON, or a JSON error.
pub async fn create_expenditure_endpoint(
    State(state): State<CreateExpenditureState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<ExpenditureForm>,
) -> Response {
    let result = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)
        .and_then(|connection| {
            add_expenditure(&form, user_id, &state.local_timezone, &connection)
        });

    match result {
        Ok(created) => Json(created).into_response(),
        Err(error) => error.into_json_response(),
    }
}
