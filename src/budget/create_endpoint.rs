//! Defines the endpoint for setting the budget for a category.

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
    aggregation::{budget_remaining, category_totals},
    budget::{NewBudget, replace_budget},
    database_id::BudgetId,
    form_field::{parse_amount, parse_category, parse_date, required},
    user::UserID,
};

/// The state needed to set a budget.
#[derive(Debug, Clone)]
pub struct CreateBudgetState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw form data for a budget.
#[derive(Debug, Deserialize)]
pub struct BudgetForm {
    pub category: Option<String>,
    pub budget: Option<String>,
    #[serde(rename = "start-date")]
    pub start_date: Option<String>,
    #[serde(rename = "end-date")]
    pub end_date: Option<String>,
}

impl BudgetForm {
    fn validate(&self, user_id: UserID) -> Result<NewBudget, Error> {
        Ok(NewBudget {
            user_id,
            category: parse_category("category", required("category", &self.category)?)?,
            amount: parse_amount("budget", required("budget", &self.budget)?)?,
            start_date: parse_date("start-date", required("start-date", &self.start_date)?)?,
            end_date: parse_date("end-date", required("end-date", &self.end_date)?)?,
        })
    }
}

/// The new budget and how much of it is left.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct CreatedBudget {
    pub id: BudgetId,
    /// The category's display name.
    pub category: String,
    pub category_id: i64,
    /// The budget amount in dollars.
    pub budget: f64,
    /// The budget minus the spending between the budget's dates.
    pub cat_budget_minus_expenses: Option<f64>,
}

fn set_budget(
    form: &BudgetForm,
    user_id: UserID,
    connection: &Connection,
) -> Result<CreatedBudget, Error> {
    let budget = replace_budget(form.validate(user_id)?, connection)?;
    let window = budget.start_date..=budget.end_date;
    let totals = category_totals(budget.category, user_id, &window, connection)?;
    let remaining = budget_remaining(budget.category, user_id, totals.total, connection)?;

    Ok(CreatedBudget {
        id: budget.id,
        category: budget.category.name().to_owned(),
        category_id: budget.category.id(),
        budget: budget.amount,
        cat_budget_minus_expenses: remaining,
    })
}

/// A route handler for setting the logged in user's budget for a category.
///
/// Any existing budget for the category is replaced. Responds with the new
/// budget as JSON, or a JSON error.
pub async fn create_budget_endpoint(
    State(state): State<CreateBudgetState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<BudgetForm>,
) -> Response {
    let result = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)
        .and_then(|connection| set_budget(&form, user_id, &connection));

    match result {
        Ok(created) => Json(created).into_response(),
        Err(error) => error.into_json_response(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, Router, http::StatusCode, routing::post};
    use axum_test::TestServer;
    use time::macros::date;

    use crate::{
        budget::get_budgets_for_user,
        category::Category,
        endpoints,
        expenditure::{NewExpenditure, create_expenditure},
        test_utils::{create_test_user, get_test_connection},
        user::UserID,
    };

    use super::{CreateBudgetState, CreatedBudget, create_budget_endpoint};

    fn get_test_server() -> (TestServer, CreateBudgetState, UserID) {
        let connection = get_test_connection();
        let user = create_test_user("alice@example.com", &connection);
        let state = CreateBudgetState {
            db_connection: Arc::new(Mutex::new(connection)),
        };
        let app = Router::new()
            .route(endpoints::ADD_BUDGET, post(create_budget_endpoint))
            .layer(Extension(user.id))
            .with_state(state.clone());

        (
            TestServer::new(app).expect("Could not create test server."),
            state,
            user.id,
        )
    }

    #[tokio::test]
    async fn second_budget_replaces_first() {
        let (server, state, user_id) = get_test_server();
        create_expenditure(
            NewExpenditure {
                user_id,
                category: Category::Travel,
                price: 40.0,
                date: date!(2024 - 01 - 10),
                where_bought: "Airline".to_owned(),
                description: "Flight".to_owned(),
                tracking_num: None,
                tracking_num_carrier: None,
            },
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        for amount in ["100", "150"] {
            server
                .post(endpoints::ADD_BUDGET)
                .form(&[
                    ("category", "2"),
                    ("budget", amount),
                    ("start-date", "2024-01-01"),
                    ("end-date", "2024-01-31"),
                ])
                .await
                .assert_status_ok();
        }

        let connection = state.db_connection.lock().unwrap();
        let budgets = get_budgets_for_user(user_id, &connection).unwrap();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].category, Category::Travel);
        assert_eq!(budgets[0].amount, 150.0);
    }

    #[tokio::test]
    async fn responds_with_remaining_budget() {
        let (server, state, user_id) = get_test_server();
        create_expenditure(
            NewExpenditure {
                user_id,
                category: Category::Food,
                price: 12.5,
                date: date!(2024 - 01 - 05),
                where_bought: "Cafe".to_owned(),
                description: "Lunch".to_owned(),
                tracking_num: None,
                tracking_num_carrier: None,
            },
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = server
            .post(endpoints::ADD_BUDGET)
            .form(&[
                ("category", "3"),
                ("budget", "100"),
                ("start-date", "2024-01-01"),
                ("end-date", "2024-01-31"),
            ])
            .await;

        response.assert_status_ok();
        let body: CreatedBudget = response.json();
        assert_eq!(body.category, "Food");
        assert_eq!(body.category_id, 3);
        assert_eq!(body.budget, 100.0);
        assert_eq!(body.cat_budget_minus_expenses, Some(87.5));
    }

    #[tokio::test]
    async fn start_after_end_is_bad_request() {
        let (server, state, user_id) = get_test_server();

        let response = server
            .post(endpoints::ADD_BUDGET)
            .form(&[
                ("category", "3"),
                ("budget", "100"),
                ("start-date", "2024-02-01"),
                ("end-date", "2024-01-01"),
            ])
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let connection = state.db_connection.lock().unwrap();
        assert!(get_budgets_for_user(user_id, &connection).unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_fields_are_bad_requests() {
        let (server, _, _) = get_test_server();

        let response = server
            .post(endpoints::ADD_BUDGET)
            .form(&[("category", "3"), ("budget", "100")])
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"], "the field \"start-date\" is required");
    }
}
