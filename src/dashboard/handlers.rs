//! The route handler for the dashboard page.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::Date;

use crate::{
    AppState, Error,
    aggregation::{CategorySummary, summarize_categories, totals_by_category, trailing_window},
    budget::{Budget, get_budgets_for_user},
    dashboard::{
        cards::category_cards_view,
        charts::{DashboardChart, build_dashboard_charts, charts_script, charts_view},
        forms::{add_budget_form, add_expenditure_form, profile_form},
        tables::{budgets_table, expenditures_table},
    },
    database_id::DatabaseId,
    endpoints,
    expenditure::{Expenditure, get_expenditures_for_user},
    html::{HeadElement, PAGE_CONTAINER_STYLE, base, dollar_input_styles},
    navigation::NavBar,
    timezone::local_today,
    user::{User, UserID, get_user_by_id},
};

/// Where the browser loads ECharts from.
const ECHARTS_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading the user's data.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Holds all the data needed to render the dashboard.
struct DashboardData {
    user: User,
    today: Date,
    summaries: Vec<CategorySummary>,
    charts: [DashboardChart; 2],
    expenditures: Vec<Expenditure>,
    budgets: Vec<Budget>,
}

/// Display the dashboard of the user with the ID in the path.
///
/// Users may only view their own dashboard, any other ID gets a 403.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
    Path(dashboard_user_id): Path<DatabaseId>,
) -> Result<Response, Error> {
    if dashboard_user_id != user_id.as_i64() {
        tracing::warn!("User {user_id} tried to view the dashboard of user {dashboard_user_id}");
        return Err(Error::Forbidden);
    }

    let today = local_today(&state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let data = build_dashboard_data(user_id, today, &connection)?;

    Ok(dashboard_view(data).into_response())
}

fn build_dashboard_data(
    user_id: UserID,
    today: Date,
    connection: &Connection,
) -> Result<DashboardData, Error> {
    let user = get_user_by_id(user_id, connection)
        .inspect_err(|error| tracing::error!("could not get user {user_id}: {error}"))?;
    let summaries = summarize_categories(user_id, today, connection)?;
    let trailing_totals = totals_by_category(user_id, &trailing_window(today), connection)?;
    let expenditures = get_expenditures_for_user(user_id, connection)?;
    let budgets = get_budgets_for_user(user_id, connection)?;

    Ok(DashboardData {
        user,
        today,
        summaries,
        charts: build_dashboard_charts(&trailing_totals),
        expenditures,
        budgets,
    })
}

fn dashboard_view(data: DashboardData) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW, data.user.id).into_html();

    let content = html!(
        (nav_bar)

        div id="dashboard-content" class=(PAGE_CONTAINER_STYLE)
        {
            h2 class="w-full text-2xl font-bold" { "Welcome, " (data.user.name) }

            (category_cards_view(&data.summaries))
            (charts_view(&data.charts))
            (expenditures_table(&data.expenditures))
            (budgets_table(&data.budgets))

            div class="grid grid-cols-1 lg:grid-cols-3 gap-4 w-full"
            {
                (add_expenditure_form(data.today))
                (add_budget_form(data.today))
                (profile_form(&data.user))
            }
        }
    );

    let head_elements = [
        HeadElement::ScriptLink(ECHARTS_URL.to_owned()),
        charts_script(&data.charts),
        dollar_input_styles(),
    ];

    base("Dashboard", &head_elements, &content)
}
