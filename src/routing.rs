//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{auth_guard, auth_guard_json, get_log_out, post_log_in, post_sign_up},
    budget::{create_budget_endpoint, delete_budget_endpoint},
    dashboard::{get_dashboard_page, get_expenditure_types_json, get_total_spent_json},
    endpoints,
    expenditure::{create_expenditure_endpoint, delete_expenditure_endpoint},
    home::get_home_page,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    profile::post_profile_edit,
    tracking::tracking_endpoint,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_home_page))
        .route(endpoints::SIGN_UP, post(post_sign_up))
        .route(endpoints::LOG_IN, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    // Pages and form posts from the browser redirect to the home page when logged out.
    let protected_routes = Router::new()
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::PROFILE_EDIT, post(post_profile_edit))
        .route(
            endpoints::REMOVE_EXPENDITURE,
            post(delete_expenditure_endpoint),
        )
        .route(endpoints::REMOVE_BUDGET, post(delete_budget_endpoint))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // Routes fetched by scripts get a JSON 401 instead.
    let protected_json_routes = Router::new()
        .route(
            endpoints::ADD_EXPENDITURE,
            post(create_expenditure_endpoint),
        )
        .route(endpoints::ADD_BUDGET, post(create_budget_endpoint))
        .route(endpoints::TRACKING, post(tracking_endpoint))
        .route(endpoints::TOTAL_SPENT_JSON, get(get_total_spent_json))
        .route(
            endpoints::EXPENDITURE_TYPES_JSON,
            get(get_expenditure_types_json),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard_json));

    protected_routes
        .merge(protected_json_routes)
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}
