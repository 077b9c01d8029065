//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/dashboard/{user_id}', use [format_endpoint].

use std::fmt::Display;

/// The home page with the sign-up and log-in forms.
pub const ROOT: &str = "/";
/// The landing page for logged in users.
pub const DASHBOARD_VIEW: &str = "/dashboard/{user_id}";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for creating a new account.
pub const SIGN_UP: &str = "/sign-up";
/// The route for logging in a user.
pub const LOG_IN: &str = "/login-form";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/logout";
/// The route for updating the logged in user's name, email or password.
pub const PROFILE_EDIT: &str = "/profile-edit";
/// The route to create an expenditure.
pub const ADD_EXPENDITURE: &str = "/add-expenditure-to-db";
/// The route to delete an expenditure.
pub const REMOVE_EXPENDITURE: &str = "/remove-expenditure/{expenditure_id}";
/// The route to create or replace the budget for a category.
pub const ADD_BUDGET: &str = "/add-budget";
/// The route to delete a budget.
pub const REMOVE_BUDGET: &str = "/remove-budget/{budget_id}";
/// The route to look up where a tracked shipment is.
pub const TRACKING: &str = "/tracking/{tracking_num}";
/// The first path segment of [TRACKING].
pub const TRACKING_SEGMENT: &str = "tracking";
/// The data for the bar chart of the totals and averages per category.
pub const TOTAL_SPENT_JSON: &str = "/total-spent.json";
/// The data for the donut chart of spending per category.
pub const EXPENDITURE_TYPES_JSON: &str = "/expenditure-types.json";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/dashboard/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: impl Display) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);
        assert_endpoint_is_valid_uri(endpoints::STATIC);

        assert_endpoint_is_valid_uri(endpoints::SIGN_UP);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN);
        assert_endpoint_is_valid_uri(endpoints::LOG_OUT);
        assert_endpoint_is_valid_uri(endpoints::PROFILE_EDIT);
        assert_endpoint_is_valid_uri(endpoints::ADD_EXPENDITURE);
        assert_endpoint_is_valid_uri(endpoints::REMOVE_EXPENDITURE);
        assert_endpoint_is_valid_uri(endpoints::ADD_BUDGET);
        assert_endpoint_is_valid_uri(endpoints::REMOVE_BUDGET);
        assert_endpoint_is_valid_uri(endpoints::TRACKING);
        assert!(endpoints::TRACKING.starts_with(&format!("/{}/", endpoints::TRACKING_SEGMENT)));
        assert_endpoint_is_valid_uri(endpoints::TOTAL_SPENT_JSON);
        assert_endpoint_is_valid_uri(endpoints::EXPENDITURE_TYPES_JSON);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());

        // Parameter with single word should also work.
        let formatted_path = format_endpoint("/hello/{world}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn accepts_string_parameters() {
        let formatted_path = format_endpoint(endpoints::TRACKING, "9205590164917312751089");

        assert_eq!(formatted_path, "/tracking/9205590164917312751089");
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/hello/{world}/bye", 1);

        assert_eq!(formatted_path, "/hello/1/bye");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
