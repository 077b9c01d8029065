//! Spending Tracker is a web app for recording expenditures, setting
//! per-category budgets and seeing where your money went.
//!
//! This library provides an HTTP server that serves HTML pages for browsers
//! and JSON payloads for the dashboard charts and forms.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use time::Date;
use tokio::signal;

mod aggregation;
mod alert;
mod app_state;
mod auth;
mod budget;
mod category;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod expenditure;
mod form_field;
mod home;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod profile;
mod routing;
mod timezone;
mod tracking;
mod user;

#[cfg(test)]
mod test_utils;

pub use aggregation::{
    CategoryTotals, budget_remaining, category_totals, effective_budget_window,
    get_expenditures_in_window,
};
pub use app_state::AppState;
pub use auth::{PASSWORD_HASH_COST, PasswordHash};
pub use budget::{Budget, NewBudget, replace_budget};
pub use category::Category;
pub use db::initialize as initialize_db;
pub use expenditure::{Expenditure, NewExpenditure, create_expenditure};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use timezone::get_local_offset;
pub use tracking::{DEFAULT_TRACKING_API_URL, DEFAULT_TRACKING_TIMEOUT, TrackingClient};
pub use user::{NewUser, User, UserID, create_user, get_user_by_id};

use crate::{
    html::error_view, internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The email and password did not match a registered user.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The request did not carry a valid session cookie.
    #[error("you must be logged in to do that")]
    NotAuthenticated,

    /// The logged in user tried to view or change a resource owned by
    /// another user.
    #[error("you do not have permission to access this resource")]
    Forbidden,

    /// A required form field was missing or blank.
    #[error("the field \"{0}\" is required")]
    MissingField(&'static str),

    /// A form field could not be parsed into the expected type.
    #[error("\"{value}\" is not a valid value for \"{field}\"")]
    InvalidField {
        /// The name of the form field.
        field: &'static str,
        /// The raw value that was submitted.
        value: String,
    },

    /// The category ID does not refer to one of the fixed categories.
    #[error("{0} is not a valid category ID")]
    InvalidCategory(i64),

    /// A budget was given a start date after its end date.
    #[error("the start date {0} is after the end date {1}")]
    InvalidDateRange(Date, Date),

    /// The email address is already used by another user.
    #[error("the email address is already in use")]
    DuplicateEmail,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The shipment tracking API could not be reached, timed out, or returned
    /// something other than a location.
    ///
    /// The string holds the underlying reason and is only meant for the logs.
    #[error("tracking information is unavailable: {0}")]
    TrackingUnavailable(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The auth cookie could not be created.
    #[error("could not set the auth cookie: {0}")]
    CookieError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                Some(ref desc),
            ) if desc.ends_with("user.email") => Error::DuplicateEmail,
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// The HTTP status code that best describes the error to a client.
    fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingField(_)
            | Error::InvalidField { .. }
            | Error::InvalidCategory(_)
            | Error::InvalidDateRange(_, _)
            | Error::DuplicateEmail => StatusCode::BAD_REQUEST,
            Error::InvalidCredentials | Error::NotAuthenticated => StatusCode::UNAUTHORIZED,
            Error::Forbidden => StatusCode::FORBIDDEN,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::TrackingUnavailable(_) => StatusCode::BAD_GATEWAY,
            Error::HashingError(_)
            | Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::InvalidTimezoneError(_)
            | Error::CookieError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message that is safe to show to the client.
    ///
    /// Internal errors are replaced with a generic message so that details
    /// about the server do not leak.
    fn client_message(&self) -> String {
        match self {
            Error::TrackingUnavailable(_) => "tracking unavailable".to_owned(),
            error if error.status_code() == StatusCode::INTERNAL_SERVER_ERROR => {
                "an unexpected error occurred, check the server logs for more details".to_owned()
            }
            error => error.to_string(),
        }
    }

    /// Convert the error into a JSON response of the form `{"error": "..."}`.
    ///
    /// Use this for routes that are called by scripts rather than browsers.
    pub(crate) fn into_json_response(self) -> Response {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            tracing::error!("An unexpected error occurred: {}", self);
        }

        (status_code, Json(json!({ "error": self.client_message() }))).into_response()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::Forbidden => (
                StatusCode::FORBIDDEN,
                error_view(
                    "Forbidden",
                    "403",
                    "You do not have access to this page.",
                    "Go back to your own dashboard.",
                ),
            )
                .into_response(),
            error if error.status_code().is_client_error() => (
                error.status_code(),
                error_view(
                    error.status_code().canonical_reason().unwrap_or("Bad Request"),
                    error.status_code().as_str(),
                    &error.client_message(),
                    "Go back and check the details you entered.",
                ),
            )
                .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use rusqlite::Connection;
    use scraper::Selector;

    use crate::{Error, test_utils::parse_html_document};

    #[test]
    fn no_rows_maps_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn unique_email_violation_maps_to_duplicate_email() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE user (email TEXT UNIQUE)", ())
            .unwrap();
        conn.execute("INSERT INTO user (email) VALUES ('a@b.c')", ())
            .unwrap();

        let error: Error = conn
            .execute("INSERT INTO user (email) VALUES ('a@b.c')", ())
            .unwrap_err()
            .into();

        assert_eq!(error, Error::DuplicateEmail);
    }

    #[test]
    fn json_response_hides_internal_details() {
        let response = Error::DatabaseLockError.into_json_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn tracking_unavailable_is_bad_gateway() {
        let response =
            Error::TrackingUnavailable("connection refused".to_owned()).into_json_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn client_error_page_is_titled_by_status() {
        let response = Error::InvalidCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let html = parse_html_document(response).await;
        let title = html
            .select(&Selector::parse("title").unwrap())
            .next()
            .expect("No title found")
            .text()
            .collect::<String>();

        assert!(title.starts_with("Unauthorized"), "got title {title:?}");
    }

    #[test]
    fn forbidden_renders_403_page() {
        let response = Error::Forbidden.into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
