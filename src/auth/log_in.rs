//! Handles log-in requests from the home page form.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    alert::Alert,
    auth::{cookie::set_auth_cookie, flash::set_flash},
    endpoints::{self, format_endpoint},
    user::{User, get_user_by_email},
};

/// The message flashed on the home page for any failed log-in attempt.
pub const LOG_IN_ERROR_MSG: &str = "Error in logging in";

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

/// The raw data entered by the user in the log-in form.
///
/// Missing fields deserialize as empty strings so that they are reported
/// the same way as a wrong password.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct LogInData {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Find the user that the credentials belong to.
///
/// The email and the password must both match the same user.
///
/// # Errors
///
/// Returns [Error::InvalidCredentials] if there is no user with the email or
/// the password does not match that user's password hash.
fn verify_credentials(
    email: &str,
    password: &str,
    connection: &Connection,
) -> Result<User, Error> {
    let user = match get_user_by_email(email.trim(), connection) {
        Ok(user) => user,
        Err(Error::NotFound) => return Err(Error::InvalidCredentials),
        Err(error) => return Err(error),
    };

    match user.password_hash.verify(password) {
        Ok(true) => Ok(user),
        Ok(false) => Err(Error::InvalidCredentials),
        Err(error) => Err(Error::HashingError(error.to_string())),
    }
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request, the auth cookie is set and the client is
/// redirected to their dashboard. Otherwise, the client is redirected to the
/// home page with the message [LOG_IN_ERROR_MSG].
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<LogInData>,
) -> Response {
    let result = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)
        .and_then(|connection| {
            verify_credentials(&user_data.email, &user_data.password, &connection)
        });

    let user = match result {
        Ok(user) => user,
        Err(Error::InvalidCredentials) => {
            tracing::info!("Failed log-in attempt for {:?}", user_data.email);
            let jar = set_flash(jar, &Alert::Error(LOG_IN_ERROR_MSG.to_owned()));
            return (jar, Redirect::to(endpoints::ROOT)).into_response();
        }
        Err(error) => return error.into_response(),
    };

    match set_auth_cookie(jar, user.id, state.cookie_duration) {
        Ok(jar) => {
            tracing::info!("User {} logged in", user.id);
            (
                jar,
                Redirect::to(&format_endpoint(endpoints::DASHBOARD_VIEW, user.id)),
            )
                .into_response()
        }
        Err(error) => error.into_response(),
    }
}
