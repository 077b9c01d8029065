//! Handles sign-up requests from the home page form.
//!
//! Every outcome is reported with a flash message on the home page.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    alert::Alert,
    auth::{PASSWORD_HASH_COST, PasswordHash, flash::set_flash},
    endpoints,
    user::{NewUser, create_user, get_user_by_email},
};

pub const SIGN_UP_SUCCESS_MSG: &str = "You have successfully signed up";
pub const USER_EXISTS_MSG: &str = "A user by this name already exists";
pub const EMAIL_TAKEN_MSG: &str = "An account with this email already exists";

/// The state needed to sign up a new user.
#[derive(Debug, Clone)]
pub struct SignUpState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SignUpState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<SignUpState> for Key {
    fn from_ref(state: &SignUpState) -> Self {
        state.cookie_key.clone()
    }
}

/// The raw data entered by the user in the sign-up form.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SignUpData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// What happened to a sign-up request.
#[derive(Debug, PartialEq)]
enum SignUpOutcome {
    Created,
    /// Somebody has already signed up with the same email and password.
    AlreadySignedUp,
    /// The email belongs to a user with a different password.
    EmailTaken,
}

fn sign_up(data: &SignUpData, connection: &Connection) -> Result<SignUpOutcome, Error> {
    let name = data.name.trim();
    let email = data.email.trim();

    if name.is_empty() {
        return Err(Error::MissingField("name"));
    }
    if email.is_empty() {
        return Err(Error::MissingField("email"));
    }
    if data.password.is_empty() {
        return Err(Error::MissingField("password"));
    }

    match get_user_by_email(email, connection) {
        Ok(existing_user) => {
            return match existing_user.password_hash.verify(&data.password) {
                Ok(true) => Ok(SignUpOutcome::AlreadySignedUp),
                Ok(false) => Ok(SignUpOutcome::EmailTaken),
                Err(error) => Err(Error::HashingError(error.to_string())),
            };
        }
        Err(Error::NotFound) => {}
        Err(error) => return Err(error),
    }

    let password_hash = PasswordHash::from_raw_password(&data.password, PASSWORD_HASH_COST)?;

    match create_user(
        NewUser {
            name: name.to_owned(),
            email: email.to_owned(),
            password_hash,
        },
        connection,
    ) {
        Ok(user) => {
            tracing::info!("Created user {}", user.id);
            Ok(SignUpOutcome::Created)
        }
        Err(Error::DuplicateEmail) => Ok(SignUpOutcome::EmailTaken),
        Err(error) => Err(error),
    }
}

/// Handler for sign-up requests via the POST method.
///
/// Always redirects back to the home page, where a flash message tells the
/// user whether the account was created.
pub async fn post_sign_up(
    State(state): State<SignUpState>,
    jar: PrivateCookieJar,
    Form(data): Form<SignUpData>,
) -> Response {
    let result = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)
        .and_then(|connection| sign_up(&data, &connection));

    let alert = match result {
        Ok(SignUpOutcome::Created) => Alert::Success(SIGN_UP_SUCCESS_MSG.to_owned()),
        Ok(SignUpOutcome::AlreadySignedUp) => Alert::Error(USER_EXISTS_MSG.to_owned()),
        Ok(SignUpOutcome::EmailTaken) => Alert::Error(EMAIL_TAKEN_MSG.to_owned()),
        Err(Error::MissingField(field)) => Alert::Error(format!("Please fill in your {field}")),
        Err(error) => {
            tracing::error!("Could not sign up user: {error}");
            Alert::Error("Something went wrong, please try again later".to_owned())
        }
    };

    (set_flash(jar, &alert), Redirect::to(endpoints::ROOT)).into_response()
}


#[cfg(test)]
mod sign_up_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, routing::post};
    use axum_extra::extract::cookie::Key;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use sha2::{Digest, Sha512};

    use crate::{
        auth::flash::COOKIE_FLASH,
        endpoints,
        user::{create_user_table, get_user_by_email},
    };

    use super::{SignUpState, post_sign_up};

    #[tokio::test]
    async fn sign_up_redirects_home_with_flash_message() {
        let connection = Connection::open_in_memory().unwrap();
        create_user_table(&connection).unwrap();
        let db_connection = Arc::new(Mutex::new(connection));
        let state = SignUpState {
            cookie_key: Key::from(&Sha512::digest("foobar")),
            db_connection: db_connection.clone(),
        };
        let app = Router::new()
            .route(endpoints::SIGN_UP, post(post_sign_up))
            .with_state(state);
        let server = TestServer::new(app).expect("Could not create test server.");

        let response = server
            .post(endpoints::SIGN_UP)
            .form(&[
                ("name", "Alice"),
                ("email", "alice@example.com"),
                ("password", "hunter2"),
            ])
            .await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::ROOT);
        assert!(response.maybe_cookie(COOKIE_FLASH).is_some());
        let connection = db_connection.lock().unwrap();
        assert!(get_user_by_email("alice@example.com", &connection).is_ok());
    }
}
