//! Handles the profile form on the dashboard.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, PASSWORD_HASH_COST, PasswordHash,
    endpoints::{self, format_endpoint},
    form_field::optional,
    user::{ProfileUpdate, UserID, get_user_by_id, update_profile},
};

/// The state needed to edit a profile.
#[derive(Debug, Clone)]
pub struct ProfileState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ProfileState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The raw data from the profile form. Blank fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileForm {
    #[serde(rename = "profile-name")]
    pub name: Option<String>,
    #[serde(rename = "profile-email")]
    pub email: Option<String>,
    #[serde(rename = "new-password")]
    pub new_password: Option<String>,
    #[serde(rename = "current-password")]
    pub current_password: Option<String>,
}

/// Passwords are used as typed, only an empty field counts as blank.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

/// Turn the form into the changes to make to the profile of `user_id`.
///
/// # Errors
/// Returns a:
/// - [Error::MissingField] if a new password is given without the current password,
/// - [Error::InvalidCredentials] if the current password is wrong,
/// - [Error::HashingError] if the new password could not be hashed.
fn validate(
    form: &ProfileForm,
    user_id: UserID,
    connection: &Connection,
) -> Result<ProfileUpdate, Error> {
    let password_hash = match non_empty(&form.new_password) {
        Some(new_password) => {
            let current_password =
                non_empty(&form.current_password).ok_or(Error::MissingField("current-password"))?;
            let user = get_user_by_id(user_id, connection)?;

            match user.password_hash.verify(current_password) {
                Ok(true) => {}
                Ok(false) => {
                    tracing::warn!("User {user_id} gave the wrong current password");
                    return Err(Error::InvalidCredentials);
                }
                Err(error) => return Err(Error::HashingError(error.to_string())),
            }

            Some(PasswordHash::from_raw_password(
                new_password,
                PASSWORD_HASH_COST,
            )?)
        }
        None => None,
    };

    Ok(ProfileUpdate {
        name: optional(&form.name),
        email: optional(&form.email),
        password_hash,
    })
}

/// A route handler for updating the logged in user's name, email or password,
/// redirects to the user's dashboard on success.
///
/// Responds with 400 if the email belongs to another user or a new password
/// is given without the current password, and 401 if the current password
/// is wrong.
pub async fn post_profile_edit(
    State(state): State<ProfileState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<ProfileForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let result = validate(&form, user_id, &connection)
        .and_then(|update| update_profile(user_id, update, &connection));

    match result {
        Ok(_) => {
            tracing::info!("Updated profile of user {user_id}");
            Redirect::to(&format_endpoint(endpoints::DASHBOARD_VIEW, user_id)).into_response()
        }
        Err(error) => error.into_response(),
    }
}
