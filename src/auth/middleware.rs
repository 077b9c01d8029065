//! Authentication middleware that turns the session cookie into a [UserID].

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};

use crate::{
    AppState, Error, auth::cookie::get_user_id_from_auth_cookie, endpoints, user::UserID,
};

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

/// Get the user ID from the request's auth cookie and place it into the request extensions.
///
/// Returns the rebuilt request on success.
async fn authenticate(state: &AuthState, request: Request) -> Result<Request, Error> {
    let (mut parts, body) = request.into_parts();

    let jar = match PrivateCookieJar::<Key>::from_request_parts(&mut parts, state).await {
        Ok(jar) => jar,
        Err(error) => {
            tracing::error!("Error getting cookie jar: {error:?}");
            return Err(Error::NotAuthenticated);
        }
    };
    let user_id: UserID = get_user_id_from_auth_cookie(&jar)?;

    parts.extensions.insert(user_id);

    Ok(Request::from_parts(parts, body))
}

/// Middleware function that checks for a valid authorization cookie.
/// The user ID is placed into request and then the request executed normally if the cookie is valid, otherwise the client is redirected to the home page.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>` to receive the user ID.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    match authenticate(&state, request).await {
        Ok(request) => next.run(request).await,
        Err(_) => Redirect::to(endpoints::ROOT).into_response(),
    }
}

/// Middleware function that checks for a valid authorization cookie.
/// The user ID is placed into request and then the request executed normally if the cookie is valid, otherwise a 401 JSON error is returned.
///
/// Use this for routes that are fetched by scripts.
pub async fn auth_guard_json(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    match authenticate(&state, request).await {
        Ok(request) => next.run(request).await,
        Err(error) => error.into_json_response(),
    }
}
