//! One-shot messages carried across a redirect in a private cookie.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};

use crate::alert::Alert;

pub(crate) const COOKIE_FLASH: &str = "flash";

/// Store `alert` so that it is shown on the next page the user loads.
pub(crate) fn set_flash(jar: PrivateCookieJar, alert: &Alert) -> PrivateCookieJar {
    let value = match serde_json::to_string(alert) {
        Ok(value) => value,
        Err(error) => {
            tracing::error!("Could not serialize flash message {alert:?}: {error}");
            return jar;
        }
    };

    jar.add(
        Cookie::build((COOKIE_FLASH, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(true),
    )
}

/// Remove the pending flash message from `jar`, if there is one.
///
/// The returned jar must be sent with the response so that the message is
/// only shown once.
pub(crate) fn take_flash(jar: PrivateCookieJar) -> (PrivateCookieJar, Option<Alert>) {
    let Some(cookie) = jar.get(COOKIE_FLASH) else {
        return (jar, None);
    };

    let alert = match serde_json::from_str(cookie.value()) {
        Ok(alert) => Some(alert),
        Err(error) => {
            tracing::warn!("Discarding malformed flash message: {error}");
            None
        }
    };

    (jar.remove(Cookie::build(COOKIE_FLASH).path("/")), alert)
}
