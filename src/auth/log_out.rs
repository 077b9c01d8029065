//! Handles log-out requests.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;

use crate::{auth::cookie::invalidate_auth_cookie, endpoints};

/// Invalidate the auth cookie and redirect the client to the home page.
///
/// Logging out without a session is not an error.
pub async fn get_log_out(jar: PrivateCookieJar) -> Response {
    let jar = invalidate_auth_cookie(jar);

    (jar, Redirect::to(endpoints::ROOT)).into_response()
}

#[cfg(test)]
mod log_out_tests {
    use axum::{Router, routing::get};
    use axum_extra::extract::cookie::Key;
    use axum_test::TestServer;
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime};

    use crate::{auth::cookie::COOKIE_USER_ID, endpoints};

    use super::get_log_out;

    #[tokio::test]
    async fn log_out_invalidates_auth_cookie() {
        let app = Router::new()
            .route(endpoints::LOG_OUT, get(get_log_out))
            .with_state(Key::from(&Sha512::digest("foobar")));
        let server = TestServer::new(app).expect("Could not create test server.");

        let response = server.get(endpoints::LOG_OUT).await;

        response.assert_status_see_other();
        assert_eq!(response.header("location"), endpoints::ROOT);
        let cookie = response.cookie(COOKIE_USER_ID);
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert_eq!(cookie.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));
    }
}
