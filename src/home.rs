//! The home page with the sign-up and log-in forms.

use axum::response::{IntoResponse, Response};
use axum_extra::extract::PrivateCookieJar;
use maud::{Markup, html};

use crate::{
    alert::Alert,
    auth::{get_user_id_from_auth_cookie, take_flash},
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        base, link,
    },
    user::UserID,
};

fn input(name: &str, label: &str, type_: &str, placeholder: &str, form_id: &str) -> Markup {
    let id = format!("{form_id}-{name}");

    html! {
        div
        {
            label for=(id) class=(FORM_LABEL_STYLE) { (label) }

            input
                type=(type_)
                name=(name)
                id=(id)
                placeholder=(placeholder)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

fn sign_up_form() -> Markup {
    html! {
        form
            id="sign-up-form"
            action=(endpoints::SIGN_UP)
            method="post"
            class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold" { "Sign up" }

            (input("name", "Name", "text", "Your name", "sign-up"))
            (input("email", "Email", "email", "name@example.com", "sign-up"))
            (input("password", "Password", "password", "••••••••", "sign-up"))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Sign up" }
        }
    }
}

fn log_in_form() -> Markup {
    html! {
        form
            id="log-in-form"
            action=(endpoints::LOG_IN)
            method="post"
            class=(FORM_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold" { "Log in" }

            (input("email", "Email", "email", "name@example.com", "log-in"))
            (input("password", "Password", "password", "••••••••", "log-in"))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Log in" }
        }
    }
}

fn home_view(alert: Option<&Alert>, logged_in_user: Option<UserID>) -> Markup {
    let content = html! {
        div class="flex flex-col items-center gap-6 px-6 py-8 mx-auto max-w-3xl text-gray-900 dark:text-white"
        {
            h1 class="text-3xl font-bold" { "Spending Tracker" }

            p class="text-center"
            {
                "Record what you spend, set a budget for each category and see where your money goes."
            }

            @if let Some(alert) = alert {
                (alert.render())
            }

            @match logged_in_user {
                Some(user_id) => {
                    p
                    {
                        "You are logged in. Go to "
                        (link(&format_endpoint(endpoints::DASHBOARD_VIEW, user_id), "your dashboard"))
                        " or "
                        (link(endpoints::LOG_OUT, "log out"))
                        "."
                    }
                }
                None => {
                    div class="grid grid-cols-1 md:grid-cols-2 gap-6 w-full"
                    {
                        (sign_up_form())
                        (log_in_form())
                    }
                }
            }
        }
    };

    base("Home", &[], &content)
}

/// Display the home page.
///
/// Any pending flash message is shown once and then removed.
pub async fn get_home_page(jar: PrivateCookieJar) -> Response {
    let logged_in_user = get_user_id_from_auth_cookie(&jar).ok();
    let (jar, alert) = take_flash(jar);

    (jar, home_view(alert.as_ref(), logged_in_user)).into_response()
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        response::{IntoResponse, Redirect},
        routing::get,
    };
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};
    use axum_test::TestServer;
    use scraper::{Html, Selector};
    use sha2::{Digest, Sha512};
    use time::Duration;

    use crate::{
        alert::Alert,
        auth::{set_auth_cookie, set_flash},
        endpoints,
        test_utils::{assert_form_action, assert_form_input, assert_valid_html},
        user::UserID,
    };

    use super::get_home_page;

    async fn flash_error(jar: PrivateCookieJar) -> impl IntoResponse {
        (
            set_flash(jar, &Alert::Error("Error in logging in".to_owned())),
            Redirect::to(endpoints::ROOT),
        )
    }

    async fn log_in_as_42(jar: PrivateCookieJar) -> impl IntoResponse {
        (
            set_auth_cookie(jar, UserID::new(42), Duration::minutes(5)).unwrap(),
            Redirect::to(endpoints::ROOT),
        )
    }

    fn get_test_server() -> TestServer {
        let app = Router::new()
            .route(endpoints::ROOT, get(get_home_page))
            .route("/flash", get(flash_error))
            .route("/log-in", get(log_in_as_42))
            .with_state(Key::from(&Sha512::digest("foobar")));

        let mut server = TestServer::new(app).expect("Could not create test server.");
        server.save_cookies();
        server
    }

    fn alert_count(html: &Html) -> usize {
        html.select(&Selector::parse("#alert").unwrap()).count()
    }

    #[tokio::test]
    async fn shows_sign_up_and_log_in_forms() {
        let server = get_test_server();

        let response = server.get(endpoints::ROOT).await;

        response.assert_status_ok();
        let html = Html::parse_document(&response.text());
        assert_valid_html(&html);

        let sign_up_form = html
            .select(&Selector::parse("form#sign-up-form").unwrap())
            .next()
            .expect("No sign-up form");
        assert_form_action(&sign_up_form, endpoints::SIGN_UP);
        assert_form_input(&sign_up_form, "name", "text");
        assert_form_input(&sign_up_form, "email", "email");
        assert_form_input(&sign_up_form, "password", "password");

        let log_in_form = html
            .select(&Selector::parse("form#log-in-form").unwrap())
            .next()
            .expect("No log-in form");
        assert_form_action(&log_in_form, endpoints::LOG_IN);
        assert_form_input(&log_in_form, "email", "email");
        assert_form_input(&log_in_form, "password", "password");
    }

    #[tokio::test]
    async fn shows_flash_message_once() {
        let server = get_test_server();
        server.get("/flash").await;

        let first = Html::parse_document(&server.get(endpoints::ROOT).await.text());
        let second = Html::parse_document(&server.get(endpoints::ROOT).await.text());

        assert_eq!(alert_count(&first), 1);
        assert!(first.html().contains("Error in logging in"));
        assert_eq!(alert_count(&second), 0);
    }

    #[tokio::test]
    async fn links_to_dashboard_when_logged_in() {
        let server = get_test_server();
        server.get("/log-in").await;

        let html = Html::parse_document(&server.get(endpoints::ROOT).await.text());

        assert!(
            html.select(&Selector::parse("a[href='/dashboard/42']").unwrap())
                .next()
                .is_some()
        );
        assert!(
            html.select(&Selector::parse("form#log-in-form").unwrap())
                .next()
                .is_none()
        );
    }
}
