//! The navigation bar shown at the top of the pages for logged in users.

use maud::{Markup, html};

use crate::{
    endpoints::{self, format_endpoint},
    user::UserID,
};

/// A link in the navigation bar.
///
/// Only one link should be marked as current at any one time.
#[derive(Debug, Clone, PartialEq)]
struct Link {
    url: String,
    title: &'static str,
    is_current: bool,
}

impl Link {
    fn into_html(self) -> Markup {
        let style = if self.is_current {
            "block py-2 px-3 text-white bg-blue-700 rounded-sm lg:bg-transparent
            lg:text-blue-700 lg:p-0 dark:text-white lg:dark:text-blue-500"
        } else {
            "block py-2 px-3 text-gray-900 rounded-sm hover:bg-gray-100
            lg:hover:bg-transparent lg:border-0 lg:hover:text-blue-700 lg:p-0
            dark:text-white lg:dark:hover:text-blue-500 dark:hover:bg-gray-700
            dark:hover:text-white lg:dark:hover:bg-transparent"
        };

        html!(
            a
                href=(self.url)
                class=(style)
                aria-current=[self.is_current.then_some("page")]
            {
                (self.title)
            }
        )
    }
}

pub struct NavBar {
    links: Vec<Link>,
}

impl NavBar {
    /// Get the navigation bar for the user with `user_id`.
    ///
    /// The link whose route matches `active_endpoint` is marked as current.
    pub fn new(active_endpoint: &str, user_id: UserID) -> NavBar {
        let links = vec![
            Link {
                url: format_endpoint(endpoints::DASHBOARD_VIEW, user_id),
                title: "Dashboard",
                is_current: active_endpoint == endpoints::DASHBOARD_VIEW,
            },
            Link {
                url: endpoints::LOG_OUT.to_owned(),
                title: "Log out",
                is_current: false,
            },
        ];

        NavBar { links }
    }

    pub fn into_html(self) -> Markup {
        // Template adapted from https://flowbite.com/docs/components/navbar/#default-navbar
        html!(
            nav class="bg-white border-gray-200 dark:bg-gray-900"
            {
                div
                    class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    a
                        href=(endpoints::ROOT)
                        class="self-center text-2xl font-semibold whitespace-nowrap dark:text-white"
                    {
                        "Spending Tracker"
                    }

                    ul
                        class="font-medium flex flex-row space-x-8 rtl:space-x-reverse"
                    {
                        @for link in self.links {
                            li { (link.into_html()) }
                        }
                    }
                }
            }
        )
    }
}

#[cfg(test)]
mod nav_bar_tests {
    use crate::{endpoints, navigation::NavBar, user::UserID};

    #[test]
    fn dashboard_link_points_to_users_dashboard() {
        let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW, UserID::new(7));

        let dashboard = &nav_bar.links[0];
        assert_eq!(dashboard.url, "/dashboard/7");
        assert!(dashboard.is_current);
    }

    #[test]
    fn log_out_is_never_current() {
        for endpoint in [endpoints::DASHBOARD_VIEW, endpoints::ROOT, endpoints::LOG_OUT] {
            let nav_bar = NavBar::new(endpoint, UserID::new(1));

            let log_out = nav_bar
                .links
                .iter()
                .find(|link| link.url == endpoints::LOG_OUT)
                .unwrap();
            assert!(!log_out.is_current);
        }
    }

    #[test]
    fn no_link_is_current_on_other_pages() {
        let nav_bar = NavBar::new(endpoints::ROOT, UserID::new(1));

        assert!(nav_bar.links.iter().all(|link| !link.is_current));
    }
}
