//! Alerts for displaying success and error messages to users.

use maud::{Markup, html};
use serde::{Deserialize, Serialize};

/// A one-off message shown at the top of a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message")]
pub enum Alert {
    /// Something the user asked for worked.
    Success(String),
    /// Something the user asked for did not work.
    Error(String),
}

impl Alert {
    /// The text of the alert.
    pub fn message(&self) -> &str {
        match self {
            Alert::Success(message) | Alert::Error(message) => message,
        }
    }

    pub fn render(&self) -> Markup {
        let (role, style) = match self {
            Alert::Success(_) => (
                "status",
                "p-4 mb-4 text-sm text-green-800 rounded bg-green-50 \
                dark:bg-gray-800 dark:text-green-400",
            ),
            Alert::Error(_) => (
                "alert",
                "p-4 mb-4 text-sm text-red-800 rounded bg-red-50 \
                dark:bg-gray-800 dark:text-red-400",
            ),
        };

        html! {
            div id="alert" role=(role) class=(style)
            {
                (self.message())
            }
        }
    }
}
