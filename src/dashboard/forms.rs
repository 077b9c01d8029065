//! The forms on the dashboard for adding expenditures and budgets and for
//! editing the user's profile.
//!
//! The expenditure and budget forms are submitted by `app.js`, which reads
//! the JSON response and updates the page in place.

use maud::{Markup, html};
use time::Date;

use crate::{
    category::Category,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    user::User,
};

/// The carriers the tracking API knows, as (token, display name).
const CARRIERS: [(&str, &str); 4] = [
    ("usps", "USPS"),
    ("ups", "UPS"),
    ("fedex", "FedEx"),
    ("dhl_express", "DHL Express"),
];

fn category_select(id: &str) -> Markup {
    html! {
        div
        {
            label for=(id) class=(FORM_LABEL_STYLE) { "Category" }

            select name="category" id=(id) required class=(FORM_TEXT_INPUT_STYLE)
            {
                @for category in Category::ALL {
                    option value=(category.id()) { (category) }
                }
            }
        }
    }
}

fn date_input(name: &str, label: &str, value: Date) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            input
                name=(name)
                id=(name)
                type="date"
                required
                value=(value)
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

fn text_input(name: &str, label: &str, required: bool) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            input
                name=(name)
                id=(name)
                type="text"
                placeholder=(label)
                required[required]
                class=(FORM_TEXT_INPUT_STYLE);
        }
    }
}

fn amount_input(name: &str, label: &str) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            div class="input-wrapper w-full"
            {
                input
                    name=(name)
                    id=(name)
                    type="number"
                    step="0.01"
                    min="0"
                    placeholder="0.00"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }
    }
}

pub(super) fn add_expenditure_form(today: Date) -> Markup {
    html! {
        form
            id="add-expenditure-form"
            action=(endpoints::ADD_EXPENDITURE)
            method="post"
            data-json-form
            class=(FORM_CONTAINER_STYLE)
        {
            h3 class="text-xl font-semibold" { "Add Expenditure" }

            (category_select("expenditure-category"))
            (amount_input("price", "Price"))
            (date_input("date", "Date", today))
            (text_input("wherebought", "Where", true))
            (text_input("description", "Description", true))
            (text_input("tracking-num", "Tracking number", false))

            div
            {
                label for="tracking-num-carrier" class=(FORM_LABEL_STYLE) { "Carrier" }

                select name="tracking-num-carrier" id="tracking-num-carrier" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "None" }

                    @for (token, name) in CARRIERS {
                        option value=(token) { (name) }
                    }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Expenditure" }
        }
    }
}

pub(super) fn add_budget_form(today: Date) -> Markup {
    html! {
        form
            id="add-budget-form"
            action=(endpoints::ADD_BUDGET)
            method="post"
            data-json-form
            class=(FORM_CONTAINER_STYLE)
        {
            h3 class="text-xl font-semibold" { "Set Budget" }

            (category_select("budget-category"))
            (amount_input("budget", "Budget"))
            (date_input("start-date", "Start date", today))
            (date_input("end-date", "End date", today))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Set Budget" }
        }
    }
}

pub(super) fn profile_form(user: &User) -> Markup {
    html! {
        form
            id="profile-form"
            action=(endpoints::PROFILE_EDIT)
            method="post"
            class=(FORM_CONTAINER_STYLE)
        {
            h3 class="text-xl font-semibold" { "Edit Profile" }

            div
            {
                label for="profile-name" class=(FORM_LABEL_STYLE) { "Name" }

                input
                    name="profile-name"
                    id="profile-name"
                    type="text"
                    value=(user.name)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="profile-email" class=(FORM_LABEL_STYLE) { "Email" }

                input
                    name="profile-email"
                    id="profile-email"
                    type="email"
                    value=(user.email)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="new-password" class=(FORM_LABEL_STYLE) { "New password" }

                input
                    name="new-password"
                    id="new-password"
                    type="password"
                    autocomplete="new-password"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="current-password" class=(FORM_LABEL_STYLE) { "Current password" }

                input
                    name="current-password"
                    id="current-password"
                    type="password"
                    autocomplete="current-password"
                    placeholder="Needed to change your password"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save" }
        }
    }
}
