//! Tables listing the user's expenditures and budgets.

use maud::{Markup, html};
use reqwest::Url;

use crate::{
    budget::Budget,
    endpoints::{self, format_endpoint},
    expenditure::Expenditure,
    html::{
        BUTTON_DELETE_STYLE, BUTTON_SECONDARY_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, format_currency,
    },
};

fn remove_button(action: &str) -> Markup {
    html! {
        form action=(action) method="post"
        {
            button type="submit" class=(BUTTON_DELETE_STYLE) { "Remove" }
        }
    }
}

/// The path of the tracking route for `tracking_num`, percent-encoded as a
/// single path segment.
fn tracking_path(tracking_num: &str) -> String {
    let mut url = Url::parse("http://localhost/").expect("static base URL is valid");
    url.path_segments_mut()
        .expect("http URLs have path segments")
        .clear()
        .extend([endpoints::TRACKING_SEGMENT, tracking_num]);

    url.path().to_owned()
}

fn tracking_cell(expenditure: &Expenditure) -> Markup {
    match (&expenditure.tracking_num, &expenditure.tracking_num_carrier) {
        (Some(tracking_num), Some(_)) => html! {
            button
                type="button"
                class=(BUTTON_SECONDARY_STYLE)
                data-tracking-url=(tracking_path(tracking_num))
            {
                "Track " (tracking_num)
            }
            span data-tracking-result {}
        },
        (Some(tracking_num), None) => html!((tracking_num)),
        _ => html!(),
    }
}

/// Renders the user's expenditures, newest first, with remove buttons.
pub(super) fn expenditures_table(expenditures: &[Expenditure]) -> Markup {
    html! {
        section class="w-full"
        {
            h3 class="text-xl font-semibold mb-4" { "Expenditures" }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table id="expenditures" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Where" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Price" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Tracking" }
                            th scope="col" class=(TABLE_CELL_STYLE) { span class="sr-only" { "Remove" } }
                        }
                    }

                    tbody
                    {
                        @for expenditure in expenditures {
                            tr class=(TABLE_ROW_STYLE) data-expenditure-id=(expenditure.id)
                            {
                                td class=(TABLE_CELL_STYLE) { (expenditure.date) }
                                td class=(TABLE_CELL_STYLE) { (expenditure.category) }
                                td class=(TABLE_CELL_STYLE) { (expenditure.where_bought) }
                                td class=(TABLE_CELL_STYLE) { (expenditure.description) }
                                td class=(TABLE_CELL_STYLE) { (format_currency(expenditure.price)) }
                                td class=(TABLE_CELL_STYLE) { (tracking_cell(expenditure)) }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    (remove_button(&format_endpoint(endpoints::REMOVE_EXPENDITURE, expenditure.id)))
                                }
                            }
                        }

                        @if expenditures.is_empty() {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td colspan="7" class={(TABLE_CELL_STYLE) " text-center"}
                                {
                                    "No expenditures recorded yet."
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders the user's budgets with remove buttons.
pub(super) fn budgets_table(budgets: &[Budget]) -> Markup {
    html! {
        section class="w-full"
        {
            h3 class="text-xl font-semibold mb-4" { "Budgets" }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table id="budgets" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Budget" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Start" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "End" }
                            th scope="col" class=(TABLE_CELL_STYLE) { span class="sr-only" { "Remove" } }
                        }
                    }

                    tbody
                    {
                        @for budget in budgets {
                            tr class=(TABLE_ROW_STYLE) data-budget-id=(budget.id) data-category-id=(budget.category.id())
                            {
                                td class=(TABLE_CELL_STYLE) { (budget.category) }
                                td class=(TABLE_CELL_STYLE) { (format_currency(budget.amount)) }
                                td class=(TABLE_CELL_STYLE) { (budget.start_date) }
                                td class=(TABLE_CELL_STYLE) { (budget.end_date) }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    (remove_button(&format_endpoint(endpoints::REMOVE_BUDGET, budget.id)))
                                }
                            }
                        }

                        @if budgets.is_empty() {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td colspan="5" class={(TABLE_CELL_STYLE) " text-center"}
                                {
                                    "No budgets set yet."
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
