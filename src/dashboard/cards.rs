//! Cards showing the totals, average and remaining budget of each category.

use maud::{Markup, html};

use crate::{aggregation::CategorySummary, html::format_currency};

/// The text shown in place of the remaining budget when no budget is set.
pub(super) const NO_BUDGET_TEXT: &str = "No budget";

fn remaining_view(remaining: Option<f64>) -> Markup {
    match remaining {
        Some(amount) if amount < 0.0 => html!(
            span data-field="remaining" class="text-red-600 dark:text-red-400"
            {
                (format_currency(amount))
            }
        ),
        Some(amount) => html!(
            span data-field="remaining" class="text-green-600 dark:text-green-400"
            {
                (format_currency(amount))
            }
        ),
        None => html!(
            span data-field="remaining" class="text-gray-500 dark:text-gray-400"
            {
                (NO_BUDGET_TEXT)
            }
        ),
    }
}

fn category_card(summary: &CategorySummary) -> Markup {
    html! {
        div
            id={ "category-" (summary.category.id()) }
            class="bg-white dark:bg-gray-800 border border-gray-200
                dark:border-gray-700 rounded-lg p-4 shadow-md"
        {
            h4 class="text-lg font-semibold mb-1" { (summary.category) }

            p class="text-xs text-gray-600 dark:text-gray-400 mb-3"
            {
                (summary.window.start()) " to " (summary.window.end())
            }

            dl class="grid grid-cols-2 gap-1 text-sm"
            {
                dt { "Total" }
                dd data-field="total" class="text-right" { (format_currency(summary.totals.total)) }
                dt { "Average" }
                dd data-field="average" class="text-right" { (format_currency(summary.totals.average)) }
                dt { "Remaining" }
                dd class="text-right" { (remaining_view(summary.remaining)) }
            }
        }
    }
}

/// Renders a card per category and the grand total across all categories.
pub(super) fn category_cards_view(summaries: &[CategorySummary]) -> Markup {
    let grand_total: f64 = summaries.iter().map(|summary| summary.totals.total).sum();

    html! {
        section id="category-cards" class="w-full mx-auto"
        {
            div class="flex justify-between items-baseline mb-4"
            {
                h3 class="text-xl font-semibold" { "Spending by Category" }

                span class="text-sm text-gray-600 dark:text-gray-400"
                {
                    "Total: " span id="grand-total" { (format_currency(grand_total)) }
                }
            }

            div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-4"
            {
                @for summary in summaries {
                    (category_card(summary))
                }
            }
        }
    }
}
