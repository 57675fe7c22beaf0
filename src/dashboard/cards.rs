//! Card components for the dashboard summary.
//!
//! Provides:
//! - The total expenses card
//! - The recent transactions card

use maud::{Markup, html};

use crate::{
    aggregation::{Summary, UNCATEGORIZED_LABEL},
    html::{CARD_STYLE, format_currency, format_date},
};

/// Renders the total expenses and recent transactions cards.
pub(super) fn summary_cards_view(summary: &Summary) -> Markup {
    html! {
        section
            id="summary"
            class="grid grid-cols-1 md:grid-cols-3 gap-6 w-full"
        {
            div class=(CARD_STYLE)
            {
                div
                    class="text-gray-500 dark:text-gray-400 text-sm font-medium
                        uppercase tracking-wider"
                {
                    "Total Expenses"
                }

                div id="total-expenses" class="mt-2 text-3xl font-bold"
                {
                    (format_currency(summary.grand_total))
                }
            }

            div class={ (CARD_STYLE) " md:col-span-2" }
            {
                h3 class="text-lg font-semibold mb-4" { "Recent Transactions" }

                @if summary.recent.is_empty() {
                    p class="text-gray-500 dark:text-gray-400" { "No recent transactions" }
                } @else {
                    ul id="recent-transactions" class="space-y-3"
                    {
                        @for transaction in &summary.recent {
                            li
                                class="flex justify-between items-center py-2 border-b
                                    border-gray-100 dark:border-gray-700 last:border-0"
                            {
                                div
                                {
                                    span class="font-medium" { (format_currency(transaction.amount)) }
                                    span class="mx-2 text-gray-400" { "•" }
                                    span class="text-gray-600 dark:text-gray-300"
                                    {
                                        (transaction.category.as_deref()
                                            .filter(|category| !category.is_empty())
                                            .unwrap_or(UNCATEGORIZED_LABEL))
                                    }
                                }

                                div class="text-sm text-gray-500 dark:text-gray-400"
                                {
                                    (format_date(transaction.date))
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
