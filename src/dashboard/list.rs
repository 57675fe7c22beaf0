//! The transaction list shown on the dashboard.

use maud::{Markup, html};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    endpoints::{self, format_endpoint},
    html::{BUTTON_DELETE_STYLE, CARD_STYLE, LINK_STYLE, format_currency, format_date},
    transaction::Transaction,
};

/// The max number of graphemes to display for a description before
/// truncating and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 48;

fn category_badge_style(category: &str) -> &'static str {
    match category {
        "Food" => "bg-green-100 text-green-800",
        "Transport" => "bg-blue-100 text-blue-800",
        "Shopping" => "bg-purple-100 text-purple-800",
        "Bills" => "bg-red-100 text-red-800",
        "Health" => "bg-yellow-100 text-yellow-800",
        _ => "bg-gray-100 text-gray-800",
    }
}

fn format_description(description: &str) -> (String, Option<&str>) {
    let description_length = description.graphemes(true).count();

    if description_length <= MAX_DESCRIPTION_GRAPHEMES {
        (description.to_owned(), None)
    } else {
        let truncated: String = description
            .graphemes(true)
            .take(MAX_DESCRIPTION_GRAPHEMES - 3)
            .collect();
        (truncated + "...", Some(description))
    }
}

/// Renders every transaction with links to edit or delete it.
pub(super) fn transactions_list_view(transactions: &[Transaction]) -> Markup {
    html! {
        section id="transactions" class=(CARD_STYLE)
        {
            div class="flex justify-between items-center mb-6"
            {
                h2 class="text-2xl font-bold" { "Your Transactions" }

                a id="refresh-transactions" href=(endpoints::ROOT) class=(LINK_STYLE)
                {
                    "Refresh"
                }
            }

            @if transactions.is_empty() {
                div class="text-center py-8"
                {
                    h3 class="mt-2 text-sm font-medium" { "No transactions" }
                    p class="mt-1 text-sm text-gray-500 dark:text-gray-400"
                    {
                        "Get started by adding a new transaction."
                    }
                }
            } @else {
                ul class="space-y-4"
                {
                    @for transaction in transactions {
                        (transaction_row(transaction))
                    }
                }
            }
        }
    }
}

fn transaction_row(transaction: &Transaction) -> Markup {
    let category = transaction
        .category
        .as_deref()
        .filter(|category| !category.is_empty());
    let (description, full_description) = format_description(&transaction.description);
    let edit_url = format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id);
    let delete_url = format_endpoint(endpoints::TRANSACTION_API, transaction.id);

    html! {
        li
            data-transaction-id=(transaction.id)
            class="bg-gray-50 dark:bg-gray-700 rounded-lg p-4 flex justify-between items-start"
        {
            div class="flex-1 min-w-0"
            {
                div class="flex items-center space-x-2"
                {
                    @if let Some(category) = category {
                        span
                            class={
                                "px-2 py-1 rounded-full text-xs font-medium "
                                (category_badge_style(category))
                            }
                        {
                            (category)
                        }
                    }

                    span class="text-lg font-semibold" { (format_currency(transaction.amount)) }
                }

                p class="mt-1 text-sm text-gray-600 dark:text-gray-300" title=[full_description]
                {
                    (description)
                }

                p class="mt-1 text-xs text-gray-500 dark:text-gray-400"
                {
                    (format_date(transaction.date))
                }
            }

            div class="flex gap-4"
            {
                a href=(edit_url) class=(LINK_STYLE) { "Edit" }

                button
                    hx-delete=(delete_url)
                    hx-confirm={
                        "Are you sure you want to delete '" (transaction.description) "'?"
                    }
                    hx-swap="none"
                    hx-target-error="#alert-container"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete"
                }
            }
        }
    }
}
