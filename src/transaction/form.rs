use maud::{Markup, html};
use time::Date;

use crate::{
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    transaction::SUGGESTED_CATEGORIES,
};

/// The values a transaction form starts with.
pub struct TransactionFormDefaults<'a> {
    /// The amount to pre-fill, if any.
    pub amount: Option<f64>,
    /// The date to pre-fill.
    pub date: Date,
    /// The description to pre-fill, if any.
    pub description: Option<&'a str>,
    /// The category to pre-select, if any.
    pub category: Option<&'a str>,
}

/// How the form is submitted.
pub enum FormAction<'a> {
    /// Send a `POST` request to the given endpoint.
    Post(&'a str),
    /// Send a `PUT` request to the given endpoint.
    Put(&'a str),
}

/// Render a transaction form.
///
/// The amount, date and description inputs are required so the browser
/// prompts for them before sending anything. Errors from the server are
/// swapped into the page's alert container.
pub fn transaction_form(
    action: FormAction<'_>,
    defaults: &TransactionFormDefaults<'_>,
    submit_label: &str,
) -> Markup {
    let (hx_post, hx_put) = match action {
        FormAction::Post(endpoint) => (Some(endpoint), None),
        FormAction::Put(endpoint) => (None, Some(endpoint)),
    };
    let amount_str = defaults.amount.map(|amount| amount.to_string());
    // A stored category outside the suggested list still needs an option.
    let custom_category = defaults
        .category
        .filter(|category| !category.is_empty() && !SUGGESTED_CATEGORIES.contains(category));

    html! {
        form
            hx-post=[hx_post]
            hx-put=[hx_put]
            hx-target-error="#alert-container"
            class="w-full space-y-4"
        {
            div
            {
                label
                    for="amount"
                    class=(FORM_LABEL_STYLE)
                {
                    "Amount (₹)"
                }

                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="any"
                    placeholder="0.00"
                    required
                    value=[amount_str.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label
                    for="date"
                    class=(FORM_LABEL_STYLE)
                {
                    "Date"
                }

                input
                    name="date"
                    id="date"
                    type="date"
                    value=(defaults.date)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label
                    for="category"
                    class=(FORM_LABEL_STYLE)
                {
                    "Category"
                }

                select
                    name="category"
                    id="category"
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "Select category" }

                    @for category in SUGGESTED_CATEGORIES {
                        @if Some(category) == defaults.category {
                            option value=(category) selected { (category) }
                        } @else {
                            option value=(category) { (category) }
                        }
                    }

                    @if let Some(category) = custom_category {
                        option value=(category) selected { (category) }
                    }
                }
            }

            div
            {
                label
                    for="description"
                    class=(FORM_LABEL_STYLE)
                {
                    "Description"
                }

                input
                    name="description"
                    id="description"
                    type="text"
                    placeholder="What was it for?"
                    required
                    value=[defaults.description]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_label) }
        }
    }
}
