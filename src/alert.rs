//! Alert messages shown to users after submitting a form.
//!
//! Alerts are swapped into the `#alert-container` element by HTMX.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

/// A success or error message, errors may carry details.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message without details.
    SuccessSimple { message: String },
    /// An error message with details.
    Error { message: String, details: String },
}

impl Alert {
    /// Render the alert as an HTML fragment.
    pub fn into_html(self) -> Markup {
        let (container_style, message, details) = match self {
            Alert::SuccessSimple { message } => (SUCCESS_STYLE, message, String::new()),
            Alert::Error { message, details } => (ERROR_STYLE, message, details),
        };

        html! {
            div
                role="alert"
                class={ "p-4 mb-4 rounded-lg border-l-4 " (container_style) }
            {
                p class="font-medium" { (message) }

                @if !details.is_empty() {
                    p class="mt-1 text-sm" { (details) }
                }

                button
                    type="button"
                    class="mt-2 text-sm underline"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "Dismiss"
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}

const SUCCESS_STYLE: &str = "text-green-800 bg-green-50 border-green-500 \
    dark:bg-gray-800 dark:text-green-400";

const ERROR_STYLE: &str = "text-red-800 bg-red-50 border-red-500 \
    dark:bg-gray-800 dark:text-red-400";
