//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - The route handler for displaying the dashboard
//! - HTML view functions for rendering the dashboard UI
//! - State and query types used by the handler

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    aggregation::{Summary, category_breakdown, category_totals, monthly_totals, summarize},
    alert::Alert,
    dashboard::{
        cards::summary_cards_view,
        charts::{
            DashboardChart, ECHARTS_SCRIPT, build_dashboard_charts, charts_script, charts_view,
        },
        list::transactions_list_view,
    },
    endpoints,
    html::{CARD_STYLE, HeadElement, PAGE_CONTAINER_STYLE, base},
    transaction::{
        FormAction, Transaction, TransactionFormDefaults, get_all_transactions, transaction_form,
    },
};

/// The number of transactions shown in the recent transactions card.
const RECENT_TRANSACTION_COUNT: usize = 3;

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters accepted by the dashboard page.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// Set to `"true"` after a transaction was created from the dashboard
    /// form. Any other value is ignored.
    #[serde(default)]
    pub added: Option<String>,
}

/// Holds all the data needed to render the dashboard.
struct DashboardData {
    transactions: Vec<Transaction>,
    summary: Summary,
    charts: [DashboardChart; 3],
}

/// Display the dashboard with the summary, the transaction form and list, and the charts.
///
/// Every section is built from a single read of the transactions. If the
/// transactions cannot be read, the page shows an error message in place of
/// the data.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let transactions = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return dashboard_error_view(Error::DatabaseLockError);
            }
        };

        match get_all_transactions(&connection) {
            Ok(transactions) => transactions,
            Err(error) => {
                tracing::error!("Could not load transactions for the dashboard: {error}");
                return dashboard_error_view(error);
            }
        }
    };

    let data = build_dashboard_data(transactions);
    let alert = (query.added.as_deref() == Some("true")).then(|| Alert::SuccessSimple {
        message: "Transaction added successfully!".to_owned(),
    });

    dashboard_view(&data, alert).into_response()
}

/// Runs every aggregation over the same snapshot of transactions.
fn build_dashboard_data(transactions: Vec<Transaction>) -> DashboardData {
    let summary = summarize(&transactions, RECENT_TRANSACTION_COUNT);
    let charts = build_dashboard_charts(
        &monthly_totals(&transactions),
        &category_breakdown(&transactions),
        &category_totals(&transactions),
    );

    DashboardData {
        transactions,
        summary,
        charts,
    }
}

fn page_header() -> Markup {
    html! {
        header class="text-center mb-8"
        {
            h1
                class="text-4xl font-extrabold sm:text-5xl bg-clip-text text-transparent
                    bg-gradient-to-r from-indigo-600 to-blue-500"
            {
                "Personal Finance Visualizer"
            }

            p class="mt-3 max-w-2xl mx-auto text-xl text-gray-500 dark:text-gray-400"
            {
                "Track, analyze, and optimize your spending"
            }
        }
    }
}

fn new_transaction_form() -> Markup {
    let today = OffsetDateTime::now_utc().date();
    let form = transaction_form(
        FormAction::Post(endpoints::DASHBOARD_TRANSACTIONS),
        &TransactionFormDefaults {
            amount: None,
            date: today,
            description: None,
            category: Some("Food"),
        },
        "Add Transaction",
    );

    html! {
        section id="new-transaction" class=(CARD_STYLE)
        {
            h2 class="text-2xl font-bold mb-6" { "Add New Transaction" }

            (form)
        }
    }
}

fn dashboard_view(data: &DashboardData, alert: Option<Alert>) -> Markup {
    let content = html!(
        div class=(PAGE_CONTAINER_STYLE)
        {
            (page_header())

            @if let Some(alert) = alert {
                div class="w-full max-w-7xl" { (alert.into_html()) }
            }

            div class="grid grid-cols-1 gap-8 lg:grid-cols-3 w-full max-w-7xl"
            {
                div class="lg:col-span-2 space-y-8"
                {
                    (summary_cards_view(&data.summary))
                    (new_transaction_form())
                    (transactions_list_view(&data.transactions))
                }

                (charts_view(&data.charts))
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
        charts_script(&data.charts),
    ];

    base("Dashboard", &scripts, &content)
}

/// Renders the dashboard with an error message in place of the data.
fn dashboard_error_view(error: Error) -> Response {
    let status = match error {
        Error::NotFound => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let content = html!(
        div class=(PAGE_CONTAINER_STYLE)
        {
            (page_header())

            div
                id="dashboard-error"
                role="alert"
                class="p-4 text-center text-red-500"
            {
                "Failed to load dashboard data"
            }
        }
    );

    (status, base("Dashboard", &[], &content)).into_response()
}
