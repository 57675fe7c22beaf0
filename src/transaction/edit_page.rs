use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    endpoints::{self, format_endpoint},
    html::{FORM_CONTAINER_STYLE, LINK_STYLE, base},
    internal_server_error::render_internal_server_error,
    not_found::get_404_not_found_response,
    transaction::{
        Transaction,
        form::{FormAction, TransactionFormDefaults, transaction_form},
        get_transaction,
    },
};

/// The state needed for the edit transaction page.
#[derive(Debug, Clone)]
pub struct EditTransactionPageState {
    /// The database connection for reading the transaction.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for editing a transaction.
pub async fn get_edit_transaction_page(
    State(state): State<EditTransactionPageState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return render_internal_server_error();
        }
    };

    let transaction = match get_transaction(transaction_id, &connection) {
        Ok(transaction) => transaction,
        Err(Error::NotFound) => {
            return get_404_not_found_response();
        }
        Err(error) => {
            tracing::error!("Failed to retrieve transaction {transaction_id}: {error}");
            return render_internal_server_error();
        }
    };

    edit_transaction_view(&transaction).into_response()
}

fn edit_transaction_view(transaction: &Transaction) -> maud::Markup {
    let endpoint = format_endpoint(endpoints::DASHBOARD_TRANSACTION, transaction.id);
    let form = transaction_form(
        FormAction::Put(&endpoint),
        &TransactionFormDefaults {
            amount: Some(transaction.amount),
            date: transaction.date,
            description: Some(&transaction.description),
            category: transaction.category.as_deref(),
        },
        "Save Changes",
    );

    let content = html! {
        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-2xl font-bold my-6" { "Edit Transaction" }

            (form)

            a href=(endpoints::ROOT) class={ "mt-4 " (LINK_STYLE) } { "Back to Dashboard" }
        }
    };

    base("Edit Transaction", &[], &content)
}
