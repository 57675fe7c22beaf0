use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    endpoints,
    transaction::{
        Transaction, TransactionUpdate, create_endpoint::TransactionForm, update_transaction,
    },
};

/// The state needed to edit a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for partially updating a transaction from a JSON body.
///
/// Responds with the updated transaction, or `null` if there is no
/// transaction with the given ID.
pub async fn update_transaction_endpoint(
    State(state): State<EditTransactionState>,
    Path(transaction_id): Path<TransactionId>,
    Json(update): Json<TransactionUpdate>,
) -> Result<Json<Option<Transaction>>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let transaction =
        update_transaction(transaction_id, update, &connection).inspect_err(|error| {
            tracing::error!("Could not update transaction {transaction_id}: {error}");
        })?;

    if transaction.is_none() {
        tracing::debug!("Tried to update transaction {transaction_id} which does not exist");
    }

    Ok(Json(transaction))
}

/// A route handler for the edit form, redirects to the dashboard on success.
///
/// Every field is replaced, an empty category clears the stored category.
pub async fn edit_transaction_form_endpoint(
    State(state): State<EditTransactionState>,
    Path(transaction_id): Path<TransactionId>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("Could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let update = TransactionUpdate {
        amount: Some(form.amount),
        date: Some(form.date),
        description: Some(form.description),
        category: Some(form.category),
    };

    match update_transaction(transaction_id, update, &connection) {
        Ok(Some(_)) => {}
        Ok(None) => {
            tracing::error!("Could not update transaction {transaction_id}: it does not exist");
            return Error::NotFound.into_alert_response();
        }
        Err(error) => {
            tracing::error!("Could not update transaction {transaction_id}: {error}");
            return error.into_alert_response();
        }
    }

    (
        HxRedirect(endpoints::ROOT.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
