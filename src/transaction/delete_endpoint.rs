use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_htmx::{HxRefresh, HxRequest};
use rusqlite::Connection;
use serde_json::json;

use crate::{AppState, Error, database_id::TransactionId, transaction::delete_transaction};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a transaction.
///
/// Responds with a confirmation message whether or not the transaction
/// existed. HTMX requests also get told to refresh the page.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    HxRequest(is_htmx_request): HxRequest,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    match delete_transaction(transaction_id, &connection) {
        Ok(0) => tracing::debug!("Transaction {transaction_id} was already deleted"),
        Ok(_) => {}
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            return Err(error);
        }
    }

    let body = Json(json!({ "message": "Transaction deleted" }));

    if is_htmx_request {
        Ok((HxRefresh(true), body).into_response())
    } else {
        Ok(body.into_response())
    }
}
