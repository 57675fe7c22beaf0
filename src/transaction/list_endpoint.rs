//! Defines the JSON endpoint for listing every transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    transaction::{Transaction, get_all_transactions},
};

/// The state needed to list transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with every stored transaction as a JSON array.
pub async fn get_transactions_endpoint(
    State(state): State<ListTransactionsState>,
) -> Result<Json<Vec<Transaction>>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    get_all_transactions(&connection).map(Json).inspect_err(|error| {
        tracing::error!("could not list transactions: {error}");
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, extract::State};
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        transaction::{
            Transaction, create_transaction, list_endpoint::ListTransactionsState,
            get_transactions_endpoint,
        },
    };

    fn get_test_state() -> ListTransactionsState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        ListTransactionsState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn returns_empty_list_for_empty_database() {
        let state = get_test_state();

        let Json(transactions) = get_transactions_endpoint(State(state)).await.unwrap();

        assert!(transactions.is_empty());
    }

    #[tokio::test]
    async fn returns_created_transactions() {
        let state = get_test_state();
        let want = {
            let connection = state.db_connection.lock().unwrap();
            vec![
                create_transaction(
                    Transaction::build(100.0, date!(2024 - 01 - 15), "Groceries")
                        .category(Some("Food".to_owned())),
                    &connection,
                )
                .unwrap(),
                create_transaction(
                    Transaction::build(50.0, date!(2024 - 01 - 20), "Train"),
                    &connection,
                )
                .unwrap(),
            ]
        };

        let Json(got) = get_transactions_endpoint(State(state)).await.unwrap();

        assert_eq!(got, want);
    }
}
