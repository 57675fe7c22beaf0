//! Defines the endpoints for creating a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error, endpoints,
    transaction::{Transaction, TransactionBuilder, core::date_format, create_transaction},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating or editing a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// The amount of money spent.
    pub amount: f64,
    /// The date when the transaction occurred.
    #[serde(with = "date_format")]
    pub date: Date,
    /// Text detailing the transaction.
    pub description: String,
    /// The category chosen in the form, if any.
    #[serde(default)]
    pub category: Option<String>,
}

/// A route handler for creating a transaction from a JSON body.
///
/// Responds with the stored transaction, including its new ID.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Json(builder): Json<TransactionBuilder>,
) -> Result<Json<Transaction>, Error> {
    let connection = state.db_connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })?;

    let transaction = create_transaction(builder, &connection).inspect_err(|error| {
        tracing::error!("could not create transaction: {error}");
    })?;

    Ok(Json(transaction))
}

/// A route handler for the dashboard's create form, redirects to the dashboard on success.
pub async fn create_transaction_form_endpoint(
    State(state): State<CreateTransactionState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let transaction =
        Transaction::build(form.amount, form.date, &form.description).category(form.category);

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = create_transaction(transaction, &connection) {
        tracing::error!("could not create transaction: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(format!("{}?added=true", endpoints::ROOT)),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
    use axum_extra::extract::Form;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        test_utils::{assert_hx_redirect, parse_html_fragment},
        transaction::{
            Transaction, count_transactions,
            create_endpoint::{CreateTransactionState, TransactionForm},
            create_transaction_endpoint, create_transaction_form_endpoint, get_transaction,
        },
    };

    fn get_test_state() -> CreateTransactionState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        CreateTransactionState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn json_create_returns_transaction_with_id() {
        let state = get_test_state();
        let builder = Transaction::build(45.5, date!(2024 - 02 - 03), "Pharmacy")
            .category(Some("Health".to_owned()));

        let Json(transaction) =
            create_transaction_endpoint(State(state.clone()), Json(builder))
                .await
                .expect("Could not create transaction");

        assert!(transaction.id > 0);
        assert_eq!(transaction.description, "Pharmacy");
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_transaction(transaction.id, &connection), Ok(transaction));
    }

    #[tokio::test]
    async fn json_create_rejects_blank_description() {
        let state = get_test_state();

        let result = create_transaction_endpoint(
            State(state.clone()),
            Json(Transaction::build(1.0, date!(2024 - 02 - 03), "")),
        )
        .await;

        assert_eq!(result.err(), Some(Error::EmptyDescription));
    }

    #[tokio::test]
    async fn form_create_redirects_to_dashboard() {
        let state = get_test_state();
        let form = TransactionForm {
            amount: 12.3,
            date: date!(2025 - 03 - 01),
            description: "test transaction".to_owned(),
            category: Some("Food".to_owned()),
        };

        let response = create_transaction_form_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, "/?added=true");
        let connection = state.db_connection.lock().unwrap();
        let transaction = get_transaction(1, &connection).unwrap();
        assert_eq!(transaction.amount, 12.3);
        assert_eq!(transaction.category.as_deref(), Some("Food"));
    }

    #[tokio::test]
    async fn form_create_with_blank_description_shows_alert() {
        let state = get_test_state();
        let form = TransactionForm {
            amount: 12.3,
            date: date!(2025 - 03 - 01),
            description: "   ".to_owned(),
            category: None,
        };

        let response = create_transaction_form_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = parse_html_fragment(response).await;
        let alert = html
            .select(&scraper::Selector::parse("[role=alert]").unwrap())
            .next();
        assert!(alert.is_some(), "want an alert in the response");
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_transactions(&connection).unwrap(), 0);
    }
}
