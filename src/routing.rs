//! Application router configuration for the JSON API and the HTML pages.

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::{
    AppState,
    dashboard::get_dashboard_page,
    endpoints,
    not_found::get_404_not_found,
    transaction::{
        create_transaction_endpoint, create_transaction_form_endpoint,
        delete_transaction_endpoint, edit_transaction_form_endpoint, get_edit_transaction_page,
        get_transactions_endpoint, update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            endpoints::TRANSACTIONS_API,
            get(get_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION_API,
            put(update_transaction_endpoint).delete(delete_transaction_endpoint),
        );

    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_dashboard_page))
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page),
        )
        .route(
            endpoints::DASHBOARD_TRANSACTIONS,
            post(create_transaction_form_endpoint),
        )
        .route(
            endpoints::DASHBOARD_TRANSACTION,
            put(edit_transaction_form_endpoint),
        );

    api_routes
        .merge(page_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}
