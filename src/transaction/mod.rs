//! Transaction management for the expense tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying, and managing transactions
//! - The JSON API handlers and the HTMX form handlers
//! - The transaction form and the edit page

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;
mod list_endpoint;

pub use self::core::{
    SUGGESTED_CATEGORIES, Transaction, TransactionBuilder, TransactionUpdate, create_transaction,
    create_transaction_table, delete_transaction, get_all_transactions, get_transaction,
    update_transaction,
};
pub use create_endpoint::{create_transaction_endpoint, create_transaction_form_endpoint};
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::{edit_transaction_form_endpoint, update_transaction_endpoint};
pub use edit_page::get_edit_transaction_page;
pub use form::{FormAction, TransactionFormDefaults, transaction_form};
pub use list_endpoint::get_transactions_endpoint;

#[cfg(test)]
pub use self::core::count_transactions;
