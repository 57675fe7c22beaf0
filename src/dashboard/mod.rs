//! Dashboard module
//!
//! Provides the main page: spending summaries, the transaction form and
//! list, and charts of monthly and per-category spending.

mod cards;
mod charts;
mod handlers;
mod list;

pub use handlers::get_dashboard_page;
