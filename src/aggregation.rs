//! Transaction aggregation for the dashboard and its charts.
//!
//! Every view derives its numbers from the functions in this module so that
//! grouping, rounding and ordering are the same everywhere. All functions are
//! pure: they only look at the transaction slice they are given.
//!
//! Transactions whose amount is not a finite number are logged and skipped
//! rather than poisoning the totals.

use std::{cmp::Ordering, collections::HashMap};

use serde::Serialize;
use time::{Date, Month};

use crate::transaction::Transaction;

/// The label used for transactions without a category.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// The sum of the amounts of all transactions in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    /// The category name, or [UNCATEGORIZED_LABEL].
    pub category: String,
    /// The sum of the amounts in the category.
    pub total: f64,
}

/// A category total with its share of the overall total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    /// The category name, or [UNCATEGORIZED_LABEL].
    pub category: String,
    /// The sum of the amounts in the category.
    pub total: f64,
    /// The category's percentage of the overall total, to one decimal place.
    pub percentage: f64,
}

/// A calendar month used for grouping and ordering monthly totals.
///
/// Months are ordered chronologically via [MonthKey::index] and never by
/// their display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MonthKey {
    /// The year, e.g. 2024.
    pub year: i32,
    /// The month of the year.
    pub month: Month,
}

impl MonthKey {
    /// The month that `date` falls in.
    pub fn from_date(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// A number that increases by one for each month, i.e. `year * 12 + month_index`.
    pub fn index(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(u8::from(self.month)) - 1
    }

    /// The display label, e.g. "Jan 2024".
    pub fn label(&self) -> String {
        format!("{} {:04}", month_abbreviation(self.month), self.year)
    }
}

impl Ord for MonthKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index().cmp(&other.index())
    }
}

impl PartialOrd for MonthKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The sum of the amounts of all transactions in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    /// The month the total covers.
    pub month: MonthKey,
    /// The display label, e.g. "Jan 2024".
    pub label: String,
    /// The sum of the amounts in the month.
    pub total: f64,
}

/// The headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// The sum of every transaction amount.
    pub grand_total: f64,
    /// The most recent transactions, newest first.
    pub recent: Vec<Transaction>,
}

/// Sum the transaction amounts per category.
///
/// Transactions with a missing or empty category are counted under
/// [UNCATEGORIZED_LABEL]. The result is sorted by total, largest first, and
/// categories with equal totals are sorted by name.
pub fn category_totals(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: HashMap<&str, f64> = HashMap::new();

    for transaction in valid_transactions(transactions) {
        let category = match transaction.category.as_deref() {
            Some(category) if !category.is_empty() => category,
            _ => UNCATEGORIZED_LABEL,
        };

        *totals.entry(category).or_insert(0.0) += transaction.amount;
    }

    let mut totals: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_owned(),
            total,
        })
        .collect();

    totals.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });

    totals
}

/// Category totals annotated with each category's share of the overall total.
///
/// The overall total is the sum of the category totals, so the shares
/// describe exactly the data shown in a category breakdown.
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategoryShare> {
    let totals = category_totals(transactions);
    let overall_total: f64 = totals.iter().map(|category| category.total).sum();

    totals
        .into_iter()
        .map(|category| CategoryShare {
            percentage: percentage_of_total(category.total, overall_total),
            category: category.category,
            total: category.total,
        })
        .collect()
}

/// Sum the transaction amounts per calendar month, oldest month first.
///
/// The day of the month does not matter: every transaction in the same month
/// of the same year is added to the same total.
pub fn monthly_totals(transactions: &[Transaction]) -> Vec<MonthlyTotal> {
    let mut totals: HashMap<MonthKey, f64> = HashMap::new();

    for transaction in valid_transactions(transactions) {
        *totals
            .entry(MonthKey::from_date(transaction.date))
            .or_insert(0.0) += transaction.amount;
    }

    let mut totals: Vec<MonthlyTotal> = totals
        .into_iter()
        .map(|(month, total)| MonthlyTotal {
            month,
            label: month.label(),
            total,
        })
        .collect();

    totals.sort_by_key(|total| total.month);

    totals
}

/// Calculate `value` as a percentage of `total`, rounded to one decimal place.
///
/// Returns zero when `total` is not positive so callers never see `NaN` or
/// infinity.
pub fn percentage_of_total(value: f64, total: f64) -> f64 {
    if total <= 0.0 || !total.is_finite() || !value.is_finite() {
        return 0.0;
    }

    (value / total * 1000.0).round() / 10.0
}

/// Calculate the grand total and find the `recent_count` most recent transactions.
///
/// Recent transactions are sorted by date, newest first. Transactions on the
/// same date are sorted by ID, highest first, i.e. the most recently created
/// transaction comes first.
pub fn summarize(transactions: &[Transaction], recent_count: usize) -> Summary {
    let grand_total = valid_transactions(transactions)
        .map(|transaction| transaction.amount)
        .sum();

    let mut recent: Vec<&Transaction> = transactions.iter().collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));

    Summary {
        grand_total,
        recent: recent
            .into_iter()
            .take(recent_count)
            .cloned()
            .collect(),
    }
}

/// Iterate over the transactions whose amount can be summed.
fn valid_transactions(transactions: &[Transaction]) -> impl Iterator<Item = &Transaction> {
    transactions.iter().filter(|transaction| {
        let is_valid = transaction.amount.is_finite();

        if !is_valid {
            tracing::warn!(
                "Skipping transaction {} with invalid amount {}",
                transaction.id,
                transaction.amount
            );
        }

        is_valid
    })
}

fn month_abbreviation(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}
