//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::{Deserialize, Deserializer, Serialize};
use time::Date;

use crate::{Error, database_id::TransactionId};

// ============================================================================
// MODELS
// ============================================================================

/// The categories offered by the transaction form.
///
/// Categories are free text, so stored transactions may use other names too.
pub const SUGGESTED_CATEGORIES: [&str; 6] = [
    "Food",
    "Transport",
    "Shopping",
    "Bills",
    "Health",
    "Entertainment",
];

/// An expense, i.e. an event where money was spent.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction, assigned by the database.
    pub id: TransactionId,
    /// The amount of money spent in this transaction.
    pub amount: f64,
    /// When the transaction happened.
    #[serde(with = "date_format")]
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The category of the transaction, e.g. "Food", "Transport", "Bills".
    pub category: Option<String>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(amount: f64, date: Date, description: &str) -> TransactionBuilder {
        TransactionBuilder {
            amount,
            date,
            description: description.to_owned(),
            category: None,
        }
    }
}

/// A candidate transaction that has not been stored yet.
///
/// This is also the JSON body accepted when creating a transaction, so
/// `amount`, `date` and `description` are required while `category` may be
/// omitted.
///
/// # Examples
///
/// ```ignore
/// use time::macros::date;
///
/// use crate::transaction::Transaction;
///
/// let transaction = Transaction::build(45.99, date!(2025 - 01 - 15), "Coffee")
///     .category(Some("Food".to_owned()));
/// ```
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct TransactionBuilder {
    /// The monetary amount of the transaction.
    pub amount: f64,

    /// The date when the transaction occurred.
    ///
    /// Accepts either a calendar date ("2025-01-15") or an RFC 3339
    /// date-time, of which only the date is kept.
    #[serde(with = "date_format")]
    pub date: Date,

    /// A human-readable description of the transaction.
    pub description: String,

    /// The free-text category of the transaction.
    ///
    /// Missing categories are stored as `NULL` and only shown as
    /// "Uncategorized" when aggregating.
    #[serde(default)]
    pub category: Option<String>,
}

impl TransactionBuilder {
    /// Set the category for the transaction.
    pub fn category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }
}

/// A partial update to a stored transaction.
///
/// Fields that are omitted are left unchanged. For `category`, an explicit
/// `null` clears the stored category while an omitted field keeps it.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct TransactionUpdate {
    /// The new amount, if any.
    #[serde(default)]
    pub amount: Option<f64>,
    /// The new date, if any.
    #[serde(default, deserialize_with = "date_format::deserialize_optional")]
    pub date: Option<Date>,
    /// The new description, if any.
    #[serde(default)]
    pub description: Option<String>,
    /// `None` keeps the category, `Some(None)` clears it.
    #[serde(default, deserialize_with = "deserialize_some")]
    pub category: Option<Option<String>>,
}

/// Distinguishes an explicit `null` from a missing field.
fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Serde support for dates written as "YYYY-MM-DD".
pub(crate) mod date_format {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{
        Date, OffsetDateTime,
        format_description::{BorrowedFormatItem, well_known::Rfc3339},
        macros::format_description,
    };

    /// The format used for dates in JSON, forms and HTML date inputs.
    pub const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

    /// Parse a calendar date, falling back to the date part of an RFC 3339 date-time.
    pub fn parse_date(text: &str) -> Result<Date, time::error::Parse> {
        let text = text.trim();

        Date::parse(text, DATE_FORMAT)
            .or_else(|_| OffsetDateTime::parse(text, &Rfc3339).map(|date_time| date_time.date()))
    }

    pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let text = date
            .format(DATE_FORMAT)
            .map_err(serde::ser::Error::custom)?;

        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;

        parse_date(&text).map_err(serde::de::Error::custom)
    }

    pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|text| parse_date(&text))
            .transpose()
            .map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyDescription] if the description is blank,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(
            "INSERT INTO \"transaction\" (amount, date, description, category)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING id, amount, date, description, category",
        )?
        .query_row(
            (
                builder.amount,
                builder.date,
                builder.description,
                builder.category,
            ),
            map_transaction_row,
        )
        .map_err(map_constraint_error)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, amount, date, description, category FROM \"transaction\" WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve every transaction in the database, oldest first.
///
/// Rows that cannot be decoded, e.g. a date that is not "YYYY-MM-DD" or an
/// amount that is not a number, are logged and skipped so that one bad row
/// does not hide the rest of the data.
///
/// # Errors
/// This function will return a [Error::SqlError] if the query itself fails.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    let mut statement = connection.prepare(
        "SELECT id, amount, date, description, category FROM \"transaction\" ORDER BY id ASC",
    )?;

    let mut transactions = Vec::new();

    for row in statement.query_map([], map_transaction_row)? {
        match row {
            Ok(transaction) => transactions.push(transaction),
            Err(error) if is_malformed_row(&error) => {
                tracing::warn!("Skipping malformed transaction row: {error}");
            }
            Err(error) => return Err(error.into()),
        }
    }

    Ok(transactions)
}

/// Apply a partial update to the transaction with `id`.
///
/// Returns `Ok(None)` if no transaction has the ID `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyDescription] if the new description is blank,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    update: TransactionUpdate,
    connection: &Connection,
) -> Result<Option<Transaction>, Error> {
    let (set_category, category) = match update.category {
        Some(category) => (true, category),
        None => (false, None),
    };

    connection
        .prepare(
            "UPDATE \"transaction\"
             SET amount = COALESCE(?1, amount),
                 date = COALESCE(?2, date),
                 description = COALESCE(?3, description),
                 category = CASE WHEN ?4 THEN ?5 ELSE category END
             WHERE id = ?6
             RETURNING id, amount, date, description, category",
        )?
        .query_row(
            params![
                update.amount,
                update.date,
                update.description,
                set_category,
                category,
                id
            ],
            map_transaction_row,
        )
        .optional()
        .map_err(map_constraint_error)
}

type RowsAffected = usize;

/// Delete the transaction with `id`, if it exists.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM \"transaction\" WHERE id = :id",
            &[(":id", &id)],
        )
        .map_err(|err| err.into())
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
#[cfg(test)]
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount REAL NOT NULL,
                date TEXT NOT NULL,
                description TEXT NOT NULL CHECK (trim(description) <> ''),
                category TEXT
                )",
        (),
    )?;

    // Recent transactions are looked up by date.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let amount = row.get(1)?;
    let date = row.get(2)?;
    let description = row.get(3)?;
    let category = row.get(4)?;

    Ok(Transaction {
        id,
        amount,
        date,
        description,
        category,
    })
}

/// Whether `error` was caused by the contents of a single row rather than
/// the query or the connection.
fn is_malformed_row(error: &rusqlite::Error) -> bool {
    matches!(
        error,
        rusqlite::Error::FromSqlConversionFailure(..)
            | rusqlite::Error::InvalidColumnType(..)
            | rusqlite::Error::IntegralValueOutOfRange(..)
    )
}

fn map_constraint_error(error: rusqlite::Error) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_CHECK,
            },
            _,
        ) => Error::EmptyDescription,
        error => error.into(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        transaction::{
            Transaction, TransactionUpdate, count_transactions, create_transaction,
            delete_transaction, get_all_transactions, get_transaction, update_transaction,
        },
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();
        let amount = 12.3;

        let result = create_transaction(
            Transaction::build(amount, date!(2025 - 10 - 05), "Lunch")
                .category(Some("Food".to_owned())),
            &conn,
        );

        match result {
            Ok(transaction) => {
                assert!(transaction.id > 0);
                assert_eq!(transaction.amount, amount);
                assert_eq!(transaction.date, date!(2025 - 10 - 05));
                assert_eq!(transaction.category.as_deref(), Some("Food"));
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_keeps_missing_category_as_none() {
        let conn = get_test_connection();

        let transaction =
            create_transaction(Transaction::build(1.0, date!(2025 - 10 - 05), "Gum"), &conn)
                .expect("Could not create transaction");

        assert_eq!(get_transaction(transaction.id, &conn).unwrap().category, None);
    }

    #[test]
    fn create_fails_on_blank_description() {
        let conn = get_test_connection();

        let result = create_transaction(Transaction::build(1.0, date!(2025 - 10 - 05), "  "), &conn);

        assert_eq!(result, Err(Error::EmptyDescription));
        assert_eq!(count_transactions(&conn).unwrap(), 0);
    }

    #[test]
    fn get_missing_transaction_is_not_found() {
        let conn = get_test_connection();

        assert_eq!(get_transaction(42, &conn), Err(Error::NotFound));
    }

    #[test]
    fn get_all_returns_every_transaction_in_creation_order() {
        let conn = get_test_connection();
        let want: Vec<Transaction> = (1..=5)
            .map(|i| {
                create_transaction(
                    Transaction::build(i as f64, date!(2025 - 10 - 05), "Thing"),
                    &conn,
                )
                .expect("Could not create transaction")
            })
            .collect();

        let got = get_all_transactions(&conn).expect("Could not get transactions");

        assert_eq!(want, got);
    }

    #[test]
    fn get_all_skips_malformed_rows() {
        let conn = get_test_connection();
        let good = create_transaction(Transaction::build(5.0, date!(2024 - 01 - 15), "Ok"), &conn)
            .expect("Could not create transaction");
        conn.execute(
            "INSERT INTO \"transaction\" (amount, date, description) VALUES (10.0, 'not a date', 'Bad date')",
            (),
        )
        .unwrap();
        conn.execute(
            "INSERT INTO \"transaction\" (amount, date, description) VALUES ('lots', '2024-01-16', 'Bad amount')",
            (),
        )
        .unwrap();

        let got = get_all_transactions(&conn).expect("Could not get transactions");

        assert_eq!(got, vec![good]);
    }

    #[test]
    fn update_only_changes_given_fields() {
        let conn = get_test_connection();
        let original = create_transaction(
            Transaction::build(10.0, date!(2024 - 01 - 15), "Bus")
                .category(Some("Transport".to_owned())),
            &conn,
        )
        .unwrap();

        let updated = update_transaction(
            original.id,
            TransactionUpdate {
                amount: Some(12.5),
                ..Default::default()
            },
            &conn,
        )
        .expect("Could not update transaction");

        let want = Transaction {
            amount: 12.5,
            ..original
        };
        assert_eq!(updated, Some(want.clone()));
        assert_eq!(get_transaction(want.id, &conn), Ok(want));
    }

    #[test]
    fn update_can_clear_category() {
        let conn = get_test_connection();
        let original = create_transaction(
            Transaction::build(10.0, date!(2024 - 01 - 15), "Bus")
                .category(Some("Transport".to_owned())),
            &conn,
        )
        .unwrap();

        let updated = update_transaction(
            original.id,
            TransactionUpdate {
                category: Some(None),
                ..Default::default()
            },
            &conn,
        )
        .expect("Could not update transaction")
        .expect("Transaction should exist");

        assert_eq!(updated.category, None);
        assert_eq!(updated.description, "Bus");
    }

    #[test]
    fn update_missing_transaction_returns_none() {
        let conn = get_test_connection();

        let result = update_transaction(
            1337,
            TransactionUpdate {
                description: Some("Nothing".to_owned()),
                ..Default::default()
            },
            &conn,
        );

        assert_eq!(result, Ok(None));
    }

    #[test]
    fn delete_removes_transaction() {
        let conn = get_test_connection();
        let transaction =
            create_transaction(Transaction::build(1.23, date!(2025 - 10 - 26), "Test"), &conn)
                .unwrap();

        let rows_affected = delete_transaction(transaction.id, &conn).unwrap();

        assert_eq!(rows_affected, 1);
        assert_eq!(get_transaction(transaction.id, &conn), Err(Error::NotFound));
    }

    #[test]
    fn delete_missing_transaction_changes_nothing() {
        let conn = get_test_connection();
        create_transaction(Transaction::build(1.23, date!(2025 - 10 - 26), "Test"), &conn).unwrap();

        let rows_affected = delete_transaction(999, &conn).unwrap();

        assert_eq!(rows_affected, 0);
        assert_eq!(count_transactions(&conn).unwrap(), 1);
    }
}

#[cfg(test)]
mod serde_tests {
    use time::macros::date;

    use crate::transaction::{Transaction, TransactionBuilder, TransactionUpdate};

    #[test]
    fn transaction_serializes_date_as_calendar_date() {
        let transaction = Transaction {
            id: 7,
            amount: 20.0,
            date: date!(2024 - 01 - 28),
            description: "Cinema".to_owned(),
            category: Some("Entertainment".to_owned()),
        };

        let json = serde_json::to_value(&transaction).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["date"], "2024-01-28");
        assert_eq!(json["category"], "Entertainment");
    }

    #[test]
    fn builder_accepts_rfc3339_date_time() {
        let builder: TransactionBuilder = serde_json::from_str(
            r#"{"amount": 9.5, "date": "2024-03-02T10:30:00.000Z", "description": "Taxi"}"#,
        )
        .unwrap();

        assert_eq!(builder.date, date!(2024 - 03 - 02));
        assert_eq!(builder.category, None);
    }

    #[test]
    fn builder_requires_description() {
        let result = serde_json::from_str::<TransactionBuilder>(
            r#"{"amount": 9.5, "date": "2024-03-02"}"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn update_distinguishes_null_category_from_missing() {
        let missing: TransactionUpdate = serde_json::from_str(r#"{"amount": 1.0}"#).unwrap();
        let null: TransactionUpdate = serde_json::from_str(r#"{"category": null}"#).unwrap();

        assert_eq!(missing.category, None);
        assert_eq!(missing.amount, Some(1.0));
        assert_eq!(null.category, Some(None));
    }

    #[test]
    fn update_parses_optional_date() {
        let update: TransactionUpdate =
            serde_json::from_str(r#"{"date": "2024-02-29"}"#).unwrap();

        assert_eq!(update.date, Some(date!(2024 - 02 - 29)));
    }
}
