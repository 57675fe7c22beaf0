use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Duration, OffsetDateTime};

use expense_tracker::{SUGGESTED_CATEGORIES, Transaction, create_transaction, initialize_db};

/// A utility for creating a test database for the expense tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The number of months of sample transactions to create, ending this month.
    #[arg(long, default_value_t = 6)]
    months: u8,
}

const SAMPLE_DESCRIPTIONS: [&str; 6] = [
    "Groceries",
    "Bus pass",
    "New shoes",
    "Electricity bill",
    "Pharmacy",
    "Movie tickets",
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating sample transactions...");

    let today = OffsetDateTime::now_utc().date();
    let mut count = 0;

    for month in 0..args.months {
        let date = months_before(today, month);

        for (index, (category, description)) in SUGGESTED_CATEGORIES
            .iter()
            .zip(SAMPLE_DESCRIPTIONS)
            .enumerate()
        {
            let amount = 150.0 + 75.0 * index as f64 + 10.0 * f64::from(month);
            let day = date.day().saturating_sub(index as u8 * 3).max(1);
            let date = date.replace_day(day)?;

            create_transaction(
                Transaction::build(amount, date, description)
                    .category(Some((*category).to_owned())),
                &conn,
            )?;
            count += 1;
        }
    }

    create_transaction(
        Transaction::build(42.0, today, "Something without a category"),
        &conn,
    )?;
    count += 1;

    println!("Created {count} transactions.");
    println!("Success!");

    Ok(())
}

/// The first day of the month that is `months` months before `date`'s month,
/// moved forward to `date`'s day where that day exists.
fn months_before(date: Date, months: u8) -> Date {
    let mut result = date.replace_day(1).unwrap_or(date);

    for _ in 0..months {
        result = result - Duration::days(1);
        result = result.replace_day(1).unwrap_or(result);
    }

    result
        .replace_day(date.day().min(result.month().length(result.year())))
        .unwrap_or(result)
}
