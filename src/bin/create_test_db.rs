use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Month, OffsetDateTime};

use finance_tracker::{
    initialize_db,
    transaction::{Transaction, TransactionBuilder, create_transaction},
};

/// A utility for creating a test database for the REST API server of finance_tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The year to create sample transactions for.
    #[arg(long, short)]
    year: Option<i32>,
}

/// The sample expenses recorded every month as (day, description, price, category).
const MONTHLY_EXPENSES: [(u8, &str, f64, Option<&str>); 6] = [
    (3, "Rent", -4500000.0, Some("Housing")),
    (7, "Groceries", -850000.0, Some("Food")),
    (12, "Bus pass", -200000.0, Some("Transport")),
    (18, "Dinner with friends", -420000.0, Some("Food")),
    (22, "Electricity bill", -610000.0, Some("Utilities")),
    (27, "Bookshop", -150000.0, None),
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

    let year = args
        .year
        .unwrap_or_else(|| OffsetDateTime::now_utc().year());

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating sample transactions for {year}...");
    let mut count = 0;

    for month_number in 1..=12u8 {
        let month = Month::try_from(month_number)?;

        for builder in sample_transactions(year, month)? {
            create_transaction(builder, &conn)?;
            count += 1;
        }
    }

    println!("Created {count} transactions.");
    println!("Success!");

    Ok(())
}

/// The salary and expenses for one month of `year`.
fn sample_transactions(year: i32, month: Month) -> Result<Vec<TransactionBuilder>, Box<dyn Error>> {
    let month_number = u8::from(month);
    let recorded_at = |day: u8| -> Result<OffsetDateTime, time::error::ComponentRange> {
        Ok(Date::from_calendar_date(year, month, day)?
            .with_hms(9, 30, 0)?
            .assume_utc())
    };

    let mut transactions = vec![
        Transaction::build(
            &format!("salary-{year}-{month_number:02}"),
            &format!("Salary - {month} {year}"),
            12000000.0,
        )
        .category(Some("Salary".to_owned()))
        .created_at(recorded_at(1)?),
    ];

    for (index, (day, expense, price, category)) in MONTHLY_EXPENSES.into_iter().enumerate() {
        // Spending creeps up a little over the year.
        let price = price * (1.0 + f64::from(month_number - 1) * 0.02);

        transactions.push(
            Transaction::build(
                &format!("expense-{year}-{month_number:02}-{index}"),
                expense,
                price.round(),
            )
            .category(category.map(str::to_owned))
            .created_at(recorded_at(day)?),
        );
    }

    if month_number % 3 == 0 {
        transactions.push(
            Transaction::build(
                &format!("bonus-{year}-{month_number:02}"),
                "Quarterly bonus",
                3000000.0,
            )
            .category(Some("Salary".to_owned()))
            .note(Some("Paid at the end of the quarter".to_owned()))
            .created_at(recorded_at(28)?),
        );
    }

    Ok(transactions)
}
