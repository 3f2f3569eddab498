//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Deserializer, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::{Error, database_id::TransactionId};

/// The category used for transactions that were not given one.
pub const DEFAULT_CATEGORY: &str = "Others";

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// Transactions are usually recorded from bank notification emails, hence the
/// `email_id` and `is_read` bookkeeping fields.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The ID of the email the transaction was recorded from.
    pub email_id: String,
    /// A text description of what the money was spent on or earned from.
    pub expense: String,
    /// The amount of money spent or earned in this transaction.
    ///
    /// Positive values are income, negative values are expenses.
    pub price: f64,
    /// The category of the transaction, e.g. "Food", "Transport", "Salary".
    pub category: Option<String>,
    /// Free text notes about the transaction.
    pub note: Option<String>,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Whether the user has reviewed the transaction.
    pub is_read: bool,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(email_id: &str, expense: &str, price: f64) -> TransactionBuilder {
        TransactionBuilder {
            email_id: email_id.to_owned(),
            expense: expense.to_owned(),
            price,
            category: None,
            note: None,
            created_at: None,
        }
    }

    /// The category to group this transaction under.
    ///
    /// Falls back to [DEFAULT_CATEGORY] when the category is missing or blank.
    pub fn category_label(&self) -> &str {
        match self.category.as_deref().map(str::trim) {
            Some(category) if !category.is_empty() => category,
            _ => DEFAULT_CATEGORY,
        }
    }

    /// Whether money was earned in this transaction.
    pub fn is_income(&self) -> bool {
        self.price > 0.0
    }

    /// Whether money was spent in this transaction.
    pub fn is_expense(&self) -> bool {
        self.price < 0.0
    }
}

/// A builder for creating [Transaction] instances.
///
/// The store assigns the ID and marks new transactions as unread.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The ID of the email the transaction was recorded from.
    pub email_id: String,

    /// A text description of the transaction.
    ///
    /// # Examples
    /// - `"Lunch with colleagues"`
    /// - `"Salary - January 2025"`
    pub expense: String,

    /// The monetary amount of the transaction.
    ///
    /// Positive values represent income, negative values represent expenses.
    ///
    /// # Examples
    /// - `1000000.0` - Salary deposit
    /// - `-45000.0` - Coffee shop purchase
    pub price: f64,

    /// The category of the transaction, if known.
    pub category: Option<String>,

    /// Optional free text notes.
    pub note: Option<String>,

    /// When the transaction was recorded.
    ///
    /// Defaults to the time the transaction is inserted into the database.
    pub created_at: Option<OffsetDateTime>,
}

impl TransactionBuilder {
    /// Set the category for the transaction.
    pub fn category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }

    /// Set the note for the transaction.
    pub fn note(mut self, note: Option<String>) -> Self {
        self.note = note;
        self
    }

    /// Set when the transaction was recorded.
    pub fn created_at(mut self, created_at: OffsetDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    fn validate(&self) -> Result<(), Error> {
        validate_price(self.price)?;
        validate_not_blank("emailId", &self.email_id)?;
        validate_not_blank("expense", &self.expense)
    }
}

/// A partial update to a [Transaction].
///
/// Fields that are `None` (missing from the JSON) are left unchanged. The
/// optional `category` and `note` fields are cleared by `Some(None)`, which
/// is what an explicit JSON `null` deserializes to.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionChanges {
    /// The new description.
    pub expense: Option<String>,
    /// The new amount.
    pub price: Option<f64>,
    /// Mark the transaction as read or unread.
    pub is_read: Option<bool>,
    /// The new category.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<Option<String>>,
    /// The new note.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub note: Option<Option<String>>,
}

/// Wraps a field that is present in the input in `Some`, even when it is `null`.
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl TransactionChanges {
    fn validate(&self) -> Result<(), Error> {
        if let Some(price) = self.price {
            validate_price(price)?;
        }

        if let Some(expense) = &self.expense {
            validate_not_blank("expense", expense)?;
        }

        Ok(())
    }
}

fn validate_price(price: f64) -> Result<(), Error> {
    if price.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidPrice(price))
    }
}

fn validate_not_blank(field: &'static str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        Err(Error::EmptyField(field))
    } else {
        Ok(())
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const TRANSACTION_COLUMNS: &str =
    "id, email_id, expense, price, category, note, created_at, is_read";

/// Create a new transaction in the database from a builder.
///
/// Timestamps are stored in UTC.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidPrice] if the price is not a finite number,
/// - [Error::EmptyField] if the email ID or description is blank,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    builder.validate()?;

    let created_at = builder
        .created_at
        .unwrap_or_else(OffsetDateTime::now_utc)
        .to_offset(UtcOffset::UTC);

    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" (email_id, expense, price, category, note, created_at, is_read)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            params![
                builder.email_id,
                builder.expense,
                builder.price,
                builder.category,
                builder.note,
                created_at,
            ],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id"
        ))?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve every transaction in the database, newest first.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn list_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" ORDER BY created_at DESC, id DESC"
        ))?
        .query_map([], map_transaction_row)?
        .collect::<Result<Vec<Transaction>, rusqlite::Error>>()
        .map_err(Error::from)
}

/// Apply `changes` to the transaction with `id` and return the updated transaction.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidPrice] or [Error::EmptyField] if a change is invalid,
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    changes: TransactionChanges,
    connection: &Connection,
) -> Result<Transaction, Error> {
    changes.validate()?;

    let set_category = changes.category.is_some();
    let category = changes.category.flatten();
    let set_note = changes.note.is_some();
    let note = changes.note.flatten();

    let transaction = connection
        .prepare(&format!(
            "UPDATE \"transaction\"
            SET \
                expense = COALESCE(?1, expense), \
                price = COALESCE(?2, price), \
                is_read = COALESCE(?3, is_read), \
                category = CASE WHEN ?4 THEN ?5 ELSE category END, \
                note = CASE WHEN ?6 THEN ?7 ELSE note END \
            WHERE id = ?8
            RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            params![
                changes.expense,
                changes.price,
                changes.is_read,
                set_category,
                category,
                set_note,
                note,
                id,
            ],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Delete the transaction with `id` and return it.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "DELETE FROM \"transaction\" WHERE id = :id RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Get the total number of transactions in the database.
#[cfg(test)]
pub(crate) fn count_transactions(connection: &Connection) -> Result<u32, Error> {
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
                email_id TEXT NOT NULL,
                expense TEXT NOT NULL,
                price REAL NOT NULL,
                category TEXT,
                note TEXT,
                created_at TEXT NOT NULL,
                is_read INTEGER NOT NULL DEFAULT 0
                )",
        (),
    )?;

    // Used for listing transactions newest first.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_created_at ON \"transaction\"(created_at);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let email_id = row.get(1)?;
    let expense = row.get(2)?;
    let price = row.get(3)?;
    let category = row.get(4)?;
    let note = row.get(5)?;
    let created_at = row.get(6)?;
    let is_read = row.get(7)?;

    Ok(Transaction {
        id,
        email_id,
        expense,
        price,
        category,
        note,
        created_at,
        is_read,
    })
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;
    use time::macros::datetime;

    use crate::{
        Error,
        db::initialize,
        transaction::{
            Transaction, TransactionChanges, count_transactions, create_transaction,
            delete_transaction, get_transaction, list_transactions, update_transaction,
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
        let created_at = datetime!(2025-10-05 09:30 UTC);

        let transaction = create_transaction(
            Transaction::build("email-1", "Salary", 1_000_000.0)
                .category(Some("Salary".to_owned()))
                .note(Some("October".to_owned()))
                .created_at(created_at),
            &conn,
        )
        .expect("Could not create transaction");

        assert_eq!(transaction.id, 1);
        assert_eq!(transaction.email_id, "email-1");
        assert_eq!(transaction.expense, "Salary");
        assert_eq!(transaction.price, 1_000_000.0);
        assert_eq!(transaction.category.as_deref(), Some("Salary"));
        assert_eq!(transaction.note.as_deref(), Some("October"));
        assert_eq!(transaction.created_at, created_at);
        assert!(!transaction.is_read);
    }

    #[test]
    fn create_stores_timestamps_in_utc() {
        let conn = get_test_connection();

        let transaction = create_transaction(
            Transaction::build("email-1", "Dinner", -20.0)
                .created_at(datetime!(2025-03-01 08:00 +13:00)),
            &conn,
        )
        .unwrap();

        assert_eq!(transaction.created_at, datetime!(2025-02-28 19:00 UTC));
        assert_eq!(transaction.created_at.offset(), time::UtcOffset::UTC);
    }

    #[test]
    fn create_defaults_created_at_to_now() {
        let conn = get_test_connection();
        let before = time::OffsetDateTime::now_utc();

        let transaction =
            create_transaction(Transaction::build("email-1", "Coffee", -4.5), &conn).unwrap();

        assert!(transaction.created_at >= before);
    }

    #[test]
    fn create_fails_on_non_finite_price() {
        let conn = get_test_connection();

        let result = create_transaction(Transaction::build("email-1", "Coffee", f64::INFINITY), &conn);

        assert_eq!(result, Err(Error::InvalidPrice(f64::INFINITY)));
        assert_eq!(count_transactions(&conn), Ok(0));
    }

    #[test]
    fn create_fails_on_blank_fields() {
        let conn = get_test_connection();

        assert_eq!(
            create_transaction(Transaction::build(" ", "Coffee", -4.5), &conn),
            Err(Error::EmptyField("emailId"))
        );
        assert_eq!(
            create_transaction(Transaction::build("email-1", "", -4.5), &conn),
            Err(Error::EmptyField("expense"))
        );
    }

    #[test]
    fn get_returns_created_transaction() {
        let conn = get_test_connection();
        let want = create_transaction(Transaction::build("email-1", "Coffee", -4.5), &conn).unwrap();

        let got = get_transaction(want.id, &conn);

        assert_eq!(got, Ok(want));
    }

    #[test]
    fn get_missing_transaction_returns_not_found() {
        let conn = get_test_connection();

        assert_eq!(get_transaction(42, &conn), Err(Error::NotFound));
    }

    #[test]
    fn list_returns_newest_first() {
        let conn = get_test_connection();
        let middle = create_transaction(
            Transaction::build("email-1", "Rent", -500.0).created_at(datetime!(2025-02-01 0:00 UTC)),
            &conn,
        )
        .unwrap();
        let newest = create_transaction(
            Transaction::build("email-2", "Pay", 1500.0).created_at(datetime!(2025-03-01 0:00 UTC)),
            &conn,
        )
        .unwrap();
        let oldest = create_transaction(
            Transaction::build("email-3", "Food", -50.0).created_at(datetime!(2025-01-01 0:00 UTC)),
            &conn,
        )
        .unwrap();

        let transactions = list_transactions(&conn).unwrap();

        assert_eq!(transactions, vec![newest, middle, oldest]);
    }

    #[test]
    fn list_empty_database() {
        let conn = get_test_connection();

        assert_eq!(list_transactions(&conn), Ok(vec![]));
    }

    #[test]
    fn update_changes_only_given_fields() {
        let conn = get_test_connection();
        let original = create_transaction(
            Transaction::build("email-1", "Coffee", -4.5)
                .category(Some("Food".to_owned()))
                .note(Some("flat white".to_owned())),
            &conn,
        )
        .unwrap();

        let updated = update_transaction(
            original.id,
            TransactionChanges {
                price: Some(-5.0),
                is_read: Some(true),
                ..Default::default()
            },
            &conn,
        )
        .unwrap();

        assert_eq!(
            updated,
            Transaction {
                price: -5.0,
                is_read: true,
                ..original
            }
        );
        assert_eq!(get_transaction(updated.id, &conn), Ok(updated));
    }

    #[test]
    fn update_clears_category_and_note_with_null() {
        let conn = get_test_connection();
        let original = create_transaction(
            Transaction::build("email-1", "Coffee", -4.5)
                .category(Some("Food".to_owned()))
                .note(Some("flat white".to_owned())),
            &conn,
        )
        .unwrap();
        let changes: TransactionChanges =
            serde_json::from_str(r#"{"category": null, "note": null}"#).unwrap();

        let updated = update_transaction(original.id, changes, &conn).unwrap();

        assert_eq!(updated.category, None);
        assert_eq!(updated.note, None);
        assert_eq!(updated.expense, original.expense);
        assert_eq!(updated.price, original.price);
    }

    #[test]
    fn update_without_category_or_note_keeps_them() {
        let conn = get_test_connection();
        let original = create_transaction(
            Transaction::build("email-1", "Coffee", -4.5)
                .category(Some("Food".to_owned()))
                .note(Some("flat white".to_owned())),
            &conn,
        )
        .unwrap();
        let changes: TransactionChanges = serde_json::from_str(r#"{"isRead": true}"#).unwrap();

        let updated = update_transaction(original.id, changes, &conn).unwrap();

        assert_eq!(updated.category.as_deref(), Some("Food"));
        assert_eq!(updated.note.as_deref(), Some("flat white"));
        assert!(updated.is_read);
    }

    #[test]
    fn update_missing_transaction_returns_not_found() {
        let conn = get_test_connection();

        let result = update_transaction(
            42,
            TransactionChanges {
                expense: Some("Coffee".to_owned()),
                ..Default::default()
            },
            &conn,
        );

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn update_rejects_invalid_changes() {
        let conn = get_test_connection();
        let original =
            create_transaction(Transaction::build("email-1", "Coffee", -4.5), &conn).unwrap();

        let result = update_transaction(
            original.id,
            TransactionChanges {
                expense: Some("\t".to_owned()),
                ..Default::default()
            },
            &conn,
        );

        assert_eq!(result, Err(Error::EmptyField("expense")));
        assert_eq!(get_transaction(original.id, &conn), Ok(original));
    }

    #[test]
    fn delete_returns_deleted_transaction() {
        let conn = get_test_connection();
        let transaction =
            create_transaction(Transaction::build("email-1", "Coffee", -4.5), &conn).unwrap();

        let deleted = delete_transaction(transaction.id, &conn);

        assert_eq!(deleted, Ok(transaction.clone()));
        assert_eq!(get_transaction(transaction.id, &conn), Err(Error::NotFound));
    }

    #[test]
    fn delete_missing_transaction_returns_not_found() {
        let conn = get_test_connection();

        assert_eq!(delete_transaction(42, &conn), Err(Error::NotFound));
    }

    #[test]
    fn get_count() {
        let conn = get_test_connection();
        let want_count = 20;
        for i in 1..=want_count {
            create_transaction(
                Transaction::build(&format!("email-{i}"), "Coffee", -(i as f64)),
                &conn,
            )
            .expect("Could not create transaction");
        }

        let got_count = count_transactions(&conn).expect("Could not get count");

        assert_eq!(want_count, got_count);
    }
}
