//! Financial aggregation of transactions into a summary for the dashboard.
//!
//! Provides functions to total incomes and expenses, group expenses by
//! category and bucket transaction amounts by calendar month.
//!
//! A transaction's sign decides whether it is an income (positive) or an
//! expense (negative). Transactions with a price of zero count towards
//! neither total.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::Month;

use crate::transaction::Transaction;

/// The number of buckets in [FinancialSummary::monthly_trend].
pub const MONTHS_IN_YEAR: usize = 12;

/// Totals, category breakdown and monthly trend for a set of transactions.
///
/// The default value is the summary of no transactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    /// The sum of all positive prices.
    pub total_income: f64,
    /// The sum of the absolute values of all negative prices.
    pub total_expenses: f64,
    /// `total_income - total_expenses`.
    pub net_change: f64,
    /// The sum of negative prices per category, e.g. `{"Food": -250000.0}`.
    pub expense_distribution: BTreeMap<String, f64>,
    /// The sum of all prices per calendar month, January first.
    ///
    /// Years are ignored, so transactions from the same month of different
    /// years share a bucket.
    pub monthly_trend: [f64; MONTHS_IN_YEAR],
}

/// Summarizes `transactions` into totals, a per-category expense
/// distribution and a monthly trend.
///
/// The month of a transaction is read from `created_at` in the offset it
/// carries, convert timestamps to the local timezone beforehand to bucket by
/// the local calendar.
pub fn summarize(transactions: &[Transaction]) -> FinancialSummary {
    let total_income = total_income(transactions);
    let total_expenses = total_expenses(transactions);

    FinancialSummary {
        total_income,
        total_expenses,
        net_change: total_income - total_expenses,
        expense_distribution: group_expenses_by_category(transactions),
        monthly_trend: aggregate_by_month(transactions),
    }
}

/// Sums the prices of all income transactions.
fn total_income(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .filter(|transaction| transaction.is_income())
        .map(|transaction| transaction.price)
        .sum()
}

/// Sums the absolute prices of all expense transactions.
fn total_expenses(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .filter(|transaction| transaction.is_expense())
        .map(|transaction| transaction.price.abs())
        .sum()
}

/// Groups expense transactions by category and sums their (negative) prices.
///
/// Transactions without a category are grouped under
/// [DEFAULT_CATEGORY](crate::transaction::DEFAULT_CATEGORY).
fn group_expenses_by_category(transactions: &[Transaction]) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();

    for transaction in transactions.iter().filter(|t| t.is_expense()) {
        *totals
            .entry(transaction.category_label().to_owned())
            .or_insert(0.0) += transaction.price;
    }

    totals
}

/// Sums transaction prices by calendar month, ignoring the year.
fn aggregate_by_month(transactions: &[Transaction]) -> [f64; MONTHS_IN_YEAR] {
    let mut totals = [0.0; MONTHS_IN_YEAR];

    for transaction in transactions {
        totals[month_index(transaction.created_at.month())] += transaction.price;
    }

    totals
}

/// Maps a month to its index in the monthly trend, January is 0.
fn month_index(month: Month) -> usize {
    u8::from(month) as usize - 1
}
