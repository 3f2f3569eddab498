//! Financial summary module
//!
//! Aggregates the stored transactions into the totals, expense distribution
//! and monthly trend shown on the dashboard.

mod aggregation;
mod handlers;

pub use aggregation::{FinancialSummary, MONTHS_IN_YEAR, summarize};
pub use handlers::{SummaryState, get_financial_summary};
