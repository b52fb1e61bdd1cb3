//! Normalized output of statement parsers (bank-agnostic)

use chrono::NaiveDate;
use serde::Serialize;

/// Output columns, in the order they are written.
pub const COLUMN_NAMES: [&str; 3] = ["date", "description", "amount"];

/// One normalized transaction.
///
/// Every field is text: parsers emit exactly what they scanned and the writer
/// copies it through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    /// `YYYY-MM-DD`
    pub date: String,
    pub description: String,
    /// Signed decimal. Negative means money out.
    pub amount: String,
}

impl Transaction {
    pub fn new(
        date: impl Into<String>,
        description: impl Into<String>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            amount: amount.into(),
        }
    }

    /// The date as a calendar date, if it is one.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}

/// Earliest and latest dates found in a batch of transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl DateSpan {
    /// Returns `None` when no transaction carries a parseable date.
    pub fn of(txns: &[Transaction]) -> Option<Self> {
        let mut dates = txns.iter().filter_map(Transaction::parsed_date);
        let first = dates.next()?;
        let (first, last) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Some(Self { first, last })
    }
}
