//! Capital One 360 account CSV export.
//!
//! Source header:
//!   Account Number,Transaction Date,Transaction Amount,Transaction Type,Transaction Description,Balance
//!
//! Amounts in the export are positive when money is spent. Downstream import
//! rules are written around credit card statements where spending is negative,
//! so the sign is flipped here.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use datacleanup_core::{CleanupError, CleanupResult, Transaction, write_output_file};

/// One input row, keyed by source column name.
pub type Row = HashMap<String, String>;

type Cleaner = fn(&str) -> CleanupResult<String>;

/// Maps an output column to the source column it is read from and its cleaner.
struct ColumnRule {
    source: &'static str,
    clean: Cleaner,
}

impl ColumnRule {
    fn apply(&self, row: &Row, row_no: usize) -> CleanupResult<String> {
        let value = row.get(self.source).ok_or(CleanupError::MissingColumn {
            row: row_no,
            column: self.source,
        })?;
        (self.clean)(value)
    }
}

/// In output column order: date, description, amount.
static COLUMN_RULES: [ColumnRule; 3] = [
    ColumnRule {
        source: "Transaction Date",
        clean: date_clean,
    },
    ColumnRule {
        source: "Transaction Description",
        clean: description_clean,
    },
    ColumnRule {
        source: "Transaction Amount",
        clean: amount_clean,
    },
];

/// `MM/DD/YY...` to `20YY-MM-DD`.
pub fn date_clean(value: &str) -> CleanupResult<String> {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < 8 {
        return Err(CleanupError::ShortValue {
            column: "Transaction Date",
            value: value.to_string(),
            min_len: 8,
        });
    }

    let month: String = chars[0..2].iter().collect();
    let day: String = chars[3..5].iter().collect();
    let year: String = chars[6..8].iter().collect();

    Ok(format!("20{year}-{month}-{day}"))
}

/// Wraps the description in literal quotes. Embedded quotes are not escaped.
pub fn description_clean(value: &str) -> CleanupResult<String> {
    Ok(format!("\"{value}\""))
}

/// Flips the sign of an amount.
pub fn amount_clean(value: &str) -> CleanupResult<String> {
    match value.strip_prefix('-') {
        Some(rest) => Ok(rest.to_string()),
        None if value.is_empty() => Err(CleanupError::EmptyValue {
            column: "Transaction Amount",
        }),
        None => Ok(format!("-{value}")),
    }
}

/// Read every row of the export. `row_no` in later errors is 1-based, header excluded.
pub fn load_input(path: &Path) -> CleanupResult<Vec<Row>> {
    let file = File::open(path).map_err(|e| CleanupError::io(path, e))?;
    let mut rdr = ReaderBuilder::new().from_reader(file);

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: Row = result?;
        rows.push(row);
    }
    Ok(rows)
}

pub fn transform_row(row: &Row, row_no: usize) -> CleanupResult<Transaction> {
    let [date, description, amount] = &COLUMN_RULES;

    Ok(Transaction {
        date: date.apply(row, row_no)?,
        description: description.apply(row, row_no)?,
        amount: amount.apply(row, row_no)?,
    })
}

pub fn transform_rows(rows: &[Row]) -> CleanupResult<Vec<Transaction>> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| transform_row(row, i + 1))
        .collect()
}

/// Convert a Capital One export at `input` into normalized CSV at `output`.
pub fn do_clean(input: &Path, output: &Path) -> CleanupResult<Vec<Transaction>> {
    let rows = load_input(input)?;
    debug!(rows = rows.len(), "loaded capital one rows");

    let txns = transform_rows(&rows)?;
    write_output_file(&txns, output)?;

    debug!(transactions = txns.len(), "capital one export cleaned");
    Ok(txns)
}
