//! Chase Visa statement export (text)
//!
//! The export looks like CSV but is not: quoting is inconsistent and
//! descriptions carry unescaped commas. Transaction rows look like:
//!   01/15 Coffee Shop,4.50
//!   10/27,"I V Y LABS, INC. HTTPSWWW.TALK CA",12.00
//!   "10/27 I V Y LABS, INC. HTTPSWWW.TALK CA",12.00
//!
//! Fields are recovered by fixed character positions: month at 0-1, day at
//! 3-4, a separator at 5, and the description from 5 or 6 up to the closing
//! quote or the first comma at or after 7.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use datacleanup_core::{CleanupError, CleanupResult, Transaction, write_output_file};

use crate::types::{RawLine, load_lines};

/// Shortest line the field scanner can index into.
pub const MIN_LINE_LEN: usize = 7;

/// Delimiter search starts here, past the date and separator.
const DELIMITER_SEARCH_FROM: usize = 7;

static START_QUOTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^"(?P<date>\d{2}/\d{2}) (?P<rest>[^"]+".*)"#).expect("valid quote-fix regex")
});

/// Options for one Chase Visa conversion.
#[derive(Debug, Clone, Default)]
pub struct ChaseVisaOptions {
    /// Statement year. Rows only carry MM/DD.
    pub year: i32,
    /// January statement: December rows belong to `year - 1`.
    pub january_statement: bool,
    /// Substrings to follow through each stage in the log.
    pub trace: Vec<String>,
}

/// Rewrite `"MM/DD rest"...` into `MM/DD,"rest"...`.
pub fn fix_quoting(line: &str) -> String {
    match START_QUOTE_RE.captures(line) {
        Some(caps) => format!("{},\"{}", &caps["date"], &caps["rest"]),
        None => line.to_string(),
    }
}

/// True when the line starts with two ASCII digits.
pub fn is_transaction_line(line: &str) -> bool {
    let bytes = line.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_digit() && bytes[1].is_ascii_digit()
}

/// Collapse each `,,` into `,`, scanning left to right once.
pub fn cleanup_commas(line: &str) -> String {
    line.replace(",,", ",")
}

fn find_from(chars: &[char], delimiter: char, from: usize, line: &RawLine) -> CleanupResult<usize> {
    chars[from..]
        .iter()
        .position(|&c| c == delimiter)
        .map(|i| i + from)
        .ok_or_else(|| CleanupError::MissingDelimiter {
            line_no: line.number,
            line: line.text.clone(),
            delimiter,
            from,
        })
}

/// Scan one transaction line into its fields.
pub fn transaction_fields(line: &RawLine, year: i32, is_jan: bool) -> CleanupResult<Transaction> {
    let chars: Vec<char> = line.text.chars().collect();
    if chars.len() < MIN_LINE_LEN {
        return Err(CleanupError::ShortLine {
            line_no: line.number,
            line: line.text.clone(),
            min_len: MIN_LINE_LEN,
        });
    }

    let month: String = chars[0..2].iter().collect();
    let day: String = chars[3..5].iter().collect();

    let year = if is_jan && month == "12" { year - 1 } else { year };

    let end = if chars[6] == '"' {
        find_from(&chars, '"', DELIMITER_SEARCH_FROM, line)? + 1
    } else {
        find_from(&chars, ',', DELIMITER_SEARCH_FROM, line)?
    };
    let start = if matches!(chars[5], ',' | ' ' | '"') { 6 } else { 5 };

    let description: String = chars[start..end].iter().collect();
    let amount: String = chars
        .get(end + 1..)
        .unwrap_or_default()
        .iter()
        .filter(|&&c| c != '"' && c != ',')
        .collect();

    Ok(Transaction {
        date: format!("{year:04}-{month}-{day}"),
        description,
        amount,
    })
}

fn trace_stage(needles: &[String], stage: &str, lines: &[RawLine]) {
    for needle in needles {
        let hits: Vec<&RawLine> = lines.iter().filter(|l| l.text.contains(needle.as_str())).collect();
        if hits.is_empty() {
            continue;
        }

        warn!(needle = %needle, stage, hits = hits.len(), "trace needle found");
        for hit in hits {
            warn!(needle = %needle, stage, line_no = hit.number, line = %hit.text);
        }
    }
}

/// Run the scanner stages over already-loaded lines.
pub fn parse_lines(lines: Vec<RawLine>, opts: &ChaseVisaOptions) -> CleanupResult<Vec<Transaction>> {
    trace_stage(&opts.trace, "load", &lines);

    let fixed: Vec<RawLine> = lines
        .into_iter()
        .map(|l| RawLine::new(l.number, fix_quoting(&l.text)))
        .collect();
    trace_stage(&opts.trace, "fix_quoting", &fixed);

    let total = fixed.len();
    let txn_lines: Vec<RawLine> = fixed
        .into_iter()
        .filter(|l| is_transaction_line(&l.text))
        .collect();
    debug!(total, kept = txn_lines.len(), "filtered transaction lines");
    trace_stage(&opts.trace, "filter", &txn_lines);

    let txn_lines: Vec<RawLine> = txn_lines
        .into_iter()
        .map(|l| RawLine::new(l.number, cleanup_commas(&l.text)))
        .collect();
    trace_stage(&opts.trace, "cleanup_commas", &txn_lines);

    txn_lines
        .iter()
        .map(|l| transaction_fields(l, opts.year, opts.january_statement))
        .collect()
}

/// Convert a Chase Visa export at `input` into normalized CSV at `output`.
pub fn do_clean(input: &Path, output: &Path, opts: &ChaseVisaOptions) -> CleanupResult<Vec<Transaction>> {
    let lines = load_lines(input)?;
    debug!(lines = lines.len(), "loaded chase visa lines");

    let txns = parse_lines(lines, opts)?;
    write_output_file(&txns, output)?;

    debug!(
        transactions = txns.len(),
        year = opts.year,
        january_statement = opts.january_statement,
        "chase visa export cleaned"
    );
    Ok(txns)
}
