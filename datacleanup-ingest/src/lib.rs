//! datacleanup-ingest: bank-specific export parsers that normalize into `Transaction` rows.

pub mod types;
pub mod parsers;

pub use parsers::{capital_one, chase_visa};
pub use types::{RawLine, load_lines};
