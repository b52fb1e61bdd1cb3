//! datacleanup-core: normalized transaction type, error taxonomy and the shared CSV writer.

pub mod error;
pub mod transaction;
pub mod writer;

pub use error::{CleanupError, CleanupResult};
pub use transaction::{COLUMN_NAMES, DateSpan, Transaction};
pub use writer::write_output_file;
