//! CSV output shared by every pipeline.

use std::fs::File;
use std::path::Path;

use csv::WriterBuilder;
use tracing::debug;

use crate::error::{CleanupError, CleanupResult};
use crate::transaction::{COLUMN_NAMES, Transaction};

/// Write `txns` to `output_path` as `date,description,amount` CSV.
///
/// The header is always written, so an empty slice yields a header-only file.
/// Rows are serialized from `Transaction` field order, which matches
/// `COLUMN_NAMES`. Values are quoted only when the csv default quoting requires it.
pub fn write_output_file(txns: &[Transaction], output_path: &Path) -> CleanupResult<()> {
    let file = File::create(output_path).map_err(|e| CleanupError::io(output_path, e))?;

    // Header written explicitly so it survives an empty batch.
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(file);
    wtr.write_record(COLUMN_NAMES)?;

    for txn in txns {
        wtr.serialize(txn)?;
    }

    wtr.flush().map_err(|e| CleanupError::io(output_path, e))?;
    debug!(rows = txns.len(), path = %output_path.display(), "wrote output file");
    Ok(())
}
