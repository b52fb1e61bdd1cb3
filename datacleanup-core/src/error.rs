use std::path::PathBuf;
use thiserror::Error;

/// Everything that can abort a conversion. No variant is recoverable per record:
/// the first error ends the run.
#[derive(Error, Debug)]
pub enum CleanupError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{column} value {value:?} is shorter than {min_len} characters")]
    ShortValue {
        column: &'static str,
        value: String,
        min_len: usize,
    },

    #[error("{column} value is empty")]
    EmptyValue { column: &'static str },

    #[error("row {row} has no {column:?} column")]
    MissingColumn { row: usize, column: &'static str },

    #[error("line {line_no}: {line:?} is shorter than {min_len} characters")]
    ShortLine {
        line_no: usize,
        line: String,
        min_len: usize,
    },

    #[error("line {line_no}: no {delimiter:?} at or after position {from} in {line:?}")]
    MissingDelimiter {
        line_no: usize,
        line: String,
        delimiter: char,
        from: usize,
    },
}

impl CleanupError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CleanupError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for cleanup operations
pub type CleanupResult<T> = Result<T, CleanupError>;
