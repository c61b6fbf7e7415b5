// Error taxonomy for the Rabobank importer
//
// A file that is "not for us" is never an error: `identify` just answers
// false. Everything below aborts the whole extraction call.

use std::path::PathBuf;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, ImportError>;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// A date field did not match the expected layout, or named an
    /// impossible calendar day.
    #[error("malformed date {text:?} (expected {layout})")]
    MalformedDate { text: String, layout: &'static str },

    /// An amount or balance field was not a decimal numeral after cleaning.
    #[error("malformed amount {text:?}")]
    MalformedAmount { text: String },

    /// A mandatory field resolved to nothing under every known header name.
    #[error("row {row}: missing mandatory field '{field}'")]
    MissingField { field: &'static str, row: usize },

    /// Row-level parse failure, tagged with the zero-based row index.
    #[error("row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: Box<ImportError>,
    },

    /// `file_date` was asked about a file whose name has no embedded date.
    #[error("file name {0:?} does not follow the CSV_A_<date>_<seq>.csv pattern")]
    FileNameMismatch(String),

    /// Adding a day to the last row's date left chrono's range.
    #[error("cannot assert a balance after {0}")]
    DateOutOfRange(chrono::NaiveDate),

    #[error("invalid importer configuration: {0}")]
    Config(String),

    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read CSV")]
    Csv(#[from] csv::Error),
}

impl ImportError {
    /// Attach the zero-based row index to a parse failure.
    pub fn at_row(self, row: usize) -> Self {
        match self {
            // Already carries its row.
            e @ (ImportError::MissingField { .. } | ImportError::Row { .. }) => e,
            e => ImportError::Row {
                row,
                source: Box::new(e),
            },
        }
    }
}
