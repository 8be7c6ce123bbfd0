use std::path::PathBuf;

use thiserror::Error;

/// Domain errors raised while loading feature files or sample data.
///
/// I/O, CSV and Parquet failures are not listed here: they travel as
/// `anyhow::Error` with context attached at the call site.
#[derive(Debug, Error)]
pub enum DataError {
    /// File name does not follow `<class_id>_<anything>.<ext>`.
    #[error("malformed feature file name {name:?}: expected `<class>_<id>` with an integer class")]
    MalformedFileName { name: String },

    #[error("delimiter {0:?} is not a single ASCII character")]
    InvalidDelimiter(char),

    /// A kept instance has a different feature count than the first one.
    #[error("instance {row} has {found} features, expected {expected}")]
    RaggedInstances {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("missing column '{0}'")]
    MissingColumn(String),

    #[error("column '{column}' has unsupported type {data_type}")]
    UnsupportedColumnType { column: String, data_type: String },

    #[error("unsupported sample file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("{0} has no parent directory to name the output after")]
    NoParentDirectory(PathBuf),
}
