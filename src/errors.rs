//! Error taxonomy for loading, matching and writing song lists.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompareError {
    #[error("file not found: '{}'", path.display())]
    FileNotFound { path: PathBuf },

    #[error("column '{column}' not found in '{table}'")]
    MissingColumn { column: String, table: String },

    #[error("malformed row at line {line} in '{}': {detail}", path.display())]
    MalformedRow {
        path: PathBuf,
        line: u64,
        detail: String,
    },

    #[error("'{}' is not valid {encoding} text", path.display())]
    Decode { path: PathBuf, encoding: String },

    #[error("unsafe output path: {0}")]
    UnsafeOutput(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, CompareError>;
