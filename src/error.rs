use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while loading or exporting a sales dataset.
/// Filtering and aggregation never fail on a loaded dataset.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The input file does not exist
    #[error("sales data file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The header row lacks one of the columns the pipeline needs
    #[error("required column `{0}` is missing from the header")]
    MissingColumn(&'static str),

    /// A field could not be coerced to its type (date or amount)
    #[error("line {line}: cannot parse {column} value `{value}`")]
    Parse {
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("error during CSV processing: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
