//! Error type for the analysis core
//!
//! Every failure aborts the whole run. Partial aggregates are never returned.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// The record source could not be opened or read.
    #[error("Failed to read records from {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A ZIP input could not be read as an archive.
    #[error("Failed to read archive {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Archive {0} is empty")]
    EmptyArchive(PathBuf),

    #[error("No CSV file found in archive {0}")]
    NoCsvInArchive(PathBuf),

    /// The header row is missing a column the core needs.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// A row carried a value that could not be interpreted.
    #[error("Row {row}: invalid {field} value '{value}'")]
    RecordParse {
        row: usize,
        field: &'static str,
        value: String,
    },

    /// A running sum no longer fits: u64 for counts, a finite f64 for spend.
    #[error("Aggregate overflow for campaign {campaign_id} on {field}")]
    AggregateOverflow {
        campaign_id: String,
        field: &'static str,
    },

    #[error("Aggregation worker failed: {0}")]
    Worker(String),
}

impl AnalyticsError {
    pub(crate) fn parse(row: usize, field: &'static str, value: impl Into<String>) -> Self {
        AnalyticsError::RecordParse {
            row,
            field,
            value: value.into(),
        }
    }
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
