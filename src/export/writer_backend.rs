//! Writer backend trait for analysis results
//!
//! Defines the interface for exporting ranked campaign views to different backends.

use crate::analytics_core::AnalysisResult;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A count too large for the target column type
    #[error("Value {value} for {field} of campaign {campaign_id} is out of range")]
    OutOfRange {
        campaign_id: String,
        field: &'static str,
        value: u64,
    },
}

/// Backend trait for writing analysis results
#[async_trait]
pub trait ReportWriterBackend: Send {
    /// Write both ranked views of one analysis run
    async fn write_result(&mut self, result: &AnalysisResult) -> Result<(), ExportError>;

    /// Flush pending writes to storage
    async fn flush(&mut self) -> Result<(), ExportError>;

    /// Get backend type for logging
    fn backend_type(&self) -> &'static str;
}
