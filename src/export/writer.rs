//! Unified writer interface for analysis results
//!
//! Routes writes to the CSV, JSONL or SQLite backend based on configuration.

use super::csv_writer::CsvReportWriter;
use super::jsonl_writer::JsonlReportWriter;
use super::sqlite_writer::SqliteReportWriter;
use super::writer_backend::{ExportError, ReportWriterBackend};
use crate::analytics_core::AnalysisResult;
use crate::config::ExportBackend;
use std::path::Path;

pub enum ReportWriter {
    Csv(CsvReportWriter),
    Jsonl(JsonlReportWriter),
    Sqlite(SqliteReportWriter),
}

impl ReportWriter {
    pub fn new(
        backend: ExportBackend,
        export_dir: impl AsRef<Path>,
        run_id: &str,
    ) -> Result<Self, ExportError> {
        Ok(match backend {
            ExportBackend::Csv => ReportWriter::Csv(CsvReportWriter::new(export_dir, run_id)?),
            ExportBackend::Jsonl => ReportWriter::Jsonl(JsonlReportWriter::new(export_dir, run_id)?),
            ExportBackend::Sqlite => ReportWriter::Sqlite(SqliteReportWriter::new(export_dir, run_id)?),
        })
    }

    fn backend(&mut self) -> &mut dyn ReportWriterBackend {
        match self {
            ReportWriter::Csv(w) => w,
            ReportWriter::Jsonl(w) => w,
            ReportWriter::Sqlite(w) => w,
        }
    }

    /// Write the result and flush it to storage
    pub async fn export(&mut self, result: &AnalysisResult) -> Result<(), ExportError> {
        let backend = self.backend();
        backend.write_result(result).await?;
        backend.flush().await
    }

    pub fn backend_type(&self) -> &'static str {
        match self {
            ReportWriter::Csv(w) => w.backend_type(),
            ReportWriter::Jsonl(w) => w.backend_type(),
            ReportWriter::Sqlite(w) => w.backend_type(),
        }
    }
}

/// Timestamp used to name export files, e.g. `20240131_235959`
pub fn run_stamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}
