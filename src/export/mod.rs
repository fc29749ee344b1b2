//! Result export and reporting
//!
//! ```text
//! AnalysisResult → ReportWriter → CSV files | JSONL file | SQLite table
//!               → render_report → console
//! ```

pub mod csv_writer;
pub mod jsonl_writer;
pub mod report;
pub mod sqlite_writer;
pub mod writer;
pub mod writer_backend;

pub use csv_writer::CsvReportWriter;
pub use jsonl_writer::JsonlReportWriter;
pub use report::render_report;
pub use sqlite_writer::SqliteReportWriter;
pub use writer::{run_stamp, ReportWriter};
pub use writer_backend::{ExportError, ReportWriterBackend};
