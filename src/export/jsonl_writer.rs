//! JSONL export - one JSON object per ranked row

use super::writer_backend::{ExportError, ReportWriterBackend};
use crate::analytics_core::{AnalysisResult, CampaignMetrics, RankingView};
use async_trait::async_trait;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
pub struct RankedRow<'a> {
    pub run_id: &'a str,
    pub view: &'static str,
    pub rank: usize,
    #[serde(flatten)]
    pub metrics: &'a CampaignMetrics,
}

pub struct JsonlReportWriter {
    path: PathBuf,
    run_id: String,
    writer: BufWriter<std::fs::File>,
}

impl JsonlReportWriter {
    pub fn new(export_dir: impl AsRef<Path>, run_id: impl Into<String>) -> Result<Self, ExportError> {
        let run_id = run_id.into();
        std::fs::create_dir_all(export_dir.as_ref())?;

        let path = export_dir.as_ref().join(format!("analysis_{}.jsonl", run_id));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        log::info!("📝 Writing ranked campaigns to: {}", path.display());

        Ok(Self {
            path,
            run_id,
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_view(&mut self, view: RankingView, rows: &[CampaignMetrics]) -> Result<(), ExportError> {
        for (idx, metrics) in rows.iter().enumerate() {
            let row = RankedRow {
                run_id: &self.run_id,
                view: view.as_str(),
                rank: idx + 1,
                metrics,
            };
            let json = serde_json::to_string(&row)?;
            writeln!(self.writer, "{}", json)?;
        }
        Ok(())
    }
}

impl Drop for JsonlReportWriter {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

#[async_trait]
impl ReportWriterBackend for JsonlReportWriter {
    async fn write_result(&mut self, result: &AnalysisResult) -> Result<(), ExportError> {
        for view in RankingView::all() {
            self.write_view(view, result.view(view))?;
        }
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), ExportError> {
        self.writer.flush()?;
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "JSONL"
    }
}
