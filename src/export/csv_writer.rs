//! CSV export - one file per ranked view

use super::writer_backend::{ExportError, ReportWriterBackend};
use crate::analytics_core::{AnalysisResult, CampaignMetrics, RankingView};
use async_trait::async_trait;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const CSV_HEADER: &str =
    "campaign_id,total_impressions,total_clicks,total_spend,total_conversions,ctr,cpa";

pub struct CsvReportWriter {
    export_dir: PathBuf,
    run_id: String,
    written: Vec<PathBuf>,
}

impl CsvReportWriter {
    pub fn new(export_dir: impl AsRef<Path>, run_id: impl Into<String>) -> Result<Self, ExportError> {
        let export_dir = export_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&export_dir)?;

        Ok(Self {
            export_dir,
            run_id: run_id.into(),
            written: Vec::new(),
        })
    }

    /// File a view is exported to, e.g. `export/top_ctr_20240101_120000.csv`
    pub fn view_path(&self, view: RankingView) -> PathBuf {
        self.export_dir
            .join(format!("{}_{}.csv", view.as_str(), self.run_id))
    }

    pub fn written_files(&self) -> &[PathBuf] {
        &self.written
    }

    fn write_view(&mut self, view: RankingView, rows: &[CampaignMetrics]) -> Result<(), ExportError> {
        let path = self.view_path(view);
        let mut writer = BufWriter::new(File::create(&path)?);

        writeln!(writer, "{}", CSV_HEADER)?;
        for row in rows {
            writeln!(writer, "{}", format_row(row))?;
        }
        writer.flush()?;

        log::info!("📝 Exported {} ({} rows) to: {}", view.as_str(), rows.len(), path.display());
        self.written.push(path);
        Ok(())
    }
}

/// spend/cpa with 2 decimals, ctr with 6, absent cpa as an empty field
pub fn format_row(m: &CampaignMetrics) -> String {
    let cpa = m.cpa.map(|cpa| format!("{:.2}", cpa)).unwrap_or_default();
    format!(
        "{},{},{},{:.2},{},{:.6},{}",
        m.campaign_id,
        m.total_impressions,
        m.total_clicks,
        m.total_spend,
        m.total_conversions,
        m.ctr,
        cpa
    )
}

#[async_trait]
impl ReportWriterBackend for CsvReportWriter {
    async fn write_result(&mut self, result: &AnalysisResult) -> Result<(), ExportError> {
        for view in RankingView::all() {
            self.write_view(view, result.view(view))?;
        }
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), ExportError> {
        // Each view file is flushed when written
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "CSV"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(cpa: Option<f64>) -> CampaignMetrics {
        CampaignMetrics {
            campaign_id: "CMP1".to_string(),
            total_impressions: 2000,
            total_clicks: 30,
            total_spend: 200.0,
            total_conversions: 5,
            ctr: 0.015,
            cpa,
        }
    }

    #[test]
    fn test_format_row() {
        assert_eq!(format_row(&metrics(Some(40.0))), "CMP1,2000,30,200.00,5,0.015000,40.00");
        assert_eq!(format_row(&metrics(None)), "CMP1,2000,30,200.00,5,0.015000,");
    }

    #[tokio::test]
    async fn test_writes_both_views() {
        let dir = tempfile::tempdir().unwrap();
        let export_dir = dir.path().join("export");
        let mut writer = CsvReportWriter::new(&export_dir, "20240101_000000").unwrap();

        let result = AnalysisResult::assemble(vec![metrics(Some(40.0))], Vec::new());
        writer.write_result(&result).await.unwrap();
        writer.flush().await.unwrap();

        assert_eq!(writer.written_files().len(), 2);

        let ctr = std::fs::read_to_string(export_dir.join("top_ctr_20240101_000000.csv")).unwrap();
        assert_eq!(ctr, format!("{}\nCMP1,2000,30,200.00,5,0.015000,40.00\n", CSV_HEADER));

        let cpa = std::fs::read_to_string(export_dir.join("top_cpa_20240101_000000.csv")).unwrap();
        assert_eq!(cpa, format!("{}\n", CSV_HEADER));
    }
}
