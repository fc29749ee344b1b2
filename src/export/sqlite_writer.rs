//! SQLite export for ranked campaigns
//!
//! Every run appends its rows under its own `run_id`, in one transaction.

use super::writer_backend::{ExportError, ReportWriterBackend};
use crate::analytics_core::{AnalysisResult, CampaignMetrics, RankingView};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::path::Path;

pub const DB_FILE_NAME: &str = "analysis.db";

pub struct SqliteReportWriter {
    conn: Connection,
    run_id: String,
}

impl SqliteReportWriter {
    pub fn new(export_dir: impl AsRef<Path>, run_id: impl Into<String>) -> Result<Self, ExportError> {
        std::fs::create_dir_all(export_dir.as_ref())?;
        let db_path = export_dir.as_ref().join(DB_FILE_NAME);
        let conn = Connection::open(&db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS ranked_campaigns (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                run_id TEXT NOT NULL,
                view TEXT NOT NULL,
                rank INTEGER NOT NULL,
                campaign_id TEXT NOT NULL,
                total_impressions INTEGER NOT NULL,
                total_clicks INTEGER NOT NULL,
                total_spend REAL NOT NULL,
                total_conversions INTEGER NOT NULL,
                ctr REAL NOT NULL,
                cpa REAL,
                UNIQUE (run_id, view, rank)
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_run_view ON ranked_campaigns(run_id, view, rank)",
            [],
        )?;

        log::info!("✅ SQLite export initialized: {}", db_path.display());

        Ok(Self {
            conn,
            run_id: run_id.into(),
        })
    }

    #[cfg(test)]
    fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// SQLite integers are signed 64-bit
fn to_sql_int(metrics: &CampaignMetrics, field: &'static str, value: u64) -> Result<i64, ExportError> {
    i64::try_from(value).map_err(|_| ExportError::OutOfRange {
        campaign_id: metrics.campaign_id.clone(),
        field,
        value,
    })
}

#[async_trait]
impl ReportWriterBackend for SqliteReportWriter {
    async fn write_result(&mut self, result: &AnalysisResult) -> Result<(), ExportError> {
        let tx = self.conn.transaction()?;
        let mut rows = 0;

        for view in RankingView::all() {
            for (idx, m) in result.view(view).iter().enumerate() {
                tx.execute(
                    "INSERT OR REPLACE INTO ranked_campaigns
                     (run_id, view, rank, campaign_id, total_impressions, total_clicks,
                      total_spend, total_conversions, ctr, cpa)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                    params![
                        self.run_id,
                        view.as_str(),
                        (idx + 1) as i64,
                        m.campaign_id,
                        to_sql_int(m, "total_impressions", m.total_impressions)?,
                        to_sql_int(m, "total_clicks", m.total_clicks)?,
                        m.total_spend,
                        to_sql_int(m, "total_conversions", m.total_conversions)?,
                        m.ctr,
                        m.cpa,
                    ],
                )?;
                rows += 1;
            }
        }

        tx.commit()?;
        log::debug!("✅ Wrote {} ranked rows for run {}", rows, self.run_id);
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), ExportError> {
        // Rows are committed per run
        Ok(())
    }

    fn backend_type(&self) -> &'static str {
        "SQLite"
    }
}
