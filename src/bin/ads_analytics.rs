//! Ads Analytics Binary - Campaign CTR / CPA Rankings
//!
//! Reads a campaign performance CSV, ranks campaigns by CTR and CPA, exports the
//! rankings and prints a console report.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --release --bin ads_analytics -- --csv ad_data.csv.zip --backend csv
//! ```
//!
//! ## Flags
//!
//! - `--csv <path>` - Input .csv or .zip (overrides ADS_CSV_PATH)
//! - `--export-dir <dir>` - Export directory (overrides ADS_EXPORT_DIR)
//! - `--backend <csv|jsonl|sqlite>` - Export backend (overrides ADS_EXPORT_BACKEND)
//! - `--top-n <n>` - Rows per ranking (overrides ADS_TOP_N)
//! - `--shards <n>` - Parallel aggregation shards (overrides ADS_SHARDS)
//! - `--no-report` - Skip the console report
//!
//! ## Environment Variables
//!
//! - ADS_CSV_PATH, ADS_EXPORT_DIR, ADS_TOP_N, ADS_SHARDS, ADS_EXPORT_BACKEND, ADS_PRINT_REPORT
//! - RUST_LOG - Logging level (optional, default: info)

use ads_analytics::analytics_core::Analyzer;
use ads_analytics::config::AnalyticsConfig;
use ads_analytics::export::{render_report, run_stamp, ReportWriter};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = AnalyticsConfig::from_env().apply_args(env::args().skip(1))?;
    config.validate()?;

    if !config.csv_path.exists() {
        log::error!("❌ File does not exist: {}", config.csv_path.display());
        return Err(format!("file does not exist: {}", config.csv_path.display()).into());
    }

    log::info!("🚀 Starting Ads Analytics");
    log::info!("   Input: {}", config.csv_path.display());
    log::info!("   Export dir: {}", config.export_dir.display());
    log::info!("   Backend: {}", config.backend.as_str());
    log::info!("   Top N: {}", config.top_n);
    log::info!("   Shards: {}", config.shards);

    let analyzer = Analyzer::new(config.top_n).with_shards(config.shards);
    let result = analyzer.analyze_csv(&config.csv_path).await.map_err(|e| {
        log::error!("❌ Analysis failed: {}", e);
        e
    })?;

    let mut writer = ReportWriter::new(config.backend, &config.export_dir, &run_stamp())?;
    writer.export(&result).await?;
    log::info!("✅ Exported rankings via {} backend", writer.backend_type());

    if config.print_report {
        print!("{}", render_report(&result, config.top_n));
    }

    Ok(())
}
