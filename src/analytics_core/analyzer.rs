//! Analysis entry points
//!
//! ```text
//! records → CampaignAggregator → MetricCalculator → RankingSelector → AnalysisResult
//! ```
//!
//! The grouping table lives only for the duration of one call.

use super::aggregator::{aggregate_sharded, CampaignAggregator};
use super::error::AnalyticsResult;
use super::input::InputFile;
use super::metrics::MetricCalculator;
use super::ranking::{RankingSelector, DEFAULT_TOP_N};
use super::reader::CsvRecordSource;
use super::record::RawRecord;
use super::result::AnalysisResult;
use std::path::Path;
use std::time::Instant;

/// Aggregate, derive metrics and rank `records`, keeping `top_n` per view
pub fn analyze<I>(records: I, top_n: usize) -> AnalyticsResult<AnalysisResult>
where
    I: IntoIterator<Item = RawRecord>,
{
    try_analyze(records.into_iter().map(Ok), top_n)
}

/// Like [`analyze`] for sources that can fail mid-stream.
/// The first error aborts the run.
pub fn try_analyze<I>(records: I, top_n: usize) -> AnalyticsResult<AnalysisResult>
where
    I: IntoIterator<Item = AnalyticsResult<RawRecord>>,
{
    let aggregator = CampaignAggregator::from_records(records)?;
    Ok(rank(&aggregator, top_n))
}

/// [`analyze`] with aggregation split across `shards` blocking tasks
pub async fn analyze_sharded(
    records: Vec<RawRecord>,
    top_n: usize,
    shards: usize,
) -> AnalyticsResult<AnalysisResult> {
    let aggregator = aggregate_sharded(records, shards).await?;
    Ok(rank(&aggregator, top_n))
}

fn rank(aggregator: &CampaignAggregator, top_n: usize) -> AnalysisResult {
    log::debug!(
        "Aggregated {} records into {} campaigns",
        aggregator.records_seen(),
        aggregator.len()
    );

    let metrics = MetricCalculator::new().compute_all(aggregator.buckets());
    let selector = RankingSelector::new(top_n);

    AnalysisResult::assemble(selector.top_ctr(&metrics), selector.top_cpa(&metrics))
}

/// Runs the full analysis over a CSV file
#[derive(Debug, Clone)]
pub struct Analyzer {
    top_n: usize,
    shards: usize,
}

impl Analyzer {
    pub fn new(top_n: usize) -> Self {
        Self { top_n, shards: 1 }
    }

    pub fn with_shards(mut self, shards: usize) -> Self {
        self.shards = shards.max(1);
        self
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    pub fn shards(&self) -> usize {
        self.shards
    }

    /// Read `path` and analyze it
    ///
    /// A `.zip` path is unpacked first and its first `.csv` entry analyzed.
    /// Single-shard runs stream rows straight into the fold. Sharded runs
    /// read every row first, then partition.
    pub async fn analyze_csv(&self, path: impl AsRef<Path>) -> AnalyticsResult<AnalysisResult> {
        let path = path.as_ref();
        let start = Instant::now();
        let input = InputFile::prepare(path)?;
        let source = CsvRecordSource::open(input.csv_path())?;

        let result = if self.shards <= 1 {
            try_analyze(source, self.top_n)?
        } else {
            let records = source.collect::<AnalyticsResult<Vec<RawRecord>>>()?;
            log::debug!("Read {} records from {}", records.len(), path.display());
            analyze_sharded(records, self.top_n, self.shards).await?
        };

        log::info!(
            "Analysis of {} completed in {:?} ({} by CTR, {} by CPA)",
            path.display(),
            start.elapsed(),
            result.top_ctr.len(),
            result.top_cpa.len()
        );

        Ok(result)
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_N)
    }
}
