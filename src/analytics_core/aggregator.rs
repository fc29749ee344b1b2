//! Per-campaign aggregation of raw records
//!
//! A single-pass hash-map fold. The sharded variant folds contiguous chunks on
//! blocking tokio tasks, each with a private table, and merges them once all
//! workers have finished.

use super::error::{AnalyticsError, AnalyticsResult};
use super::record::RawRecord;
use std::collections::HashMap;

/// Running sums for one campaign
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateBucket {
    pub campaign_id: String,
    pub impressions: u64,
    pub clicks: u64,
    pub spend: f64,
    pub conversions: u64,
    pub record_count: u64,
}

impl AggregateBucket {
    pub fn new(campaign_id: String) -> Self {
        Self {
            campaign_id,
            impressions: 0,
            clicks: 0,
            spend: 0.0,
            conversions: 0,
            record_count: 0,
        }
    }

    pub fn add_record(&mut self, record: &RawRecord) -> AnalyticsResult<()> {
        self.add(
            record.impressions,
            record.clicks,
            record.spend,
            record.conversions,
            1,
        )
    }

    /// Fold another partial bucket for the same campaign into this one
    pub fn merge(&mut self, other: &AggregateBucket) -> AnalyticsResult<()> {
        debug_assert_eq!(self.campaign_id, other.campaign_id);
        self.add(
            other.impressions,
            other.clicks,
            other.spend,
            other.conversions,
            other.record_count,
        )
    }

    fn add(
        &mut self,
        impressions: u64,
        clicks: u64,
        spend: f64,
        conversions: u64,
        records: u64,
    ) -> AnalyticsResult<()> {
        // Checked up front so a failed add leaves the bucket untouched
        let impressions = checked(&self.campaign_id, "impressions", self.impressions, impressions)?;
        let clicks = checked(&self.campaign_id, "clicks", self.clicks, clicks)?;
        let conversions = checked(&self.campaign_id, "conversions", self.conversions, conversions)?;
        let spend = self.spend + spend;
        if !spend.is_finite() {
            return Err(AnalyticsError::AggregateOverflow {
                campaign_id: self.campaign_id.clone(),
                field: "spend",
            });
        }

        self.impressions = impressions;
        self.clicks = clicks;
        self.conversions = conversions;
        self.spend = spend;
        self.record_count += records;
        Ok(())
    }
}

fn checked(campaign_id: &str, field: &'static str, current: u64, delta: u64) -> AnalyticsResult<u64> {
    current
        .checked_add(delta)
        .ok_or_else(|| AnalyticsError::AggregateOverflow {
            campaign_id: campaign_id.to_string(),
            field,
        })
}

/// Grouping table keyed by campaign id
#[derive(Debug, Default)]
pub struct CampaignAggregator {
    buckets: HashMap<String, AggregateBucket>,
    records_seen: u64,
}

impl CampaignAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_record(&mut self, record: &RawRecord) -> AnalyticsResult<()> {
        // get_mut first so the key is only cloned for new campaigns
        match self.buckets.get_mut(&record.campaign_id) {
            Some(bucket) => bucket.add_record(record)?,
            None => {
                let mut bucket = AggregateBucket::new(record.campaign_id.clone());
                bucket.add_record(record)?;
                self.buckets.insert(record.campaign_id.clone(), bucket);
            }
        }
        self.records_seen += 1;
        Ok(())
    }

    /// Fold every record; the first error discards the whole table
    pub fn from_records<I>(records: I) -> AnalyticsResult<Self>
    where
        I: IntoIterator<Item = AnalyticsResult<RawRecord>>,
    {
        let mut aggregator = Self::new();
        for record in records {
            aggregator.add_record(&record?)?;
        }
        Ok(aggregator)
    }

    /// Merge a partial table produced by another worker
    pub fn merge(&mut self, other: CampaignAggregator) -> AnalyticsResult<()> {
        for (campaign_id, partial) in other.buckets {
            match self.buckets.get_mut(&campaign_id) {
                Some(bucket) => bucket.merge(&partial)?,
                None => {
                    self.buckets.insert(campaign_id, partial);
                }
            }
        }
        self.records_seen += other.records_seen;
        Ok(())
    }

    pub fn get(&self, campaign_id: &str) -> Option<&AggregateBucket> {
        self.buckets.get(campaign_id)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn records_seen(&self) -> u64 {
        self.records_seen
    }

    /// Iteration order is unspecified
    pub fn buckets(&self) -> impl Iterator<Item = &AggregateBucket> {
        self.buckets.values()
    }

    pub fn into_buckets(self) -> impl Iterator<Item = AggregateBucket> {
        self.buckets.into_values()
    }
}

/// Aggregate `records` across up to `shards` blocking worker tasks.
///
/// Integer sums match the single-threaded fold exactly; spend may differ only
/// by floating-point summation order.
pub async fn aggregate_sharded(
    records: Vec<RawRecord>,
    shards: usize,
) -> AnalyticsResult<CampaignAggregator> {
    if shards <= 1 || records.len() < 2 {
        return CampaignAggregator::from_records(records.into_iter().map(Ok));
    }

    let shards = shards.min(records.len());
    let chunk_size = records.len().div_ceil(shards);
    let mut handles = Vec::with_capacity(records.len().div_ceil(chunk_size));
    let mut remaining = records;

    while !remaining.is_empty() {
        let tail = remaining.split_off(chunk_size.min(remaining.len()));
        let chunk = std::mem::replace(&mut remaining, tail);
        log::debug!("Spawning aggregation shard {} ({} records)", handles.len(), chunk.len());

        handles.push(tokio::task::spawn_blocking(move || {
            CampaignAggregator::from_records(chunk.into_iter().map(Ok))
        }));
    }

    // Wait for every worker before touching the merged table
    let mut partials = Vec::with_capacity(handles.len());
    for handle in handles {
        let partial = handle
            .await
            .map_err(|e| AnalyticsError::Worker(e.to_string()))??;
        partials.push(partial);
    }

    let shard_count = partials.len();
    let mut merged = CampaignAggregator::new();
    for partial in partials {
        merged.merge(partial)?;
    }

    log::debug!("Merged {} shards into {} buckets", shard_count, merged.len());
    Ok(merged)
}
