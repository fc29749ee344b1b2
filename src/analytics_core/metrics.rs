//! Derived campaign metrics (CTR, CPA)

use super::aggregator::AggregateBucket;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignMetrics {
    pub campaign_id: String,
    pub total_impressions: u64,
    pub total_clicks: u64,
    pub total_spend: f64,
    pub total_conversions: u64,
    pub ctr: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpa: Option<f64>,
}

impl CampaignMetrics {
    /// Formats CPA the way reports show it (`$40.00` or `N/A`)
    pub fn cpa_display(&self) -> String {
        match self.cpa {
            Some(cpa) => format!("${:.2}", cpa),
            None => "N/A".to_string(),
        }
    }
}

pub struct MetricCalculator;

impl MetricCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Derive both metrics for one bucket
    ///
    /// # Rules
    /// - CTR = clicks / impressions. Reported as 0.0 when impressions is 0;
    ///   such buckets never enter the CTR ranking.
    /// - CPA = spend / conversions, `None` when conversions is 0.
    ///
    /// Clicks above impressions are not clamped, the rate can exceed 1.0.
    pub fn compute(&self, bucket: &AggregateBucket) -> CampaignMetrics {
        CampaignMetrics {
            campaign_id: bucket.campaign_id.clone(),
            total_impressions: bucket.impressions,
            total_clicks: bucket.clicks,
            total_spend: bucket.spend,
            total_conversions: bucket.conversions,
            ctr: click_through_rate(bucket.clicks, bucket.impressions).unwrap_or(0.0),
            cpa: cost_per_acquisition(bucket.spend, bucket.conversions),
        }
    }

    pub fn compute_all<'a, I>(&self, buckets: I) -> Vec<CampaignMetrics>
    where
        I: IntoIterator<Item = &'a AggregateBucket>,
    {
        buckets.into_iter().map(|b| self.compute(b)).collect()
    }
}

impl Default for MetricCalculator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn click_through_rate(clicks: u64, impressions: u64) -> Option<f64> {
    if impressions == 0 {
        return None;
    }
    Some(clicks as f64 / impressions as f64)
}

pub fn cost_per_acquisition(spend: f64, conversions: u64) -> Option<f64> {
    if conversions == 0 {
        return None;
    }
    Some(spend / conversions as f64)
}
