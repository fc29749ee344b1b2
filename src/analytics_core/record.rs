//! Raw performance records as produced by a record source

use super::error::{AnalyticsError, AnalyticsResult};
use serde::{Deserialize, Serialize};

/// One performance observation for a campaign.
///
/// The date is carried through untouched; the core never groups or filters on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub campaign_id: String,
    pub date: Option<String>,
    pub impressions: u64,
    pub clicks: u64,
    pub spend: f64,
    pub conversions: u64,
}

impl RawRecord {
    /// Build a validated record.
    ///
    /// Rejects a blank campaign id and a spend that is negative, NaN or infinite.
    /// `row` is only used for error context.
    pub fn new(
        row: usize,
        campaign_id: impl Into<String>,
        impressions: u64,
        clicks: u64,
        spend: f64,
        conversions: u64,
    ) -> AnalyticsResult<Self> {
        let campaign_id = campaign_id.into();
        if campaign_id.trim().is_empty() {
            return Err(AnalyticsError::parse(row, "campaign_id", campaign_id));
        }
        if !spend.is_finite() || spend < 0.0 {
            return Err(AnalyticsError::parse(row, "spend", spend.to_string()));
        }

        Ok(Self {
            campaign_id,
            date: None,
            impressions,
            clicks,
            spend,
            conversions,
        })
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }
}
