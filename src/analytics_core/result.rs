//! Packaging of the two ranked views

use super::metrics::CampaignMetrics;
use super::ranking::RankingView;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub top_ctr: Vec<CampaignMetrics>,
    pub top_cpa: Vec<CampaignMetrics>,
}

impl AnalysisResult {
    pub fn assemble(top_ctr: Vec<CampaignMetrics>, top_cpa: Vec<CampaignMetrics>) -> Self {
        Self { top_ctr, top_cpa }
    }

    pub fn view(&self, view: RankingView) -> &[CampaignMetrics] {
        match view {
            RankingView::TopCtr => &self.top_ctr,
            RankingView::TopCpa => &self.top_cpa,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.top_ctr.is_empty() && self.top_cpa.is_empty()
    }
}
