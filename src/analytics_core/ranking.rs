//! Top-N selection over campaign metrics
//!
//! Each view has its own eligibility filter and sort order. Ties are broken
//! by campaign id ascending so output is reproducible.

use super::metrics::CampaignMetrics;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RankingView {
    /// Impressions > 0, highest CTR first
    TopCtr,
    /// Conversions > 0 with a CPA, lowest CPA first
    TopCpa,
}

impl RankingView {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankingView::TopCtr => "top_ctr",
            RankingView::TopCpa => "top_cpa",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            RankingView::TopCtr => "CTR (Click-Through Rate)",
            RankingView::TopCpa => "CPA (Cost Per Acquisition)",
        }
    }

    pub fn all() -> [RankingView; 2] {
        [RankingView::TopCtr, RankingView::TopCpa]
    }

    pub fn is_eligible(&self, metrics: &CampaignMetrics) -> bool {
        match self {
            RankingView::TopCtr => metrics.total_impressions > 0,
            RankingView::TopCpa => metrics.total_conversions > 0 && metrics.cpa.is_some(),
        }
    }

    /// `Less` means `a` ranks ahead of `b`
    pub fn compare(&self, a: &CampaignMetrics, b: &CampaignMetrics) -> Ordering {
        let primary = match self {
            RankingView::TopCtr => b.ctr.total_cmp(&a.ctr),
            RankingView::TopCpa => {
                let a_cpa = a.cpa.unwrap_or(f64::INFINITY);
                let b_cpa = b.cpa.unwrap_or(f64::INFINITY);
                a_cpa.total_cmp(&b_cpa)
            }
        };
        primary.then_with(|| a.campaign_id.cmp(&b.campaign_id))
    }
}

/// Heap entry ordered by rank, so the heap top is the worst kept entry
struct Ranked<'a> {
    view: RankingView,
    metrics: &'a CampaignMetrics,
}

impl PartialEq for Ranked<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked<'_> {}

impl PartialOrd for Ranked<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.view.compare(self.metrics, other.metrics)
    }
}

pub struct RankingSelector {
    top_n: usize,
}

impl RankingSelector {
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Select the best `top_n` eligible entries for `view`, best first.
    ///
    /// Keeps a bounded max-heap of the current winners: O(E log N).
    pub fn select(&self, view: RankingView, metrics: &[CampaignMetrics]) -> Vec<CampaignMetrics> {
        if self.top_n == 0 {
            return Vec::new();
        }

        let mut heap: BinaryHeap<Ranked<'_>> = BinaryHeap::with_capacity(self.top_n + 1);

        for m in metrics.iter().filter(|m| view.is_eligible(m)) {
            let candidate = Ranked { view, metrics: m };
            if heap.len() < self.top_n {
                heap.push(candidate);
            } else if let Some(mut worst) = heap.peek_mut() {
                if candidate < *worst {
                    *worst = candidate;
                }
            }
        }

        heap.into_sorted_vec()
            .into_iter()
            .map(|r| r.metrics.clone())
            .collect()
    }

    pub fn top_ctr(&self, metrics: &[CampaignMetrics]) -> Vec<CampaignMetrics> {
        self.select(RankingView::TopCtr, metrics)
    }

    pub fn top_cpa(&self, metrics: &[CampaignMetrics]) -> Vec<CampaignMetrics> {
        self.select(RankingView::TopCpa, metrics)
    }
}

impl Default for RankingSelector {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_N)
    }
}
