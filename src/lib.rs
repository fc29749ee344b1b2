pub mod analytics_core;
pub mod config;
pub mod export;

pub use analytics_core::{analyze, AnalysisResult, AnalyticsError, CampaignMetrics, RawRecord};
