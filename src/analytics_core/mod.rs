//! Analytics Core - Campaign Aggregation and Ranking
//!
//! Turns a sequence of raw ad performance records into two bounded rankings:
//! campaigns by click-through rate and campaigns by cost per acquisition.
//!
//! # Architecture
//!
//! ```text
//! CSV file | ZIP archive → InputFile → CsvRecordSource → RawRecord stream
//!     ↓
//! CampaignAggregator (hash-map fold, optionally sharded across tasks)
//!     ↓
//! MetricCalculator (ctr, Option<cpa>)
//!     ↓
//! RankingSelector (bounded heap per view, id tie-break)
//!     ↓
//! AnalysisResult { top_ctr, top_cpa }
//! ```

pub mod aggregator;
pub mod analyzer;
pub mod error;
pub mod input;
pub mod metrics;
pub mod ranking;
pub mod reader;
pub mod record;
pub mod result;

pub use aggregator::{aggregate_sharded, AggregateBucket, CampaignAggregator};
pub use analyzer::{analyze, analyze_sharded, try_analyze, Analyzer};
pub use error::{AnalyticsError, AnalyticsResult};
pub use input::InputFile;
pub use metrics::{CampaignMetrics, MetricCalculator};
pub use ranking::{RankingSelector, RankingView, DEFAULT_TOP_N};
pub use reader::CsvRecordSource;
pub use record::RawRecord;
pub use result::AnalysisResult;
