//! View/engagement analytics
//!
//! Log + materialized-view split: every view and engagement is appended to
//! the immutable event log, then folded into the one mutable summary document
//! per meetup so dashboard reads stay O(1). Business-level metrics are a pure
//! reduction over the summaries, computed fresh on every call.
//!
//! - `recorder`: write path (`track_view` / `track_engagement`) and the
//!   dashboard query surface
//! - `summary`: the incremental fold into the per-meetup summary
//! - `metrics`: cross-meetup roll-up and daily time series

mod metrics;
mod recorder;
mod summary;

pub use metrics::{group_daily, reduce_summaries, BusinessMetrics, DailyStat};
pub use recorder::{AnalyticsRecorder, EngagementOptions, TrackOutcome, ViewOptions};
pub use summary::{
    fold_top_locations, next_avg_duration, seed_summary, SummaryAggregator, SummaryDelta,
    TOP_LOCATIONS_LIMIT,
};

/// view 去重窗口：同一 viewer 24 小时内只算一次 unique
pub const UNIQUE_VIEW_WINDOW_HOURS: i64 = 24;
