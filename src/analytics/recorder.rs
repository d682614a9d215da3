//! Analytics recorder
//!
//! Write path for the analytics subsystem plus the dashboard query surface.
//! Failures never propagate past this boundary: tracking returns a
//! `TrackOutcome` and queries degrade to `None`/empty — a failed analytics
//! call must never break the page it instruments.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::analytics::{
    group_daily, reduce_summaries, BusinessMetrics, DailyStat, SummaryAggregator, SummaryDelta,
    UNIQUE_VIEW_WINDOW_HOURS,
};
use crate::errors::{MeetdashError, Result};
use crate::store::{
    AnalyticsEvent, AnalyticsSummary, DashboardStore, DeviceClass, EngagementKind, EventKind,
    GeoLocation, TrafficSource,
};
use crate::utils::{classify_device, generate_session_key};

/// track_view 的可选参数
#[derive(Debug, Clone, Default)]
pub struct ViewOptions {
    /// 登录用户 id 或既有会话键；缺省时生成随机会话键
    pub viewer_key: Option<String>,
    pub duration_secs: Option<u64>,
    pub source: Option<TrafficSource>,
    pub referrer: Option<String>,
    pub location: Option<GeoLocation>,
    /// 调用端的 User-Agent，用于设备分类
    pub user_agent: Option<String>,
}

/// track_engagement 的可选参数
#[derive(Debug, Clone, Default)]
pub struct EngagementOptions {
    pub viewer_key: Option<String>,
    pub event_data: Option<serde_json::Map<String, serde_json::Value>>,
}

/// 埋点调用的结果，错误被吞掉后以字段形式返回
#[derive(Debug, Clone, Serialize)]
pub struct TrackOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_unique: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TrackOutcome {
    fn ok(is_unique: Option<bool>) -> Self {
        TrackOutcome {
            success: true,
            is_unique,
            error: None,
        }
    }

    fn failed(err: &MeetdashError) -> Self {
        TrackOutcome {
            success: false,
            is_unique: None,
            error: Some(err.format_simple()),
        }
    }
}

/// Analytics 记录服务
///
/// 进程启动时构造一次，除存储句柄外无自身状态。
pub struct AnalyticsRecorder {
    store: Arc<dyn DashboardStore>,
    aggregator: SummaryAggregator,
}

impl AnalyticsRecorder {
    pub fn new(store: Arc<dyn DashboardStore>) -> Self {
        let aggregator = SummaryAggregator::new(Arc::clone(&store));
        Self { store, aggregator }
    }

    /// 记录一次 view 并触发汇总更新
    pub async fn track_view(
        &self,
        meetup_id: &str,
        business_id: &str,
        options: ViewOptions,
    ) -> TrackOutcome {
        match self.record_view(meetup_id, business_id, options).await {
            Ok(is_unique) => TrackOutcome::ok(Some(is_unique)),
            Err(e) => {
                error!("Failed to track view for meetup '{}': {}", meetup_id, e);
                TrackOutcome::failed(&e)
            }
        }
    }

    async fn record_view(
        &self,
        meetup_id: &str,
        business_id: &str,
        options: ViewOptions,
    ) -> Result<bool> {
        if meetup_id.is_empty() || business_id.is_empty() {
            return Err(MeetdashError::validation(
                "meetup_id and business_id are required",
            ));
        }

        let viewer_key = options
            .viewer_key
            .filter(|k| !k.is_empty())
            .unwrap_or_else(generate_session_key);
        let duration_secs = options.duration_secs.unwrap_or(0);
        let source = options.source.unwrap_or_default();

        // 24 小时窗口内按 (meetup, viewer) 判定 unique。
        // 纯查询判定，同一瞬间的并发请求可能都被判为 unique —
        // 低流量 dashboard 下可接受，不做事务化修正。
        let since = Utc::now() - Duration::hours(UNIQUE_VIEW_WINDOW_HOURS);
        let is_unique = !self
            .store
            .has_recent_view(meetup_id, &viewer_key, since)
            .await?;

        let device_class = options
            .user_agent
            .as_deref()
            .map(classify_device)
            .unwrap_or(DeviceClass::Desktop);

        let event = AnalyticsEvent {
            // id 与 timestamp 由存储后端在写入时分配
            id: String::new(),
            kind: EventKind::View,
            meetup_id: meetup_id.to_string(),
            business_id: business_id.to_string(),
            timestamp: Utc::now(),
            viewer_key,
            is_unique: Some(is_unique),
            view_duration_secs: Some(duration_secs),
            source: Some(source),
            referrer: options.referrer,
            device_class: Some(device_class),
            location: options.location.clone(),
            engagement: None,
            event_data: None,
        };
        self.store.insert_event(event).await?;

        // 汇总失败只记录告警，事件写入不回滚：
        // 日志 at-least-once，汇总 best-effort
        let delta = SummaryDelta::for_view(is_unique, duration_secs, source, options.location);
        if let Err(e) = self.aggregator.apply(meetup_id, business_id, delta).await {
            warn!(
                "Summary update failed for meetup '{}' (view event kept): {}",
                meetup_id, e
            );
        }

        debug!(
            "Tracked view for meetup '{}' (unique: {})",
            meetup_id, is_unique
        );
        Ok(is_unique)
    }

    /// 记录一次互动事件并触发汇总更新
    pub async fn track_engagement(
        &self,
        meetup_id: &str,
        business_id: &str,
        kind: EngagementKind,
        options: EngagementOptions,
    ) -> TrackOutcome {
        match self
            .record_engagement(meetup_id, business_id, kind, options)
            .await
        {
            Ok(()) => TrackOutcome::ok(None),
            Err(e) => {
                error!(
                    "Failed to track {} for meetup '{}': {}",
                    kind.counter_name(),
                    meetup_id,
                    e
                );
                TrackOutcome::failed(&e)
            }
        }
    }

    async fn record_engagement(
        &self,
        meetup_id: &str,
        business_id: &str,
        kind: EngagementKind,
        options: EngagementOptions,
    ) -> Result<()> {
        if meetup_id.is_empty() || business_id.is_empty() {
            return Err(MeetdashError::validation(
                "meetup_id and business_id are required",
            ));
        }

        let viewer_key = options
            .viewer_key
            .filter(|k| !k.is_empty())
            .unwrap_or_else(generate_session_key);

        let event = AnalyticsEvent {
            id: String::new(),
            kind: EventKind::Engagement,
            meetup_id: meetup_id.to_string(),
            business_id: business_id.to_string(),
            timestamp: Utc::now(),
            viewer_key,
            is_unique: None,
            view_duration_secs: None,
            source: None,
            referrer: None,
            device_class: None,
            location: None,
            engagement: Some(kind),
            event_data: options.event_data,
        };
        self.store.insert_event(event).await?;

        let delta = SummaryDelta::for_engagement(kind);
        if let Err(e) = self.aggregator.apply(meetup_id, business_id, delta).await {
            warn!(
                "Summary update failed for meetup '{}' (engagement event kept): {}",
                meetup_id, e
            );
        }

        debug!(
            "Tracked {} for meetup '{}'",
            kind.counter_name(),
            meetup_id
        );
        Ok(())
    }

    /// 单个 meetup 的汇总；不存在是合法的空状态，返回 None
    pub async fn get_meetup_analytics(&self, meetup_id: &str) -> Option<AnalyticsSummary> {
        match self.store.find_summary(meetup_id).await {
            Ok(summary) => summary,
            Err(e) => {
                error!("Failed to load analytics for meetup '{}': {}", meetup_id, e);
                None
            }
        }
    }

    /// 商家全部 meetup 的汇总，updated_at 降序
    pub async fn get_business_analytics(&self, business_id: &str) -> Vec<AnalyticsSummary> {
        match self.store.summaries_for_business(business_id).await {
            Ok(summaries) => {
                debug!(
                    "Loaded {} analytics summaries for business '{}'",
                    summaries.len(),
                    business_id
                );
                summaries
            }
            Err(e) => {
                error!(
                    "Failed to load analytics for business '{}': {}",
                    business_id, e
                );
                Vec::new()
            }
        }
    }

    /// 商家级聚合指标，每次调用现算
    pub async fn get_business_metrics(&self, business_id: &str) -> Option<BusinessMetrics> {
        info!("Analytics: computing business metrics for '{}'", business_id);
        match self.store.summaries_for_business(business_id).await {
            Ok(summaries) => Some(reduce_summaries(&summaries)),
            Err(e) => {
                error!(
                    "Failed to compute metrics for business '{}': {}",
                    business_id, e
                );
                None
            }
        }
    }

    /// 最近 days 天的按日统计，基于原始 view 日志而非汇总
    pub async fn get_time_based_analytics(&self, business_id: &str, days: u32) -> Vec<DailyStat> {
        info!(
            "Analytics: time-based query for business '{}', trailing {} days",
            business_id, days
        );

        let since = Utc::now() - Duration::days(days as i64);
        match self.store.views_for_business_since(business_id, since).await {
            Ok(views) => {
                let daily = group_daily(&views);
                debug!(
                    "Analytics: time-based query returned {} days from {} views",
                    daily.len(),
                    views.len()
                );
                daily
            }
            Err(e) => {
                error!(
                    "Failed to load view events for business '{}': {}",
                    business_id, e
                );
                Vec::new()
            }
        }
    }
}
