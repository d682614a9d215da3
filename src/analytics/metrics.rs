//! Cross-meetup metrics roll-up
//!
//! Pure read-and-reduce over the per-meetup summaries, recomputed on every
//! dashboard load. Nothing here is persisted.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::store::{AnalyticsEvent, AnalyticsSummary};

/// 商家级聚合指标（临时计算值，不落库）
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BusinessMetrics {
    pub total_impressions: u64,
    pub total_unique_viewers: u64,
    pub total_clicks: u64,
    pub total_shares: u64,
    pub total_bookmarks: u64,
    pub total_inquiries: u64,
    pub total_registrations: u64,
    pub total_revenue: f64,
    /// 各汇总 avg 的算术平均，不是跨 meetup 的加权平均（已知近似）
    pub avg_view_duration_secs: f64,
    pub click_through_rate: f64,
    pub conversion_rate: f64,
    pub meetup_count: usize,
}

/// 把一个商家的全部汇总文档归并成商家指标
pub fn reduce_summaries(summaries: &[AnalyticsSummary]) -> BusinessMetrics {
    let mut metrics = BusinessMetrics::default();

    for summary in summaries {
        metrics.total_impressions += summary.total_impressions;
        metrics.total_unique_viewers += summary.unique_viewers;
        metrics.total_clicks += summary.clicks;
        metrics.total_shares += summary.shares;
        metrics.total_bookmarks += summary.bookmarks;
        metrics.total_inquiries += summary.inquiries;
        metrics.total_registrations += summary.registrations;
        metrics.total_revenue += summary.revenue;
        metrics.avg_view_duration_secs += summary.avg_view_duration_secs;
    }

    metrics.meetup_count = summaries.len();
    if metrics.meetup_count > 0 {
        metrics.avg_view_duration_secs /= metrics.meetup_count as f64;
    }

    metrics.click_through_rate = if metrics.total_impressions > 0 {
        (metrics.total_clicks as f64 / metrics.total_impressions as f64) * 100.0
    } else {
        0.0
    };

    metrics.conversion_rate = if metrics.total_clicks > 0 {
        (metrics.total_registrations as f64 / metrics.total_clicks as f64) * 100.0
    } else {
        0.0
    };

    metrics
}

/// 按自然日聚合的 view 统计
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStat {
    pub date: NaiveDate,
    pub impressions: u64,
    pub unique_views: u64,
    /// 仅由当日事件计算
    pub avg_duration_secs: f64,
}

/// 把原始 view 事件按自然日分组（输出按日期升序）
pub fn group_daily(views: &[AnalyticsEvent]) -> Vec<DailyStat> {
    // BTreeMap 保证日期升序
    let mut days: BTreeMap<NaiveDate, (u64, u64, u64)> = BTreeMap::new();

    for view in views {
        let day = days.entry(view.timestamp.date_naive()).or_insert((0, 0, 0));
        day.0 += 1;
        if view.is_unique == Some(true) {
            day.1 += 1;
        }
        day.2 += view.view_duration_secs.unwrap_or(0);
    }

    days.into_iter()
        .map(|(date, (impressions, unique_views, total_duration))| DailyStat {
            date,
            impressions,
            unique_views,
            avg_duration_secs: if impressions > 0 {
                total_duration as f64 / impressions as f64
            } else {
                0.0
            },
        })
        .collect()
}
