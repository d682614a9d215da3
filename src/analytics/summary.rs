//! Incremental summary maintenance
//!
//! Folds one view/engagement delta into the per-meetup summary document.
//! Counters go through the store's atomic increments; the running average
//! and the top-locations list are read-modify-write fields and therefore
//! subject to drift under concurrent updates — a documented limitation of
//! the source design, acceptable at dashboard traffic volumes.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::errors::Result;
use crate::store::{
    AnalyticsSummary, DashboardStore, EngagementKind, GeoLocation, LocationCount, SummaryUpdate,
    TrafficSource,
};

/// topLocations 最多保留的条目数
pub const TOP_LOCATIONS_LIMIT: usize = 10;

/// 一次事件折算出的汇总增量
#[derive(Debug, Clone, Default)]
pub struct SummaryDelta {
    pub impressions: u64,
    pub unique_views: u64,
    pub view_duration_secs: Option<u64>,
    pub source: Option<TrafficSource>,
    pub location: Option<GeoLocation>,
    pub clicks: u64,
    pub shares: u64,
    pub bookmarks: u64,
    pub inquiries: u64,
    pub registrations: u64,
}

impl SummaryDelta {
    /// 一次 view 的增量
    pub fn for_view(
        is_unique: bool,
        duration_secs: u64,
        source: TrafficSource,
        location: Option<GeoLocation>,
    ) -> Self {
        SummaryDelta {
            impressions: 1,
            unique_views: is_unique as u64,
            view_duration_secs: Some(duration_secs),
            source: Some(source),
            location,
            ..Default::default()
        }
    }

    /// 一次 engagement 的增量，按类型落到对应的复数计数器
    pub fn for_engagement(kind: EngagementKind) -> Self {
        let mut delta = SummaryDelta::default();
        match kind {
            EngagementKind::Click => delta.clicks = 1,
            EngagementKind::Share => delta.shares = 1,
            EngagementKind::Bookmark => delta.bookmarks = 1,
            EngagementKind::Inquiry => delta.inquiries = 1,
            EngagementKind::Registration => delta.registrations = 1,
        }
        delta
    }
}

/// 首个事件到达时，用增量播种一份新的汇总文档
pub fn seed_summary(
    meetup_id: &str,
    business_id: &str,
    delta: &SummaryDelta,
    now: DateTime<Utc>,
) -> AnalyticsSummary {
    let mut top_locations = Vec::new();
    if let Some(location) = &delta.location {
        top_locations.push(LocationCount {
            city: location.city.clone(),
            country: location.country.clone(),
            count: 1,
        });
    }

    AnalyticsSummary {
        meetup_id: meetup_id.to_string(),
        business_id: business_id.to_string(),
        total_impressions: delta.impressions,
        unique_viewers: delta.unique_views,
        avg_view_duration_secs: delta.view_duration_secs.unwrap_or(0) as f64,
        clicks: delta.clicks,
        shares: delta.shares,
        bookmarks: delta.bookmarks,
        inquiries: delta.inquiries,
        registrations: delta.registrations,
        attendees: 0,
        revenue: 0.0,
        conversion_rate: 0.0,
        direct_traffic: matches!(delta.source, Some(TrafficSource::Direct)) as u64,
        search_traffic: matches!(delta.source, Some(TrafficSource::Search)) as u64,
        social_traffic: matches!(delta.source, Some(TrafficSource::Social)) as u64,
        referral_traffic: matches!(delta.source, Some(TrafficSource::Referral)) as u64,
        top_locations,
        last_viewed: None,
        created_at: now,
        updated_at: now,
    }
}

/// 加权滑动平均：newAvg = (oldAvg * oldN + duration) / (oldN + newN)
pub fn next_avg_duration(
    old_avg: f64,
    old_impressions: u64,
    duration_secs: u64,
    new_impressions: u64,
) -> f64 {
    let total = old_impressions + new_impressions;
    if total == 0 {
        return duration_secs as f64;
    }
    (old_avg * old_impressions as f64 + duration_secs as f64) / total as f64
}

/// 把一条地理位置折入 topLocations：命中则计数 +1，否则追加，
/// 然后按 count 降序截断到前 10
pub fn fold_top_locations(locations: &mut Vec<LocationCount>, city: &str, country: &str) {
    if let Some(entry) = locations
        .iter_mut()
        .find(|l| l.city == city && l.country == country)
    {
        entry.count += 1;
    } else {
        locations.push(LocationCount {
            city: city.to_string(),
            country: country.to_string(),
            count: 1,
        });
    }

    locations.sort_by(|a, b| b.count.cmp(&a.count));
    locations.truncate(TOP_LOCATIONS_LIMIT);
}

/// 汇总聚合器：把增量应用到 meetup 的唯一汇总文档上
pub struct SummaryAggregator {
    store: Arc<dyn DashboardStore>,
}

impl SummaryAggregator {
    pub fn new(store: Arc<dyn DashboardStore>) -> Self {
        Self { store }
    }

    pub async fn apply(
        &self,
        meetup_id: &str,
        business_id: &str,
        delta: SummaryDelta,
    ) -> Result<()> {
        // 查询-再写入：远端存储没有按键 upsert，两个并发首事件可能
        // 各自观察到"无汇总"并都执行创建。进程内后端按 meetup_id 建键，
        // 不会产生重复文档；对远端后端这是已知的竞态。
        match self.store.find_summary(meetup_id).await? {
            None => {
                let summary = seed_summary(meetup_id, business_id, &delta, Utc::now());
                self.store.insert_summary(summary).await?;
                debug!("Created analytics summary for meetup '{}'", meetup_id);
            }
            Some(current) => {
                let mut update = SummaryUpdate {
                    total_impressions: delta.impressions,
                    unique_viewers: delta.unique_views,
                    clicks: delta.clicks,
                    shares: delta.shares,
                    bookmarks: delta.bookmarks,
                    inquiries: delta.inquiries,
                    registrations: delta.registrations,
                    touch_last_viewed: true,
                    ..Default::default()
                };

                // 平均观看时长：读出的旧值与并发自增的计数器混算，
                // 并发下存在漂移，按源设计保留
                if let Some(duration) = delta.view_duration_secs.filter(|d| *d > 0) {
                    update.avg_view_duration_secs = Some(next_avg_duration(
                        current.avg_view_duration_secs,
                        current.total_impressions,
                        duration,
                        delta.impressions,
                    ));
                }

                match delta.source {
                    Some(TrafficSource::Direct) => update.direct_traffic = 1,
                    Some(TrafficSource::Search) => update.search_traffic = 1,
                    Some(TrafficSource::Social) => update.social_traffic = 1,
                    Some(TrafficSource::Referral) => update.referral_traffic = 1,
                    None => {}
                }

                if let Some(location) = &delta.location {
                    let mut locations = current.top_locations.clone();
                    fold_top_locations(&mut locations, &location.city, &location.country);
                    update.top_locations = Some(locations);
                }

                self.store.update_summary(meetup_id, update).await?;
                debug!("Updated analytics summary for meetup '{}'", meetup_id);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(city: &str, country: &str) -> GeoLocation {
        GeoLocation {
            city: city.to_string(),
            country: country.to_string(),
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn test_next_avg_duration_weighted() {
        // 10s 之后来一条 20s：(10*1 + 20) / 2 = 15
        let avg = next_avg_duration(10.0, 1, 20, 1);
        assert_eq!(avg, 15.0);
    }

    #[test]
    fn test_next_avg_duration_zero_impressions() {
        assert_eq!(next_avg_duration(0.0, 0, 30, 0), 30.0);
    }

    #[test]
    fn test_fold_top_locations_increments_existing() {
        let mut locations = vec![LocationCount {
            city: "Seattle".to_string(),
            country: "US".to_string(),
            count: 2,
        }];
        fold_top_locations(&mut locations, "Seattle", "US");
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].count, 3);
    }

    #[test]
    fn test_fold_top_locations_bounded_and_sorted() {
        let mut locations = Vec::new();
        // 12 个不同城市，其中 city5 出现 3 次
        for i in 0..12 {
            fold_top_locations(&mut locations, &format!("city{}", i), "US");
        }
        fold_top_locations(&mut locations, "city5", "US");
        fold_top_locations(&mut locations, "city5", "US");

        assert_eq!(locations.len(), TOP_LOCATIONS_LIMIT);
        assert_eq!(locations[0].city, "city5");
        assert_eq!(locations[0].count, 3);
        for pair in locations.windows(2) {
            assert!(pair[0].count >= pair[1].count);
        }
    }

    #[test]
    fn test_seed_summary_from_view_delta() {
        let delta = SummaryDelta::for_view(true, 30, TrafficSource::Search, Some(loc("Oslo", "NO")));
        let summary = seed_summary("m1", "b1", &delta, Utc::now());

        assert_eq!(summary.total_impressions, 1);
        assert_eq!(summary.unique_viewers, 1);
        assert_eq!(summary.avg_view_duration_secs, 30.0);
        assert_eq!(summary.search_traffic, 1);
        assert_eq!(summary.direct_traffic, 0);
        assert_eq!(summary.top_locations.len(), 1);
        assert_eq!(summary.top_locations[0].count, 1);
        assert_eq!(summary.clicks, 0);
    }

    #[test]
    fn test_seed_summary_from_engagement_delta() {
        let delta = SummaryDelta::for_engagement(EngagementKind::Registration);
        let summary = seed_summary("m1", "b1", &delta, Utc::now());

        assert_eq!(summary.registrations, 1);
        assert_eq!(summary.total_impressions, 0);
        assert!(summary.top_locations.is_empty());
    }
}
