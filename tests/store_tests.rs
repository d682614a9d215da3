//! 存储后端集成测试
//!
//! 验证两个后端对同一套 trait 契约的实现：排序、原子计数、补丁更新，
//! 以及 FileStore 的落盘与重载。

use std::sync::Arc;

use chrono::{Duration, Utc};
use tempfile::TempDir;

use meetdash::store::{
    AnalyticsEvent, AnalyticsSummary, DashboardStore, EventKind, FileStore, GeoPoint, MemoryStore,
    Meetup, MeetupPatch, SummaryUpdate,
};

fn view_event(meetup_id: &str, business_id: &str, viewer_key: &str) -> AnalyticsEvent {
    AnalyticsEvent {
        id: String::new(),
        kind: EventKind::View,
        meetup_id: meetup_id.to_string(),
        business_id: business_id.to_string(),
        timestamp: Utc::now(),
        viewer_key: viewer_key.to_string(),
        is_unique: Some(true),
        view_duration_secs: Some(10),
        source: None,
        referrer: None,
        device_class: None,
        location: None,
        engagement: None,
        event_data: None,
    }
}

fn summary(meetup_id: &str, business_id: &str) -> AnalyticsSummary {
    let now = Utc::now();
    AnalyticsSummary {
        meetup_id: meetup_id.to_string(),
        business_id: business_id.to_string(),
        total_impressions: 0,
        unique_viewers: 0,
        avg_view_duration_secs: 0.0,
        clicks: 0,
        shares: 0,
        bookmarks: 0,
        inquiries: 0,
        registrations: 0,
        attendees: 0,
        revenue: 0.0,
        conversion_rate: 0.0,
        direct_traffic: 0,
        search_traffic: 0,
        social_traffic: 0,
        referral_traffic: 0,
        top_locations: Vec::new(),
        last_viewed: None,
        created_at: now,
        updated_at: now,
    }
}

fn meetup(business_id: &str, title: &str, expires_in_hours: i64) -> Meetup {
    let now = Utc::now();
    Meetup {
        id: String::new(),
        business_id: business_id.to_string(),
        business_name: "Acme".to_string(),
        creator_id: "creator".to_string(),
        title: title.to_string(),
        activity: "run".to_string(),
        location: GeoPoint {
            latitude: 47.6,
            longitude: -122.3,
        },
        category: None,
        address: None,
        description: None,
        image_url: None,
        price: None,
        max_attendees: None,
        duration_hours: None,
        tags: Vec::new(),
        expiration_date: now + Duration::hours(expires_in_hours),
        is_live: true,
        created_at: now,
        updated_at: now,
        views: 0,
        clicks: 0,
    }
}

#[tokio::test]
async fn test_insert_event_assigns_id_and_timestamp() {
    let store = MemoryStore::new();
    let before = Utc::now();

    let mut event = view_event("m1", "b1", "v1");
    event.id = "caller-supplied".to_string();
    let stored = store.insert_event(event).await.unwrap();

    assert_ne!(stored.id, "caller-supplied");
    assert!(!stored.id.is_empty());
    assert!(stored.timestamp >= before);
}

#[tokio::test]
async fn test_has_recent_view_respects_window() {
    let store = MemoryStore::new();
    store
        .insert_event(view_event("m1", "b1", "v1"))
        .await
        .unwrap();

    let hour_ago = Utc::now() - Duration::hours(1);
    assert!(store.has_recent_view("m1", "v1", hour_ago).await.unwrap());
    // 其他 viewer 或其他 meetup 均不命中
    assert!(!store.has_recent_view("m1", "v2", hour_ago).await.unwrap());
    assert!(!store.has_recent_view("m2", "v1", hour_ago).await.unwrap());
    // since 在未来时，已有记录不命中
    let future = Utc::now() + Duration::hours(1);
    assert!(!store.has_recent_view("m1", "v1", future).await.unwrap());
}

#[tokio::test]
async fn test_views_for_business_excludes_engagements() {
    let store = MemoryStore::new();
    store
        .insert_event(view_event("m1", "b1", "v1"))
        .await
        .unwrap();
    let mut engagement = view_event("m1", "b1", "v1");
    engagement.kind = EventKind::Engagement;
    store.insert_event(engagement).await.unwrap();
    store
        .insert_event(view_event("m2", "b2", "v1"))
        .await
        .unwrap();

    let since = Utc::now() - Duration::days(1);
    let views = store.views_for_business_since("b1", since).await.unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].kind, EventKind::View);
}

#[tokio::test]
async fn test_update_summary_increments_and_overwrites() {
    let store = MemoryStore::new();
    store.insert_summary(summary("m1", "b1")).await.unwrap();

    let update = SummaryUpdate {
        total_impressions: 1,
        unique_viewers: 1,
        clicks: 2,
        avg_view_duration_secs: Some(12.5),
        touch_last_viewed: true,
        ..Default::default()
    };
    store.update_summary("m1", update).await.unwrap();
    store
        .update_summary(
            "m1",
            SummaryUpdate {
                total_impressions: 1,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let stored = store.find_summary("m1").await.unwrap().unwrap();
    assert_eq!(stored.total_impressions, 2);
    assert_eq!(stored.unique_viewers, 1);
    assert_eq!(stored.clicks, 2);
    assert_eq!(stored.avg_view_duration_secs, 12.5);
    assert!(stored.last_viewed.is_some());
}

#[tokio::test]
async fn test_update_missing_summary_is_not_found() {
    let store = MemoryStore::new();
    let result = store
        .update_summary("missing", SummaryUpdate::default())
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_summaries_for_business_newest_first() {
    let store = MemoryStore::new();
    store.insert_summary(summary("m1", "b1")).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    store.insert_summary(summary("m2", "b1")).await.unwrap();
    store.insert_summary(summary("m3", "b2")).await.unwrap();

    // 触一次 m1，让它的 updated_at 变成最新
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    store
        .update_summary(
            "m1",
            SummaryUpdate {
                total_impressions: 1,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let summaries = store.summaries_for_business("b1").await.unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].meetup_id, "m1");
}

#[tokio::test]
async fn test_live_meetups_filtered_sorted_limited() {
    let store = MemoryStore::new();
    store.insert_meetup(meetup("b1", "soon", 1)).await.unwrap();
    store.insert_meetup(meetup("b1", "later", 48)).await.unwrap();
    let mut hidden = meetup("b1", "hidden", 48);
    hidden.is_live = false;
    store.insert_meetup(hidden).await.unwrap();
    store.insert_meetup(meetup("b1", "expired", -1)).await.unwrap();

    let live = store.live_meetups(10).await.unwrap();
    assert_eq!(live.len(), 2);
    assert_eq!(live[0].title, "soon");
    assert_eq!(live[1].title, "later");

    let limited = store.live_meetups(1).await.unwrap();
    assert_eq!(limited.len(), 1);
}

#[tokio::test]
async fn test_meetup_patch_and_counters() {
    let store = MemoryStore::new();
    let stored = store.insert_meetup(meetup("b1", "before", 24)).await.unwrap();

    store
        .update_meetup(
            &stored.id,
            MeetupPatch {
                title: Some("after".to_string()),
                price: Some(12.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    store.increment_meetup_views(&stored.id).await.unwrap();
    store.increment_meetup_views(&stored.id).await.unwrap();
    store.increment_meetup_clicks(&stored.id).await.unwrap();

    let loaded = store.get_meetup(&stored.id).await.unwrap().unwrap();
    assert_eq!(loaded.title, "after");
    assert_eq!(loaded.price, Some(12.0));
    // 未出现在补丁里的字段保持不变
    assert_eq!(loaded.activity, "run");
    assert_eq!(loaded.views, 2);
    assert_eq!(loaded.clicks, 1);
}

#[tokio::test]
async fn test_delete_meetup() {
    let store = MemoryStore::new();
    let stored = store.insert_meetup(meetup("b1", "gone", 24)).await.unwrap();

    store.delete_meetup(&stored.id).await.unwrap();
    assert!(store.get_meetup(&stored.id).await.unwrap().is_none());
    assert!(store.delete_meetup(&stored.id).await.is_err());
}

#[tokio::test]
async fn test_file_store_survives_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");
    let path = path.to_str().unwrap();

    let meetup_id;
    {
        let store = FileStore::new(path).unwrap();
        let stored = store.insert_meetup(meetup("b1", "persisted", 24)).await.unwrap();
        meetup_id = stored.id.clone();
        store.insert_summary(summary(&meetup_id, "b1")).await.unwrap();
        store
            .update_summary(
                &meetup_id,
                SummaryUpdate {
                    total_impressions: 3,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        store
            .insert_event(view_event(&meetup_id, "b1", "v1"))
            .await
            .unwrap();
    }

    // 重新打开同一个文件，数据应完整
    let reopened = FileStore::new(path).unwrap();
    let loaded = reopened.get_meetup(&meetup_id).await.unwrap().unwrap();
    assert_eq!(loaded.title, "persisted");

    let loaded_summary = reopened.find_summary(&meetup_id).await.unwrap().unwrap();
    assert_eq!(loaded_summary.total_impressions, 3);

    let hour_ago = Utc::now() - Duration::hours(1);
    assert!(reopened
        .has_recent_view(&meetup_id, "v1", hour_ago)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_file_store_creates_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fresh.json");

    let store = FileStore::new(path.to_str().unwrap()).unwrap();
    assert!(path.exists());
    assert!(store.live_meetups(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_backend_names() {
    let dir = TempDir::new().unwrap();
    let file_store = FileStore::new(dir.path().join("n.json").to_str().unwrap()).unwrap();

    assert_eq!(MemoryStore::new().get_backend_name().await, "memory");
    assert_eq!(file_store.get_backend_name().await, "file");
}

#[tokio::test]
async fn test_concurrent_summary_increments_do_not_lose_counts() {
    let store = Arc::new(MemoryStore::new());
    store.insert_summary(summary("m1", "b1")).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..20 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .update_summary(
                    "m1",
                    SummaryUpdate {
                        total_impressions: 1,
                        clicks: 1,
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let stored = store.find_summary("m1").await.unwrap().unwrap();
    assert_eq!(stored.total_impressions, 20);
    assert_eq!(stored.clicks, 20);
}
