//! Meetup / Business service 集成测试

use std::sync::Arc;

use chrono::{Duration, Utc};

use meetdash::services::{
    BusinessService, CreateBusinessUserRequest, CreateMeetupRequest, MeetupService,
};
use meetdash::store::{
    AuthProvider, BusinessUserPatch, DashboardStore, GeoPoint, MemoryStore, MeetupPatch,
};

fn services() -> (MeetupService, BusinessService) {
    let store: Arc<dyn DashboardStore> = Arc::new(MemoryStore::new());
    (
        MeetupService::new(Arc::clone(&store)),
        BusinessService::new(store),
    )
}

fn meetup_request(business_id: &str, title: &str) -> CreateMeetupRequest {
    CreateMeetupRequest {
        business_id: business_id.to_string(),
        business_name: "Acme Coffee".to_string(),
        creator_id: "creator-1".to_string(),
        title: title.to_string(),
        activity: "coffee tasting".to_string(),
        location: GeoPoint {
            latitude: 47.6,
            longitude: -122.3,
        },
        expiration_date: Utc::now() + Duration::hours(24),
        category: None,
        address: None,
        description: None,
        image_url: None,
        price: None,
        max_attendees: None,
        duration_hours: None,
        tags: Vec::new(),
        is_live: true,
    }
}

fn business_request(user_id: &str) -> CreateBusinessUserRequest {
    CreateBusinessUserRequest {
        user_id: user_id.to_string(),
        email: "owner@acme.test".to_string(),
        business_name: "Acme Coffee".to_string(),
        location: GeoPoint {
            latitude: 47.6,
            longitude: -122.3,
        },
        contact_email: None,
        bio: None,
        photo_url: None,
        address: None,
        auth_provider: AuthProvider::Email,
    }
}

#[tokio::test]
async fn test_create_meetup_assigns_id_and_zeroes_counters() {
    let (meetups, _) = services();

    let created = meetups.create_meetup(meetup_request("b1", "Tasting")).await.unwrap();
    assert!(!created.id.is_empty());
    assert_eq!(created.views, 0);
    assert_eq!(created.clicks, 0);

    let loaded = meetups.get_meetup(&created.id).await.unwrap().unwrap();
    assert_eq!(loaded.title, "Tasting");
}

#[tokio::test]
async fn test_create_meetup_collects_all_validation_errors() {
    let (meetups, _) = services();

    let mut req = meetup_request("", "");
    req.business_name = String::new();
    req.location.latitude = 200.0;

    let err = meetups.create_meetup(req).await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Business name is required"));
    assert!(message.contains("Meetup title is required"));
    assert!(message.contains("Business id is required"));
    assert!(message.contains("out of range"));
}

#[tokio::test]
async fn test_meetups_for_business_only_theirs() {
    let (meetups, _) = services();
    meetups.create_meetup(meetup_request("b1", "one")).await.unwrap();
    meetups.create_meetup(meetup_request("b1", "two")).await.unwrap();
    meetups.create_meetup(meetup_request("b2", "other")).await.unwrap();

    let list = meetups.meetups_for_business("b1").await.unwrap();
    assert_eq!(list.len(), 2);
    assert!(list.iter().all(|m| m.business_id == "b1"));
}

#[tokio::test]
async fn test_update_and_delete_meetup() {
    let (meetups, _) = services();
    let created = meetups.create_meetup(meetup_request("b1", "old")).await.unwrap();

    meetups
        .update_meetup(
            &created.id,
            MeetupPatch {
                title: Some("new".to_string()),
                is_live: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let loaded = meetups.get_meetup(&created.id).await.unwrap().unwrap();
    assert_eq!(loaded.title, "new");
    assert!(!loaded.is_live);

    meetups.delete_meetup(&created.id).await.unwrap();
    assert!(meetups.get_meetup(&created.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_live_meetups_excludes_unlisted() {
    let (meetups, _) = services();
    meetups.create_meetup(meetup_request("b1", "live")).await.unwrap();
    let mut hidden = meetup_request("b1", "hidden");
    hidden.is_live = false;
    meetups.create_meetup(hidden).await.unwrap();

    let live = meetups.live_meetups(None).await.unwrap();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].title, "live");
}

#[tokio::test]
async fn test_record_hits_tolerate_missing_meetup() {
    let (meetups, _) = services();
    // 失败只记日志，不 panic 也不报错
    meetups.record_view_hit("missing").await;
    meetups.record_click_hit("missing").await;
}

#[tokio::test]
async fn test_create_business_user_applies_defaults() {
    let (_, business) = services();

    let user = business
        .create_business_user(business_request("u1"))
        .await
        .unwrap();
    assert_eq!(user.contact_email, "owner@acme.test");
    assert!(user.notification_account_alerts);
    assert_eq!(user.settings.timezone, "America/Los_Angeles");
    assert_eq!(user.settings.business_hours.len(), 7);
    assert_eq!(user.settings.business_hours["monday"].open, "09:00");
    assert_eq!(user.settings.business_hours["sunday"].open, "closed");
}

#[tokio::test]
async fn test_create_business_user_requires_core_fields() {
    let (_, business) = services();

    let mut req = business_request("u1");
    req.email = String::new();
    assert!(business.create_business_user(req).await.is_err());
}

#[tokio::test]
async fn test_update_business_user_patch() {
    let (_, business) = services();
    business
        .create_business_user(business_request("u1"))
        .await
        .unwrap();

    business
        .update_business_user(
            "u1",
            BusinessUserPatch {
                bio: Some("Best coffee in town".to_string()),
                notification_marketing_updates: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let user = business.get_business_user("u1").await.unwrap().unwrap();
    assert_eq!(user.bio, "Best coffee in town");
    assert!(!user.notification_marketing_updates);
    // 未出现在补丁里的字段保持不变
    assert_eq!(user.business_name, "Acme Coffee");
}

#[tokio::test]
async fn test_update_missing_business_user_is_error() {
    let (_, business) = services();
    let result = business
        .update_business_user("ghost", BusinessUserPatch::default())
        .await;
    assert!(result.is_err());
}
