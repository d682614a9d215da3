//! In-memory store backend
//!
//! Default backend; also what the test-suite runs against. Events are an
//! append-only vector, every other collection is a DashMap keyed the way the
//! document store keys its documents. Counter updates run under the map's
//! per-entry lock, which is what makes them behave like the remote store's
//! atomic increments.

use chrono::Utc;
use dashmap::DashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use async_trait::async_trait;
use chrono::DateTime;

use super::models::*;
use super::DashboardStore;
use crate::errors::{MeetdashError, Result};

/// 全量快照，供 FileStore 持久化用
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub events: Vec<AnalyticsEvent>,
    pub summaries: Vec<AnalyticsSummary>,
    pub meetups: Vec<Meetup>,
    pub business_users: Vec<BusinessUser>,
}

#[derive(Default)]
pub struct MemoryStore {
    events: RwLock<Vec<AnalyticsEvent>>,
    /// 以 meetup_id 为键，每个 meetup 至多一份汇总
    summaries: DashMap<String, AnalyticsSummary>,
    meetups: DashMap<String, Meetup>,
    business_users: DashMap<String, BusinessUser>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn export(&self) -> StoreSnapshot {
        StoreSnapshot {
            events: self.events.read().clone(),
            summaries: self.summaries.iter().map(|e| e.value().clone()).collect(),
            meetups: self.meetups.iter().map(|e| e.value().clone()).collect(),
            business_users: self
                .business_users
                .iter()
                .map(|e| e.value().clone())
                .collect(),
        }
    }

    pub(crate) fn import(&self, snapshot: StoreSnapshot) {
        *self.events.write() = snapshot.events;
        for summary in snapshot.summaries {
            self.summaries.insert(summary.meetup_id.clone(), summary);
        }
        for meetup in snapshot.meetups {
            self.meetups.insert(meetup.id.clone(), meetup);
        }
        for user in snapshot.business_users {
            self.business_users.insert(user.user_id.clone(), user);
        }
    }

    fn next_id() -> String {
        Uuid::new_v4().to_string()
    }
}

#[async_trait]
impl DashboardStore for MemoryStore {
    async fn insert_event(&self, mut event: AnalyticsEvent) -> Result<AnalyticsEvent> {
        // id 与 timestamp 由存储方分配，调用方传入的值被覆盖
        event.id = Self::next_id();
        event.timestamp = Utc::now();
        self.events.write().push(event.clone());
        Ok(event)
    }

    async fn has_recent_view(
        &self,
        meetup_id: &str,
        viewer_key: &str,
        since: DateTime<Utc>,
    ) -> Result<bool> {
        let events = self.events.read();
        Ok(events.iter().any(|e| {
            e.kind == EventKind::View
                && e.meetup_id == meetup_id
                && e.viewer_key == viewer_key
                && e.timestamp >= since
        }))
    }

    async fn views_for_business_since(
        &self,
        business_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<AnalyticsEvent>> {
        let events = self.events.read();
        let mut views: Vec<AnalyticsEvent> = events
            .iter()
            .filter(|e| {
                e.kind == EventKind::View && e.business_id == business_id && e.timestamp >= since
            })
            .cloned()
            .collect();
        views.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(views)
    }

    async fn find_summary(&self, meetup_id: &str) -> Result<Option<AnalyticsSummary>> {
        Ok(self.summaries.get(meetup_id).map(|e| e.value().clone()))
    }

    async fn insert_summary(&self, summary: AnalyticsSummary) -> Result<()> {
        self.summaries.insert(summary.meetup_id.clone(), summary);
        Ok(())
    }

    async fn update_summary(&self, meetup_id: &str, update: SummaryUpdate) -> Result<()> {
        let mut entry = self.summaries.get_mut(meetup_id).ok_or_else(|| {
            MeetdashError::not_found(format!("No analytics summary for meetup '{}'", meetup_id))
        })?;
        let summary = entry.value_mut();

        // 计数器自增（entry 锁内，等价于远端的原子自增）
        summary.total_impressions += update.total_impressions;
        summary.unique_viewers += update.unique_viewers;
        summary.clicks += update.clicks;
        summary.shares += update.shares;
        summary.bookmarks += update.bookmarks;
        summary.inquiries += update.inquiries;
        summary.registrations += update.registrations;
        summary.direct_traffic += update.direct_traffic;
        summary.search_traffic += update.search_traffic;
        summary.social_traffic += update.social_traffic;
        summary.referral_traffic += update.referral_traffic;

        // 整体覆写字段
        if let Some(avg) = update.avg_view_duration_secs {
            summary.avg_view_duration_secs = avg;
        }
        if let Some(locations) = update.top_locations {
            summary.top_locations = locations;
        }

        let now = Utc::now();
        if update.touch_last_viewed {
            summary.last_viewed = Some(now);
        }
        summary.updated_at = now;
        Ok(())
    }

    async fn summaries_for_business(&self, business_id: &str) -> Result<Vec<AnalyticsSummary>> {
        let mut summaries: Vec<AnalyticsSummary> = self
            .summaries
            .iter()
            .filter(|e| e.value().business_id == business_id)
            .map(|e| e.value().clone())
            .collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }

    async fn insert_meetup(&self, mut meetup: Meetup) -> Result<Meetup> {
        meetup.id = Self::next_id();
        self.meetups.insert(meetup.id.clone(), meetup.clone());
        Ok(meetup)
    }

    async fn get_meetup(&self, id: &str) -> Result<Option<Meetup>> {
        Ok(self.meetups.get(id).map(|e| e.value().clone()))
    }

    async fn meetups_for_business(&self, business_id: &str) -> Result<Vec<Meetup>> {
        let mut meetups: Vec<Meetup> = self
            .meetups
            .iter()
            .filter(|e| e.value().business_id == business_id)
            .map(|e| e.value().clone())
            .collect();
        meetups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(meetups)
    }

    async fn update_meetup(&self, id: &str, patch: MeetupPatch) -> Result<()> {
        let mut entry = self
            .meetups
            .get_mut(id)
            .ok_or_else(|| MeetdashError::not_found(format!("Meetup '{}' does not exist", id)))?;
        let meetup = entry.value_mut();

        if let Some(title) = patch.title {
            meetup.title = title;
        }
        if let Some(activity) = patch.activity {
            meetup.activity = activity;
        }
        if let Some(location) = patch.location {
            meetup.location = location;
        }
        if let Some(category) = patch.category {
            meetup.category = Some(category);
        }
        if let Some(address) = patch.address {
            meetup.address = Some(address);
        }
        if let Some(description) = patch.description {
            meetup.description = Some(description);
        }
        if let Some(image_url) = patch.image_url {
            meetup.image_url = Some(image_url);
        }
        if let Some(price) = patch.price {
            meetup.price = Some(price);
        }
        if let Some(max_attendees) = patch.max_attendees {
            meetup.max_attendees = Some(max_attendees);
        }
        if let Some(duration_hours) = patch.duration_hours {
            meetup.duration_hours = Some(duration_hours);
        }
        if let Some(tags) = patch.tags {
            meetup.tags = tags;
        }
        if let Some(expiration_date) = patch.expiration_date {
            meetup.expiration_date = expiration_date;
        }
        if let Some(is_live) = patch.is_live {
            meetup.is_live = is_live;
        }
        meetup.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_meetup(&self, id: &str) -> Result<()> {
        self.meetups
            .remove(id)
            .ok_or_else(|| MeetdashError::not_found(format!("Meetup '{}' does not exist", id)))?;
        Ok(())
    }

    async fn live_meetups(&self, limit: usize) -> Result<Vec<Meetup>> {
        let now = Utc::now();
        let mut meetups: Vec<Meetup> = self
            .meetups
            .iter()
            .filter(|e| e.value().is_live && e.value().expiration_date > now)
            .map(|e| e.value().clone())
            .collect();
        meetups.sort_by(|a, b| a.expiration_date.cmp(&b.expiration_date));
        meetups.truncate(limit);
        Ok(meetups)
    }

    async fn increment_meetup_views(&self, id: &str) -> Result<()> {
        let mut entry = self
            .meetups
            .get_mut(id)
            .ok_or_else(|| MeetdashError::not_found(format!("Meetup '{}' does not exist", id)))?;
        entry.value_mut().views += 1;
        Ok(())
    }

    async fn increment_meetup_clicks(&self, id: &str) -> Result<()> {
        let mut entry = self
            .meetups
            .get_mut(id)
            .ok_or_else(|| MeetdashError::not_found(format!("Meetup '{}' does not exist", id)))?;
        entry.value_mut().clicks += 1;
        Ok(())
    }

    async fn insert_business_user(&self, user: BusinessUser) -> Result<()> {
        self.business_users.insert(user.user_id.clone(), user);
        Ok(())
    }

    async fn get_business_user(&self, user_id: &str) -> Result<Option<BusinessUser>> {
        Ok(self.business_users.get(user_id).map(|e| e.value().clone()))
    }

    async fn update_business_user(&self, user_id: &str, patch: BusinessUserPatch) -> Result<()> {
        let mut entry = self.business_users.get_mut(user_id).ok_or_else(|| {
            MeetdashError::not_found(format!("Business user '{}' does not exist", user_id))
        })?;
        let user = entry.value_mut();

        if let Some(business_name) = patch.business_name {
            user.business_name = business_name;
        }
        if let Some(contact_email) = patch.contact_email {
            user.contact_email = contact_email;
        }
        if let Some(bio) = patch.bio {
            user.bio = bio;
        }
        if let Some(photo_url) = patch.photo_url {
            user.photo_url = photo_url;
        }
        if let Some(address) = patch.address {
            user.address = address;
        }
        if let Some(location) = patch.location {
            user.location = location;
        }
        if let Some(v) = patch.notification_promotion_updates {
            user.notification_promotion_updates = v;
        }
        if let Some(v) = patch.notification_customer_interactions {
            user.notification_customer_interactions = v;
        }
        if let Some(v) = patch.notification_marketing_updates {
            user.notification_marketing_updates = v;
        }
        if let Some(v) = patch.notification_account_alerts {
            user.notification_account_alerts = v;
        }
        if let Some(settings) = patch.settings {
            user.settings = settings;
        }
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn get_backend_name(&self) -> String {
        "memory".to_string()
    }
}
