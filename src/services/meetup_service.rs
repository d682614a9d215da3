//! Meetup service layer
//!
//! Create/read/update/delete for business meetups plus the public live
//! listing. Validation collects every problem into one error instead of
//! failing on the first.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::errors::{MeetdashError, Result};
use crate::store::{DashboardStore, GeoPoint, Meetup, MeetupCategory, MeetupPatch};

/// 公开 live 列表的默认条数
pub const DEFAULT_LIVE_LIMIT: usize = 20;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMeetupRequest {
    pub business_id: String,
    pub business_name: String,
    pub creator_id: String,
    pub title: String,
    pub activity: String,
    pub location: GeoPoint,
    pub expiration_date: DateTime<Utc>,
    #[serde(default)]
    pub category: Option<MeetupCategory>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub max_attendees: Option<u32>,
    #[serde(default)]
    pub duration_hours: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_is_live")]
    pub is_live: bool,
}

fn default_is_live() -> bool {
    true
}

/// 校验创建请求，返回全部问题（为空表示通过）
pub fn validate_meetup(req: &CreateMeetupRequest) -> Vec<String> {
    let mut errors = Vec::new();

    if req.business_name.trim().is_empty() {
        errors.push("Business name is required".to_string());
    }
    if req.title.trim().is_empty() {
        errors.push("Meetup title is required".to_string());
    }
    if req.activity.trim().is_empty() {
        errors.push("Activity type is required".to_string());
    }
    if req.business_id.trim().is_empty() {
        errors.push("Business id is required".to_string());
    }
    if !(-90.0..=90.0).contains(&req.location.latitude)
        || !(-180.0..=180.0).contains(&req.location.longitude)
    {
        errors.push("Location coordinates are out of range".to_string());
    }

    errors
}

pub struct MeetupService {
    store: Arc<dyn DashboardStore>,
}

impl MeetupService {
    pub fn new(store: Arc<dyn DashboardStore>) -> Self {
        Self { store }
    }

    pub async fn create_meetup(&self, req: CreateMeetupRequest) -> Result<Meetup> {
        let errors = validate_meetup(&req);
        if !errors.is_empty() {
            return Err(MeetdashError::validation(errors.join("; ")));
        }

        let now = Utc::now();
        let meetup = Meetup {
            // id 由存储后端分配
            id: String::new(),
            business_id: req.business_id,
            business_name: req.business_name,
            creator_id: req.creator_id,
            title: req.title,
            activity: req.activity,
            location: req.location,
            category: req.category,
            address: req.address,
            description: req.description,
            image_url: req.image_url,
            price: req.price,
            max_attendees: req.max_attendees,
            duration_hours: req.duration_hours,
            tags: req.tags,
            expiration_date: req.expiration_date,
            is_live: req.is_live,
            created_at: now,
            updated_at: now,
            views: 0,
            clicks: 0,
        };

        let meetup = self.store.insert_meetup(meetup).await?;
        info!(
            "Created meetup '{}' for business '{}'",
            meetup.id, meetup.business_id
        );
        Ok(meetup)
    }

    pub async fn get_meetup(&self, id: &str) -> Result<Option<Meetup>> {
        self.store.get_meetup(id).await
    }

    /// 某商家的全部 meetup，created_at 降序
    pub async fn meetups_for_business(&self, business_id: &str) -> Result<Vec<Meetup>> {
        let meetups = self.store.meetups_for_business(business_id).await?;
        debug!(
            "Loaded {} meetups for business '{}'",
            meetups.len(),
            business_id
        );
        Ok(meetups)
    }

    pub async fn update_meetup(&self, id: &str, patch: MeetupPatch) -> Result<()> {
        self.store.update_meetup(id, patch).await?;
        info!("Updated meetup '{}'", id);
        Ok(())
    }

    pub async fn delete_meetup(&self, id: &str) -> Result<()> {
        self.store.delete_meetup(id).await?;
        info!("Deleted meetup '{}'", id);
        Ok(())
    }

    /// 公开的 live meetup 列表：is_live 且未过期，按到期时间升序
    pub async fn live_meetups(&self, limit: Option<usize>) -> Result<Vec<Meetup>> {
        self.store
            .live_meetups(limit.unwrap_or(DEFAULT_LIVE_LIMIT))
            .await
    }

    /// 反规范化 view 计数 +1（best-effort，失败只记录）
    pub async fn record_view_hit(&self, id: &str) {
        if let Err(e) = self.store.increment_meetup_views(id).await {
            warn!("Failed to bump view counter for meetup '{}': {}", id, e);
        }
    }

    /// 反规范化 click 计数 +1（best-effort，失败只记录）
    pub async fn record_click_hit(&self, id: &str) {
        if let Err(e) = self.store.increment_meetup_clicks(id).await {
            warn!("Failed to bump click counter for meetup '{}': {}", id, e);
        }
    }
}
