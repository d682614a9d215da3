//! Store abstraction over the remote document database
//!
//! The dashboard only relies on a small capability surface: insert with
//! server-assigned id/timestamp, filtered + ordered queries, and per-document
//! updates with atomic numeric increments. `DashboardStore` expresses that
//! surface as domain operations so backends stay swappable.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::{MeetdashError, Result};

pub mod file;
pub mod memory;
pub mod models;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use models::{
    AnalyticsEvent, AnalyticsSummary, AuthProvider, BusinessSettings, BusinessUser,
    BusinessUserPatch, DayHours, DeviceClass, EngagementKind, EventKind, GeoLocation, GeoPoint,
    LocationCount, Meetup, MeetupCategory, MeetupPatch, SummaryUpdate, TrafficSource,
};

#[async_trait]
pub trait DashboardStore: Send + Sync {
    // ===== 分析事件 =====

    /// 追加一条不可变事件记录，id 与 timestamp 由后端分配
    async fn insert_event(&self, event: AnalyticsEvent) -> Result<AnalyticsEvent>;

    /// 指定 meetup + viewer 在 since 之后是否已有 view 记录
    async fn has_recent_view(
        &self,
        meetup_id: &str,
        viewer_key: &str,
        since: DateTime<Utc>,
    ) -> Result<bool>;

    /// 查询某个商家 since 之后的全部 view 事件（timestamp 降序）
    async fn views_for_business_since(
        &self,
        business_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<AnalyticsEvent>>;

    // ===== 汇总文档 =====

    async fn find_summary(&self, meetup_id: &str) -> Result<Option<AnalyticsSummary>>;

    async fn insert_summary(&self, summary: AnalyticsSummary) -> Result<()>;

    /// 应用一次汇总更新：计数器原子自增，整体字段覆写，刷新 updated_at
    async fn update_summary(&self, meetup_id: &str, update: SummaryUpdate) -> Result<()>;

    /// 某个商家的全部汇总文档（updated_at 降序）
    async fn summaries_for_business(&self, business_id: &str) -> Result<Vec<AnalyticsSummary>>;

    // ===== meetup =====

    async fn insert_meetup(&self, meetup: Meetup) -> Result<Meetup>;

    async fn get_meetup(&self, id: &str) -> Result<Option<Meetup>>;

    /// 某个商家的全部 meetup（created_at 降序）
    async fn meetups_for_business(&self, business_id: &str) -> Result<Vec<Meetup>>;

    async fn update_meetup(&self, id: &str, patch: MeetupPatch) -> Result<()>;

    async fn delete_meetup(&self, id: &str) -> Result<()>;

    /// 公开展示的 meetup：is_live 且未过期，expiration_date 升序
    async fn live_meetups(&self, limit: usize) -> Result<Vec<Meetup>>;

    async fn increment_meetup_views(&self, id: &str) -> Result<()>;

    async fn increment_meetup_clicks(&self, id: &str) -> Result<()>;

    // ===== 商家用户 =====

    async fn insert_business_user(&self, user: BusinessUser) -> Result<()>;

    async fn get_business_user(&self, user_id: &str) -> Result<Option<BusinessUser>>;

    async fn update_business_user(&self, user_id: &str, patch: BusinessUserPatch) -> Result<()>;

    async fn get_backend_name(&self) -> String;
}

pub struct StoreFactory;

impl StoreFactory {
    pub async fn create() -> Result<Arc<dyn DashboardStore>> {
        let config = crate::config::get_config();

        let boxed: Box<dyn DashboardStore> = match config.store_backend.as_str() {
            "memory" => Box::new(memory::MemoryStore::new()),
            "file" => Box::new(file::FileStore::new(&config.data_file)?),
            other => {
                return Err(MeetdashError::store_backend_not_found(format!(
                    "Unknown store backend: '{}'. Supported backends: memory, file",
                    other
                )));
            }
        };

        Ok(Arc::from(boxed))
    }
}
