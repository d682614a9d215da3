//! JSON-file store backend
//!
//! Thin persistence layer over [`MemoryStore`]: the whole dataset is loaded
//! into memory at startup and the full snapshot is rewritten after every
//! mutation. Fine for a single-instance small-business dashboard, not meant
//! for anything bigger.

use std::fs;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{error, info};

use super::memory::{MemoryStore, StoreSnapshot};
use super::models::*;
use super::DashboardStore;
use crate::errors::{MeetdashError, Result};

pub struct FileStore {
    file_path: String,
    inner: MemoryStore,
}

impl FileStore {
    pub fn new(file_path: &str) -> Result<Self> {
        let store = FileStore {
            file_path: file_path.to_string(),
            inner: MemoryStore::new(),
        };

        let snapshot = store.load_from_file()?;
        let loaded = snapshot.meetups.len() + snapshot.events.len() + snapshot.summaries.len();
        store.inner.import(snapshot);
        info!(
            "FileStore initialized from '{}' ({} documents)",
            store.file_path, loaded
        );

        Ok(store)
    }

    fn load_from_file(&self) -> Result<StoreSnapshot> {
        match fs::read_to_string(&self.file_path) {
            Ok(content) => serde_json::from_str::<StoreSnapshot>(&content).map_err(|e| {
                error!("Failed to parse store file '{}': {}", self.file_path, e);
                MeetdashError::serialization(format!(
                    "Failed to parse store file '{}': {}",
                    self.file_path, e
                ))
            }),
            Err(_) => {
                // 文件不存在时创建空存储
                let empty = StoreSnapshot::default();
                let json = serde_json::to_string(&empty)?;
                fs::write(&self.file_path, json).map_err(|e| {
                    MeetdashError::file_operation(format!(
                        "Failed to create store file '{}': {}",
                        self.file_path, e
                    ))
                })?;
                info!("Created empty store file: {}", self.file_path);
                Ok(empty)
            }
        }
    }

    fn persist(&self) -> Result<()> {
        let snapshot = self.inner.export();
        let json = serde_json::to_string_pretty(&snapshot)?;
        fs::write(&self.file_path, json)?;
        Ok(())
    }
}

#[async_trait]
impl DashboardStore for FileStore {
    async fn insert_event(&self, event: AnalyticsEvent) -> Result<AnalyticsEvent> {
        let event = self.inner.insert_event(event).await?;
        self.persist()?;
        Ok(event)
    }

    async fn has_recent_view(
        &self,
        meetup_id: &str,
        viewer_key: &str,
        since: DateTime<Utc>,
    ) -> Result<bool> {
        self.inner.has_recent_view(meetup_id, viewer_key, since).await
    }

    async fn views_for_business_since(
        &self,
        business_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<AnalyticsEvent>> {
        self.inner.views_for_business_since(business_id, since).await
    }

    async fn find_summary(&self, meetup_id: &str) -> Result<Option<AnalyticsSummary>> {
        self.inner.find_summary(meetup_id).await
    }

    async fn insert_summary(&self, summary: AnalyticsSummary) -> Result<()> {
        self.inner.insert_summary(summary).await?;
        self.persist()
    }

    async fn update_summary(&self, meetup_id: &str, update: SummaryUpdate) -> Result<()> {
        self.inner.update_summary(meetup_id, update).await?;
        self.persist()
    }

    async fn summaries_for_business(&self, business_id: &str) -> Result<Vec<AnalyticsSummary>> {
        self.inner.summaries_for_business(business_id).await
    }

    async fn insert_meetup(&self, meetup: Meetup) -> Result<Meetup> {
        let meetup = self.inner.insert_meetup(meetup).await?;
        self.persist()?;
        Ok(meetup)
    }

    async fn get_meetup(&self, id: &str) -> Result<Option<Meetup>> {
        self.inner.get_meetup(id).await
    }

    async fn meetups_for_business(&self, business_id: &str) -> Result<Vec<Meetup>> {
        self.inner.meetups_for_business(business_id).await
    }

    async fn update_meetup(&self, id: &str, patch: MeetupPatch) -> Result<()> {
        self.inner.update_meetup(id, patch).await?;
        self.persist()
    }

    async fn delete_meetup(&self, id: &str) -> Result<()> {
        self.inner.delete_meetup(id).await?;
        self.persist()
    }

    async fn live_meetups(&self, limit: usize) -> Result<Vec<Meetup>> {
        self.inner.live_meetups(limit).await
    }

    async fn increment_meetup_views(&self, id: &str) -> Result<()> {
        self.inner.increment_meetup_views(id).await?;
        self.persist()
    }

    async fn increment_meetup_clicks(&self, id: &str) -> Result<()> {
        self.inner.increment_meetup_clicks(id).await?;
        self.persist()
    }

    async fn insert_business_user(&self, user: BusinessUser) -> Result<()> {
        self.inner.insert_business_user(user).await?;
        self.persist()
    }

    async fn get_business_user(&self, user_id: &str) -> Result<Option<BusinessUser>> {
        self.inner.get_business_user(user_id).await
    }

    async fn update_business_user(&self, user_id: &str, patch: BusinessUserPatch) -> Result<()> {
        self.inner.update_business_user(user_id, patch).await?;
        self.persist()
    }

    async fn get_backend_name(&self) -> String {
        "file".to_string()
    }
}
