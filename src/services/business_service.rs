//! Business profile service layer
//!
//! Profile creation goes through an allow-list shaped request type, so stray
//! fields from the client can never land in the store, and new profiles get
//! the default business settings.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::errors::{MeetdashError, Result};
use crate::store::{
    AuthProvider, BusinessSettings, BusinessUser, BusinessUserPatch, DashboardStore, DayHours,
    GeoPoint,
};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBusinessUserRequest {
    pub user_id: String,
    pub email: String,
    pub business_name: String,
    pub location: GeoPoint,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub auth_provider: AuthProvider,
}

/// 新商家的默认偏好设置（工作日 9-17，周六 10-16，周日歇业）
pub fn default_business_settings() -> BusinessSettings {
    let mut business_hours = HashMap::new();
    for day in ["monday", "tuesday", "wednesday", "thursday", "friday"] {
        business_hours.insert(
            day.to_string(),
            DayHours {
                open: "09:00".to_string(),
                close: "17:00".to_string(),
            },
        );
    }
    business_hours.insert(
        "saturday".to_string(),
        DayHours {
            open: "10:00".to_string(),
            close: "16:00".to_string(),
        },
    );
    business_hours.insert(
        "sunday".to_string(),
        DayHours {
            open: "closed".to_string(),
            close: "closed".to_string(),
        },
    );

    BusinessSettings {
        timezone: "America/Los_Angeles".to_string(),
        business_hours,
        auto_approve_events: true,
        allow_public_events: true,
    }
}

pub struct BusinessService {
    store: Arc<dyn DashboardStore>,
}

impl BusinessService {
    pub fn new(store: Arc<dyn DashboardStore>) -> Self {
        Self { store }
    }

    pub async fn create_business_user(
        &self,
        req: CreateBusinessUserRequest,
    ) -> Result<BusinessUser> {
        if req.user_id.trim().is_empty()
            || req.email.trim().is_empty()
            || req.business_name.trim().is_empty()
        {
            return Err(MeetdashError::validation(
                "user_id, email and business_name are required",
            ));
        }

        let now = Utc::now();
        let user = BusinessUser {
            user_id: req.user_id,
            contact_email: req.contact_email.unwrap_or_else(|| req.email.clone()),
            email: req.email,
            business_name: req.business_name,
            bio: req.bio.unwrap_or_default(),
            photo_url: req.photo_url.unwrap_or_default(),
            address: req.address.unwrap_or_default(),
            location: req.location,
            auth_provider: req.auth_provider,
            notification_promotion_updates: true,
            notification_customer_interactions: true,
            notification_marketing_updates: true,
            notification_account_alerts: true,
            settings: default_business_settings(),
            created_at: now,
            updated_at: now,
        };

        self.store.insert_business_user(user.clone()).await?;
        info!("Created business profile for user '{}'", user.user_id);
        Ok(user)
    }

    pub async fn get_business_user(&self, user_id: &str) -> Result<Option<BusinessUser>> {
        self.store.get_business_user(user_id).await
    }

    pub async fn update_business_user(
        &self,
        user_id: &str,
        patch: BusinessUserPatch,
    ) -> Result<()> {
        self.store.update_business_user(user_id, patch).await?;
        info!("Updated business profile for user '{}'", user_id);
        Ok(())
    }
}
