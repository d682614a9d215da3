//! Document models shared by every store backend
//!
//! These mirror the documents kept in the remote document store: an
//! append-only `analytics` collection (view / engagement events plus the
//! derived per-meetup summary), the `meetups` collection and the
//! `business_users` collection.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 流量来源渠道
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrafficSource {
    #[default]
    Direct,
    Search,
    Social,
    Referral,
}

/// 设备分类（从 User-Agent 推断）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Mobile,
    Tablet,
    #[default]
    Desktop,
}

/// 互动事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngagementKind {
    Click,
    Share,
    Bookmark,
    Inquiry,
    Registration,
}

impl EngagementKind {
    /// 对应汇总文档里的复数计数器字段名
    pub fn counter_name(&self) -> &'static str {
        match self {
            EngagementKind::Click => "clicks",
            EngagementKind::Share => "shares",
            EngagementKind::Bookmark => "bookmarks",
            EngagementKind::Inquiry => "inquiries",
            EngagementKind::Registration => "registrations",
        }
    }
}

/// 事件记录类型（summary 单独建模，不属于日志记录）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    View,
    Engagement,
}

/// 观看者地理位置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub city: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

/// topLocations 里的一项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationCount {
    pub city: String,
    pub country: String,
    pub count: u64,
}

/// 不可变的分析事件记录（只增不改）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    /// 由存储后端分配
    pub id: String,
    pub kind: EventKind,
    pub meetup_id: String,
    pub business_id: String,
    /// 写入时由存储后端分配
    pub timestamp: DateTime<Utc>,
    pub viewer_key: String,

    // ===== view 专属字段 =====
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_unique: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_duration_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<TrafficSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_class: Option<DeviceClass>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoLocation>,

    // ===== engagement 专属字段 =====
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engagement: Option<EngagementKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_data: Option<serde_json::Map<String, serde_json::Value>>,
}

/// 每个 meetup 一份的派生汇总文档（可变）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub meetup_id: String,
    pub business_id: String,

    pub total_impressions: u64,
    pub unique_viewers: u64,
    pub avg_view_duration_secs: f64,

    pub clicks: u64,
    pub shares: u64,
    pub bookmarks: u64,
    pub inquiries: u64,
    pub registrations: u64,
    pub attendees: u64,
    pub revenue: f64,
    pub conversion_rate: f64,

    pub direct_traffic: u64,
    pub search_traffic: u64,
    pub social_traffic: u64,
    pub referral_traffic: u64,

    /// 最多保留 10 条，按 count 降序
    pub top_locations: Vec<LocationCount>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_viewed: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 对汇总文档的一次更新：计数器用原子自增，其余字段整体覆写
///
/// 拆成两类是因为远端文档库只对数值字段提供原子自增，
/// avg 与 topLocations 只能读-改-写。
#[derive(Debug, Clone, Default)]
pub struct SummaryUpdate {
    // ===== 原子自增 =====
    pub total_impressions: u64,
    pub unique_viewers: u64,
    pub clicks: u64,
    pub shares: u64,
    pub bookmarks: u64,
    pub inquiries: u64,
    pub registrations: u64,
    pub direct_traffic: u64,
    pub search_traffic: u64,
    pub social_traffic: u64,
    pub referral_traffic: u64,

    // ===== 整体覆写 =====
    pub avg_view_duration_secs: Option<f64>,
    pub top_locations: Option<Vec<LocationCount>>,
    /// 是否同时刷新 last_viewed（updated_at 总是刷新）
    pub touch_last_viewed: bool,
}

/// 商家分类（用于地图标记图标）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetupCategory {
    Restaurant,
    Fitness,
    Bar,
    Cafe,
    Entertainment,
    Retail,
    Service,
    Health,
    Education,
    Other,
}

/// 地理坐标
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// 商家创建的活动/聚会
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meetup {
    /// 由存储后端分配
    pub id: String,
    pub business_id: String,
    pub business_name: String,
    pub creator_id: String,
    pub title: String,
    pub activity: String,
    pub location: GeoPoint,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<MeetupCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attendees: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    pub expiration_date: DateTime<Utc>,
    pub is_live: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// 反规范化计数器，dashboard 列表页直接读
    pub views: u64,
    pub clicks: u64,
}

/// meetup 更新补丁（None 字段保持不变）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeetupPatch {
    pub title: Option<String>,
    pub activity: Option<String>,
    pub location: Option<GeoPoint>,
    pub category: Option<MeetupCategory>,
    pub address: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<f64>,
    pub max_attendees: Option<u32>,
    pub duration_hours: Option<f64>,
    pub tags: Option<Vec<String>>,
    pub expiration_date: Option<DateTime<Utc>>,
    pub is_live: Option<bool>,
}

/// 登录方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    #[default]
    Email,
    Google,
    Phone,
}

/// 营业时间（每天一条）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayHours {
    pub open: String,
    pub close: String,
}

/// 商家偏好设置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessSettings {
    pub timezone: String,
    pub business_hours: HashMap<String, DayHours>,
    pub auto_approve_events: bool,
    pub allow_public_events: bool,
}

/// 商家用户档案
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessUser {
    pub user_id: String,
    pub email: String,
    pub business_name: String,
    pub contact_email: String,
    pub bio: String,
    pub photo_url: String,
    pub address: String,
    pub location: GeoPoint,
    pub auth_provider: AuthProvider,

    pub notification_promotion_updates: bool,
    pub notification_customer_interactions: bool,
    pub notification_marketing_updates: bool,
    pub notification_account_alerts: bool,

    pub settings: BusinessSettings,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 商家档案更新补丁
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BusinessUserPatch {
    pub business_name: Option<String>,
    pub contact_email: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub address: Option<String>,
    pub location: Option<GeoPoint>,
    pub notification_promotion_updates: Option<bool>,
    pub notification_customer_interactions: Option<bool>,
    pub notification_marketing_updates: Option<bool>,
    pub notification_account_alerts: Option<bool>,
    pub settings: Option<BusinessSettings>,
}
