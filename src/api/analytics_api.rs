//! Analytics endpoints
//!
//! The two track endpoints are public and always answer 200 with a
//! `TrackOutcome` body, so a broken analytics backend can never break the
//! page that instruments it. The query endpoints live under the dashboard
//! scope.

use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;

use super::respond_ok;
use crate::analytics::{AnalyticsRecorder, EngagementOptions, ViewOptions};
use crate::services::MeetupService;
use crate::store::{EngagementKind, GeoLocation, TrafficSource};

/// 时间维度查询默认取最近 30 天，封顶一年
const DEFAULT_TIMELINE_DAYS: u32 = 30;
const MAX_TIMELINE_DAYS: u32 = 365;

#[derive(Debug, Deserialize)]
pub struct TrackViewRequest {
    pub meetup_id: String,
    pub business_id: String,
    #[serde(default)]
    pub viewer_key: Option<String>,
    #[serde(default)]
    pub duration_secs: Option<u64>,
    #[serde(default)]
    pub source: Option<TrafficSource>,
    #[serde(default)]
    pub referrer: Option<String>,
    #[serde(default)]
    pub location: Option<GeoLocation>,
}

#[derive(Debug, Deserialize)]
pub struct TrackEngagementRequest {
    pub meetup_id: String,
    pub business_id: String,
    pub engagement: EngagementKind,
    #[serde(default)]
    pub viewer_key: Option<String>,
    #[serde(default)]
    pub event_data: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
pub struct TimelineQuery {
    #[serde(default)]
    pub days: Option<u32>,
}

pub struct AnalyticsApi;

impl AnalyticsApi {
    /// POST /api/track/view
    pub async fn track_view(
        req: HttpRequest,
        payload: web::Json<TrackViewRequest>,
        recorder: web::Data<AnalyticsRecorder>,
        meetups: web::Data<MeetupService>,
    ) -> impl Responder {
        let body = payload.into_inner();

        // 设备分类用请求头里的 User-Agent，不信任 body
        let user_agent = req
            .headers()
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let options = ViewOptions {
            viewer_key: body.viewer_key,
            duration_secs: body.duration_secs,
            source: body.source,
            referrer: body.referrer,
            location: body.location,
            user_agent,
        };
        let outcome = recorder
            .track_view(&body.meetup_id, &body.business_id, options)
            .await;

        if outcome.success {
            // meetup 文档上的反规范化计数，与汇总各自独立
            meetups.record_view_hit(&body.meetup_id).await;
        }

        // 埋点永远 200，错误在 body 里
        HttpResponse::Ok().json(outcome)
    }

    /// POST /api/track/engagement
    pub async fn track_engagement(
        payload: web::Json<TrackEngagementRequest>,
        recorder: web::Data<AnalyticsRecorder>,
        meetups: web::Data<MeetupService>,
    ) -> impl Responder {
        let body = payload.into_inner();

        let options = EngagementOptions {
            viewer_key: body.viewer_key,
            event_data: body.event_data,
        };
        let outcome = recorder
            .track_engagement(&body.meetup_id, &body.business_id, body.engagement, options)
            .await;

        if outcome.success && body.engagement == EngagementKind::Click {
            meetups.record_click_hit(&body.meetup_id).await;
        }

        HttpResponse::Ok().json(outcome)
    }

    /// GET /api/analytics/meetup/{id}
    ///
    /// 没有汇总是合法的空状态，data 为 null。
    pub async fn meetup_analytics(
        path: web::Path<String>,
        recorder: web::Data<AnalyticsRecorder>,
    ) -> impl Responder {
        let meetup_id = path.into_inner();
        respond_ok(recorder.get_meetup_analytics(&meetup_id).await)
    }

    /// GET /api/analytics/business/{id}
    pub async fn business_analytics(
        path: web::Path<String>,
        recorder: web::Data<AnalyticsRecorder>,
    ) -> impl Responder {
        let business_id = path.into_inner();
        respond_ok(recorder.get_business_analytics(&business_id).await)
    }

    /// GET /api/analytics/business/{id}/metrics
    pub async fn business_metrics(
        path: web::Path<String>,
        recorder: web::Data<AnalyticsRecorder>,
    ) -> impl Responder {
        let business_id = path.into_inner();
        respond_ok(recorder.get_business_metrics(&business_id).await)
    }

    /// GET /api/analytics/business/{id}/timeline?days=N
    pub async fn business_timeline(
        path: web::Path<String>,
        query: web::Query<TimelineQuery>,
        recorder: web::Data<AnalyticsRecorder>,
    ) -> impl Responder {
        let business_id = path.into_inner();
        let days = query
            .days
            .unwrap_or(DEFAULT_TIMELINE_DAYS)
            .clamp(1, MAX_TIMELINE_DAYS);
        respond_ok(recorder.get_time_based_analytics(&business_id, days).await)
    }
}
