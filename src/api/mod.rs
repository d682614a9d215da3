//! HTTP API surface
//!
//! Public endpoints: view/engagement tracking and the live meetup listing.
//! Everything under the dashboard scope sits behind the bearer-token
//! middleware. All responses share the `{ code, data }` envelope.

mod analytics_api;
mod business_api;
mod health;
mod meetup_api;

pub use analytics_api::AnalyticsApi;
pub use business_api::BusinessApi;
pub use health::{AppStartTime, HealthService};
pub use meetup_api::MeetupApi;

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;

use crate::errors::MeetdashError;

#[derive(Serialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub data: T,
}

/// 200 成功响应
pub(crate) fn respond_ok<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse { code: 0, data })
}

/// 错误响应，按错误类型映射 HTTP 状态码
pub(crate) fn respond_error(err: &MeetdashError) -> HttpResponse {
    let status = match err {
        MeetdashError::Validation(_) => StatusCode::BAD_REQUEST,
        MeetdashError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    HttpResponse::build(status).json(ApiResponse {
        code: status.as_u16() as i32,
        data: serde_json::json!({ "error": err.format_simple() }),
    })
}
