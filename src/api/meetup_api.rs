//! Meetup endpoints
//!
//! CRUD lives under the dashboard scope; the live listing is public.

use actix_web::{web, Responder};
use serde::Deserialize;

use super::{respond_error, respond_ok};
use crate::services::{CreateMeetupRequest, MeetupService};
use crate::store::MeetupPatch;

#[derive(Debug, Deserialize)]
pub struct LiveQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

pub struct MeetupApi;

impl MeetupApi {
    /// POST /api/meetups
    pub async fn create(
        payload: web::Json<CreateMeetupRequest>,
        meetups: web::Data<MeetupService>,
    ) -> impl Responder {
        match meetups.create_meetup(payload.into_inner()).await {
            Ok(meetup) => respond_ok(meetup),
            Err(e) => respond_error(&e),
        }
    }

    /// GET /api/meetups/{id}
    pub async fn get(path: web::Path<String>, meetups: web::Data<MeetupService>) -> impl Responder {
        let id = path.into_inner();
        match meetups.get_meetup(&id).await {
            Ok(meetup) => respond_ok(meetup),
            Err(e) => respond_error(&e),
        }
    }

    /// GET /api/business/{id}/meetups
    pub async fn list_for_business(
        path: web::Path<String>,
        meetups: web::Data<MeetupService>,
    ) -> impl Responder {
        let business_id = path.into_inner();
        match meetups.meetups_for_business(&business_id).await {
            Ok(list) => respond_ok(list),
            Err(e) => respond_error(&e),
        }
    }

    /// PUT /api/meetups/{id}
    pub async fn update(
        path: web::Path<String>,
        payload: web::Json<MeetupPatch>,
        meetups: web::Data<MeetupService>,
    ) -> impl Responder {
        let id = path.into_inner();
        match meetups.update_meetup(&id, payload.into_inner()).await {
            Ok(()) => respond_ok(serde_json::json!({ "updated": id })),
            Err(e) => respond_error(&e),
        }
    }

    /// DELETE /api/meetups/{id}
    pub async fn delete(
        path: web::Path<String>,
        meetups: web::Data<MeetupService>,
    ) -> impl Responder {
        let id = path.into_inner();
        match meetups.delete_meetup(&id).await {
            Ok(()) => respond_ok(serde_json::json!({ "deleted": id })),
            Err(e) => respond_error(&e),
        }
    }

    /// GET /api/public/meetups/live?limit=N
    pub async fn live(
        query: web::Query<LiveQuery>,
        meetups: web::Data<MeetupService>,
    ) -> impl Responder {
        match meetups.live_meetups(query.limit).await {
            Ok(list) => respond_ok(list),
            Err(e) => respond_error(&e),
        }
    }
}
