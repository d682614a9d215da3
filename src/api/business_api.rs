//! Business profile endpoints

use actix_web::{web, Responder};

use super::{respond_error, respond_ok};
use crate::services::{BusinessService, CreateBusinessUserRequest};
use crate::store::BusinessUserPatch;

pub struct BusinessApi;

impl BusinessApi {
    /// POST /api/business
    pub async fn create(
        payload: web::Json<CreateBusinessUserRequest>,
        business: web::Data<BusinessService>,
    ) -> impl Responder {
        match business.create_business_user(payload.into_inner()).await {
            Ok(user) => respond_ok(user),
            Err(e) => respond_error(&e),
        }
    }

    /// GET /api/business/{id}
    pub async fn get(
        path: web::Path<String>,
        business: web::Data<BusinessService>,
    ) -> impl Responder {
        let user_id = path.into_inner();
        match business.get_business_user(&user_id).await {
            Ok(user) => respond_ok(user),
            Err(e) => respond_error(&e),
        }
    }

    /// PUT /api/business/{id}
    pub async fn update(
        path: web::Path<String>,
        payload: web::Json<BusinessUserPatch>,
        business: web::Data<BusinessService>,
    ) -> impl Responder {
        let user_id = path.into_inner();
        match business
            .update_business_user(&user_id, payload.into_inner())
            .await
        {
            Ok(()) => respond_ok(serde_json::json!({ "updated": user_id })),
            Err(e) => respond_error(&e),
        }
    }
}
