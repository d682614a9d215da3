use std::sync::Arc;

use actix_web::{middleware::from_fn, web, App, HttpServer};
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use meetdash::analytics::AnalyticsRecorder;
use meetdash::api::{AnalyticsApi, AppStartTime, BusinessApi, HealthService, MeetupApi};
use meetdash::config;
use meetdash::middleware::AuthMiddleware;
use meetdash::services::{BusinessService, MeetupService};
use meetdash::store::StoreFactory;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 记录程序启动时间
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = config::init_config();

    // 检查存储后端
    let store = match StoreFactory::create().await {
        Ok(store) => store,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            return Err(std::io::Error::other(e.to_string()));
        }
    };
    info!("Using store backend: {}", store.get_backend_name().await);

    // 检查 Dashboard API 是否启用
    if cfg.dashboard_token.is_empty() {
        info!("Dashboard API is disabled (DASHBOARD_TOKEN not set)");
    } else {
        info!("Dashboard API available at: /api/dashboard");
    }

    let recorder = web::Data::new(AnalyticsRecorder::new(Arc::clone(&store)));
    let meetups = web::Data::new(MeetupService::new(Arc::clone(&store)));
    let business = web::Data::new(BusinessService::new(Arc::clone(&store)));

    let bind_address = format!("{}:{}", cfg.server_host, cfg.server_port);
    info!("Starting server at http://{}", bind_address);

    let cors_origin = cfg.cors_origin.clone();

    // Start the HTTP server
    HttpServer::new(move || {
        let cors = match &cors_origin {
            Some(origin) => actix_cors::Cors::default()
                .allowed_origin(origin)
                .allow_any_method()
                .allow_any_header()
                .max_age(3600),
            None => actix_cors::Cors::permissive(),
        };

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .app_data(recorder.clone())
            .app_data(meetups.clone())
            .app_data(business.clone())
            .service(
                web::scope("/api/track")
                    .route("/view", web::post().to(AnalyticsApi::track_view))
                    .route("/engagement", web::post().to(AnalyticsApi::track_engagement)),
            )
            .service(
                web::scope("/api/public")
                    .route("/meetups/live", web::get().to(MeetupApi::live)),
            )
            .service(
                web::scope("/api/dashboard")
                    .wrap(from_fn(AuthMiddleware::dashboard_auth))
                    .route(
                        "/analytics/meetup/{id}",
                        web::get().to(AnalyticsApi::meetup_analytics),
                    )
                    .route(
                        "/analytics/business/{id}",
                        web::get().to(AnalyticsApi::business_analytics),
                    )
                    .route(
                        "/analytics/business/{id}/metrics",
                        web::get().to(AnalyticsApi::business_metrics),
                    )
                    .route(
                        "/analytics/business/{id}/timeline",
                        web::get().to(AnalyticsApi::business_timeline),
                    )
                    .route("/meetups", web::post().to(MeetupApi::create))
                    .route("/meetups/{id}", web::get().to(MeetupApi::get))
                    .route("/meetups/{id}", web::put().to(MeetupApi::update))
                    .route("/meetups/{id}", web::delete().to(MeetupApi::delete))
                    .route(
                        "/business/{id}/meetups",
                        web::get().to(MeetupApi::list_for_business),
                    )
                    .route("/business", web::post().to(BusinessApi::create))
                    .route("/business/{id}", web::get().to(BusinessApi::get))
                    .route("/business/{id}", web::put().to(BusinessApi::update)),
            )
            .service(
                web::scope("/health")
                    .route("", web::get().to(HealthService::health_check))
                    .route("/ready", web::get().to(HealthService::readiness_check)),
            )
    })
    .bind(bind_address)?
    .run()
    .await
}
