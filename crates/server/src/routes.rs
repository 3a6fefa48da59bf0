use axum::{
    extract::{DefaultBodyLimit, Request},
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
    Json, Router,
};
use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, IntCounterVec, TextEncoder};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::errors::JsonApiError;

pub mod auth;
pub mod bookings;
pub mod manager;
pub mod services;

static HTTP_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "http_requests_total",
        "HTTP requests processed, by method and status",
        &["method", "status"]
    )
    .expect("register http_requests_total")
});

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service healthy")))]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

pub async fn metrics() -> Result<String, JsonApiError> {
    let encoder = TextEncoder::new();
    encoder
        .encode_to_string(&prometheus::gather())
        .map_err(|e| JsonApiError::internal(e.to_string()))
}

async fn track_metrics(req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let resp = next.run(req).await;
    HTTP_REQUESTS
        .with_label_values(&[&method, resp.status().as_str()])
        .inc();
    resp
}

async fn not_found() -> JsonApiError {
    JsonApiError::not_found("Route not found")
}

/// Build the full application router: public catalog and slot routes,
/// customer and manager APIs, uploads, docs, and observability endpoints.
pub fn build_router(cors: CorsLayer, state: auth::ServerState) -> Router {
    let uploads_dir = state.uploads.dir.clone();
    let max_body = state.uploads.max_bytes;

    let auth_api = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password", post(auth::reset_password))
        .route("/profile", get(auth::get_profile).put(auth::update_profile))
        .route("/change-password", put(auth::change_password))
        .route("/profile-image", post(auth::upload_profile_image));

    let services_api = Router::new()
        .route("/", get(services::list).post(services::create))
        .route("/upload", post(services::upload_image))
        .route(
            "/:id",
            get(services::get).put(services::update).delete(services::delete),
        );

    let bookings_api = Router::new()
        .route("/", post(bookings::create))
        .route("/customer", get(bookings::customer_bookings))
        .route("/all", get(bookings::all_bookings))
        .route("/available-slots", get(bookings::available_slots))
        .route("/:id", get(bookings::get_by_id))
        .route("/:id/status", put(bookings::update_status))
        .route("/:id/cancel", put(bookings::cancel))
        .route("/:id/notes", put(bookings::update_notes));

    let manager_api = Router::new()
        .route("/register", post(manager::register))
        .route("/login", post(manager::login))
        .route("/profile", get(manager::get_profile).put(manager::update_profile))
        .route("/change-password", put(manager::change_password))
        .route("/dashboard-stats", get(manager::dashboard_stats))
        .route("/bookings", get(manager::all_bookings))
        .route("/customers", get(manager::all_customers))
        .route("/booking-status", put(manager::update_booking_status));

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .nest("/api/auth", auth_api)
        .nest("/api/services", services_api)
        .nest("/api/bookings", bookings_api)
        .nest("/api/manager", manager_api)
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", crate::openapi::ApiDoc::openapi()))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(max_body))
        .with_state(state)
        .layer(cors)
        .layer(middleware::from_fn(track_metrics))
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // 响应返回时打点，包含状态码与耗时
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
