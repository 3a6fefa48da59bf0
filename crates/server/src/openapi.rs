use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(utoipa::ToSchema)]
pub struct RegisterRequest { pub name: String, pub email: String, pub password: String }

#[derive(utoipa::ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(utoipa::ToSchema)]
pub struct CreateBookingRequest {
    pub service_id: Uuid,
    pub option_ids: Vec<Uuid>,
    /// YYYY-MM-DD
    pub date: String,
    /// HH:MM
    pub time: String,
    pub notes: Option<String>,
    pub total_price: Option<i64>,
    pub order_id: Option<String>,
}

#[derive(utoipa::ToSchema)]
pub struct ServiceOptionDoc {
    pub name: String,
    pub description: Option<String>,
    pub additional_price: i64,
    pub additional_duration_minutes: i32,
}

#[derive(utoipa::ToSchema)]
pub struct CreateServiceRequest {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: i64,
    pub duration_minutes: i32,
    pub image: Option<String>,
    pub web_ar_url: Option<String>,
    pub available_days: Option<Vec<String>>,
    pub options: Vec<ServiceOptionDoc>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::manager::login,
        crate::routes::manager::dashboard_stats,
        crate::routes::bookings::create,
        crate::routes::bookings::available_slots,
        crate::routes::bookings::cancel,
        crate::routes::services::list,
        crate::routes::services::get,
        crate::routes::services::create,
        crate::routes::services::update,
        crate::routes::services::delete,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            CreateBookingRequest,
            ServiceOptionDoc,
            CreateServiceRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "manager"),
        (name = "bookings"),
        (name = "services")
    )
)]
pub struct ApiDoc;
