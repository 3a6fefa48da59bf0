use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
};
use common::pagination::Pagination;
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use service::auth::domain::{LoginInput, RegisterManagerInput};
use service::auth::errors::AuthError;
use service::{booking, dashboard, profile};

use crate::errors::JsonApiError;
use crate::routes::auth::{session_cookie, ManagerAuth, MessageResponse, ServerState};

#[derive(Debug, Deserialize)]
pub struct RegisterManagerPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub department: Option<String>,
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}

pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterManagerPayload>,
) -> Result<(StatusCode, Json<MessageResponse>), JsonApiError> {
    let (Some(name), Some(email), Some(password), Some(department)) =
        (payload.name, payload.email, payload.password, payload.department)
    else {
        return Err(JsonApiError::bad_request("Please provide all required fields"));
    };
    models::customer::validate_email(&email).map_err(|e| JsonApiError::bad_request(e.to_string()))?;
    models::manager::validate_department(&department)
        .map_err(|e| JsonApiError::bad_request(e.to_string()))?;

    let svc = state.auth_service();
    svc.register_manager(RegisterManagerInput {
        name,
        email,
        password,
        department,
        permissions: payload.permissions,
    })
    .await
    .map_err(|e| match e {
        AuthError::Conflict => JsonApiError::bad_request("Manager already exists"),
        AuthError::Validation(msg) => JsonApiError::bad_request(msg),
        other => JsonApiError::internal(other.to_string()),
    })?;

    Ok((StatusCode::CREATED, Json(MessageResponse { msg: "Manager registered successfully".into() })))
}

#[derive(Serialize)]
pub struct ManagerLoginResponse {
    pub token: String,
    pub manager: models::manager::Model,
}

#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[utoipa::path(post, path = "/api/manager/login", tag = "manager", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In"), (status = 400, description = "Invalid credentials")))]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    Json(payload): Json<LoginPayload>,
) -> Result<(CookieJar, Json<ManagerLoginResponse>), JsonApiError> {
    let (Some(email), Some(password)) = (payload.email, payload.password) else {
        return Err(JsonApiError::bad_request("Please provide both email and password"));
    };

    let svc = state.auth_service();
    let session = svc.login_manager(LoginInput { email, password }).await.map_err(|e| match e {
        AuthError::Unauthorized => JsonApiError::bad_request("Invalid credentials"),
        AuthError::Deactivated => {
            JsonApiError::bad_request("Account is deactivated. Please contact administrator.")
        }
        other => JsonApiError::internal(other.to_string()),
    })?;

    let token = session
        .token
        .ok_or_else(|| JsonApiError::internal("token generation failed".into()))?;
    let manager = profile::get_manager(&state.db, session.manager.id)
        .await
        .map_err(JsonApiError::from)?
        .ok_or_else(|| JsonApiError::internal("account vanished after login".into()))?;

    let jar = jar.add(session_cookie(&token));
    Ok((jar, Json(ManagerLoginResponse { token, manager })))
}

pub async fn get_profile(ManagerAuth(manager): ManagerAuth) -> Json<models::manager::Model> {
    Json(manager)
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfilePayload {
    pub name: Option<String>,
    pub email: Option<String>,
}

pub async fn update_profile(
    State(state): State<ServerState>,
    ManagerAuth(manager): ManagerAuth,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<Json<models::manager::Model>, JsonApiError> {
    let updated = profile::update_manager_profile(
        &state.db,
        manager.id,
        payload.name.as_deref(),
        payload.email.as_deref(),
    )
    .await?;
    Ok(Json(updated))
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordPayload {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

pub async fn change_password(
    State(state): State<ServerState>,
    ManagerAuth(manager): ManagerAuth,
    Json(payload): Json<ChangePasswordPayload>,
) -> Result<Json<MessageResponse>, JsonApiError> {
    let (Some(current), Some(new)) = (payload.current_password, payload.new_password) else {
        return Err(JsonApiError::bad_request("Please provide both current and new password"));
    };
    let svc = state.auth_service();
    svc.change_password(manager.id, &current, &new).await.map_err(|e| match e {
        AuthError::Validation(msg) => JsonApiError::bad_request(msg),
        AuthError::Unauthorized => JsonApiError::bad_request("Invalid credentials"),
        other => JsonApiError::internal(other.to_string()),
    })?;
    Ok(Json(MessageResponse { msg: "Password changed successfully".into() }))
}

#[utoipa::path(get, path = "/api/manager/dashboard-stats", tag = "manager", responses((status = 200, description = "Dashboard statistics"), (status = 401, description = "Unauthorized")))]
pub async fn dashboard_stats(
    State(state): State<ServerState>,
    ManagerAuth(_manager): ManagerAuth,
) -> Result<Json<dashboard::DashboardStats>, JsonApiError> {
    let stats = dashboard::dashboard_stats(&state.db).await?;
    Ok(Json(stats))
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

pub async fn all_bookings(
    State(state): State<ServerState>,
    ManagerAuth(_manager): ManagerAuth,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<dashboard::ManagerBookingRow>>, JsonApiError> {
    // without a page param the dashboard gets the full history
    let rows = match params.page {
        Some(page) => {
            let opts = Pagination { page, per_page: params.per_page.unwrap_or(20) };
            dashboard::list_bookings_with_customers_paginated(&state.db, opts).await?
        }
        None => dashboard::list_bookings_with_customers(&state.db).await?,
    };
    Ok(Json(rows))
}

pub async fn all_customers(
    State(state): State<ServerState>,
    ManagerAuth(_manager): ManagerAuth,
) -> Result<Json<Vec<dashboard::CustomerWithStats>>, JsonApiError> {
    let rows = dashboard::list_customers_with_stats(&state.db).await?;
    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
pub struct BookingStatusPayload {
    pub booking_id: Option<Uuid>,
    pub new_status: Option<String>,
}

#[derive(Serialize)]
pub struct BookingStatusResponse {
    pub msg: String,
    pub booking: models::booking::Model,
}

/// Body-based variant used by the dashboard: `{booking_id, new_status}`.
pub async fn update_booking_status(
    State(state): State<ServerState>,
    ManagerAuth(manager): ManagerAuth,
    Json(payload): Json<BookingStatusPayload>,
) -> Result<Json<BookingStatusResponse>, JsonApiError> {
    let (Some(booking_id), Some(new_status)) = (payload.booking_id, payload.new_status) else {
        return Err(JsonApiError::bad_request("Missing booking_id or new_status"));
    };
    let updated =
        booking::update_status(&state.db, booking_id, &new_status, manager.id, &manager.department)
            .await?;
    Ok(Json(BookingStatusResponse { msg: "Booking status updated".into(), booking: updated }))
}
