use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use service::booking::{self, BookingDetail, BookingWithService, CreateBookingInput, SlotAvailability};

use crate::errors::JsonApiError;
use crate::routes::auth::{AuthClaims, CustomerAuth, ManagerAuth, ServerState};

#[derive(Serialize)]
pub struct CreateBookingResponse {
    pub msg: String,
    pub booking: BookingWithService,
    pub progress: models::booking_progress::Model,
}

#[utoipa::path(post, path = "/api/bookings", tag = "bookings", request_body = crate::openapi::CreateBookingRequest, responses((status = 201, description = "Booking created"), (status = 404, description = "Service not found")))]
pub async fn create(
    State(state): State<ServerState>,
    CustomerAuth(customer): CustomerAuth,
    Json(input): Json<CreateBookingInput>,
) -> Result<(StatusCode, Json<CreateBookingResponse>), JsonApiError> {
    let (created, progress) = booking::create_booking(&state.db, customer.id, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateBookingResponse {
            msg: "Booking created successfully".into(),
            booking: created,
            progress,
        }),
    ))
}

pub async fn customer_bookings(
    State(state): State<ServerState>,
    CustomerAuth(customer): CustomerAuth,
) -> Result<Json<Vec<BookingWithService>>, JsonApiError> {
    let rows = booking::list_customer_bookings(&state.db, customer.id).await?;
    Ok(Json(rows))
}

/// Manager-only full listing, kept under /api/bookings for the dashboard.
pub async fn all_bookings(
    State(state): State<ServerState>,
    ManagerAuth(_manager): ManagerAuth,
) -> Result<Json<Vec<BookingWithService>>, JsonApiError> {
    let rows = booking::list_all_bookings(&state.db).await?;
    Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
pub struct SlotQuery {
    pub service_id: Uuid,
    pub date: NaiveDate,
}

#[utoipa::path(get, path = "/api/bookings/available-slots", tag = "bookings", params(("service_id" = Uuid, Query,), ("date" = String, Query, description = "YYYY-MM-DD")), responses((status = 200, description = "Open slots"), (status = 404, description = "Service not found")))]
pub async fn available_slots(
    State(state): State<ServerState>,
    Query(query): Query<SlotQuery>,
) -> Result<Json<SlotAvailability>, JsonApiError> {
    let slots = booking::available_slots(&state.db, query.service_id, query.date).await?;
    Ok(Json(slots))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    claims: AuthClaims,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingDetail>, JsonApiError> {
    let detail = booking::get_booking(&state.db, id, claims.actor()).await?;
    Ok(Json(detail))
}

#[derive(Debug, Deserialize)]
pub struct StatusPayload {
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub msg: String,
    pub previous_status: String,
    pub new_status: String,
    pub booking: models::booking::Model,
}

/// Path-based status update used by the booking detail page.
pub async fn update_status(
    State(state): State<ServerState>,
    ManagerAuth(manager): ManagerAuth,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusPayload>,
) -> Result<Json<StatusResponse>, JsonApiError> {
    let Some(status) = payload.status else {
        return Err(JsonApiError::bad_request("Missing status"));
    };
    let previous = booking::get_booking(
        &state.db,
        id,
        service::booking::Actor { id: manager.id, is_manager: true },
    )
    .await?
    .booking
    .booking
    .status;
    let updated =
        booking::update_status(&state.db, id, &status, manager.id, &manager.department).await?;
    Ok(Json(StatusResponse {
        msg: "Booking status updated".into(),
        previous_status: previous,
        new_status: updated.status.clone(),
        booking: updated,
    }))
}

#[derive(Serialize)]
pub struct CancelResponse {
    pub msg: String,
    pub booking: models::booking::Model,
}

#[utoipa::path(put, path = "/api/bookings/{id}/cancel", tag = "bookings", params(("id" = Uuid, Path,)), responses((status = 200, description = "Canceled"), (status = 400, description = "Cannot cancel a completed booking"), (status = 403, description = "Not authorized")))]
pub async fn cancel(
    State(state): State<ServerState>,
    claims: AuthClaims,
    Path(id): Path<Uuid>,
) -> Result<Json<CancelResponse>, JsonApiError> {
    let updated = booking::cancel_booking(&state.db, id, claims.actor()).await?;
    Ok(Json(CancelResponse { msg: "Booking canceled successfully".into(), booking: updated }))
}

#[derive(Debug, Deserialize)]
pub struct NotesPayload {
    pub notes: Option<String>,
}

pub async fn update_notes(
    State(state): State<ServerState>,
    claims: AuthClaims,
    Path(id): Path<Uuid>,
    Json(payload): Json<NotesPayload>,
) -> Result<Json<CancelResponse>, JsonApiError> {
    let updated = booking::update_notes(&state.db, id, claims.actor(), payload.notes).await?;
    Ok(Json(CancelResponse { msg: "Booking notes updated".into(), booking: updated }))
}
