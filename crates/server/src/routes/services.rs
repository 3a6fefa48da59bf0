use axum::{
    extract::{multipart::Multipart, Json, Path, State},
    http::StatusCode,
};
use serde::Serialize;
use uuid::Uuid;

use service::catalog::{self, CreateServiceInput, ServiceWithOptions, UpdateServiceInput};

use crate::errors::JsonApiError;
use crate::routes::auth::{ManagerAuth, ServerState};
use crate::uploads;

#[utoipa::path(get, path = "/api/services", tag = "services", responses((status = 200, description = "Catalog listing")))]
pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<ServiceWithOptions>>, JsonApiError> {
    let rows = catalog::list_services(&state.db).await?;
    Ok(Json(rows))
}

#[utoipa::path(get, path = "/api/services/{id}", tag = "services", params(("id" = Uuid, Path,)), responses((status = 200, description = "Service"), (status = 404, description = "Not Found")))]
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ServiceWithOptions>, JsonApiError> {
    let row = catalog::get_service(&state.db, id).await?;
    Ok(Json(row))
}

#[utoipa::path(post, path = "/api/services", tag = "services", request_body = crate::openapi::CreateServiceRequest, responses((status = 201, description = "Created"), (status = 400, description = "Validation Error")))]
pub async fn create(
    State(state): State<ServerState>,
    ManagerAuth(_manager): ManagerAuth,
    Json(input): Json<CreateServiceInput>,
) -> Result<(StatusCode, Json<ServiceWithOptions>), JsonApiError> {
    let created = catalog::create_service(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(put, path = "/api/services/{id}", tag = "services", params(("id" = Uuid, Path,)), responses((status = 200, description = "Updated"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    ManagerAuth(_manager): ManagerAuth,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateServiceInput>,
) -> Result<Json<ServiceWithOptions>, JsonApiError> {
    let updated = catalog::update_service(&state.db, id, input).await?;
    Ok(Json(updated))
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

#[utoipa::path(delete, path = "/api/services/{id}", tag = "services", params(("id" = Uuid, Path,)), responses((status = 200, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete(
    State(state): State<ServerState>,
    ManagerAuth(_manager): ManagerAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, JsonApiError> {
    catalog::delete_service(&state.db, id).await?;
    Ok(Json(DeleteResponse { message: "Service deleted successfully".into() }))
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub image_url: String,
}

pub async fn upload_image(
    State(state): State<ServerState>,
    ManagerAuth(_manager): ManagerAuth,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, JsonApiError> {
    let image_url = uploads::save_image(
        &mut multipart,
        &state.uploads.dir,
        "services",
        state.uploads.max_bytes,
    )
    .await?;
    Ok(Json(UploadResponse { image_url }))
}
