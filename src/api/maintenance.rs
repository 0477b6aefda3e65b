//! Maintenance ledger API endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::maintenance::{Maintenance, MaintenanceDetails, MaintenanceInput},
    AppState,
};

use super::{AuthenticatedUser, DeleteResponse, JsonBody, PathId};

#[utoipa::path(
    get,
    path = "/maintenance",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Maintenance records, newest first", body = Vec<MaintenanceDetails>)
    )
)]
pub async fn list_maintenance(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<MaintenanceDetails>>> {
    let records = state.services.maintenance.list().await?;
    Ok(Json(records))
}

#[utoipa::path(
    get,
    path = "/maintenance/{id}",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Maintenance record ID")),
    responses(
        (status = 200, description = "Maintenance record", body = MaintenanceDetails),
        (status = 404, description = "Maintenance record not found")
    )
)]
pub async fn get_maintenance(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    PathId(id): PathId<i32>,
) -> AppResult<Json<MaintenanceDetails>> {
    let record = state.services.maintenance.get_by_id(id).await?;
    Ok(Json(record))
}

#[utoipa::path(
    post,
    path = "/maintenance",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    request_body = MaintenanceInput,
    responses(
        (status = 201, description = "Maintenance recorded", body = Maintenance),
        (status = 400, description = "Missing or invalid fields"),
        (status = 404, description = "Asset not found")
    )
)]
pub async fn create_maintenance(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    JsonBody(data): JsonBody<MaintenanceInput>,
) -> AppResult<(StatusCode, Json<Maintenance>)> {
    let record = state
        .services
        .maintenance
        .create(&data, claims.user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    put,
    path = "/maintenance/{id}",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Maintenance record ID")),
    request_body = MaintenanceInput,
    responses(
        (status = 200, description = "Maintenance updated", body = Maintenance),
        (status = 404, description = "Maintenance record or asset not found")
    )
)]
pub async fn update_maintenance(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    PathId(id): PathId<i32>,
    JsonBody(data): JsonBody<MaintenanceInput>,
) -> AppResult<Json<Maintenance>> {
    let record = state.services.maintenance.update(id, &data).await?;
    Ok(Json(record))
}

#[utoipa::path(
    delete,
    path = "/maintenance/{id}",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Maintenance record ID")),
    responses(
        (status = 200, description = "Maintenance deleted", body = DeleteResponse),
        (status = 404, description = "Maintenance record not found")
    )
)]
pub async fn delete_maintenance(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    PathId(id): PathId<i32>,
) -> AppResult<Json<DeleteResponse>> {
    state.services.maintenance.delete(id).await?;
    Ok(Json(DeleteResponse::new("Maintenance record", id)))
}
