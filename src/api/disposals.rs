//! Disposal ledger API endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::disposal::{Disposal, DisposalDetails, DisposalInput},
    AppState,
};

use super::{AuthenticatedUser, DeleteResponse, JsonBody, PathId};

/// List all disposals
#[utoipa::path(
    get,
    path = "/disposals",
    tag = "disposals",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Disposal records, newest first", body = Vec<DisposalDetails>)
    )
)]
pub async fn list_disposals(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<DisposalDetails>>> {
    let records = state.services.disposals.list().await?;
    Ok(Json(records))
}

/// Get disposal by ID
#[utoipa::path(
    get,
    path = "/disposals/{id}",
    tag = "disposals",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Disposal record ID")),
    responses(
        (status = 200, description = "Disposal record", body = DisposalDetails),
        (status = 404, description = "Disposal record not found")
    )
)]
pub async fn get_disposal(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    PathId(id): PathId<i32>,
) -> AppResult<Json<DisposalDetails>> {
    let record = state.services.disposals.get_by_id(id).await?;
    Ok(Json(record))
}

/// Record an asset disposal
#[utoipa::path(
    post,
    path = "/disposals",
    tag = "disposals",
    security(("bearer_auth" = [])),
    request_body = DisposalInput,
    responses(
        (status = 201, description = "Disposal recorded, asset now Disposed", body = Disposal),
        (status = 400, description = "Missing or invalid fields"),
        (status = 404, description = "Asset not found")
    )
)]
pub async fn create_disposal(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    JsonBody(data): JsonBody<DisposalInput>,
) -> AppResult<(StatusCode, Json<Disposal>)> {
    let record = state.services.disposals.create(&data, claims.user_id).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Update a disposal
#[utoipa::path(
    put,
    path = "/disposals/{id}",
    tag = "disposals",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Disposal record ID")),
    request_body = DisposalInput,
    responses(
        (status = 200, description = "Disposal updated", body = Disposal),
        (status = 404, description = "Disposal record or asset not found")
    )
)]
pub async fn update_disposal(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    PathId(id): PathId<i32>,
    JsonBody(data): JsonBody<DisposalInput>,
) -> AppResult<Json<Disposal>> {
    let record = state.services.disposals.update(id, &data).await?;
    Ok(Json(record))
}

/// Delete a disposal
#[utoipa::path(
    delete,
    path = "/disposals/{id}",
    tag = "disposals",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Disposal record ID")),
    responses(
        (status = 200, description = "Disposal deleted", body = DeleteResponse),
        (status = 404, description = "Disposal record not found")
    )
)]
pub async fn delete_disposal(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    PathId(id): PathId<i32>,
) -> AppResult<Json<DeleteResponse>> {
    state.services.disposals.delete(id).await?;
    Ok(Json(DeleteResponse::new("Disposal record", id)))
}
