//! Asset registry API endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::asset::{Asset, AssetDetails, AssetInput},
    AppState,
};

use super::{AuthenticatedUser, DeleteResponse, JsonBody, PathId};

/// List all assets
#[utoipa::path(
    get,
    path = "/assets",
    tag = "assets",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Assets with creator and assignee", body = Vec<AssetDetails>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_assets(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<AssetDetails>>> {
    let assets = state.services.assets.list().await?;
    Ok(Json(assets))
}

/// Get asset by ID
#[utoipa::path(
    get,
    path = "/assets/{id}",
    tag = "assets",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Asset ID")),
    responses(
        (status = 200, description = "Asset details", body = AssetDetails),
        (status = 404, description = "Asset not found")
    )
)]
pub async fn get_asset(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    PathId(id): PathId<i32>,
) -> AppResult<Json<AssetDetails>> {
    let asset = state.services.assets.get_by_id(id).await?;
    Ok(Json(asset))
}

/// Register an asset
#[utoipa::path(
    post,
    path = "/assets",
    tag = "assets",
    security(("bearer_auth" = [])),
    request_body = AssetInput,
    responses(
        (status = 201, description = "Asset created", body = Asset),
        (status = 400, description = "Missing fields, duplicate serial number or unknown assignee")
    )
)]
pub async fn create_asset(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    JsonBody(data): JsonBody<AssetInput>,
) -> AppResult<(StatusCode, Json<Asset>)> {
    let asset = state.services.assets.create(&data, claims.user_id).await?;
    Ok((StatusCode::CREATED, Json(asset)))
}

/// Update an asset
#[utoipa::path(
    put,
    path = "/assets/{id}",
    tag = "assets",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Asset ID")),
    request_body = AssetInput,
    responses(
        (status = 200, description = "Asset updated", body = Asset),
        (status = 400, description = "Duplicate serial number or unknown assignee"),
        (status = 404, description = "Asset not found")
    )
)]
pub async fn update_asset(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    PathId(id): PathId<i32>,
    JsonBody(data): JsonBody<AssetInput>,
) -> AppResult<Json<Asset>> {
    let asset = state.services.assets.update(id, &data).await?;
    Ok(Json(asset))
}

/// Delete an asset
#[utoipa::path(
    delete,
    path = "/assets/{id}",
    tag = "assets",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Asset ID")),
    responses(
        (status = 200, description = "Asset deleted", body = DeleteResponse),
        (status = 404, description = "Asset not found")
    )
)]
pub async fn delete_asset(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    PathId(id): PathId<i32>,
) -> AppResult<Json<DeleteResponse>> {
    state.services.assets.delete(id).await?;
    Ok(Json(DeleteResponse::new("Asset", id)))
}
