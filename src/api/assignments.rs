//! Assignment ledger API endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::assignment::{Assignment, AssignmentDetails, AssignmentInput},
    AppState,
};

use super::{AuthenticatedUser, DeleteResponse, JsonBody, PathId};

/// List all assignments
#[utoipa::path(
    get,
    path = "/assignments",
    tag = "assignments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Assignment history", body = Vec<AssignmentDetails>)
    )
)]
pub async fn list_assignments(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<AssignmentDetails>>> {
    let records = state.services.assignments.list().await?;
    Ok(Json(records))
}

/// Get assignment by ID
#[utoipa::path(
    get,
    path = "/assignments/{id}",
    tag = "assignments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment details", body = AssignmentDetails),
        (status = 404, description = "Assignment not found")
    )
)]
pub async fn get_assignment(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    PathId(id): PathId<i32>,
) -> AppResult<Json<AssignmentDetails>> {
    let record = state.services.assignments.get_by_id(id).await?;
    Ok(Json(record))
}

/// Assign an asset to a user
#[utoipa::path(
    post,
    path = "/assignments",
    tag = "assignments",
    security(("bearer_auth" = [])),
    request_body = AssignmentInput,
    responses(
        (status = 201, description = "Assignment created, asset now In Use", body = Assignment),
        (status = 400, description = "Missing fields or asset already assigned"),
        (status = 404, description = "Asset or user not found")
    )
)]
pub async fn create_assignment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    JsonBody(data): JsonBody<AssignmentInput>,
) -> AppResult<(StatusCode, Json<Assignment>)> {
    let record = state
        .services
        .assignments
        .create(&data, claims.user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Update an assignment (return, reassign, move)
#[utoipa::path(
    put,
    path = "/assignments/{id}",
    tag = "assignments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Assignment ID")),
    request_body = AssignmentInput,
    responses(
        (status = 200, description = "Assignment updated", body = Assignment),
        (status = 400, description = "Target asset already assigned"),
        (status = 404, description = "Assignment, asset or user not found")
    )
)]
pub async fn update_assignment(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    PathId(id): PathId<i32>,
    JsonBody(data): JsonBody<AssignmentInput>,
) -> AppResult<Json<Assignment>> {
    let record = state.services.assignments.update(id, &data).await?;
    Ok(Json(record))
}

/// Delete an assignment
#[utoipa::path(
    delete,
    path = "/assignments/{id}",
    tag = "assignments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Assignment deleted", body = DeleteResponse),
        (status = 404, description = "Assignment not found")
    )
)]
pub async fn delete_assignment(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    PathId(id): PathId<i32>,
) -> AppResult<Json<DeleteResponse>> {
    state.services.assignments.delete(id).await?;
    Ok(Json(DeleteResponse::new("Assignment", id)))
}
