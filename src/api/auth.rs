//! Authentication and profile endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::user::{
        AuthResponse, LoginRequest, Profile, ProfileUpdated, RegisterUser, UpdateProfile, User,
    },
    AppState,
};

use super::{AuthenticatedUser, JsonBody};

/// Register a new user
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterUser,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 400, description = "Invalid input or email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(data): JsonBody<RegisterUser>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let response = state.services.auth.register(&data).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(credentials): JsonBody<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let response = state.services.auth.authenticate(&credentials).await?;
    Ok(Json(response))
}

/// Get the current user's profile
#[utoipa::path(
    get,
    path = "/auth/profile",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = Profile),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Profile>> {
    let profile = state.services.auth.profile(claims.user_id).await?;
    Ok(Json(profile))
}

/// Update the current user's profile
#[utoipa::path(
    put,
    path = "/auth/profile",
    tag = "auth",
    security(("bearer_auth" = [])),
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Profile updated with a fresh token", body = ProfileUpdated),
        (status = 400, description = "Invalid input or email already in use"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    JsonBody(data): JsonBody<UpdateProfile>,
) -> AppResult<Json<ProfileUpdated>> {
    let updated = state
        .services
        .auth
        .update_profile(claims.user_id, &data)
        .await?;
    Ok(Json(updated))
}

/// List all users
#[utoipa::path(
    get,
    path = "/auth/all",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Users, without password hashes", body = Vec<User>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<User>>> {
    let users = state.services.auth.list_users().await?;
    Ok(Json(users))
}
