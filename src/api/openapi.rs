//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{assets, assignments, auth, disposals, health, maintenance};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Assetrack API",
        version = "1.0.0",
        description = "IT asset tracking REST API: registry, assignments, maintenance and disposals"
    ),
    servers(
        (url = "/api", description = "API")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::get_profile,
        auth::update_profile,
        auth::list_users,
        // Assets
        assets::list_assets,
        assets::get_asset,
        assets::create_asset,
        assets::update_asset,
        assets::delete_asset,
        // Assignments
        assignments::list_assignments,
        assignments::get_assignment,
        assignments::create_assignment,
        assignments::update_assignment,
        assignments::delete_assignment,
        // Maintenance
        maintenance::list_maintenance,
        maintenance::get_maintenance,
        maintenance::create_maintenance,
        maintenance::update_maintenance,
        maintenance::delete_maintenance,
        // Disposals
        disposals::list_disposals,
        disposals::get_disposal,
        disposals::create_disposal,
        disposals::update_disposal,
        disposals::delete_disposal,
    ),
    components(
        schemas(
            // Auth
            crate::models::user::User,
            crate::models::user::UserSummary,
            crate::models::user::RegisterUser,
            crate::models::user::LoginRequest,
            crate::models::user::AuthResponse,
            crate::models::user::Profile,
            crate::models::user::ProfileUpdated,
            crate::models::user::UpdateProfile,
            // Assets
            crate::models::asset::Asset,
            crate::models::asset::AssetDetails,
            crate::models::asset::AssetSummary,
            crate::models::asset::AssetInput,
            crate::models::enums::AssetStatus,
            // Assignments
            crate::models::assignment::Assignment,
            crate::models::assignment::AssignmentDetails,
            crate::models::assignment::AssignmentInput,
            crate::models::enums::AssignmentStatus,
            // Maintenance
            crate::models::maintenance::Maintenance,
            crate::models::maintenance::MaintenanceDetails,
            crate::models::maintenance::MaintenanceInput,
            crate::models::enums::MaintenanceType,
            crate::models::enums::MaintenanceStatus,
            // Disposals
            crate::models::disposal::Disposal,
            crate::models::disposal::DisposalDetails,
            crate::models::disposal::DisposalInput,
            crate::models::enums::DisposalMethod,
            // Common
            super::DeleteResponse,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration, login and profile"),
        (name = "assets", description = "Asset registry"),
        (name = "assignments", description = "Asset hand-outs to users"),
        (name = "maintenance", description = "Service events"),
        (name = "disposals", description = "End-of-life records")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by protected paths
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
