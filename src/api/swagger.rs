use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tapzx API",
        version = "1.0.0",
        description = "Backend API for Tapzx - Digital Business Card App. \n\n**Authentication:** Endpoints that mutate or read the caller's own data require a JWT Bearer token from /auth/signup or /auth/signin.\n\n**Features:**\n- Email/password accounts with unique email and phone\n- One link-set per user, replaced whole on every save\n- One profile per user with a globally unique username and derived profile URL\n- Public card resolution by username or user id",
        contact(
            name = "Tapzx Team",
            email = "support@tapzx.app"
        )
    ),
    paths(
        // Auth endpoints
        crate::api::auth::signup,
        crate::api::auth::signin,
        crate::api::auth::verify_token,
        crate::api::auth::get_me,

        // Links
        crate::api::links::upsert_links,
        crate::api::links::get_my_links,
        crate::api::links::get_links_by_user_id,
        crate::api::links::delete_links,

        // Profile
        crate::api::profile::upsert_profile,
        crate::api::profile::get_my_profile,
        crate::api::profile::get_profile_by_username,
        crate::api::profile::check_username,
        crate::api::profile::get_profile_by_user_id,
        crate::api::profile::delete_profile,

        // User composites
        crate::api::user::get_complete_profile,
        crate::api::user::get_public_profile_by_username,
        crate::api::user::get_public_profile,
        crate::api::user::delete_account,

        // Health
        crate::api::health::health_check,
    ),
    components(
        schemas(
            // Auth
            crate::services::auth_service::SignupRequest,
            crate::services::auth_service::SigninRequest,
            crate::services::auth_service::AuthResponse,

            // Links
            crate::services::links_service::UpsertLinksRequest,
            crate::services::links_service::UpsertLinksResponse,
            crate::models::LinksResponse,

            // Profile
            crate::services::profile_service::UpsertProfileRequest,
            crate::services::profile_service::UpsertProfileResponse,
            crate::services::profile_service::UsernameAvailabilityResponse,
            crate::models::ProfileResponse,

            // User
            crate::models::UserResponse,
            crate::services::user_service::CompleteUserProfile,

            // Health
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Account creation and authentication. Email and phone number are unique per account."),
        (name = "Links", description = "Social and contact links. One record per user, fully replaced on every save."),
        (name = "Profile", description = "Public profile with unique username and derived tapzx.app URL."),
        (name = "User", description = "Composite views of user + profile + links, and account deletion."),
        (name = "Health", description = "Health check endpoint for monitoring service status."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Enter your JWT token"))
                        .build(),
                ),
            );
        }
    }
}
