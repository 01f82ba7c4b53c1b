//! OpenAPI documentation

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use tusla_core::models;

/// Returns the generated OpenAPI spec.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

struct SecurityAddon;

impl Modify for SecurityAddon {
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

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tusla API",
        version = "0.1.0",
        description = "Community volunteering platform API. Users publish help-request posts with images, browse them by category, and apply to volunteer on each other's posts. All endpoints are versioned under /api/v1/."
    ),
    modifiers(&SecurityAddon),
    paths(
        // Users
        handlers::users::register,
        handlers::users::login,
        handlers::users::get_me,
        handlers::users::update_my_details,
        handlers::users::update_my_email,
        handlers::users::update_my_password,
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::get_user_by_email,
        handlers::users::delete_user,
        handlers::users::list_user_posts,
        handlers::users::get_user_stats,
        // Posts
        handlers::posts::list_posts,
        handlers::posts::create_post,
        handlers::posts::get_post,
        handlers::posts::update_post,
        handlers::posts::delete_post,
        // Volunteers
        handlers::volunteers::list_volunteers,
        handlers::volunteers::apply,
        handlers::volunteers::remove,
        handlers::volunteers::approve,
        handlers::volunteers::reject,
        // Categories
        handlers::categories::list_categories,
        handlers::categories::get_category,
        // Health
        handlers::health::health_check,
    ),
    components(
        schemas(
            // User models
            models::UserRole,
            models::UserResponse,
            models::CreateUserRequest,
            models::LoginRequest,
            models::LoginResponse,
            models::UpdateUserDetailsRequest,
            models::UpdateUserEmailRequest,
            models::UpdateUserPasswordRequest,
            models::UserStats,
            // Post models
            models::PostResponse,
            models::CreatePostRequest,
            models::UpdatePostRequest,
            // Volunteer models
            models::PostVolunteer,
            models::VolunteerResponse,
            models::ApplyVolunteerRequest,
            models::VolunteerDecisionRequest,
            // Category models
            models::Category,
            // Health
            handlers::health::HealthResponse,
            // Error
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "users", description = "Registration, authentication, and profile management"),
        (name = "posts", description = "Help-request posts with images and volunteer applications"),
        (name = "volunteers", description = "Volunteer applications on posts"),
        (name = "categories", description = "Post categories"),
        (name = "health", description = "Service health checks")
    )
)]
pub struct ApiDoc;
