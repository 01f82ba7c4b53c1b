//! User account handlers: registration, login, profile management

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use tusla_core::models::{
    CreateUserRequest, LoginRequest, LoginResponse, PostResponse, UpdateUserDetailsRequest,
    UpdateUserEmailRequest, UpdateUserPasswordRequest, UserResponse, UserStats,
};
use tusla_core::AppError;
use tusla_storage::keys::generate_key;

use crate::auth::jwt::issue_token;
use crate::auth::models::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::posts::build_post_responses;
use crate::state::AppState;
use crate::utils::upload::{parse_json_payload, read_multipart_payload};
use crate::validation::extension_for;

async fn hash_password(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

async fn verify_password(password: String, hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("Hashing task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Failed to verify password: {}", e)))
}

/// Register a new account
///
/// Multipart request: a `userData` JSON part plus an optional
/// `profileImage` part.
#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    tag = "users",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 413, description = "Profile image too large", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart))]
pub async fn register(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let (payload, mut images) =
        read_multipart_payload(&mut multipart, "userData", "profileImage", 1).await?;
    let request: CreateUserRequest = parse_json_payload(&payload)?;

    let password_hash = hash_password(request.password.clone()).await?;

    let user = state
        .users
        .create_user(
            &request.first_name,
            &request.last_name,
            request.phone.as_deref(),
            request.is_volunteering,
            &request.email,
            request.role,
            request.profile_url.as_deref(),
            &password_hash,
        )
        .await?;

    // Profile image is uploaded after the insert so a duplicate email does
    // not leave an orphaned object behind.
    let mut user = user;
    if let Some(image) = images.pop() {
        let key = generate_key("user_profiles", user.id, extension_for(image.content_type));
        let url = state
            .storage
            .upload(&key, image.content_type, image.data)
            .await?;
        state.users.update_profile_url(user.id, &url).await?;
        user.profile_url = Some(url);
    }

    tracing::info!(user_id = %user.id, "User registered");

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    tag = "users",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate()?;

    let user = state
        .users
        .get_user_by_email(&request.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    if !verify_password(request.password, user.password_hash.clone()).await? {
        return Err(AppError::Unauthorized("Invalid email or password".to_string()).into());
    }

    let token = issue_token(&user, &state.config.jwt_secret, state.config.jwt_expiry_hours)?;

    Ok(Json(LoginResponse {
        token,
        user: UserResponse::from(user),
    }))
}

/// Current user's profile
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    tag = "users",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = %auth.id))]
pub async fn get_me(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<impl IntoResponse, HttpAppError> {
    let user = state
        .users
        .get_user(auth.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from(user)))
}

/// Update profile fields of the current user
#[utoipa::path(
    put,
    path = "/api/v1/users/me/details",
    tag = "users",
    request_body = UpdateUserDetailsRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, request), fields(user_id = %auth.id))]
pub async fn update_my_details(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(request): Json<UpdateUserDetailsRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate()?;

    let user = state
        .users
        .update_details(
            auth.id,
            request.first_name.as_deref(),
            request.last_name.as_deref(),
            request.phone.as_deref(),
            request.is_volunteering,
            request.profile_url.as_deref(),
        )
        .await?;

    Ok(Json(UserResponse::from(user)))
}

/// Change the current user's email
#[utoipa::path(
    put,
    path = "/api/v1/users/me/email",
    tag = "users",
    request_body = UpdateUserEmailRequest,
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, request), fields(user_id = %auth.id))]
pub async fn update_my_email(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(request): Json<UpdateUserEmailRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate()?;

    let user = state.users.update_email(auth.id, &request.email).await?;

    Ok(Json(UserResponse::from(user)))
}

/// Change the current user's password
#[utoipa::path(
    put,
    path = "/api/v1/users/me/password",
    tag = "users",
    request_body = UpdateUserPasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Password too short", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, request), fields(user_id = %auth.id))]
pub async fn update_my_password(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(request): Json<UpdateUserPasswordRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate()?;

    let password_hash = hash_password(request.new_password).await?;
    state.users.update_password(auth.id, &password_hash).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List all users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    responses(
        (status = 200, description = "All users", body = [UserResponse])
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
) -> Result<impl IntoResponse, HttpAppError> {
    let users = state.users.list_users().await?;
    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();

    Ok(Json(users))
}

/// Fetch a user by id
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "users",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "No such user", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let user = state
        .users
        .get_user(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from(user)))
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

/// Fetch a user by email
#[utoipa::path(
    get,
    path = "/api/v1/users/by-email",
    tag = "users",
    params(("email" = String, Query, description = "Email address")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "No such user", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, query))]
pub async fn get_user_by_email(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Query(query): Query<EmailQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let user = state
        .users
        .get_user_by_email(&query.email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse::from(user)))
}

/// Delete an account. Users may only delete themselves.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "users",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 403, description = "Not your account", body = ErrorResponse),
        (status = 404, description = "No such user", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = %auth.id))]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    if auth.id != id {
        return Err(AppError::Forbidden("You can only delete your own account".to_string()).into());
    }

    if !state.users.delete_user(id).await? {
        return Err(AppError::NotFound("User not found".to_string()).into());
    }

    tracing::info!(user_id = %id, "User deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Posts authored by a user
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/posts",
    tag = "users",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "The user's posts", body = [PostResponse])
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn list_user_posts(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let posts = state.posts.list_posts_by_user(id).await?;
    let responses = build_post_responses(&state, posts).await?;

    Ok(Json(responses))
}

/// Aggregate activity counters for a user
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/stats",
    tag = "users",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "Activity counters", body = UserStats),
        (status = 404, description = "No such user", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn get_user_stats(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    if state.users.get_user(id).await?.is_none() {
        return Err(AppError::NotFound("User not found".to_string()).into());
    }

    let stats = state.users.get_user_stats(id).await?;

    Ok(Json(stats))
}
