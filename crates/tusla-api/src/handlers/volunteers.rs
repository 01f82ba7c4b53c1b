//! Volunteer application handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use tusla_core::models::{
    ApplyVolunteerRequest, PostVolunteer, VolunteerDecisionRequest, VolunteerResponse,
};
use tusla_core::AppError;

use crate::auth::models::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// All volunteer applications across the platform
#[utoipa::path(
    get,
    path = "/api/v1/posts/volunteers",
    tag = "volunteers",
    responses(
        (status = 200, description = "All applications", body = [VolunteerResponse])
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn list_volunteers(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
) -> Result<impl IntoResponse, HttpAppError> {
    let volunteers = state.volunteers.list_all().await?;

    Ok(Json(volunteers))
}

/// Apply to volunteer on a post
#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/volunteers",
    tag = "volunteers",
    params(("id" = Uuid, Path, description = "Post id")),
    request_body = ApplyVolunteerRequest,
    responses(
        (status = 201, description = "Application filed"),
        (status = 400, description = "Cannot volunteer on your own post", body = ErrorResponse),
        (status = 404, description = "No such post", body = ErrorResponse),
        (status = 409, description = "Already applied", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, request), fields(user_id = %auth.id))]
pub async fn apply(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(post_id): Path<Uuid>,
    request: Option<Json<ApplyVolunteerRequest>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    request.validate()?;

    let post = state
        .posts
        .get_post(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    if post.user_id == auth.id {
        return Err(
            AppError::BadRequest("You cannot volunteer on your own post".to_string()).into(),
        );
    }

    let volunteer = state
        .volunteers
        .apply(post_id, auth.id, request.notes.as_deref())
        .await?;

    tracing::info!(post_id = %post_id, volunteer_id = %volunteer.id, "Volunteer application filed");

    Ok(StatusCode::CREATED)
}

#[derive(Debug, Deserialize)]
pub struct PostIdQuery {
    pub post_id: Uuid,
}

/// Withdraw or remove an application
///
/// Allowed for the volunteer themself and for the post's author.
#[utoipa::path(
    delete,
    path = "/api/v1/posts/volunteers/{user_id}",
    tag = "volunteers",
    params(
        ("user_id" = Uuid, Path, description = "Applicant user id"),
        ("post_id" = Uuid, Query, description = "Post id")
    ),
    responses(
        (status = 204, description = "Application removed"),
        (status = 403, description = "Not allowed", body = ErrorResponse),
        (status = 404, description = "No such application", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = %auth.id))]
pub async fn remove(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(volunteer_user_id): Path<Uuid>,
    Query(query): Query<PostIdQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let post = state
        .posts
        .get_post(query.post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    if auth.id != volunteer_user_id && auth.id != post.user_id {
        return Err(AppError::Forbidden(
            "Only the volunteer or the post author can remove an application".to_string(),
        )
        .into());
    }

    if !state
        .volunteers
        .delete_application(query.post_id, volunteer_user_id)
        .await?
    {
        return Err(AppError::NotFound("Volunteer application not found".to_string()).into());
    }

    state.posts.refresh_volunteer_count(query.post_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Approve an application. Only the post's author may approve; repeating
/// the call is a no-op.
#[utoipa::path(
    post,
    path = "/api/v1/volunteers/approve",
    tag = "volunteers",
    request_body = VolunteerDecisionRequest,
    responses(
        (status = 200, description = "The approved application", body = PostVolunteer),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "No such application", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, request), fields(user_id = %auth.id))]
pub async fn approve(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(request): Json<VolunteerDecisionRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    authorize_decision(&state, &auth, request.post_id).await?;

    let volunteer = state
        .volunteers
        .approve(request.post_id, request.user_id)
        .await?;
    state.posts.refresh_volunteer_count(request.post_id).await?;

    tracing::info!(post_id = %request.post_id, volunteer_user_id = %request.user_id, "Volunteer approved");

    Ok(Json(volunteer))
}

/// Reject an application. Only the post's author may reject; repeating
/// the call is a no-op.
#[utoipa::path(
    post,
    path = "/api/v1/volunteers/reject",
    tag = "volunteers",
    request_body = VolunteerDecisionRequest,
    responses(
        (status = 200, description = "The rejected application", body = PostVolunteer),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "No such application", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, request), fields(user_id = %auth.id))]
pub async fn reject(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(request): Json<VolunteerDecisionRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    authorize_decision(&state, &auth, request.post_id).await?;

    let volunteer = state
        .volunteers
        .reject(request.post_id, request.user_id)
        .await?;
    state.posts.refresh_volunteer_count(request.post_id).await?;

    tracing::info!(post_id = %request.post_id, volunteer_user_id = %request.user_id, "Volunteer rejected");

    Ok(Json(volunteer))
}

async fn authorize_decision(
    state: &AppState,
    auth: &AuthUser,
    post_id: Uuid,
) -> Result<(), HttpAppError> {
    let post = state
        .posts
        .get_post(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    if post.user_id != auth.id {
        return Err(AppError::Forbidden(
            "Only the post author can decide on applications".to_string(),
        )
        .into());
    }

    Ok(())
}
