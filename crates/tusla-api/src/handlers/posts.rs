//! Help-request post handlers

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use tusla_core::constants::MAX_POST_IMAGES;
use tusla_core::models::{CreatePostRequest, Post, PostResponse, UpdatePostRequest};
use tusla_core::AppError;
use tusla_storage::keys::generate_key;

use crate::auth::models::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::{parse_json_payload, read_multipart_payload, UploadedImage};
use crate::validation::extension_for;

/// Resolve images and volunteer applications for a batch of posts.
pub(crate) async fn build_post_responses(
    state: &AppState,
    posts: Vec<Post>,
) -> Result<Vec<PostResponse>, HttpAppError> {
    let post_ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();

    let mut images_by_post: HashMap<Uuid, Vec<String>> = HashMap::new();
    for image in state.post_images.list_for_posts(&post_ids).await? {
        images_by_post
            .entry(image.post_id)
            .or_default()
            .push(image.image_url);
    }

    let mut volunteers_by_post: HashMap<Uuid, Vec<_>> = HashMap::new();
    for volunteer in state.volunteers.list_for_posts(&post_ids).await? {
        volunteers_by_post
            .entry(volunteer.post_id)
            .or_default()
            .push(volunteer);
    }

    Ok(posts
        .into_iter()
        .map(|post| {
            let images = images_by_post.remove(&post.id).unwrap_or_default();
            let volunteers = volunteers_by_post.remove(&post.id).unwrap_or_default();
            post.into_response(images, volunteers)
        })
        .collect())
}

async fn build_single_response(
    state: &AppState,
    post: Post,
) -> Result<PostResponse, HttpAppError> {
    let images = state
        .post_images
        .list_for_post(post.id)
        .await?
        .into_iter()
        .map(|i| i.image_url)
        .collect();
    let volunteers = state.volunteers.list_for_post(post.id).await?;

    Ok(post.into_response(images, volunteers))
}

/// List all posts with their images and volunteer applications
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    tag = "posts",
    responses(
        (status = 200, description = "All posts", body = [PostResponse])
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let posts = state.posts.list_posts().await?;
    let responses = build_post_responses(&state, posts).await?;

    Ok(Json(responses))
}

/// Create a post
///
/// Multipart request: a `postData` JSON part plus up to five `postImages`
/// parts. When no category is given and a model is configured, one is
/// suggested from the post text. The first uploaded image becomes the
/// preview when the payload names none.
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    tag = "posts",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 413, description = "Image too large", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, multipart), fields(user_id = %auth.id))]
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let (payload, images) =
        read_multipart_payload(&mut multipart, "postData", "postImages", MAX_POST_IMAGES)
            .await?;
    let request: CreatePostRequest = parse_json_payload(&payload)?;

    let category_id = match request.category_id {
        Some(id) => Some(id),
        None => match &state.categorizer {
            Some(categorizer) => {
                categorizer
                    .suggest_category(&request.title, &request.description)
                    .await
            }
            None => None,
        },
    };

    let image_urls = upload_post_images(&state, auth.id, images).await?;

    let preview_url = request
        .preview_url
        .clone()
        .or_else(|| image_urls.first().cloned());

    let post = state
        .posts
        .create_post(auth.id, &request, category_id, preview_url.as_deref())
        .await?;

    for url in &image_urls {
        state.post_images.add_image(post.id, url).await?;
    }

    tracing::info!(post_id = %post.id, image_count = image_urls.len(), "Post created");

    let response = build_single_response(&state, post).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

async fn upload_post_images(
    state: &AppState,
    owner_id: Uuid,
    images: Vec<UploadedImage>,
) -> Result<Vec<String>, HttpAppError> {
    let mut urls = Vec::with_capacity(images.len());
    for image in images {
        let key = generate_key("post_images", owner_id, extension_for(image.content_type));
        let url = state
            .storage
            .upload(&key, image.content_type, image.data)
            .await?;
        urls.push(url);
    }
    Ok(urls)
}

/// Fetch a post by id
#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    tag = "posts",
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post", body = PostResponse),
        (status = 404, description = "No such post", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state))]
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let post = state
        .posts
        .get_post(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    let response = build_single_response(&state, post).await?;

    Ok(Json(response))
}

/// Update a post. Only the author may update it.
#[utoipa::path(
    put,
    path = "/api/v1/posts/{id}",
    tag = "posts",
    params(("id" = Uuid, Path, description = "Post id")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Updated post", body = PostResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "No such post", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, request), fields(user_id = %auth.id))]
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePostRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate()?;

    let post = state
        .posts
        .get_post(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    if post.user_id != auth.id {
        return Err(AppError::Forbidden("You can only update your own posts".to_string()).into());
    }

    let post = state.posts.update_post(id, &request).await?;
    let response = build_single_response(&state, post).await?;

    Ok(Json(response))
}

/// Delete a post. Only the author may delete it.
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}",
    tag = "posts",
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "No such post", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = %auth.id))]
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let post = state
        .posts
        .get_post(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    if post.user_id != auth.id {
        return Err(AppError::Forbidden("You can only delete your own posts".to_string()).into());
    }

    state.posts.delete_post(id).await?;

    tracing::info!(post_id = %id, "Post deleted");

    Ok(StatusCode::NO_CONTENT)
}
