use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use tusla_core::{
    models::{CreatePostRequest, Post, UpdatePostRequest},
    AppError,
};

const POST_COLUMNS: &str = "id, title, description, status, priority, preview_url, post_type, \
     user_id, max_volunteers, current_volunteers, category_id, location_lat, location_lng, \
     address_text, created_at, updated_at";

/// Repository for help-request posts
#[derive(Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self, request), fields(db.table = "posts", db.operation = "insert"))]
    pub async fn create_post(
        &self,
        user_id: Uuid,
        request: &CreatePostRequest,
        category_id: Option<Uuid>,
        preview_url: Option<&str>,
    ) -> Result<Post, AppError> {
        let post = sqlx::query_as::<Postgres, Post>(&format!(
            r#"
            INSERT INTO posts (
                title, description, status, priority, preview_url, post_type,
                user_id, max_volunteers, category_id, location_lat, location_lng, address_text
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {POST_COLUMNS}
            "#,
        ))
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.status_or_default())
        .bind(request.priority_or_default())
        .bind(preview_url)
        .bind(&request.post_type)
        .bind(user_id)
        .bind(request.max_volunteers.unwrap_or(0))
        .bind(category_id)
        .bind(request.location_lat)
        .bind(request.location_lng)
        .bind(request.address_text.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    #[tracing::instrument(skip(self), fields(db.table = "posts", db.operation = "select", db.record_id = %id))]
    pub async fn get_post(&self, id: Uuid) -> Result<Option<Post>, AppError> {
        let post = sqlx::query_as::<Postgres, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    #[tracing::instrument(skip(self), fields(db.table = "posts", db.operation = "select"))]
    pub async fn list_posts(&self) -> Result<Vec<Post>, AppError> {
        let posts = sqlx::query_as::<Postgres, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    #[tracing::instrument(skip(self), fields(db.table = "posts", db.operation = "select"))]
    pub async fn list_posts_by_user(&self, user_id: Uuid) -> Result<Vec<Post>, AppError> {
        let posts = sqlx::query_as::<Postgres, Post>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    /// Partial update. `None` fields keep their current value.
    #[tracing::instrument(skip(self, request), fields(db.table = "posts", db.operation = "update", db.record_id = %id))]
    pub async fn update_post(
        &self,
        id: Uuid,
        request: &UpdatePostRequest,
    ) -> Result<Post, AppError> {
        let post = sqlx::query_as::<Postgres, Post>(&format!(
            r#"
            UPDATE posts SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                status = COALESCE($4, status),
                priority = COALESCE($5, priority),
                preview_url = COALESCE($6, preview_url),
                post_type = COALESCE($7, post_type),
                max_volunteers = COALESCE($8, max_volunteers),
                category_id = COALESCE($9, category_id),
                location_lat = COALESCE($10, location_lat),
                location_lng = COALESCE($11, location_lng),
                address_text = COALESCE($12, address_text),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {POST_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(request.title.as_deref())
        .bind(request.description.as_deref())
        .bind(request.status.as_deref())
        .bind(request.priority.as_deref())
        .bind(request.preview_url.as_deref())
        .bind(request.post_type.as_deref())
        .bind(request.max_volunteers)
        .bind(request.category_id)
        .bind(request.location_lat)
        .bind(request.location_lng)
        .bind(request.address_text.as_deref())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

        Ok(post)
    }

    /// Delete a post. Images and volunteer applications cascade.
    #[tracing::instrument(skip(self), fields(db.table = "posts", db.operation = "delete", db.record_id = %id))]
    pub async fn delete_post(&self, id: Uuid) -> Result<bool, AppError> {
        let rows_affected = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }

    /// Recompute the cached volunteer counter from approved applications.
    #[tracing::instrument(skip(self), fields(db.table = "posts", db.operation = "update", db.record_id = %id))]
    pub async fn refresh_volunteer_count(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE posts SET
                current_volunteers = (
                    SELECT COUNT(*) FROM post_volunteers
                    WHERE post_id = $1 AND status = 'approved'
                ),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
