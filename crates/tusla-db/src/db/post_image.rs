use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use tusla_core::{models::PostImage, AppError};

/// Repository for images attached to posts
#[derive(Clone)]
pub struct PostImageRepository {
    pool: PgPool,
}

impl PostImageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self), fields(db.table = "post_images", db.operation = "insert"))]
    pub async fn add_image(&self, post_id: Uuid, image_url: &str) -> Result<PostImage, AppError> {
        let image = sqlx::query_as::<Postgres, PostImage>(
            r#"
            INSERT INTO post_images (post_id, image_url)
            VALUES ($1, $2)
            RETURNING id, post_id, image_url, created_at
            "#,
        )
        .bind(post_id)
        .bind(image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(image)
    }

    #[tracing::instrument(skip(self), fields(db.table = "post_images", db.operation = "select"))]
    pub async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<PostImage>, AppError> {
        let images = sqlx::query_as::<Postgres, PostImage>(
            "SELECT id, post_id, image_url, created_at FROM post_images \
             WHERE post_id = $1 ORDER BY created_at ASC",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(images)
    }

    /// Fetch images for a batch of posts in one query. Callers group the rows
    /// by `post_id` themselves.
    #[tracing::instrument(skip(self, post_ids), fields(db.table = "post_images", db.operation = "select"))]
    pub async fn list_for_posts(&self, post_ids: &[Uuid]) -> Result<Vec<PostImage>, AppError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let images = sqlx::query_as::<Postgres, PostImage>(
            "SELECT id, post_id, image_url, created_at FROM post_images \
             WHERE post_id = ANY($1) ORDER BY created_at ASC",
        )
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(images)
    }
}
