use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use tusla_core::{
    constants::{VOLUNTEER_STATUS_APPROVED, VOLUNTEER_STATUS_REJECTED},
    models::{PostVolunteer, VolunteerResponse},
    AppError,
};

use crate::db::map_insert_error;

const VOLUNTEER_JOIN_COLUMNS: &str = "pv.id, pv.post_id, pv.user_id, pv.status, pv.notes, \
     u.first_name, u.last_name, u.email, u.phone, u.profile_url, pv.created_at, pv.updated_at";

/// Repository for volunteer applications on posts
#[derive(Clone)]
pub struct PostVolunteerRepository {
    pool: PgPool,
}

impl PostVolunteerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// File an application. A second application to the same post surfaces
    /// as `Conflict`.
    #[tracing::instrument(skip(self), fields(db.table = "post_volunteers", db.operation = "insert"))]
    pub async fn apply(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        notes: Option<&str>,
    ) -> Result<PostVolunteer, AppError> {
        let volunteer = sqlx::query_as::<Postgres, PostVolunteer>(
            r#"
            INSERT INTO post_volunteers (post_id, user_id, notes)
            VALUES ($1, $2, $3)
            RETURNING id, post_id, user_id, status, notes, created_at, updated_at
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .bind(notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, "You have already volunteered for this post"))?;

        Ok(volunteer)
    }

    /// Every application on the platform, applicant details included.
    #[tracing::instrument(skip(self), fields(db.table = "post_volunteers", db.operation = "select"))]
    pub async fn list_all(&self) -> Result<Vec<VolunteerResponse>, AppError> {
        let volunteers = sqlx::query_as::<Postgres, VolunteerResponse>(&format!(
            r#"
            SELECT {VOLUNTEER_JOIN_COLUMNS}
            FROM post_volunteers pv
            JOIN users u ON u.id = pv.user_id
            ORDER BY pv.created_at DESC
            "#,
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(volunteers)
    }

    #[tracing::instrument(skip(self), fields(db.table = "post_volunteers", db.operation = "select"))]
    pub async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<VolunteerResponse>, AppError> {
        let volunteers = sqlx::query_as::<Postgres, VolunteerResponse>(&format!(
            r#"
            SELECT {VOLUNTEER_JOIN_COLUMNS}
            FROM post_volunteers pv
            JOIN users u ON u.id = pv.user_id
            WHERE pv.post_id = $1
            ORDER BY pv.created_at ASC
            "#,
        ))
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(volunteers)
    }

    /// Applications for a batch of posts in one query. Callers group the rows
    /// by `post_id` themselves.
    #[tracing::instrument(skip(self, post_ids), fields(db.table = "post_volunteers", db.operation = "select"))]
    pub async fn list_for_posts(
        &self,
        post_ids: &[Uuid],
    ) -> Result<Vec<VolunteerResponse>, AppError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let volunteers = sqlx::query_as::<Postgres, VolunteerResponse>(&format!(
            r#"
            SELECT {VOLUNTEER_JOIN_COLUMNS}
            FROM post_volunteers pv
            JOIN users u ON u.id = pv.user_id
            WHERE pv.post_id = ANY($1)
            ORDER BY pv.created_at ASC
            "#,
        ))
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(volunteers)
    }

    /// Mark an application approved. Idempotent.
    #[tracing::instrument(skip(self), fields(db.table = "post_volunteers", db.operation = "update"))]
    pub async fn approve(&self, post_id: Uuid, user_id: Uuid) -> Result<PostVolunteer, AppError> {
        self.set_status(post_id, user_id, VOLUNTEER_STATUS_APPROVED)
            .await
    }

    /// Mark an application rejected. Idempotent.
    #[tracing::instrument(skip(self), fields(db.table = "post_volunteers", db.operation = "update"))]
    pub async fn reject(&self, post_id: Uuid, user_id: Uuid) -> Result<PostVolunteer, AppError> {
        self.set_status(post_id, user_id, VOLUNTEER_STATUS_REJECTED)
            .await
    }

    async fn set_status(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        status: &str,
    ) -> Result<PostVolunteer, AppError> {
        let volunteer = sqlx::query_as::<Postgres, PostVolunteer>(
            r#"
            UPDATE post_volunteers SET status = $3, updated_at = NOW()
            WHERE post_id = $1 AND user_id = $2
            RETURNING id, post_id, user_id, status, notes, created_at, updated_at
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Volunteer application not found".to_string()))?;

        Ok(volunteer)
    }

    #[tracing::instrument(skip(self), fields(db.table = "post_volunteers", db.operation = "delete"))]
    pub async fn delete_application(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let rows_affected =
            sqlx::query("DELETE FROM post_volunteers WHERE post_id = $1 AND user_id = $2")
                .bind(post_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?
                .rows_affected();

        Ok(rows_affected > 0)
    }
}
