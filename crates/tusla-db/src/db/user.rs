use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use tusla_core::{
    models::{User, UserRole, UserStats},
    AppError,
};

use crate::db::map_insert_error;

const USER_COLUMNS: &str = "id, first_name, last_name, phone, is_volunteering, email, role, \
     profile_url, password_hash, created_at, updated_at";

/// Repository for user accounts
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new account. Email uniqueness violations surface as `Conflict`.
    #[tracing::instrument(skip(self, password_hash), fields(db.table = "users", db.operation = "insert"))]
    pub async fn create_user(
        &self,
        first_name: &str,
        last_name: &str,
        phone: Option<&str>,
        is_volunteering: bool,
        email: &str,
        role: UserRole,
        profile_url: Option<&str>,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<Postgres, User>(&format!(
            r#"
            INSERT INTO users (first_name, last_name, phone, is_volunteering, email, role, profile_url, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(first_name)
        .bind(last_name)
        .bind(phone)
        .bind(is_volunteering)
        .bind(email)
        .bind(role)
        .bind(profile_url)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, "A user with this email already exists"))?;

        Ok(user)
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select", db.record_id = %id))]
    pub async fn get_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<Postgres, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select"))]
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<Postgres, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select"))]
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<Postgres, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Update profile fields. `None` leaves a column untouched.
    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "update", db.record_id = %id))]
    pub async fn update_details(
        &self,
        id: Uuid,
        first_name: Option<&str>,
        last_name: Option<&str>,
        phone: Option<&str>,
        is_volunteering: Option<bool>,
        profile_url: Option<&str>,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<Postgres, User>(&format!(
            r#"
            UPDATE users SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                phone = COALESCE($4, phone),
                is_volunteering = COALESCE($5, is_volunteering),
                profile_url = COALESCE($6, profile_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(first_name)
        .bind(last_name)
        .bind(phone)
        .bind(is_volunteering)
        .bind(profile_url)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(user)
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "update", db.record_id = %id))]
    pub async fn update_email(&self, id: Uuid, email: &str) -> Result<User, AppError> {
        let user = sqlx::query_as::<Postgres, User>(&format!(
            r#"
            UPDATE users SET email = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, "A user with this email already exists"))?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(user)
    }

    #[tracing::instrument(skip(self, password_hash), fields(db.table = "users", db.operation = "update", db.record_id = %id))]
    pub async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), AppError> {
        let rows_affected =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(password_hash)
                .execute(&self.pool)
                .await?
                .rows_affected();

        if rows_affected == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "update", db.record_id = %id))]
    pub async fn update_profile_url(&self, id: Uuid, profile_url: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET profile_url = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(profile_url)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete an account. Posts and volunteer applications cascade.
    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "delete", db.record_id = %id))]
    pub async fn delete_user(&self, id: Uuid) -> Result<bool, AppError> {
        let rows_affected = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }

    /// Profile counters: posts authored, applications filed, applications approved.
    #[tracing::instrument(skip(self), fields(db.table = "users", db.operation = "select", db.record_id = %id))]
    pub async fn get_user_stats(&self, id: Uuid) -> Result<UserStats, AppError> {
        let (post_count, volunteer_count, approved_count) =
            sqlx::query_as::<Postgres, (i64, i64, i64)>(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM posts WHERE user_id = $1),
                    (SELECT COUNT(*) FROM post_volunteers WHERE user_id = $1),
                    (SELECT COUNT(*) FROM post_volunteers WHERE user_id = $1 AND status = 'approved')
                "#,
            )
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(UserStats {
            post_count,
            volunteer_count,
            approved_count,
        })
    }
}
