use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Volunteer application row. One per (post, user) pair. Returned as-is
/// from the approve/reject endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PostVolunteer {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Volunteer application joined with the applicant's public details
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct VolunteerResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub notes: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub profile_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Application payload for `POST /posts/{id}/volunteers`
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct ApplyVolunteerRequest {
    #[serde(default)]
    #[validate(length(max = 2000, message = "Notes are limited to 2000 characters"))]
    pub notes: Option<String>,
}

/// Approve/reject payload. Keyed on the post and applicant rather than the
/// application id so owners can act straight from the post view.
#[derive(Debug, Deserialize, ToSchema)]
pub struct VolunteerDecisionRequest {
    pub post_id: Uuid,
    pub user_id: Uuid,
}
