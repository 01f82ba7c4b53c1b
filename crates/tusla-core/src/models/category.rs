use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Post category row. Categories are seeded by migration, not managed via the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub endpoint: String,
    pub can_volunteer: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
