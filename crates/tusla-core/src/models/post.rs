use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::constants::{DEFAULT_POST_PRIORITY, DEFAULT_POST_STATUS};
use crate::models::VolunteerResponse;

/// Help-request post row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub preview_url: Option<String>,
    pub post_type: String,
    pub user_id: Uuid,
    pub max_volunteers: i32,
    pub current_volunteers: i32,
    pub category_id: Option<Uuid>,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    pub address_text: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Attached image row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PostImage {
    pub id: Uuid,
    pub post_id: Uuid,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

/// Post with its images and volunteer applications resolved
#[derive(Debug, Serialize, ToSchema)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub preview_url: Option<String>,
    pub post_type: String,
    pub user_id: Uuid,
    pub max_volunteers: i32,
    pub current_volunteers: i32,
    pub category_id: Option<Uuid>,
    pub location_lat: Option<f64>,
    pub location_lng: Option<f64>,
    pub address_text: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub images: Vec<String>,
    pub volunteers: Vec<VolunteerResponse>,
}

impl Post {
    pub fn into_response(
        self,
        images: Vec<String>,
        volunteers: Vec<VolunteerResponse>,
    ) -> PostResponse {
        PostResponse {
            id: self.id,
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            preview_url: self.preview_url,
            post_type: self.post_type,
            user_id: self.user_id,
            max_volunteers: self.max_volunteers,
            current_volunteers: self.current_volunteers,
            category_id: self.category_id,
            location_lat: self.location_lat,
            location_lng: self.location_lng,
            address_text: self.address_text,
            created_at: self.created_at,
            updated_at: self.updated_at,
            images,
            volunteers,
        }
    }
}

/// Creation payload, carried in the `postData` multipart field
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Post type is required"))]
    pub post_type: String,
    #[serde(default)]
    pub max_volunteers: Option<i32>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub location_lat: Option<f64>,
    #[serde(default)]
    pub location_lng: Option<f64>,
    #[serde(default)]
    pub address_text: Option<String>,
}

impl CreatePostRequest {
    /// Status to persist, falling back to the platform default
    pub fn status_or_default(&self) -> &str {
        self.status.as_deref().unwrap_or(DEFAULT_POST_STATUS)
    }

    /// Priority to persist, falling back to the platform default
    pub fn priority_or_default(&self) -> &str {
        self.priority.as_deref().unwrap_or(DEFAULT_POST_PRIORITY)
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdatePostRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub post_type: Option<String>,
    #[serde(default)]
    pub max_volunteers: Option<i32>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub location_lat: Option<f64>,
    #[serde(default)]
    pub location_lng: Option<f64>,
    #[serde(default)]
    pub address_text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_and_priority_defaults() {
        let req: CreatePostRequest = serde_json::from_str(
            r#"{"title": "Тусламж хэрэгтэй", "description": "гэрийн ажил", "post_type": "request"}"#,
        )
        .unwrap();
        assert_eq!(req.status_or_default(), "Хүлээгдэж байгаа");
        assert_eq!(req.priority_or_default(), "бага");

        let req: CreatePostRequest = serde_json::from_str(
            r#"{"title": "t", "description": "d", "post_type": "request", "status": "Дууссан", "priority": "өндөр"}"#,
        )
        .unwrap();
        assert_eq!(req.status_or_default(), "Дууссан");
        assert_eq!(req.priority_or_default(), "өндөр");
    }

    #[test]
    fn test_create_post_request_validation() {
        let req: CreatePostRequest =
            serde_json::from_str(r#"{"title": "", "description": "", "post_type": ""}"#).unwrap();
        let err = req.validate().unwrap_err();
        assert!(err.field_errors().contains_key("title"));
        assert!(err.field_errors().contains_key("description"));
        assert!(err.field_errors().contains_key("post_type"));
    }
}
