use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Account role. Stored as a Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
    Organization,
}

/// User account row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub is_volunteering: bool,
    pub email: String,
    pub role: UserRole,
    pub profile_url: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User representation returned to clients. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub is_volunteering: bool,
    pub email: String,
    pub role: UserRole,
    pub profile_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            is_volunteering: user.is_volunteering,
            email: user.email,
            role: user.role,
            profile_url: user.profile_url,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Registration payload, carried in the `userData` multipart field.
/// Role is required; a payload without one is rejected.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 255, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 255, message = "Last name is required"))]
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub is_volunteering: bool,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    pub role: UserRole,
    #[serde(default)]
    pub profile_url: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateUserDetailsRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "First name cannot be empty"))]
    pub first_name: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "Last name cannot be empty"))]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub is_volunteering: Option<bool>,
    #[serde(default)]
    pub profile_url: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateUserEmailRequest {
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateUserPasswordRequest {
    #[validate(length(min = 8, message = "New password must be at least 8 characters"))]
    pub new_password: String,
}

/// Aggregate counts shown on a profile page
#[derive(Debug, Serialize, ToSchema)]
pub struct UserStats {
    pub post_count: i64,
    pub volunteer_count: i64,
    pub approved_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_request_validation() {
        let req = CreateUserRequest {
            first_name: "Bat".to_string(),
            last_name: "Erdene".to_string(),
            phone: None,
            is_volunteering: false,
            email: "bat@example.com".to_string(),
            role: UserRole::User,
            profile_url: None,
            password: "hunter2hunter2".to_string(),
        };
        assert!(req.validate().is_ok());

        let req = CreateUserRequest {
            first_name: "".to_string(),
            last_name: "Erdene".to_string(),
            phone: None,
            is_volunteering: false,
            email: "not-an-email".to_string(),
            role: UserRole::User,
            profile_url: None,
            password: "short".to_string(),
        };
        let err = req.validate().unwrap_err();
        assert!(err.field_errors().contains_key("first_name"));
        assert!(err.field_errors().contains_key("email"));
        assert!(err.field_errors().contains_key("password"));
    }

    #[test]
    fn test_create_user_request_carries_full_field_set() {
        let req: CreateUserRequest = serde_json::from_str(
            r#"{
                "first_name": "Bat",
                "last_name": "Erdene",
                "is_volunteering": true,
                "email": "bat@example.com",
                "role": "organization",
                "profile_url": "https://cdn.example/bat.png",
                "password": "hunter2hunter2"
            }"#,
        )
        .unwrap();
        assert!(req.is_volunteering);
        assert_eq!(req.role, UserRole::Organization);
        assert_eq!(req.profile_url.as_deref(), Some("https://cdn.example/bat.png"));
    }

    #[test]
    fn test_create_user_request_requires_role() {
        let result: Result<CreateUserRequest, _> = serde_json::from_str(
            r#"{
                "first_name": "Bat",
                "last_name": "Erdene",
                "email": "bat@example.com",
                "password": "hunter2hunter2"
            }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_password_update_needs_only_new_password() {
        let req: UpdateUserPasswordRequest =
            serde_json::from_str(r#"{"new_password": "freshfresh1"}"#).unwrap();
        assert!(req.validate().is_ok());

        let req: UpdateUserEmailRequest =
            serde_json::from_str(r#"{"email": "new@example.com"}"#).unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_user_response_excludes_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            first_name: "Bat".to_string(),
            last_name: "Erdene".to_string(),
            phone: None,
            is_volunteering: false,
            email: "bat@example.com".to_string(),
            role: UserRole::User,
            profile_url: None,
            password_hash: "$2b$12$secret".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&UserResponse::from(user)).unwrap();
        assert!(!json.contains("password"));
        assert!(json.contains("\"role\":\"user\""));
    }
}
