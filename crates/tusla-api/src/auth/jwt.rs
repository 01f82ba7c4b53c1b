//! JWT issuing and verification (HS256)

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use tusla_core::{models::User, AppError};

use crate::auth::models::JwtClaims;

/// Issue a token for a freshly authenticated user.
pub fn issue_token(user: &User, secret: &str, expiry_hours: i64) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = JwtClaims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role,
        iat: now.timestamp(),
        exp: (now + Duration::hours(expiry_hours)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
}

/// Verify a token and return its claims. Expired or tampered tokens are
/// rejected as `Unauthorized`.
pub fn verify_token(token: &str, secret: &str) -> Result<JwtClaims, AppError> {
    decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tusla_core::models::UserRole;
    use uuid::Uuid;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn sample_user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            first_name: "Bat".to_string(),
            last_name: "Erdene".to_string(),
            phone: None,
            is_volunteering: false,
            email: "bat@example.com".to_string(),
            role: UserRole::User,
            profile_url: None,
            password_hash: "hash".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_token_round_trip() {
        let user = sample_user();
        let token = issue_token(&user, SECRET, 24).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, UserRole::User);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_token(&sample_user(), SECRET, 24).unwrap();
        let err = verify_token(&token, "another-secret-another-secret-xx").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = issue_token(&sample_user(), SECRET, -1).unwrap();
        let err = verify_token(&token, SECRET).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(verify_token("not.a.token", SECRET).is_err());
    }
}
