use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use tusla_core::AppError;

use crate::auth::jwt::verify_token;
use crate::auth::models::AuthUser;
use crate::error::HttpAppError;

#[derive(Clone)]
pub struct AuthState {
    pub jwt_secret: String,
}

/// Bearer-token middleware for the protected route group. On success the
/// verified caller is inserted into request extensions as [`AuthUser`].
pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => {
            return HttpAppError(AppError::Unauthorized(
                "Missing authorization header".to_string(),
            ))
            .into_response();
        }
    };

    let token = match auth_header.strip_prefix("Bearer ") {
        Some(token) => token,
        None => {
            return HttpAppError(AppError::Unauthorized(
                "Invalid authorization header format".to_string(),
            ))
            .into_response();
        }
    };

    let claims = match verify_token(token, &auth_state.jwt_secret) {
        Ok(claims) => claims,
        Err(e) => return HttpAppError(e).into_response(),
    };

    request.extensions_mut().insert(AuthUser {
        id: claims.sub,
        email: claims.email,
        role: claims.role,
    });

    next.run(request).await
}
