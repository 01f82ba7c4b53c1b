//! Route configuration and setup

use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    routing::{delete, get, post, put},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use tusla_core::Config;

use crate::auth::middleware::{auth_middleware, AuthState};
use crate::constants::{API_PREFIX, MAX_REQUEST_BODY_BYTES};
use crate::handlers;
use crate::state::AppState;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;

    let auth_state = Arc::new(AuthState {
        jwt_secret: config.jwt_secret.clone(),
    });

    let protected = protected_routes().layer(axum::middleware::from_fn_with_state(
        auth_state,
        auth_middleware,
    ));

    let app = public_routes()
        .merge(protected)
        .merge(Into::<Router<Arc<AppState>>>::into(
            utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"),
        ))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .map(|o| {
                o.parse()
                    .map_err(|_| anyhow::anyhow!("Invalid CORS origin: {}", o))
            })
            .collect::<Result<_, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([
                axum::http::header::AUTHORIZATION,
                axum::http::header::CONTENT_TYPE,
            ])
    };
    Ok(cors)
}

/// Routes that require no authentication
fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/users/register", API_PREFIX),
            post(handlers::users::register),
        )
        .route(
            &format!("{}/users/login", API_PREFIX),
            post(handlers::users::login),
        )
        .route(
            &format!("{}/posts", API_PREFIX),
            get(handlers::posts::list_posts),
        )
        .route(
            &format!("{}/categories", API_PREFIX),
            get(handlers::categories::list_categories),
        )
        .route(
            &format!("{}/categories/{{id}}", API_PREFIX),
            get(handlers::categories::get_category),
        )
        .route(
            &format!("{}/health", API_PREFIX),
            get(handlers::health::health_check),
        )
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
}

/// Routes behind bearer-token authentication
fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/users", API_PREFIX),
            get(handlers::users::list_users),
        )
        .route(
            &format!("{}/users/me", API_PREFIX),
            get(handlers::users::get_me),
        )
        .route(
            &format!("{}/users/me/details", API_PREFIX),
            put(handlers::users::update_my_details),
        )
        .route(
            &format!("{}/users/me/email", API_PREFIX),
            put(handlers::users::update_my_email),
        )
        .route(
            &format!("{}/users/me/password", API_PREFIX),
            put(handlers::users::update_my_password),
        )
        .route(
            &format!("{}/users/by-email", API_PREFIX),
            get(handlers::users::get_user_by_email),
        )
        .route(
            &format!("{}/users/{{id}}", API_PREFIX),
            get(handlers::users::get_user).delete(handlers::users::delete_user),
        )
        .route(
            &format!("{}/users/{{id}}/posts", API_PREFIX),
            get(handlers::users::list_user_posts),
        )
        .route(
            &format!("{}/users/{{id}}/stats", API_PREFIX),
            get(handlers::users::get_user_stats),
        )
        .route(
            &format!("{}/posts", API_PREFIX),
            post(handlers::posts::create_post),
        )
        .route(
            &format!("{}/posts/{{id}}", API_PREFIX),
            get(handlers::posts::get_post)
                .put(handlers::posts::update_post)
                .delete(handlers::posts::delete_post),
        )
        .route(
            &format!("{}/posts/volunteers", API_PREFIX),
            get(handlers::volunteers::list_volunteers),
        )
        .route(
            &format!("{}/posts/volunteers/{{user_id}}", API_PREFIX),
            delete(handlers::volunteers::remove),
        )
        .route(
            &format!("{}/posts/{{id}}/volunteers", API_PREFIX),
            post(handlers::volunteers::apply),
        )
        .route(
            &format!("{}/volunteers/approve", API_PREFIX),
            post(handlers::volunteers::approve),
        )
        .route(
            &format!("{}/volunteers/reject", API_PREFIX),
            post(handlers::volunteers::reject),
        )
}
