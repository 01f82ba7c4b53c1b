//! Registration payload contract and credential updates.

mod helpers;

use axum::http::StatusCode;
use axum_test::multipart::MultipartForm;
use serde_json::{json, Value};

use helpers::{api_path, register_user, setup_test_app, TEST_PASSWORD};

#[tokio::test]
async fn test_register_persists_the_full_payload() {
    let app = setup_test_app().await;

    let payload = json!({
        "first_name": "Sarnai",
        "last_name": "Bold",
        "phone": "99112233",
        "is_volunteering": true,
        "email": "sarnai@example.com",
        "role": "organization",
        "profile_url": "https://cdn.example/sarnai.png",
        "password": TEST_PASSWORD,
    });
    let form = MultipartForm::new().add_text("userData", payload.to_string());

    let response = app
        .server
        .post(&api_path("/users/register"))
        .multipart(form)
        .await;
    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["is_volunteering"], true);
    assert_eq!(body["role"], "organization");
    assert_eq!(body["profile_url"], "https://cdn.example/sarnai.png");
    assert_eq!(body["phone"], "99112233");
}

#[tokio::test]
async fn test_register_without_role_is_rejected() {
    let app = setup_test_app().await;

    let payload = json!({
        "first_name": "Sarnai",
        "last_name": "Bold",
        "email": "sarnai@example.com",
        "password": TEST_PASSWORD,
    });
    let form = MultipartForm::new().add_text("userData", payload.to_string());

    let response = app
        .server
        .post(&api_path("/users/register"))
        .multipart(form)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_email_and_password_change_without_current_password() {
    let app = setup_test_app().await;
    let (_user_id, token) = register_user(&app, "before@example.com").await;

    let response = app
        .server
        .put(&api_path("/users/me/email"))
        .authorization_bearer(&token)
        .json(&json!({"email": "after@example.com"}))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["email"], "after@example.com");

    let response = app
        .server
        .put(&api_path("/users/me/password"))
        .authorization_bearer(&token)
        .json(&json!({"new_password": "brand-new-password"}))
        .await;
    response.assert_status(StatusCode::NO_CONTENT);

    let response = app
        .server
        .post(&api_path("/users/login"))
        .json(&json!({"email": "after@example.com", "password": "brand-new-password"}))
        .await;
    response.assert_status_ok();

    let response = app
        .server
        .post(&api_path("/users/login"))
        .json(&json!({"email": "after@example.com", "password": TEST_PASSWORD}))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}
