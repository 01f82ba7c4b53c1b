//! Authorization rules: only authors manage their posts and decide on
//! applications, and accounts can only be deleted by their owner.

mod helpers;

use axum::http::StatusCode;
use serde_json::{json, Value};

use helpers::{api_path, create_post, register_user, setup_test_app};

#[tokio::test]
async fn test_only_the_author_updates_or_deletes_a_post() {
    let app = setup_test_app().await;
    let (_author_id, author_token) = register_user(&app, "author@example.com").await;
    let (_other_id, other_token) = register_user(&app, "other@example.com").await;

    let post_id = create_post(&app, &author_token, "Гэр цэвэрлэх").await;
    let path = api_path(&format!("/posts/{}", post_id));

    let response = app
        .server
        .put(&path)
        .authorization_bearer(&other_token)
        .json(&json!({"title": "hijacked"}))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = app
        .server
        .delete(&path)
        .authorization_bearer(&other_token)
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = app
        .server
        .put(&path)
        .authorization_bearer(&author_token)
        .json(&json!({"title": "Гэр цэвэрлэх (шинэчилсэн)"}))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["title"],
        "Гэр цэвэрлэх (шинэчилсэн)"
    );

    let response = app
        .server
        .delete(&path)
        .authorization_bearer(&author_token)
        .await;
    response.assert_status(StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_only_the_author_decides_on_applications() {
    let app = setup_test_app().await;
    let (_author_id, author_token) = register_user(&app, "author@example.com").await;
    let (volunteer_id, volunteer_token) = register_user(&app, "volunteer@example.com").await;
    let (_other_id, other_token) = register_user(&app, "other@example.com").await;

    let post_id = create_post(&app, &author_token, "Сургуулийн тоглолт").await;

    let response = app
        .server
        .post(&api_path(&format!("/posts/{}/volunteers", post_id)))
        .authorization_bearer(&volunteer_token)
        .json(&json!({}))
        .await;
    response.assert_status(StatusCode::CREATED);

    let decision = json!({"post_id": post_id, "user_id": volunteer_id});

    let response = app
        .server
        .post(&api_path("/volunteers/approve"))
        .authorization_bearer(&other_token)
        .json(&decision)
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = app
        .server
        .post(&api_path("/volunteers/reject"))
        .authorization_bearer(&other_token)
        .json(&decision)
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = app
        .server
        .post(&api_path("/volunteers/approve"))
        .authorization_bearer(&author_token)
        .json(&decision)
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_accounts_are_only_deletable_by_their_owner() {
    let app = setup_test_app().await;
    let (target_id, _target_token) = register_user(&app, "target@example.com").await;
    let (_other_id, other_token) = register_user(&app, "other@example.com").await;

    let response = app
        .server
        .delete(&api_path(&format!("/users/{}", target_id)))
        .authorization_bearer(&other_token)
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
}
