//! End-to-end volunteer workflow: apply, decide, and the cached counter.

mod helpers;

use axum::http::StatusCode;
use serde_json::{json, Value};

use helpers::{api_path, create_post, register_user, setup_test_app};

#[tokio::test]
async fn test_apply_approve_reject_drives_volunteer_counter() {
    let app = setup_test_app().await;
    let (_owner_id, owner_token) = register_user(&app, "owner@example.com").await;
    let (volunteer_id, volunteer_token) = register_user(&app, "volunteer@example.com").await;

    let post_id = create_post(&app, &owner_token, "Нүүлгэхэд туслаач").await;

    let response = app
        .server
        .post(&api_path(&format!("/posts/{}/volunteers", post_id)))
        .authorization_bearer(&volunteer_token)
        .json(&json!({"notes": "I can help on weekends"}))
        .await;
    response.assert_status(StatusCode::CREATED);

    let response = app
        .server
        .post(&api_path("/volunteers/approve"))
        .authorization_bearer(&owner_token)
        .json(&json!({"post_id": post_id, "user_id": volunteer_id}))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "approved");
    assert_eq!(body["user_id"], volunteer_id.to_string());

    let post: Value = app
        .server
        .get(&api_path(&format!("/posts/{}", post_id)))
        .authorization_bearer(&owner_token)
        .await
        .json();
    assert_eq!(post["current_volunteers"], 1);

    // A repeated approval rewrites the same row and must not drift the counter.
    let response = app
        .server
        .post(&api_path("/volunteers/approve"))
        .authorization_bearer(&owner_token)
        .json(&json!({"post_id": post_id, "user_id": volunteer_id}))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "approved");

    let post: Value = app
        .server
        .get(&api_path(&format!("/posts/{}", post_id)))
        .authorization_bearer(&owner_token)
        .await
        .json();
    assert_eq!(post["current_volunteers"], 1);

    let response = app
        .server
        .post(&api_path("/volunteers/reject"))
        .authorization_bearer(&owner_token)
        .json(&json!({"post_id": post_id, "user_id": volunteer_id}))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "rejected");

    let post: Value = app
        .server
        .get(&api_path(&format!("/posts/{}", post_id)))
        .authorization_bearer(&owner_token)
        .await
        .json();
    assert_eq!(post["current_volunteers"], 0);
}

#[tokio::test]
async fn test_duplicate_application_conflicts() {
    let app = setup_test_app().await;
    let (_owner_id, owner_token) = register_user(&app, "owner@example.com").await;
    let (_volunteer_id, volunteer_token) = register_user(&app, "volunteer@example.com").await;

    let post_id = create_post(&app, &owner_token, "Хогоо цэвэрлэе").await;

    let path = api_path(&format!("/posts/{}/volunteers", post_id));
    let response = app
        .server
        .post(&path)
        .authorization_bearer(&volunteer_token)
        .json(&json!({}))
        .await;
    response.assert_status(StatusCode::CREATED);

    let response = app
        .server
        .post(&path)
        .authorization_bearer(&volunteer_token)
        .json(&json!({}))
        .await;
    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_owner_cannot_apply_to_own_post() {
    let app = setup_test_app().await;
    let (_owner_id, owner_token) = register_user(&app, "owner@example.com").await;

    let post_id = create_post(&app, &owner_token, "Туслах хүсэлт").await;

    let response = app
        .server
        .post(&api_path(&format!("/posts/{}/volunteers", post_id)))
        .authorization_bearer(&owner_token)
        .json(&json!({}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_volunteer_listing_spans_all_posts() {
    let app = setup_test_app().await;
    let (_owner_id, owner_token) = register_user(&app, "owner@example.com").await;
    let (volunteer_id, volunteer_token) = register_user(&app, "volunteer@example.com").await;
    let (_bystander_id, bystander_token) = register_user(&app, "bystander@example.com").await;

    let post_id = create_post(&app, &owner_token, "Мод тарих").await;

    let response = app
        .server
        .post(&api_path(&format!("/posts/{}/volunteers", post_id)))
        .authorization_bearer(&volunteer_token)
        .json(&json!({}))
        .await;
    response.assert_status(StatusCode::CREATED);

    // The listing is platform-wide: a user with no stake in the post still
    // sees the application.
    let response = app
        .server
        .get(&api_path("/posts/volunteers"))
        .authorization_bearer(&bystander_token)
        .await;
    response.assert_status_ok();
    let applications: Vec<Value> = response.json();
    assert_eq!(applications.len(), 1);
    assert_eq!(applications[0]["post_id"], post_id.to_string());
    assert_eq!(applications[0]["user_id"], volunteer_id.to_string());
}
