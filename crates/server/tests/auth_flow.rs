mod common;

use axum::http::StatusCode;
use models::{Role, UserStatus};
use serde_json::json;
use service::user_service::{self, UpdateUserInput};

use common::{spawn_app, PASSWORD};

#[tokio::test]
async fn health_reports_ok() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let resp = app.get("/health", None).await?;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn register_login_me_logout() -> anyhow::Result<()> {
    let app = spawn_app().await?;

    let resp = app
        .post("/api/auth/register", None, json!({"email": "Amina@Example.com", "name": "Amina", "password": PASSWORD}))
        .await?;
    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.json()["role"], "student");
    assert_eq!(resp.json()["email"], "amina@example.com");

    let resp = app.post("/api/auth/login", None, json!({"email": "amina@example.com", "password": PASSWORD})).await?;
    assert_eq!(resp.status, StatusCode::OK);
    let cookie = resp.headers.get("set-cookie").and_then(|v| v.to_str().ok()).unwrap_or_default().to_string();
    assert!(cookie.starts_with("session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    let token = resp.json()["token"].as_str().unwrap_or_default().to_string();

    // Cookie and bearer both identify the caller
    let cookie_pair = cookie.split(';').next().unwrap_or_default().to_string();
    let req = axum::http::Request::builder()
        .uri("/api/auth/me")
        .header("cookie", cookie_pair)
        .body(axum::body::Body::empty())?;
    let resp = tower::ServiceExt::oneshot(app.router.clone(), req).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.get("/api/auth/me", Some(&token)).await?;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["name"], "Amina");

    let resp = app.post("/api/auth/logout", None, json!({})).await?;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    assert!(resp.headers.get("set-cookie").is_some());
    Ok(())
}

#[tokio::test]
async fn me_requires_a_session() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    assert_eq!(app.get("/api/auth/me", None).await?.status, StatusCode::UNAUTHORIZED);
    let resp = app.get("/api/auth/me", Some("not-a-jwt")).await?;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.json()["error"], "Unauthorized");
    Ok(())
}

#[tokio::test]
async fn duplicate_and_invalid_registrations_are_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let body = json!({"email": "dup@example.com", "name": "Dup", "password": PASSWORD});
    assert_eq!(app.post("/api/auth/register", None, body.clone()).await?.status, StatusCode::CREATED);
    assert_eq!(app.post("/api/auth/register", None, body).await?.status, StatusCode::CONFLICT);

    let short = json!({"email": "short@example.com", "name": "Short", "password": "abc"});
    assert_eq!(app.post("/api/auth/register", None, short).await?.status, StatusCode::BAD_REQUEST);

    let bad_email = json!({"email": "nope", "name": "X", "password": PASSWORD});
    assert_eq!(app.post("/api/auth/register", None, bad_email).await?.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_unauthorized() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    app.user("s@example.com", "S", Role::Student).await?;
    let resp = app.post("/api/auth/login", None, json!({"email": "s@example.com", "password": "wrong-password"})).await?;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn disabled_accounts_cannot_log_in_or_use_sessions() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (user, token) = app.user("gone@example.com", "Gone", Role::Student).await?;
    user_service::update_user(&app.state.db, user.id, UpdateUserInput { status: Some(UserStatus::Disabled), ..Default::default() }).await?;

    let resp = app.post("/api/auth/login", None, json!({"email": "gone@example.com", "password": PASSWORD})).await?;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
    assert_eq!(app.get("/api/auth/me", Some(&token)).await?.status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn change_password_checks_current() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (_, token) = app.user("pw@example.com", "Pw", Role::Teacher).await?;

    let wrong = json!({"current_password": "not-it-at-all", "new_password": "AnotherPass1"});
    assert_eq!(app.post("/api/auth/password", Some(&token), wrong).await?.status, StatusCode::UNAUTHORIZED);

    let ok = json!({"current_password": PASSWORD, "new_password": "AnotherPass1"});
    assert_eq!(app.post("/api/auth/password", Some(&token), ok).await?.status, StatusCode::NO_CONTENT);

    let resp = app.post("/api/auth/login", None, json!({"email": "pw@example.com", "password": "AnotherPass1"})).await?;
    assert_eq!(resp.status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn malformed_body_and_unknown_api_paths_answer_in_json() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let resp = app.post("/api/auth/login", None, json!({"email": 5})).await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json()["error"], "Invalid Body");

    let resp = app.get("/api/does-not-exist", None).await?;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.json()["error"], "Not Found");
    Ok(())
}

#[tokio::test]
async fn openapi_document_is_served() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let resp = app.get("/api-docs/openapi.json", None).await?;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.json()["paths"]["/api/auth/login"].is_object());
    Ok(())
}
