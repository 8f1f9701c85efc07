mod common;

use axum::http::StatusCode;
use models::Role;
use serde_json::json;

use common::spawn_app;

#[tokio::test]
async fn admin_routes_need_an_admin_session() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (_, student) = app.user("student@example.com", "Student", Role::Student).await?;
    let (_, teacher) = app.user("teacher@example.com", "Teacher", Role::Teacher).await?;

    for path in ["/api/admin/stats", "/api/admin/bookings", "/api/admin/users", "/api/admin/fee-plans"] {
        assert_eq!(app.get(path, None).await?.status, StatusCode::UNAUTHORIZED, "{path}");
        assert_eq!(app.get(path, Some(&student)).await?.status, StatusCode::FORBIDDEN, "{path}");
        assert_eq!(app.get(path, Some(&teacher)).await?.status, StatusCode::FORBIDDEN, "{path}");
    }
    assert_eq!(app.get("/api/teacher/students", Some(&student)).await?.status, StatusCode::FORBIDDEN);
    assert_eq!(app.get("/api/teacher/students", Some(&teacher)).await?.status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn services_are_created_and_listed() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (_, admin) = app.user("admin@example.com", "Admin", Role::Admin).await?;

    let resp = app.post("/api/admin/services", Some(&admin), json!({"title": "Hifz Program", "sort_order": 2})).await?;
    assert_eq!(resp.status, StatusCode::CREATED);
    let id = resp.json()["id"].as_i64().unwrap_or_default();

    let listed = app.get("/api/services", None).await?.json();
    let items = listed.as_array().cloned().unwrap_or_default();
    assert!(items.iter().any(|s| s["id"].as_i64() == Some(id) && s["title"] == "Hifz Program"));

    let resp = app.post("/api/admin/services", Some(&admin), json!({"title": "   "})).await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json()["error"], "Validation Error");
    Ok(())
}

#[tokio::test]
async fn inactive_courses_are_hidden_from_the_public() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (_, admin) = app.user("admin@example.com", "Admin", Role::Admin).await?;

    let resp = app.post("/api/admin/courses", Some(&admin), json!({"title": "Tajweed Basics", "monthly_fee": 3000})).await?;
    assert_eq!(resp.status, StatusCode::CREATED);
    let course = resp.json();
    assert_eq!(course["slug"], "tajweed-basics");
    let id = course["id"].as_i64().unwrap_or_default();

    assert_eq!(app.get(&format!("/api/courses/{id}"), None).await?.status, StatusCode::OK);
    let resp = app.put(&format!("/api/admin/courses/{id}"), Some(&admin), json!({"is_active": false})).await?;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(app.get(&format!("/api/courses/{id}"), None).await?.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/api/courses", None).await?.json(), json!([]));

    let dup = app.post("/api/admin/courses", Some(&admin), json!({"title": "Tajweed Basics", "monthly_fee": 1})).await?;
    assert_eq!(dup.status, StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn booking_status_changes_persist() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (_, admin) = app.user("admin@example.com", "Admin", Role::Admin).await?;

    let resp = app.post("/api/bookings", None, json!({"name": "Bilal", "email": "bilal@example.com"})).await?;
    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.json()["status"], "pending");
    let id = resp.json()["id"].as_i64().unwrap_or_default();

    let resp = app.put(&format!("/api/admin/bookings/{id}"), Some(&admin), json!({"status": "cancelled"})).await?;
    assert_eq!(resp.status, StatusCode::OK);

    let page = app.get("/api/admin/bookings?status=cancelled", Some(&admin)).await?.json();
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["id"].as_i64(), Some(id));
    assert_eq!(page["items"][0]["status"], "cancelled");

    let resp = app.put(&format!("/api/admin/bookings/{id}"), Some(&admin), json!({"status": "shipped"})).await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    let resp = app.put("/api/admin/bookings/9999", Some(&admin), json!({"status": "confirmed"})).await?;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get("/api/admin/bookings?status=bogus", Some(&admin)).await?.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn malformed_path_and_query_values_get_json_errors() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (_, admin) = app.user("admin@example.com", "Admin", Role::Admin).await?;

    let resp = app.put("/api/admin/bookings/abc", Some(&admin), json!({"status": "confirmed"})).await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json()["error"], "Invalid Path");
    assert!(resp.json()["detail"].is_string());

    let resp = app.get("/api/admin/bookings?page=abc", Some(&admin)).await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.json()["error"], "Invalid Query");
    assert!(resp.json()["detail"].is_string());
    Ok(())
}

#[tokio::test]
async fn courses_with_non_latin_titles_get_a_generated_slug() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (_, admin) = app.user("admin@example.com", "Admin", Role::Admin).await?;

    let first = app.post("/api/admin/courses", Some(&admin), json!({"title": "تجويد القرآن"})).await?;
    assert_eq!(first.status, StatusCode::CREATED);
    let slug = first.json()["slug"].as_str().unwrap_or_default().to_string();
    assert!(slug.starts_with("course-"), "{slug}");
    assert_eq!(first.json()["title"], "تجويد القرآن");

    let second = app.post("/api/admin/courses", Some(&admin), json!({"title": "حفظ القرآن"})).await?;
    assert_eq!(second.status, StatusCode::CREATED);
    assert_ne!(second.json()["slug"], first.json()["slug"]);

    let explicit = app.post("/api/admin/courses", Some(&admin), json!({"title": "ناظرہ", "slug": "!!!"})).await?;
    assert_eq!(explicit.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn bookings_reject_unknown_references() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let resp = app.post("/api/bookings", None, json!({"name": "Bilal", "email": "bilal@example.com", "course_id": 42})).await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn settings_round_trip_through_admin() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (_, admin) = app.user("admin@example.com", "Admin", Role::Admin).await?;

    let resp = app.put("/api/admin/settings", Some(&admin), json!({"site_name": "Noor Academy", "currency": "PKR"})).await?;
    assert_eq!(resp.status, StatusCode::OK);
    let all = app.get("/api/settings", None).await?.json();
    assert_eq!(all["site_name"], "Noor Academy");

    let resp = app.put("/api/admin/settings", Some(&admin), json!({"Bad Key": "x"})).await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn admins_cannot_delete_themselves() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (me, admin) = app.user("admin@example.com", "Admin", Role::Admin).await?;
    let resp = app.request("DELETE", &format!("/api/admin/users/{}", me.id), Some(&admin), None).await?;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = app
        .post("/api/admin/users", Some(&admin), json!({"email": "t@example.com", "name": "Ustadh", "role": "teacher", "password": "TeachPass1"}))
        .await?;
    assert_eq!(resp.status, StatusCode::CREATED);
    let id = resp.json()["id"].as_i64().unwrap_or_default();
    let resp = app.request("DELETE", &format!("/api/admin/users/{id}"), Some(&admin), None).await?;
    assert_eq!(resp.status, StatusCode::NO_CONTENT);
    Ok(())
}

#[tokio::test]
async fn dashboard_counts_bookings_by_status() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (_, admin) = app.user("admin@example.com", "Admin", Role::Admin).await?;
    app.post("/api/bookings", None, json!({"name": "A", "email": "a@example.com"})).await?;
    app.post("/api/messages", None, json!({"name": "A", "email": "a@example.com", "body": "Salaam"})).await?;

    let stats = app.get("/api/admin/stats", Some(&admin)).await?.json();
    assert_eq!(stats["bookings"]["pending"], 1);
    assert_eq!(stats["unread_messages"], 1);
    assert_eq!(stats["users"]["admin"], 1);
    Ok(())
}
