mod common;

use axum::http::StatusCode;
use models::Role;
use serde_json::json;

use common::spawn_app;

#[tokio::test]
async fn scheduling_links_teacher_and_student() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (_, admin) = app.user("admin@example.com", "Admin", Role::Admin).await?;
    let (teacher, teacher_token) = app.user("ustadh@example.com", "Ustadh Yusuf", Role::Teacher).await?;
    let (student, student_token) = app.user("maryam@example.com", "Maryam", Role::Student).await?;

    let resp = app
        .post(
            "/api/admin/schedule",
            Some(&admin),
            json!({"teacher_id": teacher.id, "student_id": student.id, "weekday": 1, "start_time": " 09:30 ", "duration_minutes": 45}),
        )
        .await?;
    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.json()["start_time"], "09:30");

    let swapped = app
        .post(
            "/api/admin/schedule",
            Some(&admin),
            json!({"teacher_id": student.id, "student_id": teacher.id, "weekday": 1, "start_time": "10:00", "duration_minutes": 45}),
        )
        .await?;
    assert_eq!(swapped.status, StatusCode::BAD_REQUEST);

    let mine = app.get("/api/schedule", Some(&student_token)).await?.json();
    assert_eq!(mine[0]["counterpart_name"], "Ustadh Yusuf");
    assert_eq!(mine[0]["as_role"], "student");

    let students = app.get("/api/teacher/students", Some(&teacher_token)).await?.json();
    assert_eq!(students.as_array().map(Vec::len), Some(1));
    assert_eq!(students[0]["name"], "Maryam");

    let feed = app.get("/api/notifications", Some(&teacher_token)).await?.json();
    assert_eq!(feed["unread"], 1);
    Ok(())
}

#[tokio::test]
async fn direct_messages_follow_contacts() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (_, admin) = app.user("admin@example.com", "Admin", Role::Admin).await?;
    let (teacher, teacher_token) = app.user("teacher@example.com", "Teacher", Role::Teacher).await?;
    let (student, student_token) = app.user("student@example.com", "Student", Role::Student).await?;
    let (stranger, _) = app.user("stranger@example.com", "Stranger", Role::Student).await?;

    app.post(
        "/api/admin/schedule",
        Some(&admin),
        json!({"teacher_id": teacher.id, "student_id": student.id, "weekday": 3, "start_time": "17:00", "duration_minutes": 30}),
    )
    .await?;

    let contacts = app.get("/api/inbox/contacts", Some(&student_token)).await?.json();
    let ids: Vec<i64> = contacts.as_array().cloned().unwrap_or_default().iter().filter_map(|c| c["id"].as_i64()).collect();
    assert!(ids.contains(&(teacher.id as i64)));
    assert!(!ids.contains(&(stranger.id as i64)));

    let sent = app.post("/api/inbox", Some(&student_token), json!({"recipient_id": teacher.id, "body": "Assalamu alaikum"})).await?;
    assert_eq!(sent.status, StatusCode::CREATED);
    let msg_id = sent.json()["id"].as_i64().unwrap_or_default();

    let denied = app.post("/api/inbox", Some(&student_token), json!({"recipient_id": stranger.id, "body": "hi"})).await?;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let inbox = app.get("/api/inbox", Some(&teacher_token)).await?.json();
    assert_eq!(inbox["unread"], 1);
    assert_eq!(inbox["groups"][0]["items"][0]["body"], "Assalamu alaikum");
    assert_eq!(inbox["groups"][0]["items"][0]["outgoing"], false);

    let by_sender = app.request("PATCH", &format!("/api/inbox/{msg_id}/read"), Some(&student_token), None).await?;
    assert_eq!(by_sender.status, StatusCode::FORBIDDEN);
    let by_recipient = app.request("PATCH", &format!("/api/inbox/{msg_id}/read"), Some(&teacher_token), None).await?;
    assert_eq!(by_recipient.status, StatusCode::NO_CONTENT);
    assert_eq!(app.get("/api/inbox", Some(&teacher_token)).await?.json()["unread"], 0);
    Ok(())
}

#[tokio::test]
async fn notifications_broadcast_and_read() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (_, admin) = app.user("admin@example.com", "Admin", Role::Admin).await?;
    let (_, s1) = app.user("s1@example.com", "S1", Role::Student).await?;
    app.user("s2@example.com", "S2", Role::Student).await?;

    let resp = app.post("/api/admin/notifications", Some(&admin), json!({"role": "student", "title": "Eid break", "body": "No classes this week"})).await?;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.json()["created"], 2);

    let both = app.post("/api/admin/notifications", Some(&admin), json!({"role": "student", "user_id": 1, "title": "x", "body": "y"})).await?;
    assert_eq!(both.status, StatusCode::BAD_REQUEST);

    let feed = app.get("/api/notifications", Some(&s1)).await?.json();
    assert_eq!(feed["unread"], 1);
    let id = feed["groups"][0]["items"][0]["id"].as_i64().unwrap_or_default();

    let resp = app.request("PATCH", &format!("/api/notifications/{id}/read"), Some(&admin), None).await?;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    let resp = app.request("PATCH", &format!("/api/notifications/{id}/read"), Some(&s1), None).await?;
    assert_eq!(resp.status, StatusCode::OK);

    let resp = app.post("/api/notifications/read-all", Some(&s1), json!({})).await?;
    assert_eq!(resp.json()["updated"], 0);
    Ok(())
}

#[tokio::test]
async fn testimonials_wait_for_approval() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (_, admin) = app.user("admin@example.com", "Admin", Role::Admin).await?;

    let resp = app.post("/api/testimonials", None, json!({"author_name": "Zaid", "content": "Excellent teachers", "rating": 5})).await?;
    assert_eq!(resp.status, StatusCode::CREATED);
    let id = resp.json()["id"].as_i64().unwrap_or_default();
    assert_eq!(app.get("/api/testimonials", None).await?.json(), json!([]));

    let bad = app.post("/api/testimonials", None, json!({"author_name": "Zaid", "content": "x", "rating": 9})).await?;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);

    let resp = app.put(&format!("/api/admin/testimonials/{id}"), Some(&admin), json!({"is_approved": true})).await?;
    assert_eq!(resp.status, StatusCode::OK);
    let public = app.get("/api/testimonials", None).await?.json();
    assert_eq!(public[0]["author_name"], "Zaid");
    Ok(())
}

#[tokio::test]
async fn contact_messages_are_paginated_for_admins() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (_, admin) = app.user("admin@example.com", "Admin", Role::Admin).await?;
    for i in 0..3 {
        let resp = app.post("/api/messages", None, json!({"name": format!("N{i}"), "email": "n@example.com", "body": "Question"})).await?;
        assert_eq!(resp.status, StatusCode::CREATED);
    }
    let page = app.get("/api/admin/messages?page=1&per_page=2", Some(&admin)).await?.json();
    assert_eq!(page["total"], 3);
    assert_eq!(page["items"].as_array().map(Vec::len), Some(2));
    let id = page["items"][0]["id"].as_i64().unwrap_or_default();

    let resp = app.request("PATCH", &format!("/api/admin/messages/{id}"), Some(&admin), Some(json!({"is_read": true}))).await?;
    assert_eq!(resp.status, StatusCode::OK);
    let unread = app.get("/api/admin/messages?unread=true", Some(&admin)).await?.json();
    assert_eq!(unread["total"], 2);
    Ok(())
}
