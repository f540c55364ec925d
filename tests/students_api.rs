mod common;

use axum::http::StatusCode;
use common::{spawn_app, TestApp};
use serde_json::{json, Value};
use shulea_server::entities::{school, user, user::Role};

struct Fixture {
    school: school::Model,
    parent: user::Model,
    teacher_session: String,
    parent_session: String,
}

async fn fixture(app: &TestApp) -> Fixture {
    let school = app.school("Riverside Primary").await;
    let teacher = app
        .user("teacher@example.com", Some(Role::Teacher), Some(school.id))
        .await;
    let parent = app.user("parent@example.com", Some(Role::Parent), None).await;
    Fixture {
        teacher_session: app.session(teacher.id),
        parent_session: app.session(parent.id),
        school,
        parent,
    }
}

async fn create(app: &TestApp, session: &str, body: Value) -> Value {
    let (status, body) = app.post("/students", session, body).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["student"].clone()
}

#[tokio::test]
async fn created_student_reads_back_identically() {
    let app = spawn_app().await;
    let fx = fixture(&app).await;

    let created = create(
        &app,
        &fx.teacher_session,
        json!({
            "name": "Baraka Otieno",
            "class": "Grade 4",
            "stream": "East",
            "schoolId": fx.school.id,
            "parentId": fx.parent.id
        }),
    )
    .await;

    let id = created["id"].as_i64().unwrap();
    let (status, body) = app.get(&format!("/students/{id}"), &fx.teacher_session).await;
    assert_eq!(status, StatusCode::OK);

    let fetched = &body["student"];
    for field in ["id", "name", "class", "stream", "school_id", "parent_id", "created_at"] {
        assert_eq!(fetched[field], created[field], "{field}");
    }
    assert_eq!(fetched["parent_name"], "parent");
    assert_eq!(fetched["parent_email"], "parent@example.com");
    assert_eq!(fetched["parent_phone"], "+254700000000");
}

#[tokio::test]
async fn updating_class_leaves_other_fields() {
    let app = spawn_app().await;
    let fx = fixture(&app).await;

    let created = create(
        &app,
        &fx.teacher_session,
        json!({"name": "Wanjiru", "class": "Grade 5", "stream": "West", "schoolId": fx.school.id}),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = app
        .put(&format!("/students/{id}"), &fx.teacher_session, json!({"class": "Grade 6"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["student"]["class"], "Grade 6");
    assert_eq!(body["student"]["name"], "Wanjiru");
    assert_eq!(body["student"]["stream"], "West");

    // Explicit null clears, absence keeps
    let (status, body) = app
        .put(
            &format!("/students/{id}"),
            &fx.teacher_session,
            json!({"stream": null, "parentId": fx.parent.id}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["student"]["stream"], Value::Null);
    assert_eq!(body["student"]["parent_id"], fx.parent.id);
    assert_eq!(body["student"]["class"], "Grade 6");
}

#[tokio::test]
async fn create_validates_and_checks_references() {
    let app = spawn_app().await;
    let fx = fixture(&app).await;

    let (status, body) = app
        .post("/students", &fx.teacher_session, json!({"name": "No Class", "schoolId": fx.school.id}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name, class, and school ID are required");

    let (status, _) = app
        .post("/students", &fx.teacher_session, json!({"name": "", "class": "G1", "schoolId": fx.school.id}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post("/students", &fx.teacher_session, json!({"name": "A", "class": "G1", "schoolId": 999}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .post(
            "/students",
            &fx.teacher_session,
            json!({"name": "A", "class": "G1", "schoolId": fx.school.id, "parentId": 999}),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Parent not found");

    let (status, _) = app.post("/students", &fx.teacher_session, json!("not an object")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn parents_cannot_manage_the_roster() {
    let app = spawn_app().await;
    let fx = fixture(&app).await;

    let (status, _) = app
        .post(
            "/students",
            &fx.parent_session,
            json!({"name": "A", "class": "G1", "schoolId": fx.school.id}),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn update_rejects_empty_and_unknown() {
    let app = spawn_app().await;
    let fx = fixture(&app).await;

    let created = create(
        &app,
        &fx.teacher_session,
        json!({"name": "Kip", "class": "Grade 2", "schoolId": fx.school.id}),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let (status, _) = app.put(&format!("/students/{id}"), &fx.teacher_session, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .put("/students/4242", &fx.teacher_session, json!({"name": "Ghost"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get("/students/4242", &fx.teacher_session).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_filters_and_sorts_by_name() {
    let app = spawn_app().await;
    let fx = fixture(&app).await;
    let other_school = app.school("Lakeview").await;

    create(
        &app,
        &fx.teacher_session,
        json!({"name": "Zawadi", "class": "Grade 3", "schoolId": fx.school.id, "parentId": fx.parent.id}),
    )
    .await;
    create(
        &app,
        &fx.teacher_session,
        json!({"name": "Achieng", "class": "Grade 3", "schoolId": fx.school.id}),
    )
    .await;
    create(
        &app,
        &fx.teacher_session,
        json!({"name": "Musa", "class": "Grade 4", "schoolId": other_school.id}),
    )
    .await;

    let (status, body) = app.get("/students", &fx.parent_session).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["students"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Achieng", "Musa", "Zawadi"]);

    let (_, body) = app
        .get(&format!("/students?schoolId={}&class=Grade%203", fx.school.id), &fx.parent_session)
        .await;
    assert_eq!(body["students"].as_array().unwrap().len(), 2);

    let (_, body) = app
        .get(&format!("/students?parentId={}", fx.parent.id), &fx.parent_session)
        .await;
    let mine = body["students"].as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["name"], "Zawadi");
    assert_eq!(mine[0]["parent_name"], "parent");
}

#[tokio::test]
async fn blank_filters_are_ignored_and_bad_ids_are_rejected() {
    let app = spawn_app().await;
    let fx = fixture(&app).await;

    create(
        &app,
        &fx.teacher_session,
        json!({"name": "Baraka", "class": "Grade 1", "schoolId": fx.school.id}),
    )
    .await;

    let (status, body) = app
        .get("/students?parentId=&schoolId=&class=", &fx.parent_session)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["students"].as_array().unwrap().len(), 1);

    let (status, body) = app.get("/students?schoolId=abc", &fx.parent_session).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = app.get("/students/abc", &fx.parent_session).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}
