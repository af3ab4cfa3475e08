//! Router tests against an in-memory SQLite backend.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use catalog_core::Coordinator;
use catalog_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::api_router;

async fn app() -> Router {
  let store = SqliteStore::open_in_memory().await.expect("in-memory store");
  let catalog = Coordinator::new(store.clone(), store.clone(), store);
  api_router(Arc::new(catalog))
}

async fn call(
  app: &Router,
  method: &str,
  uri: &str,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let builder = Request::builder().method(method).uri(uri);
  let request = match body {
    Some(body) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string())),
    None => builder.body(Body::empty()),
  }
  .unwrap();

  let response = app.clone().oneshot(request).await.unwrap();
  let status = response.status();
  let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
    .await
    .unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

fn id_of(value: &Value, field: &str) -> String {
  value[field].as_str().unwrap().to_owned()
}

// ─── Faculties ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn faculty_image_round_trips_as_base64() {
  let app = app().await;

  let (status, created) = call(
    &app,
    "POST",
    "/faculties",
    Some(json!({ "name": "Engineering", "image": "AQID" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(created["image"], "AQID");
  assert_eq!(created["major_ids"], json!([]));

  let id = id_of(&created, "faculty_id");
  let (status, updated) = call(
    &app,
    "PUT",
    &format!("/faculties/{id}"),
    Some(json!({ "name": "Eng" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(updated["name"], "Eng");
  assert_eq!(updated["image"], "AQID");
}

#[tokio::test]
async fn bad_base64_is_bad_request() {
  let app = app().await;
  let (status, body) = call(
    &app,
    "POST",
    "/faculties",
    Some(json!({ "name": "X", "image": "!!!" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("base64"));
}

#[tokio::test]
async fn malformed_id_is_bad_request() {
  let app = app().await;
  let (status, body) = call(&app, "GET", "/faculties/not-an-id", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn missing_faculty_is_not_found() {
  let app = app().await;
  let (status, _) =
    call(&app, "DELETE", "/faculties/0123456789abcdef01234567", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Hierarchy ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_move_and_delete_through_http() {
  let app = app().await;

  let (_, eng) = call(&app, "POST", "/faculties", Some(json!({ "name": "Engineering" }))).await;
  let (_, sci) = call(&app, "POST", "/faculties", Some(json!({ "name": "Science" }))).await;
  let eng_id = id_of(&eng, "faculty_id");
  let sci_id = id_of(&sci, "faculty_id");

  let (status, cs) = call(
    &app,
    "POST",
    "/majors",
    Some(json!({ "name": "Computer Science", "faculty_id": eng_id })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  let cs_id = id_of(&cs, "major_id");

  let (_, math) = call(
    &app,
    "POST",
    "/majors",
    Some(json!({ "name": "Mathematics", "faculty_id": sci_id })),
  )
  .await;
  let math_id = id_of(&math, "major_id");

  let (status, subject) = call(
    &app,
    "POST",
    "/subjects",
    Some(json!({ "major_id": cs_id, "code": "CS101", "name": "Intro", "credit": 3 })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(subject["status"], "AVAILABLE");
  let subject_id = id_of(&subject, "subject_id");

  let (_, listed) = call(&app, "GET", &format!("/majors/{cs_id}/subjects"), None).await;
  assert_eq!(listed.as_array().unwrap().len(), 1);

  let (status, moved) = call(
    &app,
    "PUT",
    &format!("/subjects/{subject_id}"),
    Some(json!({ "major_id": math_id, "name": "Intro to CS", "code": "" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(moved["name"], "Intro to CS");
  assert_eq!(moved["code"], "CS101");
  assert_eq!(moved["credit"], 3);

  let (_, cs) = call(&app, "GET", &format!("/majors/{cs_id}"), None).await;
  assert_eq!(cs["subject_ids"], json!([]));
  let (_, math) = call(&app, "GET", &format!("/majors/{math_id}"), None).await;
  assert_eq!(math["subject_ids"], json!([subject_id]));

  let (status, _) = call(&app, "DELETE", &format!("/subjects/{subject_id}"), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  let (_, math) = call(&app, "GET", &format!("/majors/{math_id}"), None).await;
  assert_eq!(math["subject_ids"], json!([]));

  let (_, majors) = call(&app, "GET", &format!("/faculties/{eng_id}/majors"), None).await;
  assert_eq!(majors[0]["name"], "Computer Science");
}

#[tokio::test]
async fn update_major_with_no_fields_changes_nothing() {
  let app = app().await;
  let (_, f) = call(&app, "POST", "/faculties", Some(json!({ "name": "F" }))).await;
  let (_, m) = call(
    &app,
    "POST",
    "/majors",
    Some(json!({ "name": "M", "faculty_id": id_of(&f, "faculty_id") })),
  )
  .await;
  let m_id = id_of(&m, "major_id");

  let (status, after) = call(
    &app,
    "PUT",
    &format!("/majors/{m_id}"),
    Some(json!({ "name": "", "faculty_id": "" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(after["name"], "M");
}

// ─── Likes ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn likes_are_deduplicated_per_email() {
  let app = app().await;
  let (_, f) = call(&app, "POST", "/faculties", Some(json!({ "name": "F" }))).await;
  let (_, m) = call(
    &app,
    "POST",
    "/majors",
    Some(json!({ "name": "M", "faculty_id": id_of(&f, "faculty_id") })),
  )
  .await;
  let (_, s) = call(
    &app,
    "POST",
    "/subjects",
    Some(json!({ "major_id": id_of(&m, "major_id"), "code": "C", "name": "N" })),
  )
  .await;
  let uri = format!("/subjects/{}/likes", id_of(&s, "subject_id"));

  let (_, first) = call(&app, "POST", &uri, Some(json!({ "email": "a@x.com" }))).await;
  let (_, again) = call(&app, "POST", &uri, Some(json!({ "email": "a@x.com" }))).await;
  assert_eq!(first["added"], true);
  assert_eq!(again["added"], false);

  let (_, subject) = call(&app, "GET", &format!("/subjects/{}", id_of(&s, "subject_id")), None).await;
  assert_eq!(subject["likes"], 1);

  let (status, _) = call(&app, "PUT", &uri, Some(json!({ "likes": 7 }))).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  let (_, subject) = call(&app, "GET", &format!("/subjects/{}", id_of(&s, "subject_id")), None).await;
  assert_eq!(subject["likes"], 7);
  assert_eq!(subject["like_list"], json!(["a@x.com"]));
}

#[tokio::test]
async fn empty_like_email_is_rejected() {
  let app = app().await;
  let (status, _) = call(
    &app,
    "POST",
    "/subjects/0123456789abcdef01234567/likes",
    Some(json!({ "email": "" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_like_count_is_bad_request() {
  let app = app().await;
  let (_, f) = call(&app, "POST", "/faculties", Some(json!({ "name": "F" }))).await;
  let (_, m) = call(
    &app,
    "POST",
    "/majors",
    Some(json!({ "name": "M", "faculty_id": id_of(&f, "faculty_id") })),
  )
  .await;
  let (_, s) = call(
    &app,
    "POST",
    "/subjects",
    Some(json!({ "major_id": id_of(&m, "major_id"), "code": "C", "name": "N" })),
  )
  .await;
  let uri = format!("/subjects/{}/likes", id_of(&s, "subject_id"));

  let (status, body) = call(&app, "PUT", &uri, Some(json!({ "likes": u64::MAX }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("likes"));

  let (status, _) = call(&app, "PUT", &uri, Some(json!({ "likes": i64::MAX }))).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
}
