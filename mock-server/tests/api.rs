use axum::{
    http::{self, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use mock_server::{app, SkinRecord};
use serde_json::Value;
use tower::ServiceExt;

const BOUNDARY: &str = "test-boundary";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn delete(uri: &str) -> Request<String> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(String::new())
        .unwrap()
}

/// Multipart body with text fields and, optionally, one `image` file part.
fn form(fields: &[(&str, &str)], image: Option<(&str, &str)>) -> Request<String> {
    let mut body = String::new();
    if let Some((file_name, content)) = image {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n{content}\r\n"
        ));
    }
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    Request::builder()
        .method("POST")
        .uri("/api/records/")
        .header(
            http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(body)
        .unwrap()
}

async fn create(app: &Router, date: &str, memo: &str) -> SkinRecord {
    let resp = app
        .clone()
        .oneshot(form(&[("memo", memo), ("date", date)], None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await
}

// --- list ---

#[tokio::test]
async fn list_records_empty() {
    let resp = app().oneshot(get("/api/records/")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let records: Vec<SkinRecord> = body_json(resp).await;
    assert!(records.is_empty());
}

#[tokio::test]
async fn list_records_newest_date_first() {
    let app = app();
    create(&app, "2025-01-02", "b").await;
    create(&app, "2025-01-03", "c").await;
    create(&app, "2025-01-01", "a").await;

    let resp = app.oneshot(get("/api/records/")).await.unwrap();
    let records: Vec<SkinRecord> = body_json(resp).await;
    let memos: Vec<&str> = records.iter().map(|r| r.memo.as_str()).collect();
    assert_eq!(memos, vec!["c", "b", "a"]);
}

// --- create ---

#[tokio::test]
async fn create_record_returns_201_with_sequential_ids() {
    let app = app();
    let first = create(&app, "2025-01-01", "m").await;
    let second = create(&app, "2025-01-02", "").await;

    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);
    assert_eq!(first.memo, "m");
    assert_eq!(first.date.to_string(), "2025-01-01");
    assert!(first.image.is_none());
}

#[tokio::test]
async fn create_record_memo_is_optional() {
    let resp = app()
        .oneshot(form(&[("date", "2025-01-01")], None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let record: SkinRecord = body_json(resp).await;
    assert_eq!(record.memo, "");
}

#[tokio::test]
async fn create_record_requires_date() {
    let resp = app().oneshot(form(&[("memo", "m")], None)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body["date"][0], "This field is required.");
}

#[tokio::test]
async fn create_record_rejects_badly_formatted_date() {
    let resp = app()
        .oneshot(form(&[("date", "01/02/2025")], None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert!(body["date"][0].as_str().unwrap().starts_with("Date has wrong format"));
}

#[tokio::test]
async fn create_record_rejects_duplicate_date() {
    let app = app();
    create(&app, "2025-01-01", "first").await;

    let resp = app
        .oneshot(form(&[("date", "2025-01-01")], None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body["date"][0], "skin record with this date already exists.");
}

#[tokio::test]
async fn create_record_rejects_image_without_file_name() {
    let resp = app()
        .oneshot(form(&[("image", "https://example.com/a.png"), ("date", "2025-01-01")], None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert!(body["image"][0].as_str().unwrap().contains("not a file"));
}

#[tokio::test]
async fn uploaded_image_is_served_from_media() {
    let app = app();
    let resp = app
        .clone()
        .oneshot(form(&[("date", "2025-01-01")], Some(("face.png", "PNGDATA"))))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let record: SkinRecord = body_json(resp).await;
    let url = record.image.expect("image url");
    assert_eq!(url, "/media/skin_records/1_face.png");

    let resp = app.oneshot(get(&url)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[http::header::CONTENT_TYPE], "image/png");
    assert_eq!(&body_bytes(resp).await[..], b"PNGDATA");
}

// --- get ---

#[tokio::test]
async fn get_record_returns_created() {
    let app = app();
    let created = create(&app, "2025-01-01", "m").await;

    let resp = app
        .oneshot(get(&format!("/api/records/{}/", created.id)))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: SkinRecord = body_json(resp).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn get_record_not_found() {
    let resp = app().oneshot(get("/api/records/99/")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body["detail"], "Not found.");
}

// --- delete ---

#[tokio::test]
async fn delete_record_returns_204() {
    let app = app();
    let created = create(&app, "2025-01-01", "m").await;
    let uri = format!("/api/records/{}/", created.id);

    let resp = app.clone().oneshot(delete(&uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    let resp = app.oneshot(get(&uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_record_not_found() {
    let resp = app().oneshot(delete("/api/records/1/")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_record_drops_its_image() {
    let app = app();
    let resp = app
        .clone()
        .oneshot(form(&[("date", "2025-01-01")], Some(("face.png", "PNGDATA"))))
        .await
        .unwrap();
    let record: SkinRecord = body_json(resp).await;
    let url = record.image.unwrap();

    app.clone()
        .oneshot(delete(&format!("/api/records/{}/", record.id)))
        .await
        .unwrap();

    let resp = app.oneshot(get(&url)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
