use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, StatusCode},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const MEDIA_PREFIX: &str = "/media/skin_records";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SkinRecord {
    pub id: u64,
    pub image: Option<String>,
    pub memo: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

struct StoredImage {
    content_type: String,
    bytes: Vec<u8>,
}

#[derive(Default)]
pub struct MockDb {
    last_id: u64,
    records: BTreeMap<u64, SkinRecord>,
    media: HashMap<String, StoredImage>,
}

pub type Db = Arc<RwLock<MockDb>>;

type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(MockDb::default()));
    Router::new()
        .route("/api/records/", get(list_records).post(create_record))
        .route("/api/records/{id}/", get(get_record).delete(delete_record))
        .route("/media/skin_records/{name}", get(get_media))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Validation failure shaped like a DRF serializer error: `{field: [message]}`.
fn field_error(field: &str, message: &str) -> (StatusCode, Json<Value>) {
    let mut body = serde_json::Map::new();
    body.insert(field.to_string(), json!([message]));
    (StatusCode::BAD_REQUEST, Json(Value::Object(body)))
}

fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found." })))
}

fn malformed(err: MultipartError) -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({ "detail": format!("Multipart form parse error - {err}") })))
}

/// Keep only the final path component so uploads cannot escape the media dir.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    if base.is_empty() {
        "upload".to_string()
    } else {
        base.to_string()
    }
}

async fn list_records(State(db): State<Db>) -> Json<Vec<SkinRecord>> {
    let db = db.read().await;
    let mut records: Vec<SkinRecord> = db.records.values().cloned().collect();
    records.sort_by(|a, b| b.date.cmp(&a.date));
    Json(records)
}

struct Upload {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

async fn create_record(State(db): State<Db>, mut multipart: Multipart) -> ApiResult<(StatusCode, Json<SkinRecord>)> {
    let mut image = None;
    let mut memo = String::new();
    let mut date = None;

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let Some(file_name) = field.file_name().map(sanitize_file_name) else {
                    return Err(field_error(
                        "image",
                        "The submitted data was not a file. Check the encoding type on the form.",
                    ));
                };
                let content_type = field.content_type().unwrap_or("application/octet-stream").to_string();
                let bytes = field.bytes().await.map_err(malformed)?.to_vec();
                image = Some(Upload {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            "memo" => memo = field.text().await.map_err(malformed)?,
            "date" => date = Some(field.text().await.map_err(malformed)?),
            _ => {}
        }
    }

    let date = date.ok_or_else(|| field_error("date", "This field is required."))?;
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|_| {
        field_error(
            "date",
            "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.",
        )
    })?;

    let mut db = db.write().await;
    if db.records.values().any(|r| r.date == date) {
        return Err(field_error("date", "skin record with this date already exists."));
    }

    db.last_id += 1;
    let id = db.last_id;
    let image_url = image.map(|upload| {
        let key = format!("{id}_{}", upload.file_name);
        let url = format!("{MEDIA_PREFIX}/{key}");
        db.media.insert(
            key,
            StoredImage {
                content_type: upload.content_type,
                bytes: upload.bytes,
            },
        );
        url
    });

    let now = Utc::now();
    let record = SkinRecord {
        id,
        image: image_url,
        memo,
        date,
        created_at: now,
        updated_at: now,
    };
    db.records.insert(id, record.clone());
    tracing::info!(id, %date, "record created");
    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_record(State(db): State<Db>, Path(id): Path<u64>) -> ApiResult<Json<SkinRecord>> {
    let db = db.read().await;
    db.records.get(&id).cloned().map(Json).ok_or_else(not_found)
}

async fn delete_record(State(db): State<Db>, Path(id): Path<u64>) -> ApiResult<StatusCode> {
    let mut db = db.write().await;
    let record = db.records.remove(&id).ok_or_else(not_found)?;
    if let Some(url) = record.image {
        if let Some(key) = url.strip_prefix(&format!("{MEDIA_PREFIX}/")) {
            db.media.remove(key);
        }
    }
    tracing::info!(id, "record deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn get_media(
    State(db): State<Db>,
    Path(name): Path<String>,
) -> ApiResult<([(header::HeaderName, String); 1], Vec<u8>)> {
    let db = db.read().await;
    let image = db.media.get(&name).ok_or_else(not_found)?;
    Ok(([(header::CONTENT_TYPE, image.content_type.clone())], image.bytes.clone()))
}
