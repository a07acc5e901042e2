//! Stateless HTTP request builder and response parser for the records API.
//!
//! # Design
//! `RecordsClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. A `Transport` executes the round-trip in between, keeping
//! this module deterministic and free of I/O.

use crate::config::{ClientConfig, DEFAULT_CONTENT_TYPE};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, CONTENT_TYPE};
use crate::multipart::MultipartForm;
use crate::types::{NewRecord, Record, RecordId};

/// Synchronous, stateless client for the records API.
#[derive(Debug, Clone)]
pub struct RecordsClient {
    base_url: String,
}

impl RecordsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_records(&self) -> HttpRequest {
        self.json_request(HttpMethod::Get, format!("{}/records/", self.base_url))
    }

    pub fn build_get_record(&self, id: RecordId) -> HttpRequest {
        self.json_request(HttpMethod::Get, format!("{}/records/{id}/", self.base_url))
    }

    /// Encode `record` as the create form: `image` (only for binary data),
    /// `memo` (empty when absent) and `date` as `YYYY-MM-DD`.
    pub fn build_create_form(&self, record: NewRecord) -> Result<MultipartForm, ApiError> {
        let NewRecord { date, memo, images } = record;
        let date = date.to_form_value()?;

        let mut form = MultipartForm::new();
        if let Some(file) = images.into_iter().next().and_then(|image| image.into_file()) {
            form.file("image", file);
        }
        form.text("memo", memo.unwrap_or_default());
        form.text("date", date);
        Ok(form)
    }

    pub fn build_create_record(&self, record: NewRecord) -> Result<HttpRequest, ApiError> {
        let form = self.build_create_form(record)?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/records/", self.base_url),
            headers: vec![(CONTENT_TYPE.to_string(), form.content_type())],
            body: Some(form.into_body()),
        })
    }

    pub fn build_delete_record(&self, id: RecordId) -> HttpRequest {
        self.json_request(HttpMethod::Delete, format!("{}/records/{id}/", self.base_url))
    }

    pub fn parse_list_records(&self, response: HttpResponse) -> Result<Vec<Record>, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_get_record(&self, response: HttpResponse) -> Result<Record, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_create_record(&self, response: HttpResponse) -> Result<Record, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_delete_record(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)?;
        Ok(())
    }

    fn json_request(&self, method: HttpMethod, url: String) -> HttpRequest {
        HttpRequest {
            method,
            url,
            headers: vec![(CONTENT_TYPE.to_string(), DEFAULT_CONTENT_TYPE.to_string())],
            body: None,
        }
    }
}

/// Map non-2xx status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
