//! Error types for the skin-records API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the record does not exist" from "the server returned an unexpected
//! status." All other non-2xx responses land in `HttpError` with the raw
//! status code and body, which for validation failures carries the server's
//! per-field messages.
//!
//! An image that is not binary data has no variant here: the client
//! logs it and sends the form without the `image` field.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors returned by `RecordsClient`, `RecordApi` and `RecordStore`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404: the requested record does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request never produced a response (connection refused, reset, ...).
    #[error("{0}")]
    Transport(String),

    /// No response arrived within the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The record date could not be turned into a calendar date.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// An image file could not be read from disk.
    #[error("failed to read image {}: {source}", .path.display())]
    ReadImage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
