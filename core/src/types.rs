//! Domain DTOs for the skin-records API.
//!
//! # Design
//! `Record` mirrors the backend's serializer output but is defined
//! independently of the mock-server crate; integration tests catch schema
//! drift. `NewRecord` is the create input and never carries an id.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::date::DateInput;
use crate::image::ImageInput;

/// Server-assigned record identifier.
pub type RecordId = u64;

/// A skin condition record returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    pub id: RecordId,
    /// URL of the stored photo, if one was uploaded.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub memo: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<FixedOffset>>,
}

/// Input for creating a record.
///
/// Only the first entry of `images` is uploaded.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub date: DateInput,
    pub memo: Option<String>,
    pub images: Vec<ImageInput>,
}

impl NewRecord {
    pub fn new(date: impl Into<DateInput>) -> Self {
        Self {
            date: date.into(),
            memo: None,
            images: Vec::new(),
        }
    }

    pub fn memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    pub fn image(mut self, image: impl Into<ImageInput>) -> Self {
        self.images.push(image.into());
        self
    }
}
