//! Record date inputs and their `YYYY-MM-DD` form-field encoding.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::ApiError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// The shapes a caller may hand over as a record date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    /// A calendar date, formatted as `YYYY-MM-DD`.
    Date(NaiveDate),
    /// Already formatted by the caller; sent as-is.
    Text(String),
    /// A point in time; the UTC calendar date is sent.
    Instant(DateTime<Utc>),
    /// Milliseconds since the Unix epoch; the UTC calendar date is sent.
    EpochMillis(i64),
}

impl DateInput {
    /// Encode as the `date` form field.
    pub fn to_form_value(&self) -> Result<String, ApiError> {
        match self {
            DateInput::Date(date) => Ok(date.format(DATE_FORMAT).to_string()),
            DateInput::Text(text) => Ok(text.clone()),
            DateInput::Instant(instant) => Ok(instant.date_naive().format(DATE_FORMAT).to_string()),
            DateInput::EpochMillis(millis) => DateTime::<Utc>::from_timestamp_millis(*millis)
                .map(|instant| instant.date_naive().format(DATE_FORMAT).to_string())
                .ok_or_else(|| ApiError::InvalidDate(format!("{millis} ms is out of range"))),
        }
    }
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        DateInput::Date(date)
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        DateInput::Text(text.to_string())
    }
}

impl From<String> for DateInput {
    fn from(text: String) -> Self {
        DateInput::Text(text)
    }
}

impl From<DateTime<Utc>> for DateInput {
    fn from(instant: DateTime<Utc>) -> Self {
        DateInput::Instant(instant)
    }
}
