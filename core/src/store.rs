//! Observable record state for the UI layer.
//!
//! # Design
//! One `RecordStore` is owned per application session. Its `StoreState` is
//! published through a `tokio::sync::watch` channel: views `subscribe()` and
//! re-render when the receiver reports a change. All mutations go through the
//! four operations, each of which follows the same sequence:
//!
//! ```text
//! idle ──► loading (is_loading = true, error = None)
//!             │
//!             ├─ Ok  ──► records reconciled, is_loading = false
//!             └─ Err ──► error = message,   is_loading = false, Err returned
//! ```
//!
//! Concurrent operations are not coordinated. Whichever finishes last decides
//! `is_loading`, and whichever reconciles last decides `records`.

use std::future::Future;

use chrono::NaiveDate;
use tokio::sync::watch;
use tracing::error;

use crate::error::ApiError;
use crate::transport::{RecordApi, Transport};
use crate::types::{NewRecord, Record, RecordId};

/// Shown when an error renders to an empty message.
pub const FETCH_FAILED: &str = "記録の取得に失敗しました";
pub const CREATE_FAILED: &str = "記録の作成に失敗しました";
pub const DELETE_FAILED: &str = "記録の削除に失敗しました";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreState {
    /// In server-response order.
    pub records: Vec<Record>,
    pub is_loading: bool,
    /// Message of the most recent failure; cleared when an operation starts.
    pub error: Option<String>,
}

pub struct RecordStore<T> {
    api: RecordApi<T>,
    state: watch::Sender<StoreState>,
}

impl<T: Transport> RecordStore<T> {
    pub fn new(api: RecordApi<T>) -> Self {
        let (state, _) = watch::channel(StoreState::default());
        Self { api, state }
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> StoreState {
        self.state.borrow().clone()
    }

    pub fn records(&self) -> Vec<Record> {
        self.state.borrow().records.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    /// Replace the collection with the whole list from the server.
    pub async fn fetch_records(&self) -> Result<Vec<Record>, ApiError> {
        self.track("fetch_records", FETCH_FAILED, self.api.list_records(), |records, fetched| {
            records.clone_from(fetched);
        })
        .await
    }

    /// Fetch one record.
    ///
    /// The collection is replaced by the fetched record alone rather than
    /// updated in place; views showing the list must re-fetch afterwards.
    pub async fn fetch_record(&self, id: RecordId) -> Result<Record, ApiError> {
        self.track("fetch_record", FETCH_FAILED, self.api.get_record(id), |records, fetched| {
            *records = vec![fetched.clone()];
        })
        .await
    }

    /// Create a record and append the server's copy to the collection.
    pub async fn create_record(&self, record: NewRecord) -> Result<Record, ApiError> {
        self.track("create_record", CREATE_FAILED, self.api.create_record(record), |records, created| {
            records.push(created.clone());
        })
        .await
    }

    pub async fn delete_record(&self, id: RecordId) -> Result<(), ApiError> {
        self.track("delete_record", DELETE_FAILED, self.api.delete_record(id), |records, _| {
            records.retain(|record| record.id != id);
        })
        .await
    }

    /// Fill the collection with fixed placeholder records, no network involved.
    pub fn load_sample_records(&self) {
        self.state.send_modify(|state| state.records = sample_records());
    }

    async fn track<R, F, A>(&self, action: &'static str, fallback: &str, call: F, apply: A) -> Result<R, ApiError>
    where
        F: Future<Output = Result<R, ApiError>>,
        A: FnOnce(&mut Vec<Record>, &R),
    {
        self.state.send_modify(|state| {
            state.is_loading = true;
            state.error = None;
        });

        let result = call.await;

        self.state.send_modify(|state| {
            match &result {
                Ok(value) => apply(&mut state.records, value),
                Err(err) => state.error = Some(failure_message(err, fallback)),
            }
            state.is_loading = false;
        });

        if let Err(err) = &result {
            error!(action, error = %err, "record operation failed");
        }
        result
    }
}

fn failure_message(err: &ApiError, fallback: &str) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

fn sample_records() -> Vec<Record> {
    let sample = |id: RecordId, day: u32, memo: &str, image: &str| Record {
        id,
        image: Some(image.to_string()),
        memo: memo.to_string(),
        date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap_or_default(),
        created_at: None,
        updated_at: None,
    };
    vec![
        sample(1, 1, "テスト記録", "https://placehold.jp/150x150.png"),
        sample(2, 2, "テスト記録2", "https://via.placeholder.com/150"),
        sample(3, 3, "テスト記録3", "https://via.placeholder.com/150"),
    ]
}
