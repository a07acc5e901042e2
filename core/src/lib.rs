//! Client core for the skin-records service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern); a `Transport` performs the
//! round-trip. `RecordStore` sits on top and keeps an observable copy of the
//! records plus loading/error flags for the UI.
//!
//! # Design
//! - `RecordsClient` is stateless: it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - Record creation is a multipart upload; date and image inputs are tagged
//!   unions resolved when the request is built.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod date;
pub mod error;
pub mod http;
pub mod image;
pub mod multipart;
pub mod store;
pub mod transport;
pub mod types;

pub use client::RecordsClient;
pub use config::ClientConfig;
pub use date::DateInput;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use image::{ImageFile, ImageInput, UploadEnvelope};
pub use store::{RecordStore, StoreState};
pub use transport::{RecordApi, Transport, UreqTransport};
pub use types::{NewRecord, Record, RecordId};
