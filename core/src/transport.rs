//! Executing `HttpRequest`s, and the async API built on top of that.
//!
//! # Design
//! `Transport` is the only seam that touches the network. `UreqTransport`
//! drives a blocking ureq agent on tokio's blocking pool, so callers await a
//! response without holding up the runtime. `RecordApi` pairs it with the
//! stateless `RecordsClient`: build, execute, parse.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::client::RecordsClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{NewRecord, Record, RecordId};

#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform the round-trip. Non-2xx statuses are returned as responses,
    /// not errors; only failures to get a response at all are `Err`.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    timeout: Duration,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent, timeout }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.timeout)
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let agent = self.agent.clone();
        let timeout = self.timeout;
        tokio::task::spawn_blocking(move || execute_blocking(&agent, request, timeout))
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn execute_blocking(agent: &ureq::Agent, request: HttpRequest, timeout: Duration) -> Result<HttpResponse, ApiError> {
    let HttpRequest {
        method,
        url,
        headers,
        body,
    } = request;
    debug!(method = method.as_str(), %url, "sending request");

    let result = match method {
        HttpMethod::Get => with_headers(agent.get(&url), &headers).call(),
        HttpMethod::Delete => with_headers(agent.delete(&url), &headers).call(),
        HttpMethod::Post => {
            let body = body.unwrap_or_default();
            with_headers(agent.post(&url), &headers).send(&body[..])
        }
    };

    let mut response = result.map_err(|e| match e {
        ureq::Error::Timeout(_) => ApiError::Timeout(timeout),
        other => ApiError::Transport(other.to_string()),
    })?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                value.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    debug!(method = method.as_str(), %url, status, "received response");

    Ok(HttpResponse { status, headers, body })
}

/// The four record operations over a concrete transport.
pub struct RecordApi<T> {
    client: RecordsClient,
    transport: T,
}

impl RecordApi<UreqTransport> {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(RecordsClient::from_config(config), UreqTransport::from_config(config))
    }
}

impl<T: Transport> RecordApi<T> {
    pub fn new(client: RecordsClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn list_records(&self) -> Result<Vec<Record>, ApiError> {
        let response = self.transport.execute(self.client.build_list_records()).await?;
        self.client.parse_list_records(response)
    }

    pub async fn get_record(&self, id: RecordId) -> Result<Record, ApiError> {
        let response = self.transport.execute(self.client.build_get_record(id)).await?;
        self.client.parse_get_record(response)
    }

    pub async fn create_record(&self, record: NewRecord) -> Result<Record, ApiError> {
        let request = self.client.build_create_record(record)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_create_record(response)
    }

    pub async fn delete_record(&self, id: RecordId) -> Result<(), ApiError> {
        let response = self.transport.execute(self.client.build_delete_record(id)).await?;
        self.client.parse_delete_record(response)
    }
}
