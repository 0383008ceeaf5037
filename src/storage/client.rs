//! Network table store client.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Store failure classification driving the batcher's retry decision.
#[derive(Debug, Clone)]
pub enum StoreError {
    /// Network-class failures worth retrying: timeouts, connection
    /// resets, 5xx, 408/429.
    Transient(String),
    /// Request-class failures that will not succeed on retry, e.g. a
    /// conflict-key violation or schema rejection (other 4xx).
    Validation(String),
}

impl StoreError {
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Transient(_))
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Transient(msg) => write!(f, "transient store failure: {msg}"),
            StoreError::Validation(msg) => write!(f, "store rejected request: {msg}"),
        }
    }
}

/// A table-oriented store reached over the network.
///
/// The pipeline is agnostic to the concrete engine beyond inserting and
/// upserting field maps into a named table with a bounded batch size.
#[async_trait]
pub trait TableStore: Send + Sync {
    async fn insert(
        &self,
        table: &str,
        records: &[Map<String, Value>],
    ) -> std::result::Result<(), StoreError>;

    /// Keyed write: an existing row with the same conflict-key values is
    /// superseded instead of duplicated.
    async fn upsert(
        &self,
        table: &str,
        records: &[Map<String, Value>],
        conflict_key: &[&str],
    ) -> std::result::Result<(), StoreError>;
}

/// PostgREST-style table store (`POST {base}/rest/v1/{table}`).
pub struct RestTableStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RestTableStore {
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> crate::error::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| {
                crate::error::PipelineError::Config(format!("failed to build store client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    async fn write(
        &self,
        table: &str,
        records: &[Map<String, Value>],
        conflict_key: Option<&[&str]>,
    ) -> std::result::Result<(), StoreError> {
        let url = format!("{}/rest/v1/{table}", self.base_url);
        let prefer = if conflict_key.is_some() {
            "resolution=merge-duplicates,return=minimal"
        } else {
            "return=minimal"
        };

        let mut request = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", prefer)
            .json(records);
        if let Some(key) = conflict_key {
            request = request.query(&[("on_conflict", key.join(","))]);
        }

        let response = request.send().await.map_err(|e| {
            // Anything that never produced a status is network-class.
            StoreError::Transient(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            debug!(table, rows = records.len(), "chunk written");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status, &body))
    }
}

fn classify_status(status: StatusCode, body: &str) -> StoreError {
    let detail = format!("status {status}: {body}");
    if status.is_server_error()
        || status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
    {
        StoreError::Transient(detail)
    } else {
        StoreError::Validation(detail)
    }
}

#[async_trait]
impl TableStore for RestTableStore {
    async fn insert(
        &self,
        table: &str,
        records: &[Map<String, Value>],
    ) -> std::result::Result<(), StoreError> {
        self.write(table, records, None).await
    }

    async fn upsert(
        &self,
        table: &str,
        records: &[Map<String, Value>],
        conflict_key: &[&str],
    ) -> std::result::Result<(), StoreError> {
        self.write(table, records, Some(conflict_key)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_and_throttling_are_transient() {
        assert!(classify_status(StatusCode::INTERNAL_SERVER_ERROR, "").is_transient());
        assert!(classify_status(StatusCode::BAD_GATEWAY, "").is_transient());
        assert!(classify_status(StatusCode::TOO_MANY_REQUESTS, "").is_transient());
        assert!(classify_status(StatusCode::REQUEST_TIMEOUT, "").is_transient());
    }

    #[test]
    fn client_errors_are_validation_failures() {
        assert!(!classify_status(StatusCode::CONFLICT, "duplicate key").is_transient());
        assert!(!classify_status(StatusCode::BAD_REQUEST, "").is_transient());
        assert!(!classify_status(StatusCode::UNPROCESSABLE_ENTITY, "").is_transient());
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let store = RestTableStore::new("https://store.example.com/", "key", 30).unwrap();
        assert_eq!(store.base_url, "https://store.example.com");
    }
}
