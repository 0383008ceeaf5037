//! Bounded-batch persistence with partial-failure tolerance.

use crate::storage::client::{StoreError, TableStore};
use crate::types::prediction::PredictionRecord;
use crate::types::summary::{FailedChunk, PersistenceSummary};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{info, warn};

/// Retry policy for transient chunk failures; backoff grows linearly
/// with the attempt number.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff_ms: 120,
        }
    }
}

/// Splits one upload's records into contiguous chunks and writes them
/// sequentially. A failed chunk is recorded with its record range and
/// never blocks the remaining chunks.
pub struct PersistenceBatcher<'a> {
    store: &'a dyn TableStore,
    batch_size: usize,
    retry: RetryPolicy,
}

impl<'a> PersistenceBatcher<'a> {
    pub fn new(store: &'a dyn TableStore, batch_size: usize, retry: RetryPolicy) -> Self {
        Self {
            store,
            batch_size: batch_size.max(1),
            retry,
        }
    }

    /// Write all records to `table`. The chunk count never changes the
    /// committed total on a healthy store.
    pub async fn persist(
        &self,
        table: &str,
        records: &[PredictionRecord],
        conflict_key: Option<&[&str]>,
    ) -> PersistenceSummary {
        let mut summary = PersistenceSummary {
            attempted: records.len(),
            ..Default::default()
        };
        if records.is_empty() {
            return summary;
        }

        let total_chunks = records.len().div_ceil(self.batch_size);
        for (chunk_no, chunk) in records.chunks(self.batch_size).enumerate() {
            let start = chunk_no * self.batch_size;
            let end = start + chunk.len();
            let payload: Vec<Map<String, Value>> = chunk.iter().map(record_fields).collect();

            match self.write_chunk(table, &payload, conflict_key).await {
                Ok(attempts) => {
                    summary.committed += chunk.len();
                    info!(
                        table,
                        chunk = chunk_no + 1,
                        total = total_chunks,
                        rows = chunk.len(),
                        attempts,
                        "chunk committed"
                    );
                }
                Err((attempts, err)) => {
                    warn!(
                        table,
                        chunk = chunk_no + 1,
                        total = total_chunks,
                        records = format!("{start}..{end}"),
                        attempts,
                        error = %err,
                        "chunk failed"
                    );
                    summary.failed_chunks.push(FailedChunk {
                        start,
                        end,
                        attempts,
                        reason: err.to_string(),
                    });
                }
            }
        }

        summary
    }

    /// One chunk write with bounded retries. Validation-class failures
    /// are terminal immediately; only transient failures back off and
    /// retry.
    async fn write_chunk(
        &self,
        table: &str,
        payload: &[Map<String, Value>],
        conflict_key: Option<&[&str]>,
    ) -> std::result::Result<usize, (usize, StoreError)> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let result = match conflict_key {
                Some(key) => self.store.upsert(table, payload, key).await,
                None => self.store.insert(table, payload).await,
            };

            match result {
                Ok(()) => return Ok(attempt),
                Err(err) if err.is_transient() && attempt < self.retry.max_attempts => {
                    warn!(table, attempt, error = %err, "transient store failure, retrying");
                    tokio::time::sleep(Duration::from_millis(
                        self.retry.base_backoff_ms.saturating_mul(attempt as u64),
                    ))
                    .await;
                }
                Err(err) => return Err((attempt, err)),
            }
        }
    }
}

fn record_fields(record: &PredictionRecord) -> Map<String, Value> {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}
