//! Structured summaries returned to callers per upload.

use crate::error::PipelineError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One persistence chunk that could not be committed. `start`/`end` are
/// record indices into the upload's result set (end exclusive).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedChunk {
    pub start: usize,
    pub end: usize,
    pub attempts: usize,
    pub reason: String,
}

/// Outcome of writing one upload's records to storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistenceSummary {
    pub attempted: usize,
    pub committed: usize,
    pub failed_chunks: Vec<FailedChunk>,
}

/// Dataset-level aggregates surfaced alongside the tier distribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateMetrics {
    pub mean_score: f64,
    pub total_financial_impact: f64,
    pub distinct_entities: usize,
}

/// Terminal response for a fully scored upload. Partial persistence
/// failures are data inside this summary, not a request failure.
#[derive(Debug, Clone, Serialize)]
pub struct UploadSummary {
    pub success: bool,
    pub domain: String,
    pub processed_records: usize,
    pub risk_distribution: BTreeMap<String, u64>,
    pub aggregate_metrics: AggregateMetrics,
    pub persistence: PersistenceSummary,
    pub generated_at: DateTime<Utc>,
}

/// Structured payload for unrecoverable requests.
#[derive(Debug, Clone, Serialize)]
pub struct FailureReport {
    pub success: bool,
    pub detail: String,
}

impl FailureReport {
    pub fn from_error(err: &PipelineError) -> Self {
        Self {
            success: false,
            detail: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_report_carries_the_error_detail() {
        let err = PipelineError::MissingIdentity {
            column: "product_id".to_string(),
        };
        let report = FailureReport::from_error(&err);
        assert!(!report.success);
        assert_eq!(report.detail, "missing required column: product_id");
    }

    #[test]
    fn summary_serializes_distribution_keys_in_order() {
        let mut distribution = BTreeMap::new();
        distribution.insert("CRITICAL".to_string(), 2);
        distribution.insert("NORMAL".to_string(), 5);

        let summary = UploadSummary {
            success: true,
            domain: "vessel".to_string(),
            processed_records: 7,
            risk_distribution: distribution,
            aggregate_metrics: AggregateMetrics {
                mean_score: 0.41,
                total_financial_impact: 0.0,
                distinct_entities: 7,
            },
            persistence: PersistenceSummary {
                attempted: 7,
                committed: 7,
                failed_chunks: Vec::new(),
            },
            generated_at: Utc::now(),
        };

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"processed_records\":7"));
        assert!(json.find("CRITICAL").unwrap() < json.find("NORMAL").unwrap());
    }
}
