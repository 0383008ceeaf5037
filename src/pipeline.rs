//! Upload orchestration: the linear stage machine from file to summary.

use crate::classifier::classify;
use crate::deriver::derive;
use crate::domains::{DomainDescriptor, RiskBand};
use crate::error::{PipelineError, Result};
use crate::feature_engineer::engineer;
use crate::ingest::read_table;
use crate::models::handle::ScoringModel;
use crate::normalizer::normalize_table;
use crate::storage::batcher::{PersistenceBatcher, RetryPolicy};
use crate::storage::client::TableStore;
use crate::types::prediction::{PredictionRecord, ScoreResult};
use crate::types::summary::{AggregateMetrics, UploadSummary};
use chrono::Utc;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Stages of one upload, in order. `Failed` is reachable only from the
/// stages before persistence; once scoring has fully succeeded, the
/// request always terminates in `Summarized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Received,
    Normalized,
    Featurized,
    Scored,
    Classified,
    MetricsDerived,
    Persisted,
    Summarized,
    Failed,
}

/// Tuning knobs resolved from configuration at construction time.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Storage table override; defaults to the descriptor's table.
    pub table: Option<String>,
    /// Persistence chunk size.
    pub batch_size: usize,
    pub retry: RetryPolicy,
    /// Per-tier cutoff overrides (lowercase tier name -> cutoff).
    pub thresholds: Option<HashMap<String, f64>>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            table: None,
            batch_size: 1000,
            retry: RetryPolicy::default(),
            thresholds: None,
        }
    }
}

/// A per-domain pipeline wired with a loaded model and a store client.
///
/// Holds no per-request state: the model is read-only after load and
/// one instance serves many concurrent uploads.
pub struct Pipeline {
    domain: &'static DomainDescriptor,
    model: Arc<dyn ScoringModel>,
    store: Arc<dyn TableStore>,
    table: String,
    bands: Vec<RiskBand>,
    batch_size: usize,
    retry: RetryPolicy,
}

impl Pipeline {
    pub fn new(
        domain: &'static DomainDescriptor,
        model: Arc<dyn ScoringModel>,
        store: Arc<dyn TableStore>,
        options: PipelineOptions,
    ) -> Result<Self> {
        domain.validate()?;
        if model.arity() != domain.arity() {
            return Err(PipelineError::Config(format!(
                "domain {} declares {} features but the model expects {}",
                domain.key,
                domain.arity(),
                model.arity()
            )));
        }
        let bands = resolve_bands(domain, options.thresholds.as_ref())?;

        Ok(Self {
            domain,
            model,
            store,
            table: options
                .table
                .unwrap_or_else(|| domain.table.to_string()),
            bands,
            batch_size: options.batch_size.max(1),
            retry: options.retry,
        })
    }

    pub fn domain_key(&self) -> &'static str {
        self.domain.key
    }

    /// Process one uploaded file end to end.
    pub async fn run_file(&self, path: &Path) -> Result<UploadSummary> {
        let file = File::open(path).map_err(|e| {
            PipelineError::Ingest(format!("cannot open {}: {e}", path.display()))
        })?;
        self.run(BufReader::new(file)).await
    }

    /// Drive one upload through every stage.
    ///
    /// Errors returned here are whole-request failures from the stages
    /// before persistence; nothing has been written when they occur.
    pub async fn run<R: BufRead>(&self, input: R) -> Result<UploadSummary> {
        let uploaded_at = Utc::now();
        debug!(domain = self.domain.key, stage = ?PipelineStage::Received, "upload received");

        let table = read_table(input, &self.domain.input_format)?;
        let rows = normalize_table(&table, self.domain, uploaded_at.naive_utc())?;
        info!(
            domain = self.domain.key,
            rows = rows.len(),
            stage = ?PipelineStage::Normalized,
            "schema normalized"
        );

        let vectors: Vec<Vec<f32>> = rows.iter().map(|row| engineer(row, self.domain)).collect();
        debug!(
            domain = self.domain.key,
            arity = self.domain.arity(),
            stage = ?PipelineStage::Featurized,
            "feature vectors built"
        );

        // One vectorized call for the whole dataset; an arity mismatch
        // here fails the request before anything is persisted.
        let scores = self.model.score(&vectors)?;
        if scores.len() != rows.len() {
            return Err(PipelineError::Inference(format!(
                "model returned {} scores for {} rows",
                scores.len(),
                rows.len()
            )));
        }
        debug!(domain = self.domain.key, stage = ?PipelineStage::Scored, "dataset scored");

        let generated_at = Utc::now();
        let results: Vec<ScoreResult> = rows
            .iter()
            .zip(&scores)
            .map(|(row, &score)| {
                let tier = classify(
                    score,
                    self.domain.direction,
                    &self.bands,
                    self.domain.fallback_tier,
                );
                let metrics = derive(row, score, self.domain, tier);
                ScoreResult {
                    entity_id: row.entity_id.clone(),
                    cycle: row.cycle,
                    score,
                    risk_tier: tier,
                    metrics,
                    generated_at,
                }
            })
            .collect();
        debug!(
            domain = self.domain.key,
            stage = ?PipelineStage::MetricsDerived,
            "scores classified and metrics derived"
        );

        let records: Vec<PredictionRecord> = results
            .into_iter()
            .map(|result| PredictionRecord::from_result(result, uploaded_at))
            .collect();

        let batcher = PersistenceBatcher::new(self.store.as_ref(), self.batch_size, self.retry.clone());
        let persistence = batcher
            .persist(&self.table, &records, self.domain.conflict_key)
            .await;
        info!(
            domain = self.domain.key,
            committed = persistence.committed,
            failed_chunks = persistence.failed_chunks.len(),
            stage = ?PipelineStage::Persisted,
            "records persisted"
        );

        let summary = summarize(self.domain, &records, persistence);
        info!(
            domain = self.domain.key,
            processed = summary.processed_records,
            mean_score = summary.aggregate_metrics.mean_score,
            stage = ?PipelineStage::Summarized,
            "upload summarized"
        );
        Ok(summary)
    }

}

/// Descriptor band defaults with per-tier config overrides applied.
fn resolve_bands(
    domain: &DomainDescriptor,
    overrides: Option<&HashMap<String, f64>>,
) -> Result<Vec<RiskBand>> {
    let mut bands: Vec<RiskBand> = domain.bands.to_vec();
    let Some(overrides) = overrides else {
        return Ok(bands);
    };

    for (tier_name, cutoff) in overrides {
        let matched = bands
            .iter_mut()
            .find(|band| band.tier.as_str().eq_ignore_ascii_case(tier_name));
        match matched {
            Some(band) => band.cutoff = *cutoff,
            None => {
                return Err(PipelineError::Config(format!(
                    "domain {}: threshold override names unknown tier {tier_name}",
                    domain.key
                )))
            }
        }
    }
    Ok(bands)
}

fn summarize(
    domain: &DomainDescriptor,
    records: &[PredictionRecord],
    persistence: crate::types::summary::PersistenceSummary,
) -> UploadSummary {
    let mut distribution: BTreeMap<String, u64> = BTreeMap::new();
    let mut entities: HashSet<&str> = HashSet::new();
    let mut score_sum = 0.0;
    let mut impact_sum = 0.0;

    for record in records {
        *distribution
            .entry(record.risk_tier.as_str().to_string())
            .or_insert(0) += 1;
        entities.insert(record.entity_id.as_str());
        score_sum += record.score;
        impact_sum += record.financial_impact.unwrap_or(0.0);
    }

    let mean_score = if records.is_empty() {
        0.0
    } else {
        score_sum / records.len() as f64
    };

    UploadSummary {
        success: true,
        domain: domain.key.to_string(),
        processed_records: records.len(),
        risk_distribution: distribution,
        aggregate_metrics: AggregateMetrics {
            mean_score,
            total_financial_impact: impact_sum,
            distinct_entities: entities.len(),
        },
        persistence,
        generated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::VESSEL;

    #[test]
    fn threshold_overrides_replace_cutoffs_by_tier_name() {
        let mut overrides = HashMap::new();
        overrides.insert("critical".to_string(), 0.80);
        let bands = resolve_bands(&VESSEL, Some(&overrides)).unwrap();
        assert_eq!(bands[0].cutoff, 0.80);
        assert_eq!(bands[1].cutoff, 0.70);
    }

    #[test]
    fn unknown_override_tier_is_a_config_error() {
        let mut overrides = HashMap::new();
        overrides.insert("severe".to_string(), 0.5);
        let err = resolve_bands(&VESSEL, Some(&overrides)).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }
}
