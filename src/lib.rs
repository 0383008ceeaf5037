//! Batch inference and persistence pipeline for multi-domain risk
//! scoring.
//!
//! Uploaded tabular files (vessel telemetry, turbofan sensor logs,
//! retail inventory snapshots) are normalized onto a per-domain
//! canonical schema, turned into the exact feature vectors a trained
//! model artifact expects, scored in one vectorized call, classified
//! into risk tiers, enriched with derived business metrics, and
//! persisted to a network table store in bounded, retry-tolerant
//! batches.
//!
//! Per-domain variation lives entirely in [`domains::DomainDescriptor`]
//! data; the pipeline itself is generic.

pub mod classifier;
pub mod config;
pub mod deriver;
pub mod domains;
pub mod error;
pub mod feature_engineer;
pub mod ingest;
pub mod metrics;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod storage;
pub mod types;

pub use config::AppConfig;
pub use error::{PipelineError, Result};
pub use metrics::PipelineMetrics;
pub use models::{OnnxScorer, ScoringModel};
pub use pipeline::{Pipeline, PipelineOptions, PipelineStage};
pub use storage::{RestTableStore, TableStore};
pub use types::{FailureReport, PredictionRecord, RiskTier, UploadSummary};
