//! Type definitions shared across pipeline stages.

pub mod prediction;
pub mod row;
pub mod summary;

pub use prediction::{DerivedMetrics, PredictionRecord, RiskTier, ScoreResult};
pub use row::{CanonicalRow, FieldValue, RawTable};
pub use summary::{FailureReport, PersistenceSummary, UploadSummary};
