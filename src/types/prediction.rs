//! Score results and the prediction records persisted to storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete, ordered classification of a continuous score.
///
/// Domains use different subsets: 3-tier (NORMAL/WARNING/CRITICAL) for
/// vessel and turbofan, 4-tier (LOW/MEDIUM/HIGH/CRITICAL) for inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskTier {
    Low,
    Medium,
    Normal,
    Warning,
    High,
    Critical,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "LOW",
            RiskTier::Medium => "MEDIUM",
            RiskTier::Normal => "NORMAL",
            RiskTier::Warning => "WARNING",
            RiskTier::High => "HIGH",
            RiskTier::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain-specific secondary metrics computed from score + raw fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivedMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financial_impact: Option<f64>,
    pub recommended_action: String,
}

/// One scored, classified row before a persistence identity is minted.
#[derive(Debug, Clone)]
pub struct ScoreResult {
    pub entity_id: String,
    pub cycle: Option<i64>,
    pub score: f64,
    pub risk_tier: RiskTier,
    pub metrics: DerivedMetrics,
    pub generated_at: DateTime<Utc>,
}

/// The unit persisted to storage. Never mutated after creation; later
/// predictions for the same entity supersede it only through the
/// domain's declared conflict key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub prediction_id: String,
    pub entity_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle: Option<i64>,
    pub score: f64,
    pub risk_tier: RiskTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financial_impact: Option<f64>,
    pub recommended_action: String,
    pub generated_at: DateTime<Utc>,
    pub uploaded_at: DateTime<Utc>,
}

impl PredictionRecord {
    /// Mint a persistable record from a score result.
    pub fn from_result(result: ScoreResult, uploaded_at: DateTime<Utc>) -> Self {
        Self {
            prediction_id: uuid::Uuid::new_v4().to_string(),
            entity_id: result.entity_id,
            cycle: result.cycle,
            score: result.score,
            risk_tier: result.risk_tier,
            financial_impact: result.metrics.financial_impact,
            recommended_action: result.metrics.recommended_action,
            generated_at: result.generated_at,
            uploaded_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_serializes_uppercase() {
        let json = serde_json::to_string(&RiskTier::Critical).unwrap();
        assert_eq!(json, "\"CRITICAL\"");
        let back: RiskTier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RiskTier::Critical);
    }

    #[test]
    fn record_minting_assigns_unique_ids() {
        let result = ScoreResult {
            entity_id: "V-901".to_string(),
            cycle: None,
            score: 0.93,
            risk_tier: RiskTier::Critical,
            metrics: DerivedMetrics {
                financial_impact: None,
                recommended_action: "IMMEDIATE: Priority berthing & Tugboat standby.".to_string(),
            },
            generated_at: Utc::now(),
        };

        let uploaded_at = Utc::now();
        let a = PredictionRecord::from_result(result.clone(), uploaded_at);
        let b = PredictionRecord::from_result(result, uploaded_at);

        assert_ne!(a.prediction_id, b.prediction_id);
        assert_eq!(a.entity_id, b.entity_id);
        assert_eq!(a.uploaded_at, b.uploaded_at);
    }

    #[test]
    fn record_serialization_round_trips() {
        let record = PredictionRecord {
            prediction_id: "p-1".to_string(),
            entity_id: "unit-3".to_string(),
            cycle: Some(128),
            score: 47.5,
            risk_tier: RiskTier::Critical,
            financial_impact: None,
            recommended_action: "IMMEDIATE: Withdraw engine from service and schedule overhaul."
                .to_string(),
            generated_at: Utc::now(),
            uploaded_at: Utc::now(),
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: PredictionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.entity_id, record.entity_id);
        assert_eq!(back.cycle, record.cycle);
        assert_eq!(back.risk_tier, record.risk_tier);
    }
}
