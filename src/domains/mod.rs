//! Domain descriptors: all per-domain variation expressed as data.
//!
//! The pipeline itself is generic; a descriptor carries the rename map,
//! canonical column sets, feature contract, risk bands, action texts,
//! and conflict key for one domain. Adding a domain means adding a new
//! descriptor, not new control flow.

mod inventory;
mod turbofan;
mod vessel;

pub use inventory::INVENTORY;
pub use turbofan::TURBOFAN;
pub use vessel::VESSEL;

use crate::error::{PipelineError, Result};
use crate::types::prediction::RiskTier;

/// How a continuous score maps onto severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreDirection {
    /// Probabilistic models: larger score = higher risk; bands test `>=`.
    HigherIsRiskier,
    /// Remaining-life regressors: smaller score = higher risk; bands
    /// test strict `<` on an inverted scale.
    LowerIsRiskier,
}

/// Model family resolved at load time, never branched on per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    /// Binary classifier emitting a positive-class probability in [0,1].
    Classifier,
    /// Regressor emitting an unbounded domain quantity (e.g. RUL cycles).
    Regressor,
}

/// One ordered threshold band. Bands are listed most severe first and
/// the first match wins, so boundary values land in the severer tier.
#[derive(Debug, Clone, Copy)]
pub struct RiskBand {
    pub tier: RiskTier,
    pub cutoff: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Whitespace,
}

/// Column naming for files without a header row. The function receives
/// the observed column count and returns the full canonical name list
/// (the turbofan sensor set depends on file width).
#[derive(Clone, Copy)]
pub enum HeaderPolicy {
    Headered,
    Headerless(fn(usize) -> Vec<String>),
}

#[derive(Clone, Copy)]
pub struct InputFormat {
    pub delimiter: Delimiter,
    pub header: HeaderPolicy,
}

/// A single entry in the ordered feature contract of a model artifact.
///
/// The list order is part of the artifact's implicit contract and is
/// versioned through [`DomainDescriptor::feature_version`].
#[derive(Debug, Clone, Copy)]
pub enum FeatureSpec {
    /// Numeric canonical column, verbatim.
    Column(&'static str),
    /// Categorical column encoded through the descriptor's code list.
    Categorical(&'static str),
    /// Weekday index Mon=0..Sun=6 from a time column; unparsed -> -1.
    DayOfWeek(&'static str),
    /// 1.0 for Saturday/Sunday, otherwise (and when unparsed) 0.0.
    IsWeekend(&'static str),
    /// `a - b`.
    Delta(&'static str, &'static str),
    /// `a / (b + 1)`, denominator-safe.
    Ratio(&'static str, &'static str),
    /// Arithmetic mean over trailing-sample columns.
    Mean(&'static [&'static str]),
    /// Population standard deviation over trailing-sample columns.
    StdDev(&'static [&'static str]),
}

/// Secondary business-metric formula computed from score + raw fields.
#[derive(Debug, Clone, Copy)]
pub enum ImpactFormula {
    None,
    /// score x price x velocity; missing inputs contribute zero.
    ScorePriceVelocity {
        price: &'static str,
        velocity: &'static str,
    },
}

/// Everything the pipeline needs to know about one domain.
pub struct DomainDescriptor {
    pub key: &'static str,
    /// Storage table receiving this domain's prediction records.
    pub table: &'static str,
    /// The one structurally required column; its absence from an upload
    /// is the single unrecoverable normalization error.
    pub id_column: &'static str,
    /// Optional cycle/sequence column feeding the record's natural key.
    pub cycle_column: Option<&'static str>,
    /// Source header -> canonical name.
    pub rename_map: &'static [(&'static str, &'static str)],
    pub numeric_columns: &'static [&'static str],
    pub categorical_columns: &'static [&'static str],
    pub time_columns: &'static [&'static str],
    /// Time column feeding day-of-week / weekend derivation.
    pub primary_time_column: Option<&'static str>,
    /// Training label columns dropped when present in uploads.
    pub label_columns: &'static [&'static str],
    pub input_format: InputFormat,
    /// Ordered known values per categorical column; the code is the
    /// position, unknown values map past the end ("other" bucket).
    pub category_codes: &'static [(&'static str, &'static [&'static str])],
    pub features: &'static [FeatureSpec],
    /// Version tag of the feature contract, checked against artifact
    /// metadata at load time to catch silent drift.
    pub feature_version: &'static str,
    pub model_family: ModelFamily,
    pub direction: ScoreDirection,
    pub bands: &'static [RiskBand],
    pub fallback_tier: RiskTier,
    /// Total mapping tier -> recommended action text.
    pub actions: &'static [(RiskTier, &'static str)],
    pub impact: ImpactFormula,
    /// Natural key for upserts; `None` means plain inserts.
    pub conflict_key: Option<&'static [&'static str]>,
}

impl DomainDescriptor {
    /// Number of features the domain's model artifact expects.
    pub fn arity(&self) -> usize {
        self.features.len()
    }

    pub fn action_for(&self, tier: RiskTier) -> &'static str {
        self.actions
            .iter()
            .find(|(t, _)| *t == tier)
            .map(|(_, action)| *action)
            .unwrap_or("")
    }

    pub fn category_code(&self, column: &str, value: &str) -> f32 {
        match self
            .category_codes
            .iter()
            .find(|(col, _)| *col == column)
        {
            Some((_, values)) => values
                .iter()
                .position(|v| *v == value)
                .unwrap_or(values.len()) as f32,
            None => 0.0,
        }
    }

    fn knows_numeric(&self, name: &str) -> bool {
        self.numeric_columns.contains(&name)
    }

    fn knows_time(&self, name: &str) -> bool {
        self.time_columns.contains(&name)
    }

    /// Structural validation run once at pipeline construction, so the
    /// hot path can rely on total action maps and ordered bands.
    pub fn validate(&self) -> Result<()> {
        let mut tiers: Vec<RiskTier> = self.bands.iter().map(|b| b.tier).collect();
        tiers.push(self.fallback_tier);
        for tier in tiers {
            if self.action_for(tier).is_empty() {
                return Err(PipelineError::Config(format!(
                    "domain {}: no recommended action mapped for tier {tier}",
                    self.key
                )));
            }
        }

        for pair in self.bands.windows(2) {
            let ordered = match self.direction {
                ScoreDirection::HigherIsRiskier => pair[0].cutoff > pair[1].cutoff,
                ScoreDirection::LowerIsRiskier => pair[0].cutoff < pair[1].cutoff,
            };
            if !ordered {
                return Err(PipelineError::Config(format!(
                    "domain {}: risk bands are not ordered most severe first",
                    self.key
                )));
            }
        }

        for spec in self.features.iter().copied() {
            let ok = match spec {
                FeatureSpec::Column(c) => self.knows_numeric(c),
                FeatureSpec::Categorical(c) => {
                    self.categorical_columns.contains(&c)
                        && self.category_codes.iter().any(|(col, _)| *col == c)
                }
                FeatureSpec::DayOfWeek(t) | FeatureSpec::IsWeekend(t) => self.knows_time(t),
                FeatureSpec::Delta(a, b) | FeatureSpec::Ratio(a, b) => {
                    self.knows_numeric(a) && self.knows_numeric(b)
                }
                FeatureSpec::Mean(cols) | FeatureSpec::StdDev(cols) => {
                    !cols.is_empty() && cols.iter().copied().all(|col| self.knows_numeric(col))
                }
            };
            if !ok {
                return Err(PipelineError::Config(format!(
                    "domain {}: feature {spec:?} references an undeclared column",
                    self.key
                )));
            }
        }

        Ok(())
    }
}

/// Look up a domain descriptor by key.
pub fn descriptor(key: &str) -> Option<&'static DomainDescriptor> {
    all().into_iter().find(|d| d.key == key)
}

pub fn all() -> [&'static DomainDescriptor; 3] {
    [&VESSEL, &TURBOFAN, &INVENTORY]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_registered_domain_validates() {
        for domain in all() {
            domain.validate().unwrap();
        }
    }

    #[test]
    fn descriptor_lookup_by_key() {
        assert_eq!(descriptor("vessel").unwrap().key, "vessel");
        assert_eq!(descriptor("turbofan").unwrap().key, "turbofan");
        assert_eq!(descriptor("inventory").unwrap().key, "inventory");
        assert!(descriptor("unknown").is_none());
    }

    #[test]
    fn category_codes_bucket_unknown_values_past_the_end() {
        let code_known = INVENTORY.category_code("region", "North");
        let code_unknown = INVENTORY.category_code("region", "Atlantis");
        assert_eq!(code_known, 0.0);
        assert!(code_unknown > code_known);
    }

    #[test]
    fn action_map_is_total_over_band_tiers() {
        for domain in all() {
            for band in domain.bands {
                assert!(!domain.action_for(band.tier).is_empty());
            }
            assert!(!domain.action_for(domain.fallback_tier).is_empty());
        }
    }
}
