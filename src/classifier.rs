//! Score-to-tier classification.

use crate::domains::{RiskBand, ScoreDirection};
use crate::types::prediction::RiskTier;

/// Map a continuous score onto a discrete risk tier.
///
/// Bands are evaluated most severe first and the first match wins, so
/// exact boundary values land in the more severe tier. Probabilistic
/// domains test `score >= cutoff`; remaining-life domains invert the
/// scale and test strict `score < cutoff`. Total: every finite score
/// maps to exactly one tier, with the fallback covering the remainder.
pub fn classify(
    score: f64,
    direction: ScoreDirection,
    bands: &[RiskBand],
    fallback: RiskTier,
) -> RiskTier {
    for band in bands {
        let matched = match direction {
            ScoreDirection::HigherIsRiskier => score >= band.cutoff,
            ScoreDirection::LowerIsRiskier => score < band.cutoff,
        };
        if matched {
            return band.tier;
        }
    }
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::{INVENTORY, TURBOFAN, VESSEL};

    fn classify_for(domain: &crate::domains::DomainDescriptor, score: f64) -> RiskTier {
        classify(score, domain.direction, domain.bands, domain.fallback_tier)
    }

    #[test]
    fn probability_boundaries_are_inclusive() {
        // 0.80 with CRITICAL >= 0.80 is CRITICAL, not HIGH.
        assert_eq!(classify_for(&INVENTORY, 0.80), RiskTier::Critical);
        assert_eq!(classify_for(&INVENTORY, 0.79), RiskTier::High);
        assert_eq!(classify_for(&INVENTORY, 0.50), RiskTier::High);
        assert_eq!(classify_for(&INVENTORY, 0.20), RiskTier::Medium);
        assert_eq!(classify_for(&INVENTORY, 0.19), RiskTier::Low);
        assert_eq!(classify_for(&INVENTORY, 0.0), RiskTier::Low);
    }

    #[test]
    fn vessel_tiers_follow_the_configured_cutoffs() {
        assert_eq!(classify_for(&VESSEL, 0.95), RiskTier::Critical);
        assert_eq!(classify_for(&VESSEL, 0.90), RiskTier::Critical);
        assert_eq!(classify_for(&VESSEL, 0.70), RiskTier::Warning);
        assert_eq!(classify_for(&VESSEL, 0.69), RiskTier::Normal);
    }

    #[test]
    fn remaining_life_scale_is_inverted_and_strict() {
        assert_eq!(classify_for(&TURBOFAN, 12.0), RiskTier::Critical);
        assert_eq!(classify_for(&TURBOFAN, 49.9), RiskTier::Critical);
        // Exactly 50 cycles is WARNING: the band is `< 50`.
        assert_eq!(classify_for(&TURBOFAN, 50.0), RiskTier::Warning);
        assert_eq!(classify_for(&TURBOFAN, 99.9), RiskTier::Warning);
        assert_eq!(classify_for(&TURBOFAN, 100.0), RiskTier::Normal);
        assert_eq!(classify_for(&TURBOFAN, 250.0), RiskTier::Normal);
    }

    #[test]
    fn classification_is_total_over_a_score_sweep() {
        for i in 0..=100 {
            let score = i as f64 / 100.0;
            // Must never panic and always return some tier.
            let _ = classify_for(&INVENTORY, score);
        }
    }
}
