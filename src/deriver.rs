//! Derived business metrics computed from score and raw fields.

use crate::domains::{DomainDescriptor, ImpactFormula};
use crate::types::prediction::{DerivedMetrics, RiskTier};
use crate::types::row::CanonicalRow;

/// Compute the domain's secondary metrics for one scored row.
///
/// Side-effect free. Missing formula inputs read as zero through the
/// canonical row accessors, so a gap in the upload zeroes the metric
/// for that row instead of poisoning it.
pub fn derive(
    row: &CanonicalRow,
    score: f64,
    domain: &DomainDescriptor,
    tier: RiskTier,
) -> DerivedMetrics {
    let financial_impact = match domain.impact {
        ImpactFormula::None => None,
        ImpactFormula::ScorePriceVelocity { price, velocity } => {
            Some(score * row.number(price) * row.number(velocity))
        }
    };

    DerivedMetrics {
        financial_impact,
        recommended_action: domain.action_for(tier).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::{INVENTORY, VESSEL};
    use crate::types::row::FieldValue;

    #[test]
    fn revenue_at_risk_multiplies_score_price_velocity() {
        let mut row = CanonicalRow::new("P1".to_string(), None);
        row.insert("price", FieldValue::Number(150.0));
        row.insert("units_sold", FieldValue::Number(30.0));

        let metrics = derive(&row, 0.5, &INVENTORY, RiskTier::High);
        assert_eq!(metrics.financial_impact, Some(0.5 * 150.0 * 30.0));
        assert_eq!(
            metrics.recommended_action,
            "PRIORITY: Expedite pending purchase orders."
        );
    }

    #[test]
    fn missing_formula_inputs_zero_the_metric() {
        let mut row = CanonicalRow::new("P2".to_string(), None);
        row.insert("units_sold", FieldValue::Number(30.0));
        // No price field at all: the impact is zero, never null.
        let metrics = derive(&row, 0.9, &INVENTORY, RiskTier::Critical);
        assert_eq!(metrics.financial_impact, Some(0.0));
    }

    #[test]
    fn domains_without_a_formula_carry_only_the_action() {
        let row = CanonicalRow::new("V1".to_string(), None);
        let metrics = derive(&row, 0.95, &VESSEL, RiskTier::Critical);
        assert!(metrics.financial_impact.is_none());
        assert_eq!(
            metrics.recommended_action,
            "IMMEDIATE: Priority berthing & Tugboat standby."
        );
    }
}
