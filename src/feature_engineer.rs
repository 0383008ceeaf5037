//! Feature vector construction from canonical rows.
//!
//! Produces the exact ordered vector a domain's model artifact was
//! trained against, including engineered fields that are not present
//! verbatim in the input (calendar features, trailing-sample
//! aggregates, deltas and ratios). The order is fixed by the domain
//! descriptor and versioned through its `feature_version` tag.

use crate::domains::{DomainDescriptor, FeatureSpec};
use crate::types::row::CanonicalRow;
use chrono::{Datelike, Weekday};

/// Build the feature vector for one row. Pure and deterministic: the
/// same canonical row always yields a bit-identical vector, and one
/// input row always yields exactly one vector.
pub fn engineer(row: &CanonicalRow, domain: &DomainDescriptor) -> Vec<f32> {
    domain
        .features
        .iter()
        .map(|spec| feature_value(row, domain, spec))
        .collect()
}

/// Human-readable names for the domain's feature slots, in order.
pub fn feature_names(domain: &DomainDescriptor) -> Vec<String> {
    domain
        .features
        .iter()
        .map(|spec| match spec {
            FeatureSpec::Column(c) => (*c).to_string(),
            FeatureSpec::Categorical(c) => format!("{c}_code"),
            FeatureSpec::DayOfWeek(t) => format!("{t}_day_of_week"),
            FeatureSpec::IsWeekend(t) => format!("{t}_is_weekend"),
            FeatureSpec::Delta(a, b) => format!("{a}_minus_{b}"),
            FeatureSpec::Ratio(a, b) => format!("{a}_per_{b}"),
            FeatureSpec::Mean(cols) => format!("{}_mean", cols[0]),
            FeatureSpec::StdDev(cols) => format!("{}_stddev", cols[0]),
        })
        .collect()
}

fn feature_value(row: &CanonicalRow, domain: &DomainDescriptor, spec: &FeatureSpec) -> f32 {
    match *spec {
        FeatureSpec::Column(c) => row.number(c) as f32,
        FeatureSpec::Categorical(c) => domain.category_code(c, row.text(c)),
        FeatureSpec::DayOfWeek(t) => row
            .time(t)
            .map(|dt| dt.weekday().num_days_from_monday() as f32)
            .unwrap_or(-1.0),
        FeatureSpec::IsWeekend(t) => row
            .time(t)
            .map(|dt| {
                if matches!(dt.weekday(), Weekday::Sat | Weekday::Sun) {
                    1.0
                } else {
                    0.0
                }
            })
            .unwrap_or(0.0),
        FeatureSpec::Delta(a, b) => (row.number(a) - row.number(b)) as f32,
        FeatureSpec::Ratio(a, b) => (row.number(a) / (row.number(b) + 1.0)) as f32,
        FeatureSpec::Mean(cols) => mean(row, cols) as f32,
        FeatureSpec::StdDev(cols) => {
            let m = mean(row, cols);
            let variance = cols
                .iter()
                .copied()
                .map(|col| {
                    let delta = row.number(col) - m;
                    delta * delta
                })
                .sum::<f64>()
                / cols.len() as f64;
            variance.sqrt() as f32
        }
    }
}

fn mean(row: &CanonicalRow, cols: &[&str]) -> f64 {
    cols.iter().copied().map(|col| row.number(col)).sum::<f64>() / cols.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::{INVENTORY, VESSEL};
    use crate::types::row::FieldValue;
    use chrono::NaiveDate;

    fn vessel_row() -> CanonicalRow {
        let mut row = CanonicalRow::new("123456789".to_string(), None);
        for (col, value) in [
            ("speed_knots", 12.0),
            ("speed_prev_1", 10.0),
            ("speed_prev_2", 11.0),
            ("speed_prev_3", 11.0),
            ("heading_deg", 90.0),
            ("course_deg", 84.0),
            ("draught_m", 9.5),
            ("wind_speed_kn", 18.0),
            ("wave_height_m", 1.2),
            ("distance_to_berth_nm", 4.5),
        ] {
            row.insert(col, FieldValue::Number(value));
        }
        row.insert("vessel_type", FieldValue::Text("Tanker".to_string()));
        row.insert(
            "recorded_at",
            FieldValue::Time(
                NaiveDate::from_ymd_opt(2024, 6, 1).unwrap().and_hms_opt(6, 0, 0),
            ),
        );
        row
    }

    #[test]
    fn vector_matches_the_declared_contract() {
        let row = vessel_row();
        let features = engineer(&row, &VESSEL);

        assert_eq!(features.len(), VESSEL.arity());
        assert_eq!(features[0], 12.0); // speed_knots
        assert_eq!(features[1], 11.0); // trailing mean
        assert_eq!(features[3], 2.0); // speed delta
        assert_eq!(features[5], 6.0); // heading vs course divergence
        assert_eq!(features[10], 1.0); // Tanker code
        assert_eq!(features[11], 5.0); // Saturday
        assert_eq!(features[12], 1.0); // weekend
    }

    #[test]
    fn engineering_is_deterministic() {
        let row = vessel_row();
        assert_eq!(engineer(&row, &VESSEL), engineer(&row, &VESSEL));
    }

    #[test]
    fn stddev_over_identical_samples_is_zero() {
        let mut row = vessel_row();
        for col in ["speed_knots", "speed_prev_1", "speed_prev_2", "speed_prev_3"] {
            row.insert(col, FieldValue::Number(8.0));
        }
        let features = engineer(&row, &VESSEL);
        assert_eq!(features[2], 0.0);
    }

    #[test]
    fn unparsed_time_features_are_null_safe() {
        let mut row = vessel_row();
        row.insert("recorded_at", FieldValue::Time(None));
        let features = engineer(&row, &VESSEL);
        assert_eq!(features[11], -1.0);
        assert_eq!(features[12], 0.0);
    }

    #[test]
    fn ratio_features_are_denominator_safe() {
        let mut row = CanonicalRow::new("P1".to_string(), None);
        row.insert("units_sold", FieldValue::Number(30.0));
        row.insert("inventory_level", FieldValue::Number(0.0));
        let idx = INVENTORY
            .features
            .iter()
            .position(|s| matches!(s, FeatureSpec::Ratio(_, _)))
            .unwrap();
        let features = engineer(&row, &INVENTORY);
        assert_eq!(features[idx], 30.0);
    }

    #[test]
    fn feature_names_align_with_vector_slots() {
        let names = feature_names(&VESSEL);
        assert_eq!(names.len(), VESSEL.arity());
        assert_eq!(names[0], "speed_knots");
        assert_eq!(names[1], "speed_knots_mean");
    }
}
