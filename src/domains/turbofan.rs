//! Turbofan remaining-useful-life domain.
//!
//! C-MAPSS style test files: whitespace-delimited, headerless, with a
//! sensor count that depends on the file width. The model is a
//! regressor predicting remaining cycles, so smaller scores are riskier.

use super::{
    Delimiter, DomainDescriptor, FeatureSpec, HeaderPolicy, ImpactFormula, InputFormat,
    ModelFamily, RiskBand, ScoreDirection,
};
use crate::types::prediction::RiskTier;

/// Column names for a headerless engine log: unit and cycle counters,
/// three operational settings, then one column per remaining sensor.
fn column_names(width: usize) -> Vec<String> {
    let sensors = width.saturating_sub(5);
    let mut columns = Vec::with_capacity(width);
    columns.push("unit_number".to_string());
    columns.push("time_in_cycles".to_string());
    for i in 1..=3 {
        columns.push(format!("op_setting_{i}"));
    }
    for i in 1..=sensors {
        columns.push(format!("sensor_{i}"));
    }
    columns
}

pub static TURBOFAN: DomainDescriptor = DomainDescriptor {
    key: "turbofan",
    table: "engine_rul_predictions",
    id_column: "unit_number",
    cycle_column: Some("time_in_cycles"),
    rename_map: &[],
    numeric_columns: &[
        "time_in_cycles",
        "op_setting_1",
        "op_setting_2",
        "op_setting_3",
        "sensor_1",
        "sensor_2",
        "sensor_3",
        "sensor_4",
        "sensor_5",
        "sensor_6",
        "sensor_7",
        "sensor_8",
        "sensor_9",
        "sensor_10",
        "sensor_11",
        "sensor_12",
        "sensor_13",
        "sensor_14",
        "sensor_15",
        "sensor_16",
        "sensor_17",
        "sensor_18",
        "sensor_19",
        "sensor_20",
        "sensor_21",
    ],
    categorical_columns: &[],
    time_columns: &[],
    primary_time_column: None,
    label_columns: &[],
    input_format: InputFormat {
        delimiter: Delimiter::Whitespace,
        header: HeaderPolicy::Headerless(column_names),
    },
    category_codes: &[],
    // The exact feature order the artifact was trained against.
    features: &[
        FeatureSpec::Column("time_in_cycles"),
        FeatureSpec::Column("sensor_11"),
        FeatureSpec::Column("sensor_4"),
        FeatureSpec::Column("sensor_12"),
        FeatureSpec::Column("sensor_7"),
        FeatureSpec::Column("sensor_15"),
        FeatureSpec::Column("sensor_21"),
        FeatureSpec::Column("sensor_20"),
    ],
    feature_version: "turbofan-fe-v1",
    model_family: ModelFamily::Regressor,
    direction: ScoreDirection::LowerIsRiskier,
    bands: &[
        RiskBand {
            tier: RiskTier::Critical,
            cutoff: 50.0,
        },
        RiskBand {
            tier: RiskTier::Warning,
            cutoff: 100.0,
        },
    ],
    fallback_tier: RiskTier::Normal,
    actions: &[
        (
            RiskTier::Critical,
            "IMMEDIATE: Withdraw engine from service and schedule overhaul.",
        ),
        (
            RiskTier::Warning,
            "PROACTIVE: Increase inspection frequency and order parts.",
        ),
        (
            RiskTier::Normal,
            "ROUTINE: Continue standard maintenance intervals.",
        ),
    ],
    impact: ImpactFormula::None,
    conflict_key: Some(&["entity_id", "cycle"]),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_names_scale_with_file_width() {
        let columns = column_names(26);
        assert_eq!(columns.len(), 26);
        assert_eq!(columns[0], "unit_number");
        assert_eq!(columns[1], "time_in_cycles");
        assert_eq!(columns[2], "op_setting_1");
        assert_eq!(columns[5], "sensor_1");
        assert_eq!(columns[25], "sensor_21");
    }
}
