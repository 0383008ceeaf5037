//! Vessel port-call delay domain.
//!
//! Telemetry snapshots carry trailing hourly speed samples; stability
//! aggregates over those samples plus heading-vs-course divergence are
//! the main engineered signals.

use super::{
    Delimiter, DomainDescriptor, FeatureSpec, HeaderPolicy, ImpactFormula, InputFormat,
    ModelFamily, RiskBand, ScoreDirection,
};
use crate::types::prediction::RiskTier;

const SPEED_TRAIL: &[&str] = &[
    "speed_knots",
    "speed_prev_1",
    "speed_prev_2",
    "speed_prev_3",
];

pub static VESSEL: DomainDescriptor = DomainDescriptor {
    key: "vessel",
    table: "vessel_delay_alerts",
    id_column: "vessel_id",
    cycle_column: None,
    rename_map: &[
        ("MMSI", "vessel_id"),
        ("IMO", "vessel_id"),
        ("Vessel ID", "vessel_id"),
        ("BaseDateTime", "recorded_at"),
        ("Timestamp", "recorded_at"),
        ("SOG", "speed_knots"),
        ("Speed", "speed_knots"),
        ("SOG_1h", "speed_prev_1"),
        ("SOG_2h", "speed_prev_2"),
        ("SOG_3h", "speed_prev_3"),
        ("Heading", "heading_deg"),
        ("COG", "course_deg"),
        ("Draft", "draught_m"),
        ("Draught", "draught_m"),
        ("Wind Speed", "wind_speed_kn"),
        ("WindSpeed", "wind_speed_kn"),
        ("Wave Height", "wave_height_m"),
        ("WaveHeight", "wave_height_m"),
        ("Distance To Berth", "distance_to_berth_nm"),
        ("DistanceToBerth", "distance_to_berth_nm"),
        ("Vessel Type", "vessel_type"),
        ("VesselType", "vessel_type"),
    ],
    numeric_columns: &[
        "speed_knots",
        "speed_prev_1",
        "speed_prev_2",
        "speed_prev_3",
        "heading_deg",
        "course_deg",
        "draught_m",
        "wind_speed_kn",
        "wave_height_m",
        "distance_to_berth_nm",
    ],
    categorical_columns: &["vessel_type"],
    time_columns: &["recorded_at"],
    primary_time_column: Some("recorded_at"),
    label_columns: &["delay_flag"],
    input_format: InputFormat {
        delimiter: Delimiter::Comma,
        header: HeaderPolicy::Headered,
    },
    category_codes: &[(
        "vessel_type",
        &[
            "Cargo",
            "Tanker",
            "Container",
            "Bulk Carrier",
            "Passenger",
            "Tug",
        ],
    )],
    features: &[
        FeatureSpec::Column("speed_knots"),
        FeatureSpec::Mean(SPEED_TRAIL),
        FeatureSpec::StdDev(SPEED_TRAIL),
        FeatureSpec::Delta("speed_knots", "speed_prev_1"),
        FeatureSpec::Column("heading_deg"),
        FeatureSpec::Delta("heading_deg", "course_deg"),
        FeatureSpec::Column("draught_m"),
        FeatureSpec::Column("wind_speed_kn"),
        FeatureSpec::Column("wave_height_m"),
        FeatureSpec::Column("distance_to_berth_nm"),
        FeatureSpec::Categorical("vessel_type"),
        FeatureSpec::DayOfWeek("recorded_at"),
        FeatureSpec::IsWeekend("recorded_at"),
    ],
    feature_version: "vessel-fe-v3",
    model_family: ModelFamily::Classifier,
    direction: ScoreDirection::HigherIsRiskier,
    bands: &[
        RiskBand {
            tier: RiskTier::Critical,
            cutoff: 0.90,
        },
        RiskBand {
            tier: RiskTier::Warning,
            cutoff: 0.70,
        },
    ],
    fallback_tier: RiskTier::Normal,
    actions: &[
        (
            RiskTier::Critical,
            "IMMEDIATE: Priority berthing & Tugboat standby.",
        ),
        (
            RiskTier::Warning,
            "PROACTIVE: Verify ETA and terminal capacity.",
        ),
        (RiskTier::Normal, "ROUTINE: Follow standard operations."),
    ],
    impact: ImpactFormula::None,
    conflict_key: None,
};
