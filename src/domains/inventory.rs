//! Retail inventory stockout domain.
//!
//! Daily store/product snapshots scored for 14-day stockout risk; the
//! derived metric is revenue at risk (score x price x units sold).

use super::{
    Delimiter, DomainDescriptor, FeatureSpec, HeaderPolicy, ImpactFormula, InputFormat,
    ModelFamily, RiskBand, ScoreDirection,
};
use crate::types::prediction::RiskTier;

pub static INVENTORY: DomainDescriptor = DomainDescriptor {
    key: "inventory",
    table: "stockout_predictions",
    id_column: "product_id",
    cycle_column: None,
    rename_map: &[
        ("Date", "date"),
        ("Store ID", "store_id"),
        ("Product ID", "product_id"),
        ("Category", "category"),
        ("Region", "region"),
        ("Inventory Level", "inventory_level"),
        ("Units Sold", "units_sold"),
        ("Units Ordered", "units_ordered"),
        ("Demand Forecast", "demand_forecast"),
        ("Price", "price"),
        ("Discount", "discount"),
        ("Weather Condition", "weather"),
        ("Holiday/Promotion", "holiday_promo"),
        ("Competitor Pricing", "competitor_pricing"),
        ("Seasonality", "seasonality"),
    ],
    numeric_columns: &[
        "inventory_level",
        "units_sold",
        "units_ordered",
        "demand_forecast",
        "price",
        "discount",
        "competitor_pricing",
    ],
    categorical_columns: &[
        "store_id",
        "category",
        "region",
        "weather",
        "holiday_promo",
        "seasonality",
    ],
    time_columns: &["date"],
    primary_time_column: Some("date"),
    label_columns: &["stockout_14d"],
    input_format: InputFormat {
        delimiter: Delimiter::Comma,
        header: HeaderPolicy::Headered,
    },
    category_codes: &[
        (
            "category",
            &["Electronics", "Fashion", "Home", "Toys", "Groceries"],
        ),
        ("region", &["North", "South", "East", "West", "Central"]),
        ("weather", &["Clear", "Cloudy", "Rainy", "Snowy", "Stormy"]),
        ("holiday_promo", &["None", "Holiday", "Promotion"]),
        ("seasonality", &["Regular", "Festive", "Summer", "Winter"]),
    ],
    features: &[
        FeatureSpec::Column("inventory_level"),
        FeatureSpec::Column("units_sold"),
        FeatureSpec::Column("units_ordered"),
        FeatureSpec::Column("demand_forecast"),
        FeatureSpec::Ratio("units_sold", "inventory_level"),
        FeatureSpec::Column("price"),
        FeatureSpec::Column("discount"),
        FeatureSpec::Column("competitor_pricing"),
        FeatureSpec::Delta("competitor_pricing", "price"),
        FeatureSpec::Categorical("category"),
        FeatureSpec::Categorical("region"),
        FeatureSpec::Categorical("weather"),
        FeatureSpec::Categorical("holiday_promo"),
        FeatureSpec::Categorical("seasonality"),
        FeatureSpec::DayOfWeek("date"),
        FeatureSpec::IsWeekend("date"),
    ],
    feature_version: "inventory-fe-v2",
    model_family: ModelFamily::Classifier,
    direction: ScoreDirection::HigherIsRiskier,
    bands: &[
        RiskBand {
            tier: RiskTier::Critical,
            cutoff: 0.80,
        },
        RiskBand {
            tier: RiskTier::High,
            cutoff: 0.50,
        },
        RiskBand {
            tier: RiskTier::Medium,
            cutoff: 0.20,
        },
    ],
    fallback_tier: RiskTier::Low,
    actions: &[
        (
            RiskTier::Critical,
            "IMMEDIATE: Issue emergency replenishment order.",
        ),
        (
            RiskTier::High,
            "PRIORITY: Expedite pending purchase orders.",
        ),
        (
            RiskTier::Medium,
            "WATCHLIST: Monitor sales velocity daily.",
        ),
        (RiskTier::Low, "ROUTINE: Standard replenishment cycle."),
    ],
    impact: ImpactFormula::ScorePriceVelocity {
        price: "price",
        velocity: "units_sold",
    },
    conflict_key: None,
};
