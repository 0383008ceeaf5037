//! Raw and canonical row representations shared across pipeline stages.

use chrono::NaiveDateTime;
use std::collections::HashMap;

/// One parsed delimited file: ordered column names plus rows of string
/// cells. Produced by the ingest reader, consumed by the normalizer.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A typed cell value after normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Time(Option<NaiveDateTime>),
}

/// A row rewritten onto one domain's canonical schema.
///
/// Invariant: every canonical column the domain declares is present
/// after normalization. Numeric fields hold real numbers (defaulted,
/// never missing), categorical fields hold non-empty strings.
#[derive(Debug, Clone)]
pub struct CanonicalRow {
    pub entity_id: String,
    pub cycle: Option<i64>,
    fields: HashMap<String, FieldValue>,
}

impl CanonicalRow {
    pub fn new(entity_id: String, cycle: Option<i64>) -> Self {
        Self {
            entity_id,
            cycle,
            fields: HashMap::new(),
        }
    }

    pub fn insert(&mut self, name: &str, value: FieldValue) {
        self.fields.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Numeric field access. Absent or non-numeric fields read as zero,
    /// which is also the contract the metric deriver relies on.
    pub fn number(&self, name: &str) -> f64 {
        match self.fields.get(name) {
            Some(FieldValue::Number(v)) => *v,
            _ => 0.0,
        }
    }

    /// Categorical field access; absent fields read as "Unknown".
    pub fn text(&self, name: &str) -> &str {
        match self.fields.get(name) {
            Some(FieldValue::Text(s)) => s.as_str(),
            _ => "Unknown",
        }
    }

    pub fn time(&self, name: &str) -> Option<NaiveDateTime> {
        match self.fields.get(name) {
            Some(FieldValue::Time(t)) => *t,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_fall_back_to_defaults() {
        let row = CanonicalRow::new("unit-7".to_string(), Some(42));
        assert_eq!(row.number("sensor_4"), 0.0);
        assert_eq!(row.text("region"), "Unknown");
        assert!(row.time("recorded_at").is_none());
    }

    #[test]
    fn typed_fields_read_back() {
        let mut row = CanonicalRow::new("P0042".to_string(), None);
        row.insert("price", FieldValue::Number(19.9));
        row.insert("region", FieldValue::Text("North".to_string()));
        assert_eq!(row.number("price"), 19.9);
        assert_eq!(row.text("region"), "North");
    }
}
