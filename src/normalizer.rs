//! Schema normalization onto a domain's canonical column set.
//!
//! Uploads drift: headers get renamed, columns go missing, numeric
//! cells arrive with thousands separators, dates arrive in half a dozen
//! formats. Everything here degrades to a declared default; the single
//! unrecoverable condition is an absent identity column.

use crate::domains::DomainDescriptor;
use crate::error::{PipelineError, Result};
use crate::types::row::{CanonicalRow, FieldValue, RawTable};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Weekday};

/// Rewrite every raw row onto the domain's canonical schema.
///
/// `now` fills missing time columns so derived calendar fields stay
/// meaningful; it is passed in to keep the caller in charge of clocks.
pub fn normalize_table(
    table: &RawTable,
    domain: &DomainDescriptor,
    now: NaiveDateTime,
) -> Result<Vec<CanonicalRow>> {
    let canonical = canonical_columns(table, domain);

    let id_idx = canonical
        .iter()
        .position(|c| c == domain.id_column)
        .ok_or_else(|| PipelineError::MissingIdentity {
            column: domain.id_column.to_string(),
        })?;
    let cycle_idx = domain
        .cycle_column
        .and_then(|col| canonical.iter().position(|c| c == col));
    let index_of = |name: &str| canonical.iter().position(|c| c == name);

    let mut rows = Vec::with_capacity(table.len());
    for (row_no, cells) in table.rows.iter().enumerate() {
        let entity_id = match cells.get(id_idx).map(|c| c.trim()) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => format!("row-{row_no}"),
        };
        let cycle = cycle_idx
            .and_then(|idx| cells.get(idx))
            .and_then(|cell| coerce_number(cell))
            .map(|v| v as i64);

        let mut row = CanonicalRow::new(entity_id, cycle);

        for col in domain.numeric_columns.iter().copied() {
            let value = index_of(col)
                .and_then(|idx| cells.get(idx))
                .and_then(|cell| coerce_number(cell))
                .unwrap_or(0.0);
            row.insert(col, FieldValue::Number(value));
        }

        for col in domain.categorical_columns.iter().copied() {
            let value = index_of(col)
                .and_then(|idx| cells.get(idx))
                .map(|cell| cell.trim())
                .filter(|cell| !cell.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| "Unknown".to_string());
            row.insert(col, FieldValue::Text(value));
        }

        for col in domain.time_columns.iter().copied() {
            let value = match index_of(col) {
                Some(idx) => cells.get(idx).and_then(|cell| parse_datetime(cell)),
                // Column absent from the upload entirely: use the batch clock.
                None => Some(now),
            };
            row.insert(col, FieldValue::Time(value));
        }

        if let Some(time_col) = domain.primary_time_column {
            let parsed = row.time(time_col);
            let day_name = parsed
                .map(|t| weekday_name(t.weekday()).to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            let weekend = parsed
                .map(|t| matches!(t.weekday(), Weekday::Sat | Weekday::Sun))
                .unwrap_or(false);
            row.insert("day_of_week", FieldValue::Text(day_name));
            row.insert("is_weekend", FieldValue::Number(if weekend { 1.0 } else { 0.0 }));
        }

        rows.push(row);
    }

    Ok(rows)
}

/// Header names after trimming and the domain's rename map. Label
/// columns from training sets are blanked out so they can never collide
/// with canonical names.
fn canonical_columns(table: &RawTable, domain: &DomainDescriptor) -> Vec<String> {
    table
        .columns
        .iter()
        .map(|raw| {
            let trimmed = raw.trim();
            let renamed = domain
                .rename_map
                .iter()
                .find(|(source, _)| *source == trimmed)
                .map(|(_, canonical)| *canonical)
                .unwrap_or(trimmed);
            if domain.label_columns.contains(&renamed) {
                String::new()
            } else {
                renamed.to_string()
            }
        })
        .collect()
}

/// Coerce a numeric-looking cell, stripping thousands separators and
/// stray whitespace. Anything that still fails is `None`, never an
/// error.
pub(crate) fn coerce_number(cell: &str) -> Option<f64> {
    let cleaned: String = cell
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

/// Permissive date parsing: RFC 3339 first, then common datetime and
/// date-only layouts, day-first before month-first.
pub(crate) fn parse_datetime(cell: &str) -> Option<NaiveDateTime> {
    let s = cell.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%d/%m/%Y %H:%M:%S", "%m/%d/%Y %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%m/%d/%Y", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
