//! Delimited input reading.
//!
//! One upload is one delimited text file, comma- or whitespace-
//! separated, with or without a header row. Headerless files are only
//! accepted for domains that can generate column names from the row
//! width.

use crate::domains::{Delimiter, HeaderPolicy, InputFormat};
use crate::error::{PipelineError, Result};
use crate::types::row::RawTable;
use std::io::BufRead;

/// Read one delimited file into a raw table.
///
/// Short rows are padded with empty cells and long rows truncated to
/// the header width; both degrade gracefully downstream.
pub fn read_table<R: BufRead>(reader: R, format: &InputFormat) -> Result<RawTable> {
    let mut parsed: Vec<Vec<String>> = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|e| PipelineError::Ingest(e.to_string()))?;
        if line.trim().is_empty() {
            continue;
        }
        parsed.push(split_line(&line, format.delimiter));
    }

    if parsed.is_empty() {
        return Err(PipelineError::Ingest("input file is empty".to_string()));
    }

    let (columns, data_start) = match format.header {
        HeaderPolicy::Headered => (header_cells(&parsed[0]), 1),
        HeaderPolicy::Headerless(namer) => {
            if looks_numeric_row(&parsed[0]) {
                (namer(parsed[0].len()), 0)
            } else {
                // Same domain, headered variant.
                (header_cells(&parsed[0]), 1)
            }
        }
    };

    let width = columns.len();
    let rows = parsed
        .into_iter()
        .skip(data_start)
        .map(|mut row| {
            row.resize(width, String::new());
            row
        })
        .collect();

    Ok(RawTable { columns, rows })
}

fn header_cells(cells: &[String]) -> Vec<String> {
    cells.iter().map(|c| c.trim().to_string()).collect()
}

fn looks_numeric_row(cells: &[String]) -> bool {
    !cells.is_empty() && cells.iter().all(|c| c.trim().parse::<f64>().is_ok())
}

fn split_line(line: &str, delimiter: Delimiter) -> Vec<String> {
    match delimiter {
        Delimiter::Whitespace => line.split_whitespace().map(str::to_string).collect(),
        Delimiter::Comma => split_comma(line),
    }
}

/// Comma split with minimal double-quote support, enough for exports
/// that quote cells containing commas.
fn split_comma(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                cells.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    cells.push(current);
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::{TURBOFAN, VESSEL};
    use std::io::Cursor;

    #[test]
    fn headered_comma_file_parses() {
        let input = "MMSI,SOG,Heading\n123456789,12.4,85\n987654321,9.1,120\n";
        let table = read_table(Cursor::new(input), &VESSEL.input_format).unwrap();
        assert_eq!(table.columns, vec!["MMSI", "SOG", "Heading"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0][1], "12.4");
    }

    #[test]
    fn quoted_cells_keep_embedded_commas() {
        let input = "Product ID,Category\nP1,\"Home, Garden\"\n";
        let table = read_table(Cursor::new(input), &VESSEL.input_format).unwrap();
        assert_eq!(table.rows[0][1], "Home, Garden");
    }

    #[test]
    fn headerless_whitespace_file_generates_columns() {
        let input = "1 1 0.0 0.1 100.0 641.82 1589.7 14.62 21.61 554.36\n\
                     1 2 0.1 0.2 100.0 642.15 1591.8 14.62 21.61 553.75\n";
        let table = read_table(Cursor::new(input), &TURBOFAN.input_format).unwrap();
        assert_eq!(table.columns[0], "unit_number");
        assert_eq!(table.columns[1], "time_in_cycles");
        assert_eq!(table.columns[5], "sensor_1");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn headerless_domain_accepts_a_headered_variant() {
        let input = "unit_number time_in_cycles op_setting_1\n7 12 0.4\n";
        let table = read_table(Cursor::new(input), &TURBOFAN.input_format).unwrap();
        assert_eq!(table.columns, vec!["unit_number", "time_in_cycles", "op_setting_1"]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn short_rows_are_padded_to_header_width() {
        let input = "a,b,c\n1,2\n";
        let table = read_table(Cursor::new(input), &VESSEL.input_format).unwrap();
        assert_eq!(table.rows[0], vec!["1", "2", ""]);
    }

    #[test]
    fn empty_input_is_an_ingest_error() {
        let err = read_table(Cursor::new("\n\n"), &VESSEL.input_format).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }
}
