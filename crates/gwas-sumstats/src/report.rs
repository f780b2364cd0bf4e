//! Error-table presentation and persistence.

use std::fs::File;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::{Result, SumstatsError};
use crate::validation::ErrorTable;

/// How many failure records the preview shows.
pub const PREVIEW_ROWS: usize = 10;

const COLUMNS: [&str; 6] = [
    "schema_context",
    "column",
    "check",
    "check_number",
    "failure_case",
    "index",
];

/// Path of the persisted error table for an input file.
pub fn errors_file_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_os_string();
    name.push(".err.csv.gz");
    PathBuf::from(name)
}

/// Write the full error table next to the input as
/// `<input>.err.csv.gz` and return the path written.
pub fn write_errors(input: &Path, errors: &ErrorTable) -> Result<PathBuf> {
    let out_path = errors_file_path(input);
    let file = File::create(&out_path).map_err(|e| SumstatsError::io(&out_path, e))?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut writer = csv::Writer::from_writer(encoder);

    writer.write_record(COLUMNS)?;
    for record in errors.records() {
        let check_number = record
            .check_number
            .map(|n| n.to_string())
            .unwrap_or_default();
        let index = record.index.map(|i| i.to_string()).unwrap_or_default();
        writer.write_record([
            record.schema_context.as_str(),
            record.column.as_str(),
            record.check.as_str(),
            check_number.as_str(),
            record.failure_case.as_str(),
            index.as_str(),
        ])?;
    }
    writer.flush().map_err(|e| SumstatsError::io(&out_path, e))?;
    Ok(out_path)
}

/// Render the first [`PREVIEW_ROWS`] records as an aligned text table.
pub fn format_preview(errors: &ErrorTable) -> String {
    let head = errors.head(PREVIEW_ROWS);
    let mut rows: Vec<[String; 6]> = vec![COLUMNS.map(String::from)];
    for record in head.records() {
        rows.push([
            record.schema_context.as_str().to_string(),
            record.column.clone(),
            record.check.clone(),
            record
                .check_number
                .map(|n| n.to_string())
                .unwrap_or_default(),
            record.failure_case.clone(),
            record.index.map(|i| i.to_string()).unwrap_or_default(),
        ]);
    }

    let mut widths = [0usize; 6];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in &rows {
        let line: Vec<String> = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:width$}"))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ErrorRecord;
    use std::io::Read;
    use tempfile::TempDir;

    fn sample_errors(n: usize) -> ErrorTable {
        let mut errors = ErrorTable::new();
        for i in 0..n {
            errors.push(ErrorRecord::cell(
                "chromosome",
                "Must be a value between 1 and 25",
                Some(0),
                "99",
                i,
            ));
        }
        errors
    }

    #[test]
    fn test_errors_file_path() {
        assert_eq!(
            errors_file_path(Path::new("/data/GCST1.tsv.gz")),
            PathBuf::from("/data/GCST1.tsv.gz.err.csv.gz")
        );
    }

    #[test]
    fn test_write_errors_round_trip() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("GCST1.tsv");
        let out = write_errors(&input, &sample_errors(3)).unwrap();
        assert!(out.ends_with("GCST1.tsv.err.csv.gz"));

        let mut decoder = flate2::read::MultiGzDecoder::new(File::open(&out).unwrap());
        let mut content = String::new();
        decoder.read_to_string(&mut content).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "schema_context,column,check,check_number,failure_case,index"
        );
        assert_eq!(lines.count(), 3);
    }

    #[test]
    fn test_format_preview_is_bounded() {
        let preview = format_preview(&sample_errors(25));
        // Header plus at most PREVIEW_ROWS records.
        assert_eq!(preview.lines().count(), 1 + PREVIEW_ROWS);
        assert!(preview.starts_with("schema_context"));
    }
}
