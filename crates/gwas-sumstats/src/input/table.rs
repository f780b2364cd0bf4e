//! Table abstraction and the file-backed sumstats handle.

use std::path::{Path, PathBuf};

use indexmap::IndexSet;

use super::parser::{ChunkReader, Parser};
use crate::error::{Result, SumstatsError};

/// Markers pandas-style readers treat as missing values.
const NA_VALUES: &[&str] = &["", "#NA", "NA", "N/A", "NaN", "NR"];

/// Index of the effect-size field in the required column ordering.
pub(crate) const EFFECT_FIELD_INDEX: usize = 4;
/// Index of the p-value field in the required column ordering.
pub(crate) const P_VALUE_FIELD_INDEX: usize = 7;

/// Parsed tabular data: ordered headers plus row-major string cells.
///
/// Rows are padded or truncated to the header width on construction, so
/// every column has the same length.
#[derive(Debug, Clone)]
pub struct DataTable {
    /// Column headers, in on-disk order.
    pub headers: Vec<String>,
    /// Row data as raw strings.
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Create a new data table, squaring rows up to the header width.
    pub fn new(headers: Vec<String>, mut rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        for row in &mut rows {
            while row.len() < width {
                row.push(String::new());
            }
            row.truncate(width);
        }
        Self { headers, rows }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the position of a named column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(|s| s.as_str()).unwrap_or(""))
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col).map(|s| s.as_str()))
    }

    /// Get the field name at a position, or `None` past the header end.
    pub fn field_at_index(&self, index: usize) -> Option<&str> {
        self.headers.get(index).map(|s| s.as_str())
    }

    /// Append a derived column. `values` must have one cell per row.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<String>) {
        debug_assert_eq!(values.len(), self.rows.len());
        self.headers.push(name.into());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
    }

    /// Check if a value represents a missing/null cell.
    pub fn is_null_value(value: &str) -> bool {
        let trimmed = value.trim();
        NA_VALUES.contains(&trimmed)
    }
}

/// A sumstats file on disk: caches the header and hands out sequential
/// read passes over the data.
///
/// The validator *holds* one of these alongside a schema; it does not
/// extend it.
#[derive(Debug, Clone)]
pub struct SumStatsTable {
    path: PathBuf,
    parser: Parser,
    headers: Vec<String>,
}

impl SumStatsTable {
    /// Open a sumstats file and cache its header.
    ///
    /// Fails with [`SumstatsError::Io`] on unreadable input and with
    /// [`SumstatsError::EmptyFile`] when the file holds no data rows.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_parser(path, Parser::new())
    }

    /// Open a sumstats file with a custom parser configuration.
    pub fn load_with_parser(path: impl AsRef<Path>, parser: Parser) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let headers = parser.read_header(&path)?;
        let probe = parser.read_table(&path, Some(1), 0)?;
        if probe.row_count() == 0 {
            return Err(SumstatsError::EmptyFile(format!(
                "no data rows in '{}'",
                path.display()
            )));
        }
        Ok(Self {
            path,
            parser,
            headers,
        })
    }

    /// The file path this table reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The header of the file.
    pub fn header(&self) -> &[String] {
        &self.headers
    }

    /// Get the field name at a position, or `None` past the header end.
    pub fn field_at_index(&self, index: usize) -> Option<&str> {
        self.headers.get(index).map(|s| s.as_str())
    }

    /// The effect-size field label (header index 4), if present.
    pub fn effect_field(&self) -> Option<&str> {
        self.field_at_index(EFFECT_FIELD_INDEX)
    }

    /// The p-value field label (header index 7), if present.
    pub fn p_value_field(&self) -> Option<&str> {
        self.field_at_index(P_VALUE_FIELD_INDEX)
    }

    /// Read the first `nrows` data rows.
    pub fn sample(&self, nrows: usize) -> Result<DataTable> {
        self.parser.read_table(&self.path, Some(nrows), 0)
    }

    /// Stream the remainder of the file in `chunksize`-row tables,
    /// skipping the first `skip_rows` data rows.
    pub fn chunks(&self, skip_rows: usize, chunksize: usize) -> Result<ChunkReader> {
        self.parser.read_chunks(&self.path, skip_rows, chunksize)
    }

    /// Distinct non-null values of a named column, streaming the whole
    /// file. `None` if the column is not in the header.
    pub fn distinct_values(&self, column: &str) -> Result<Option<IndexSet<String>>> {
        match self.headers.iter().position(|h| h == column) {
            Some(index) => Ok(Some(self.parser.scan_column(&self.path, index)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_rows_squared_to_header_width() {
        let table = DataTable::new(
            vec!["a".into(), "b".into(), "c".into()],
            vec![vec!["1".into()], vec!["1".into(), "2".into(), "3".into(), "4".into()]],
        );
        assert!(table.rows.iter().all(|r| r.len() == 3));
        assert_eq!(table.get(0, 1), Some(""));
        assert_eq!(table.get(1, 2), Some("3"));
    }

    #[test]
    fn test_push_column() {
        let mut table = DataTable::new(
            vec!["a".into()],
            vec![vec!["1".into()], vec!["2".into()]],
        );
        table.push_column("b", vec!["x".into(), "y".into()]);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.get(1, 1), Some("y"));
    }

    #[test]
    fn test_is_null_value() {
        assert!(DataTable::is_null_value(""));
        assert!(DataTable::is_null_value("NA"));
        assert!(DataTable::is_null_value("#NA"));
        assert!(DataTable::is_null_value("N/A"));
        assert!(DataTable::is_null_value("NaN"));
        assert!(DataTable::is_null_value("NR"));
        assert!(!DataTable::is_null_value("0"));
        assert!(!DataTable::is_null_value("na"));
    }

    #[test]
    fn test_positional_field_lookup() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "t.tsv",
            "chromosome\tbase_pair_location\teffect_allele\tother_allele\tbeta\tstandard_error\teffect_allele_frequency\tp_value\n\
             1\t100\tA\tG\t0.1\t0.2\t0.3\t0.4\n",
        );
        let table = SumStatsTable::load(&path).unwrap();
        assert_eq!(table.effect_field(), Some("beta"));
        assert_eq!(table.p_value_field(), Some("p_value"));
        assert_eq!(table.field_at_index(20), None);
    }

    #[test]
    fn test_effect_field_none_when_short() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "t.tsv", "a\tb\n1\t2\n");
        let table = SumStatsTable::load(&path).unwrap();
        assert_eq!(table.effect_field(), None);
        assert_eq!(table.p_value_field(), None);
    }

    #[test]
    fn test_load_empty_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "t.tsv", "a\tb\n");
        let err = SumStatsTable::load(&path).unwrap_err();
        assert!(matches!(err, SumstatsError::EmptyFile(_)));
    }

    #[test]
    fn test_distinct_values_missing_column() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "t.tsv", "a\n1\n");
        let table = SumStatsTable::load(&path).unwrap();
        assert!(table.distinct_values("chromosome").unwrap().is_none());
    }
}
