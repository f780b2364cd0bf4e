//! Delimited-file reading with extension-inferred delimiters and
//! transparent gzip decompression.
//!
//! Sumstats files are read in several sequential passes (header scan,
//! chromosome scan, bounded sample, chunked remainder), so every read
//! operation here opens a fresh handle rather than seeking a shared one.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use flate2::read::MultiGzDecoder;
use indexmap::IndexSet;

use super::table::DataTable;
use crate::error::{Result, SumstatsError};

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = infer from the file extension).
    pub delimiter: Option<u8>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            quote: b'"',
        }
    }
}

/// Reads delimited sumstats files.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Infer the delimiter from the file extension.
    ///
    /// `.csv` is comma-separated and `.txt` space-separated; everything
    /// else is treated as tab-separated. A trailing `.gz` is ignored, so
    /// `study.csv.gz` still reads as comma-separated.
    pub fn delimiter_for(path: &Path) -> u8 {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let suffixes: Vec<&str> = name.split('.').skip(1).collect();
        if suffixes.iter().any(|s| *s == "csv") {
            b','
        } else if suffixes.iter().any(|s| *s == "txt") {
            b' '
        } else {
            b'\t'
        }
    }

    fn resolve_delimiter(&self, path: &Path) -> u8 {
        self.config
            .delimiter
            .unwrap_or_else(|| Self::delimiter_for(path))
    }

    /// Open a read handle, decompressing gzip transparently.
    fn open(&self, path: &Path) -> Result<Box<dyn Read>> {
        let file = File::open(path).map_err(|e| SumstatsError::io(path, e))?;
        if path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("gz"))
            .unwrap_or(false)
        {
            // MultiGzDecoder copes with the multi-member streams BGZIP writes.
            Ok(Box::new(MultiGzDecoder::new(file)))
        } else {
            Ok(Box::new(file))
        }
    }

    fn csv_reader(&self, path: &Path) -> Result<csv::Reader<Box<dyn Read>>> {
        let handle = self.open(path)?;
        Ok(csv::ReaderBuilder::new()
            .delimiter(self.resolve_delimiter(path))
            .has_headers(true)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(handle))
    }

    /// Read only the header row.
    pub fn read_header(&self, path: &Path) -> Result<Vec<String>> {
        let mut reader = self.csv_reader(path)?;
        let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();
        if headers.is_empty() {
            return Err(SumstatsError::EmptyFile(format!(
                "no header found in '{}'",
                path.display()
            )));
        }
        Ok(headers)
    }

    /// Read up to `nrows` data rows into a table, skipping `skip_rows`
    /// data rows first. `nrows = None` reads to the end of the file.
    pub fn read_table(
        &self,
        path: &Path,
        nrows: Option<usize>,
        skip_rows: usize,
    ) -> Result<DataTable> {
        let mut reader = self.csv_reader(path)?;
        let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();

        let mut rows = Vec::new();
        for (i, record) in reader.records().enumerate() {
            if i < skip_rows {
                record?;
                continue;
            }
            if let Some(max) = nrows {
                if rows.len() >= max {
                    break;
                }
            }
            let record = record?;
            rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        Ok(DataTable::new(headers, rows))
    }

    /// Stream the file as fixed-size chunks, skipping `skip_rows` data
    /// rows first. Yields nothing (rather than erroring) when the skip
    /// covers the whole file.
    pub fn read_chunks(&self, path: &Path, skip_rows: usize, chunksize: usize) -> Result<ChunkReader> {
        let mut reader = self.csv_reader(path)?;
        let headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();
        Ok(ChunkReader {
            headers,
            records: reader.into_records(),
            chunksize: chunksize.max(1),
            to_skip: skip_rows,
        })
    }

    /// Stream one column and collect its distinct non-null values, in
    /// first-seen order. Bounded by the number of distinct labels, not
    /// the number of rows.
    pub fn scan_column(&self, path: &Path, index: usize) -> Result<IndexSet<String>> {
        let mut reader = self.csv_reader(path)?;
        let mut values = IndexSet::new();
        for record in reader.records() {
            let record = record?;
            if let Some(cell) = record.get(index) {
                let cell = cell.trim();
                if !DataTable::is_null_value(cell) && !values.contains(cell) {
                    values.insert(cell.to_string());
                }
            }
        }
        Ok(values)
    }
}

/// Iterator over fixed-size table chunks of a sumstats file.
pub struct ChunkReader {
    headers: Vec<String>,
    records: csv::StringRecordsIntoIter<Box<dyn Read>>,
    chunksize: usize,
    to_skip: usize,
}

impl ChunkReader {
    /// Read the next chunk, or `None` once the file is exhausted.
    pub fn next_chunk(&mut self) -> Result<Option<DataTable>> {
        while self.to_skip > 0 {
            match self.records.next() {
                Some(record) => {
                    record?;
                    self.to_skip -= 1;
                }
                None => return Ok(None),
            }
        }

        let mut rows: Vec<Vec<String>> = Vec::new();
        while rows.len() < self.chunksize {
            match self.records.next() {
                Some(record) => {
                    let record = record?;
                    rows.push(record.iter().map(|s| s.to_string()).collect());
                }
                None => break,
            }
        }

        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(DataTable::new(self.headers.clone(), rows)))
    }
}

impl Iterator for ChunkReader {
    type Item = Result<DataTable>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_chunk().transpose()
    }
}
