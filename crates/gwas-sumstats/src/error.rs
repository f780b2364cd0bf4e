//! Error types for the gwas-sumstats library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sumstats operations.
///
/// Expected validation failures are never surfaced here — a failed
/// validation run still returns `Ok` with a `valid = false` outcome.
/// These variants are reserved for I/O-boundary failures on the input
/// path and its sidecar files.
#[derive(Debug, Error)]
pub enum SumstatsError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File contains a header but no data rows, or nothing at all.
    #[error("Empty file: {0}")]
    EmptyFile(String),

    /// Error parsing a metadata YAML sidecar.
    #[error("Metadata error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl SumstatsError {
    /// Wrap an `std::io::Error` with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for sumstats operations.
pub type Result<T> = std::result::Result<T, SumstatsError>;
