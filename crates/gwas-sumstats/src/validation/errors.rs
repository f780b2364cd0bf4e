//! Failure records, the accumulated error table, and the primary-error
//! classification.

use serde::Serialize;

use crate::schema::P_VALUE_MANTISSA;

/// Where a failure was detected: against the table as a whole (missing
/// or misplaced columns) or against the cells of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SchemaContext {
    /// Table-wide/header-level violation.
    #[serde(rename = "DataFrameSchema")]
    Table,
    /// Per-cell violation within one column.
    #[serde(rename = "Column")]
    Column,
}

impl SchemaContext {
    /// Label used in the serialized error table.
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaContext::Table => "DataFrameSchema",
            SchemaContext::Column => "Column",
        }
    }
}

/// The single summarizing classification of why a file failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorType {
    /// Unacceptable file extension.
    #[serde(rename = "file_ext")]
    FileExt,
    /// Mandatory columns missing or out of order.
    #[serde(rename = "field order")]
    FieldOrder,
    /// Autosomes missing from the chromosome column.
    #[serde(rename = "missing_chromosomes")]
    MissingChromosomes,
    /// Fewer data rows than the configured minimum.
    #[serde(rename = "minrows")]
    MinRows,
    /// Header-level schema violations.
    #[serde(rename = "headers")]
    Headers,
    /// Per-cell data violations.
    #[serde(rename = "data")]
    Data,
    /// P-value-specific violations (zero when disallowed, or magnitude
    /// out of range).
    #[serde(rename = "p_val")]
    PVal,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ErrorType::FileExt => "file_ext",
            ErrorType::FieldOrder => "field order",
            ErrorType::MissingChromosomes => "missing_chromosomes",
            ErrorType::MinRows => "minrows",
            ErrorType::Headers => "headers",
            ErrorType::Data => "data",
            ErrorType::PVal => "p_val",
        };
        f.write_str(label)
    }
}

/// One failed check.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    /// Level the failure was detected at.
    pub schema_context: SchemaContext,
    /// Column the failure is attributed to.
    pub column: String,
    /// Description of the failed check.
    pub check: String,
    /// Position of the check within the column's rule, when applicable.
    pub check_number: Option<usize>,
    /// The offending value (the column name for header-level failures).
    pub failure_case: String,
    /// Zero-based data-row index, absolute within the file.
    pub index: Option<usize>,
}

impl ErrorRecord {
    /// A header-level failure: a required column missing from the table.
    pub fn missing_column(column: impl Into<String>) -> Self {
        let column = column.into();
        Self {
            schema_context: SchemaContext::Table,
            check: "column_in_dataframe".to_string(),
            check_number: None,
            failure_case: column.clone(),
            column,
            index: None,
        }
    }

    /// A per-cell failure.
    pub fn cell(
        column: impl Into<String>,
        check: impl Into<String>,
        check_number: Option<usize>,
        failure_case: impl Into<String>,
        index: usize,
    ) -> Self {
        Self {
            schema_context: SchemaContext::Column,
            column: column.into(),
            check: check.into(),
            check_number,
            failure_case: failure_case.into(),
            index: Some(index),
        }
    }
}

/// The failures accumulated over one validation pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ErrorTable {
    records: Vec<ErrorRecord>,
}

impl ErrorTable {
    /// Create an empty error table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    pub fn push(&mut self, record: ErrorRecord) {
        self.records.push(record);
    }

    /// Append every record of another table.
    pub fn extend(&mut self, other: ErrorTable) {
        self.records.extend(other.records);
    }

    /// All records, in detection order.
    pub fn records(&self) -> &[ErrorRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// A copy of the first `n` records.
    pub fn head(&self, n: usize) -> ErrorTable {
        ErrorTable {
            records: self.records.iter().take(n).cloned().collect(),
        }
    }

    /// Classify the dominant reason for failure.
    ///
    /// Header-level violations dominate; otherwise p-value-specific
    /// failures (a disallowed zero caught on the derived mantissa, or a
    /// magnitude above one caught on the p-value column) classify as
    /// `p_val`, so callers know to suggest the allow-zero flag rather
    /// than a generic data fix; everything else is `data`.
    pub fn classify(&self, p_value_field: &str) -> ErrorType {
        if self
            .records
            .iter()
            .any(|r| r.schema_context == SchemaContext::Table)
        {
            return ErrorType::Headers;
        }
        if self.records.iter().any(|r| Self::is_p_value_specific(r, p_value_field)) {
            return ErrorType::PVal;
        }
        ErrorType::Data
    }

    fn is_p_value_specific(record: &ErrorRecord, p_value_field: &str) -> bool {
        if record.column == P_VALUE_MANTISSA {
            // The non-positive-mantissa rule with a failing value of
            // exactly zero: the p-value is zero while zero is disallowed.
            return record.check.starts_with("Must be greater than")
                && record
                    .failure_case
                    .trim()
                    .parse::<f64>()
                    .map(|v| v == 0.0)
                    .unwrap_or(false);
        }
        if record.column == p_value_field {
            // The magnitude rule on the p-value column itself.
            return record.check.contains("between 0 and 1")
                || record.check.contains("> 0 and <= 1");
        }
        false
    }
}
