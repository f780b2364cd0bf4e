//! The staged validator and the top-level `validate` driver.
//!
//! Stages run in a fixed order and short-circuit on the first failure:
//! file extension, field order, chromosome coverage, minimum rows, a
//! sampled schema pass, then a chunked schema pass over the remainder
//! of the file. The order is a contract, not an optimization — field
//! order must hold before any column is interpreted positionally.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::input::SumStatsTable;
use crate::metadata;
use crate::report;
use crate::schema::{required_order, EffectField, PValueRepr, SumStatsSchema};
use crate::validation::{append_split_columns, check_table, ErrorTable, ErrorType};

/// Tuning knobs for one validation run.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Allow p-values of exactly zero.
    pub pval_zero: bool,
    /// Fewest data rows an acceptable file can have.
    pub minimum_rows: usize,
    /// Rows validated in the up-front sample pass.
    pub sample_size: usize,
    /// Rows held in memory at once during the full-file pass.
    pub chunksize: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            pval_zero: false,
            minimum_rows: 100_000,
            sample_size: 100_000,
            chunksize: 1_000_000,
        }
    }
}

/// The result of one validation run, with the full error table.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// Whether the file conforms.
    pub valid: bool,
    /// Human-readable outcome message.
    pub message: String,
    /// The single summarizing failure classification.
    pub primary_error_type: Option<ErrorType>,
    /// Every failure collected before the run stopped.
    pub errors: Option<ErrorTable>,
}

impl ValidationReport {
    fn pass() -> Self {
        Self {
            valid: true,
            message: "Data table is valid.".to_string(),
            primary_error_type: None,
            errors: None,
        }
    }

    fn fail(message: impl Into<String>, error_type: ErrorType) -> Self {
        Self {
            valid: false,
            message: message.into(),
            primary_error_type: Some(error_type),
            errors: None,
        }
    }

    fn fail_with_errors(message: impl Into<String>, errors: ErrorTable, p_value_field: &str) -> Self {
        let error_type = errors.classify(p_value_field);
        Self {
            valid: false,
            message: message.into(),
            primary_error_type: Some(error_type),
            errors: Some(errors),
        }
    }
}

/// Staged, fail-fast validator for one sumstats file.
///
/// Holds the file handle and configuration; each [`Validator::validate`]
/// call produces a fresh, self-contained report — nothing is shared
/// between runs.
#[derive(Debug, Clone)]
pub struct Validator {
    path: PathBuf,
    config: ValidatorConfig,
}

impl Validator {
    /// Create a validator for a file path.
    pub fn new(path: impl AsRef<Path>, config: ValidatorConfig) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            config,
        }
    }

    /// Run all validation stages.
    ///
    /// Only I/O failures surface as `Err`; a non-conforming file is an
    /// `Ok` report with `valid = false`.
    pub fn validate(&self) -> Result<ValidationReport> {
        // Stage 1: file extension.
        if let Some(report) = self.check_file_ext() {
            return Ok(report);
        }

        let table = SumStatsTable::load(&self.path)?;
        let effect = EffectField::from_label(table.effect_field());
        let pval_repr = PValueRepr::from_label(table.p_value_field());

        // Stage 2: field order.
        if let Some(report) = self.check_field_order(&table, effect, pval_repr) {
            return Ok(report);
        }

        // Stage 3: chromosome coverage.
        if let Some(report) = self.check_chromosomes(&table)? {
            return Ok(report);
        }

        // Stage 4: minimum rows.
        let nrows = self.config.sample_size.max(self.config.minimum_rows);
        debug!(nrows, "loading sample");
        let sample = table.sample(nrows)?;
        if sample.row_count() < self.config.minimum_rows {
            let message = format!(
                "The file has fewer than the minimum rows required: {} < {}.",
                sample.row_count(),
                self.config.minimum_rows
            );
            warn!(%message, "minimum row check failed");
            return Ok(ValidationReport::fail(message, ErrorType::MinRows));
        }

        let schema = SumStatsSchema::build(effect, pval_repr, self.config.pval_zero);

        // Stage 5: schema validation over the sample.
        debug!(rows = sample.row_count(), "validating sample");
        let mut sample = sample;
        if schema.pval_repr() == PValueRepr::PValue {
            append_split_columns(&mut sample, schema.p_value_field());
        }
        let sample_rows = sample.rows.len();
        let errors = check_table(&sample, &schema, 0);
        if !errors.is_empty() {
            warn!(failures = errors.len(), "sample validation failed");
            return Ok(ValidationReport::fail_with_errors(
                format!("Validated the first {nrows} rows."),
                errors,
                schema.p_value_field(),
            ));
        }

        // Stage 6: the rest of the file, one chunk at a time. Errors
        // come from the first offending chunk only; later chunks are
        // not scanned.
        let mut chunks = table.chunks(sample_rows, self.config.chunksize)?;
        let mut row_offset = sample_rows;
        while let Some(mut chunk) = chunks.next_chunk()? {
            debug!(row_offset, rows = chunk.row_count(), "validating chunk");
            if schema.pval_repr() == PValueRepr::PValue {
                append_split_columns(&mut chunk, schema.p_value_field());
            }
            let rows = chunk.row_count();
            let errors = check_table(&chunk, &schema, row_offset);
            if !errors.is_empty() {
                warn!(failures = errors.len(), row_offset, "chunk validation failed");
                return Ok(ValidationReport::fail_with_errors(
                    "Data table is invalid",
                    errors,
                    schema.p_value_field(),
                ));
            }
            row_offset += rows;
        }

        Ok(ValidationReport::pass())
    }

    fn check_file_ext(&self) -> Option<ValidationReport> {
        let name = self.path.file_name()?.to_string_lossy();
        let valid = SumStatsSchema::FILE_EXTENSIONS
            .iter()
            .any(|ext| name.ends_with(ext));
        if valid {
            return None;
        }
        let file_ext = name.find('.').map(|i| &name[i..]).unwrap_or_default();
        Some(ValidationReport::fail(
            format!(
                "Extension, '{}', not in valid set: {:?}.",
                file_ext,
                SumStatsSchema::FILE_EXTENSIONS
            ),
            ErrorType::FileExt,
        ))
    }

    fn check_field_order(
        &self,
        table: &SumStatsTable,
        effect: EffectField,
        pval_repr: PValueRepr,
    ) -> Option<ValidationReport> {
        let expected = required_order(effect, pval_repr);
        let header: Vec<&str> = table.header().iter().map(|h| h.as_str()).collect();
        if header.len() >= expected.len() && header[..expected.len()] == expected[..] {
            return None;
        }
        Some(ValidationReport::fail(
            format!(
                "Mandatory fields are missing or not in the required order. \
                 Expected the header to start with {:?}, found {:?}.",
                expected,
                &header[..header.len().min(expected.len())]
            ),
            ErrorType::FieldOrder,
        ))
    }

    fn check_chromosomes(&self, table: &SumStatsTable) -> Result<Option<ValidationReport>> {
        let Some(labels) = table.distinct_values("chromosome")? else {
            return Ok(Some(ValidationReport::fail(
                "The mandatory 'chromosome' field is missing from the header.",
                ErrorType::MissingChromosomes,
            )));
        };

        // A file reporting nothing but chromosome 23 is a valid
        // X-chromosome-only study.
        if labels.len() == 1 && labels.contains("23") {
            info!("chromosome column contains only '23'; treating as X-only file");
            return Ok(None);
        }

        let missing_autosomes: Vec<String> = (1..=22)
            .map(|c| c.to_string())
            .filter(|c| !labels.contains(c.as_str()))
            .collect();
        if !missing_autosomes.is_empty() {
            return Ok(Some(ValidationReport::fail(
                format!(
                    "Chromosome(s) {} are missing from the file.",
                    missing_autosomes.join(", ")
                ),
                ErrorType::MissingChromosomes,
            )));
        }

        let missing_optional: Vec<String> = (23..=25)
            .map(|c| c.to_string())
            .filter(|c| !labels.contains(c.as_str()))
            .collect();
        if !missing_optional.is_empty() {
            info!(
                "sex/mitochondrial chromosome(s) {} not present; not required",
                missing_optional.join(", ")
            );
        }

        Ok(None)
    }
}

/// Options for the [`validate`] driver.
#[derive(Debug, Clone)]
pub struct ValidateOptions {
    /// Persist the full error table to `<input>.err.csv.gz` on failure.
    pub errors_file: bool,
    /// Allow p-values of exactly zero. Takes precedence over the
    /// metadata-inferred value.
    pub pval_zero: bool,
    /// Fewest data rows an acceptable file can have.
    pub minimum_rows: usize,
    /// Rows held in memory at once during the full-file pass.
    pub chunksize: usize,
    /// Consult `<input>-meta.yaml` to infer `pval_zero`.
    pub infer_from_metadata: bool,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        let config = ValidatorConfig::default();
        Self {
            errors_file: false,
            pval_zero: false,
            minimum_rows: config.minimum_rows,
            chunksize: config.chunksize,
            infer_from_metadata: false,
        }
    }
}

/// The caller-facing result of a validation run.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationOutcome {
    /// Whether the file conforms.
    pub valid: bool,
    /// Human-readable outcome message.
    pub message: String,
    /// The first few failure records, for display.
    pub error_preview: Option<ErrorTable>,
    /// The single summarizing failure classification.
    pub primary_error_type: Option<ErrorType>,
    /// When the run finished.
    pub validated_at: DateTime<Utc>,
}

/// Validate a sumstats file.
///
/// Wires together metadata inference, the staged validator, preview
/// bounding, and optional error-table persistence. Only I/O failures
/// return `Err`.
pub fn validate(filename: &Path, options: &ValidateOptions) -> Result<ValidationOutcome> {
    let mut pval_zero = options.pval_zero;
    if options.infer_from_metadata && !pval_zero {
        match metadata::for_data_file(filename) {
            Some(meta) => {
                pval_zero = meta.pval_zero_inferred();
                debug!(pval_zero, "inferred validation options from metadata");
            }
            None => warn!(
                "Cannot infer options from metadata file, because metadata file cannot be found."
            ),
        }
    }

    let config = ValidatorConfig {
        pval_zero,
        minimum_rows: options.minimum_rows,
        chunksize: options.chunksize,
        ..ValidatorConfig::default()
    };
    let report = Validator::new(filename, config).validate()?;

    let mut message = report.message;
    let error_preview = report
        .errors
        .as_ref()
        .map(|errors| errors.head(report::PREVIEW_ROWS));
    if !report.valid && options.errors_file {
        if let Some(errors) = &report.errors {
            let out = report::write_errors(filename, errors)?;
            message.push_str(&format!("\nWriting errors --> {}", out.display()));
        }
    }

    Ok(ValidationOutcome {
        valid: report.valid,
        message,
        error_preview,
        primary_error_type: report.primary_error_type,
        validated_at: Utc::now(),
    })
}
