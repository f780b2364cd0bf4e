//! gwas-sumstats: validation engine for GWAS summary statistics files.
//!
//! Decides whether a (potentially very large) delimited file of
//! per-variant association results conforms to the required column
//! layout, data types, and numeric-range constraints before
//! publication.
//!
//! # Core Principles
//!
//! - **Staged and fail-fast**: extension, field order, chromosome
//!   coverage, and row count are checked before any cell is parsed;
//!   the first failing stage ends the run.
//! - **Per-file schemas**: the rule set is assembled for each file,
//!   because the effect-size and p-value columns each have several
//!   accepted representations.
//! - **Precision-preserving**: p-values as small as 1e-90000 are
//!   validated from their textual mantissa and exponent, never from a
//!   parsed float that would underflow.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use gwas_sumstats::{validate, ValidateOptions};
//!
//! let outcome = validate(Path::new("GCST1234567.tsv.gz"), &ValidateOptions::default()).unwrap();
//!
//! println!("{}", outcome.message);
//! if let Some(error_type) = outcome.primary_error_type {
//!     println!("Primary reason for failure: {error_type}");
//! }
//! ```

pub mod error;
pub mod input;
pub mod metadata;
pub mod report;
pub mod schema;
pub mod validation;

mod validator;

pub use error::{Result, SumstatsError};
pub use input::{DataTable, Parser, ParserConfig, SumStatsTable};
pub use metadata::SumStatsMetadata;
pub use schema::{EffectField, FieldRule, FieldType, PValueRepr, SumStatsSchema};
pub use validation::{ErrorRecord, ErrorTable, ErrorType, SchemaContext};
pub use validator::{
    validate, ValidateOptions, ValidationOutcome, ValidationReport, Validator, ValidatorConfig,
};
