//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// gwas-sumstats: GWAS summary statistics validation
#[derive(Parser)]
#[command(name = "gwas-sumstats")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a GWAS summary statistics data file
    Validate {
        /// Input sumstats file. Must be TSV and may be gzipped
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output errors to a csv file, <filename>.err.csv.gz
        #[arg(short = 'e', long = "errors-out")]
        errors_out: bool,

        /// Force p-values of zero to be allowable. Takes precedence
        /// over the inferred value (-i)
        #[arg(short = 'z', long = "p-zero")]
        p_zero: bool,

        /// Minimum rows acceptable for the file
        #[arg(short = 'm', long = "min-rows", default_value_t = 100_000)]
        min_rows: usize,

        /// Number of rows to store in memory at once. Increase this
        /// number for more speed at the cost of more memory; decrease
        /// to save memory, at the cost of speed
        #[arg(short = 's', long = "chunksize", default_value_t = 1_000_000)]
        chunksize: usize,

        /// Infer validation options from the metadata file
        /// <filename>-meta.yaml. E.g. the analysis software field
        /// affects the data validation behaviour
        #[arg(short = 'i', long = "infer-from-metadata")]
        infer_from_metadata: bool,

        /// Output the outcome as JSON
        #[arg(long)]
        json: bool,
    },
}
