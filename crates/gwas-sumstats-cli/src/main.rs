//! gwas-sumstats CLI - validate GWAS summary statistics files.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Validate {
            file,
            errors_out,
            p_zero,
            min_rows,
            chunksize,
            infer_from_metadata,
            json,
        } => commands::validate::run(
            file,
            errors_out,
            p_zero,
            min_rows,
            chunksize,
            infer_from_metadata,
            json,
        ),
    };

    match result {
        // The exit code is the validation verdict: 0 for a valid file,
        // 1 otherwise.
        Ok(valid) => std::process::exit(if valid { 0 } else { 1 }),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
