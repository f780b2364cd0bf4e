//! Validate command - run the staged validator over a sumstats file.

use std::path::PathBuf;

use colored::Colorize;
use gwas_sumstats::{report, validate, ValidateOptions};

#[allow(clippy::too_many_arguments)]
pub fn run(
    file: PathBuf,
    errors_out: bool,
    p_zero: bool,
    min_rows: usize,
    chunksize: usize,
    infer_from_metadata: bool,
    json: bool,
) -> Result<bool, Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    if !json {
        println!(
            "{} {}",
            "Validating file:".cyan().bold(),
            file.display().to_string().white()
        );
    }

    let options = ValidateOptions {
        errors_file: errors_out,
        pval_zero: p_zero,
        minimum_rows: min_rows,
        chunksize,
        infer_from_metadata,
    };
    let outcome = validate(&file, &options)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(outcome.valid);
    }

    let status = if outcome.valid {
        "True".green().bold()
    } else {
        "False".red().bold()
    };
    println!("Validation status: {}", status);
    println!("{}", outcome.message);

    if let Some(error_type) = outcome.primary_error_type {
        println!(
            "Primary reason for validation failure: {}",
            error_type.to_string().red()
        );
    }
    if let Some(preview) = &outcome.error_preview {
        println!(
            "See below for a preview of the errors. To get all the errors \
             in a file run the {} command with the {} flag.",
            "validate".green().bold(),
            "-e".green().bold()
        );
        print!("{}", report::format_preview(preview));
    }

    Ok(outcome.valid)
}
