//! Applies a schema to a table, producing the error table.
//!
//! Cells are coerced to the rule's declared type before any range or
//! pattern check runs; a coercion failure is itself a validation
//! failure attributed to that column. Checks never raise — every
//! failure becomes an [`ErrorRecord`].

use crate::input::DataTable;
use crate::schema::{CheckKind, FieldType, SumStatsSchema};

use super::errors::{ErrorRecord, ErrorTable};
use super::pvalue::split_cell;

/// Validate every cell of `table` against `schema`.
///
/// `row_offset` is added to in-table row positions so that records from
/// a chunked pass carry absolute data-row indices.
pub fn check_table(table: &DataTable, schema: &SumStatsSchema, row_offset: usize) -> ErrorTable {
    let mut errors = ErrorTable::new();

    for rule in schema.rules() {
        let Some(col) = table.column_index(&rule.name) else {
            // Derived columns are only present when their source column
            // is; their absence is the source column's failure, not a
            // header-level one.
            if rule.required && !rule.derived {
                errors.push(ErrorRecord::missing_column(rule.name.as_str()));
            }
            continue;
        };

        for (row, raw) in table.column_values(col).enumerate() {
            let cell = raw.trim();
            let index = row_offset + row;

            if DataTable::is_null_value(cell) {
                if !rule.nullable {
                    errors.push(ErrorRecord::cell(rule.name.as_str(), "not_nullable", None, cell, index));
                }
                continue;
            }

            let numeric = match rule.dtype {
                FieldType::Integer => match cell.parse::<i64>() {
                    Ok(value) => Some(value as f64),
                    Err(_) => {
                        errors.push(ErrorRecord::cell(
                            &rule.name,
                            format!("coerce_dtype('{}')", rule.dtype.label()),
                            None,
                            cell,
                            index,
                        ));
                        continue;
                    }
                },
                FieldType::Float => match cell.parse::<f64>() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        errors.push(ErrorRecord::cell(
                            &rule.name,
                            format!("coerce_dtype('{}')", rule.dtype.label()),
                            None,
                            cell,
                            index,
                        ));
                        continue;
                    }
                },
                FieldType::String => None,
            };

            for (check_number, check) in rule.checks.iter().enumerate() {
                let ok = match &check.kind {
                    CheckKind::PValueMagnitude => within_unit_magnitude(cell),
                    CheckKind::Pattern(_) | CheckKind::IsIn(_) => check.passes_str(cell),
                    _ => numeric.map(|v| check.passes_numeric(v)).unwrap_or(true),
                };
                if !ok {
                    errors.push(ErrorRecord::cell(
                        &rule.name,
                        check.error,
                        Some(check_number),
                        cell,
                        index,
                    ));
                }
            }
        }
    }

    errors
}

/// Whether a textual p-value is at most one, compared in log space.
///
/// Non-positive and unparsable significands pass here — those are the
/// mantissa rule's failures. An exponent marker followed by something
/// that is not an integer fails: such a value has no magnitude at all.
fn within_unit_magnitude(raw: &str) -> bool {
    let (mantissa_text, exponent_text) = split_cell(raw);
    let Ok(mantissa) = mantissa_text.trim().parse::<f64>() else {
        return true;
    };
    if mantissa <= 0.0 {
        return true;
    }
    let exponent = match exponent_text {
        Some(text) => match text.trim().parse::<i64>() {
            Ok(value) => value,
            Err(_) => return false,
        },
        None => 0,
    };
    mantissa.log10() + exponent as f64 <= 0.0
}
