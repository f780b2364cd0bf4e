//! Mantissa/exponent splitting for p-values.
//!
//! P-values in association results can be far below the smallest
//! representable float (exponents past roughly -4900 underflow even in
//! extended precision), so the textual value is split on the exponent
//! marker instead of being parsed whole. The significand can then be
//! checked independently of magnitude, and the magnitude compared in
//! log space.

use crate::input::DataTable;

/// Split a textual p-value into its significand and exponent parts.
///
/// The split happens at the first `e`/`E`; a value without an exponent
/// marker comes back whole, with no exponent part. No parsing happens
/// here — both parts are returned as written.
pub fn split_cell(value: &str) -> (String, Option<String>) {
    let trimmed = value.trim();
    match trimmed.find(['e', 'E']) {
        Some(pos) => (
            trimmed[..pos].to_string(),
            Some(trimmed[pos + 1..].to_string()),
        ),
        None => (trimmed.to_string(), None),
    }
}

/// Append the derived `_p_value_mantissa` and `_p_value_exponent`
/// columns to a table by splitting the named p-value column.
///
/// A table without that column, or with no rows at all, is left with
/// consistent (possibly empty) derived columns rather than an error.
/// Rows without an exponent marker get a null exponent cell.
pub fn append_split_columns(table: &mut DataTable, p_value_field: &str) {
    use crate::schema::{P_VALUE_EXPONENT, P_VALUE_MANTISSA};

    let Some(index) = table.column_index(p_value_field) else {
        return;
    };

    let mut mantissas = Vec::with_capacity(table.row_count());
    let mut exponents = Vec::with_capacity(table.row_count());
    for cell in table.column_values(index) {
        let (mantissa, exponent) = split_cell(cell);
        mantissas.push(mantissa);
        exponents.push(exponent.unwrap_or_default());
    }

    table.push_column(P_VALUE_MANTISSA, mantissas);
    table.push_column(P_VALUE_EXPONENT, exponents);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{P_VALUE_EXPONENT, P_VALUE_MANTISSA};

    #[test]
    fn test_split_scientific_notation() {
        assert_eq!(
            split_cell("3.7899998e-15"),
            ("3.7899998".to_string(), Some("-15".to_string()))
        );
        assert_eq!(
            split_cell("1E-90000"),
            ("1".to_string(), Some("-90000".to_string()))
        );
        assert_eq!(
            split_cell("1E+90000"),
            ("1".to_string(), Some("+90000".to_string()))
        );
    }

    #[test]
    fn test_split_plain_decimal() {
        assert_eq!(split_cell("0.4865"), ("0.4865".to_string(), None));
        assert_eq!(split_cell("0"), ("0".to_string(), None));
    }

    #[test]
    fn test_split_only_first_marker() {
        assert_eq!(
            split_cell("1e2e3"),
            ("1".to_string(), Some("2e3".to_string()))
        );
    }

    #[test]
    fn test_split_preserves_null_marker() {
        assert_eq!(split_cell("NA"), ("NA".to_string(), None));
        assert_eq!(split_cell(""), ("".to_string(), None));
    }

    #[test]
    fn test_append_split_columns() {
        let mut table = DataTable::new(
            vec!["p_value".into()],
            vec![vec!["1e-5".into()], vec!["0.5".into()]],
        );
        append_split_columns(&mut table, "p_value");
        let m = table.column_index(P_VALUE_MANTISSA).unwrap();
        let e = table.column_index(P_VALUE_EXPONENT).unwrap();
        assert_eq!(table.get(0, m), Some("1"));
        assert_eq!(table.get(0, e), Some("-5"));
        assert_eq!(table.get(1, m), Some("0.5"));
        assert_eq!(table.get(1, e), Some(""));
    }

    #[test]
    fn test_append_split_columns_empty_table() {
        let mut table = DataTable::new(vec!["p_value".into()], vec![]);
        append_split_columns(&mut table, "p_value");
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_append_split_columns_missing_field() {
        let mut table = DataTable::new(vec!["other".into()], vec![vec!["1".into()]]);
        append_split_columns(&mut table, "p_value");
        assert_eq!(table.column_count(), 1);
    }
}
