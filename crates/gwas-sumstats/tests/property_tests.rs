//! Property-based tests for the p-value splitter and check engine.
//!
//! These verify:
//! 1. **No panics**: splitting and checking never crash on any input
//! 2. **Structure**: the split is a faithful partition of the input
//! 3. **Precision**: conforming scientific-notation p-values validate
//!    no matter how extreme the exponent

use proptest::prelude::*;

use gwas_sumstats::validation::{append_split_columns, check_table, split_cell};
use gwas_sumstats::{DataTable, EffectField, PValueRepr, SumStatsSchema};

fn one_row_table(p_value: &str) -> DataTable {
    let headers = [
        "chromosome",
        "base_pair_location",
        "effect_allele",
        "other_allele",
        "beta",
        "standard_error",
        "effect_allele_frequency",
        "p_value",
    ];
    let row = vec![
        "1".to_string(),
        "1118275".to_string(),
        "A".to_string(),
        "G".to_string(),
        "0.92".to_string(),
        "0.03".to_string(),
        "0.39".to_string(),
        p_value.to_string(),
    ];
    let mut table = DataTable::new(headers.iter().map(|s| s.to_string()).collect(), vec![row]);
    append_split_columns(&mut table, "p_value");
    table
}

proptest! {
    #[test]
    fn split_never_panics(input in "\\PC*") {
        let _ = split_cell(&input);
    }

    #[test]
    fn split_partitions_the_input(input in "\\PC*") {
        let trimmed = input.trim();
        let (mantissa, exponent) = split_cell(&input);
        match exponent {
            None => {
                prop_assert_eq!(&mantissa, trimmed);
                prop_assert!(!mantissa.contains(['e', 'E']));
            }
            Some(exponent) => {
                prop_assert!(!mantissa.contains(['e', 'E']));
                prop_assert_eq!(mantissa.len() + 1 + exponent.len(), trimmed.len());
                prop_assert!(trimmed.starts_with(&mantissa));
                prop_assert!(trimmed.ends_with(&exponent));
            }
        }
    }

    #[test]
    fn checking_arbitrary_p_values_never_panics(p_value in "\\PC*") {
        let schema = SumStatsSchema::build(EffectField::Beta, PValueRepr::PValue, false);
        let table = one_row_table(&p_value);
        let _ = check_table(&table, &schema, 0);
    }

    #[test]
    fn conforming_scientific_p_values_validate(
        whole in 1u32..=9,
        frac in 0u32..=999_999,
        exponent in 1i64..=200_000,
        upper_marker in proptest::bool::ANY,
    ) {
        // Significand in [1, 10), strictly negative exponent: always a
        // value in (0, 1), however far below the float floor.
        let marker = if upper_marker { 'E' } else { 'e' };
        let p_value = format!("{whole}.{frac}{marker}-{exponent}");
        let schema = SumStatsSchema::build(EffectField::Beta, PValueRepr::PValue, false);
        let table = one_row_table(&p_value);
        let errors = check_table(&table, &schema, 0);
        prop_assert!(errors.is_empty(), "{:?}", errors.records());
    }

    #[test]
    fn p_values_above_one_never_validate(
        whole in 2u32..=9,
        exponent in 1i64..=200_000,
    ) {
        let p_value = format!("{whole}e{exponent}");
        let schema = SumStatsSchema::build(EffectField::Beta, PValueRepr::PValue, false);
        let table = one_row_table(&p_value);
        let errors = check_table(&table, &schema, 0);
        prop_assert!(!errors.is_empty());
    }
}
