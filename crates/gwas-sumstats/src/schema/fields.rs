//! Canonical field names and the required column ordering.
//!
//! The first eight columns of a sumstats file are fixed. Two of them
//! vary by representation: the effect-size column (index 4) can be a
//! beta, an odds ratio or a hazard ratio, and the p-value column
//! (index 7) can be a direct probability or a -log10 value. The rest
//! of the header is free: known optional fields in any order, then any
//! passthrough columns.

/// Mandatory fields, in required order, excluding the effect and
/// p-value slots.
pub const FIELDS_REQUIRED: [&str; 6] = [
    "chromosome",
    "base_pair_location",
    "effect_allele",
    "other_allele",
    "standard_error",
    "effect_allele_frequency",
];

/// Optional fields recognised by the schema.
pub const FIELDS_OPTIONAL: [&str; 7] = [
    "variant_id",
    "rsid",
    "ref_allele",
    "ci_upper",
    "ci_lower",
    "info",
    "n",
];

/// Derived column holding the significand of each p-value.
pub const P_VALUE_MANTISSA: &str = "_p_value_mantissa";
/// Derived column holding the base-ten exponent of each p-value.
pub const P_VALUE_EXPONENT: &str = "_p_value_exponent";

/// The three accepted effect-size representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectField {
    Beta,
    OddsRatio,
    HazardRatio,
}

impl EffectField {
    /// The column name for this representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectField::Beta => "beta",
            EffectField::OddsRatio => "odds_ratio",
            EffectField::HazardRatio => "hazard_ratio",
        }
    }

    /// Map a header label to a representation. Unrecognised or absent
    /// labels fall back to `Beta`, matching the default rule set.
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some("odds_ratio") => EffectField::OddsRatio,
            Some("hazard_ratio") => EffectField::HazardRatio,
            _ => EffectField::Beta,
        }
    }
}

/// The two accepted p-value representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PValueRepr {
    /// A direct probability in (0, 1].
    PValue,
    /// A -log10-transformed probability in (0, inf).
    NegLog10,
}

impl PValueRepr {
    /// The column name for this representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PValueRepr::PValue => "p_value",
            PValueRepr::NegLog10 => "neg_log_10_p_value",
        }
    }

    /// Map a header label to a representation, defaulting to `PValue`.
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some("neg_log_10_p_value") => PValueRepr::NegLog10,
            _ => PValueRepr::PValue,
        }
    }
}

/// The required ordering of the eight mandatory columns for the given
/// effect and p-value representations. The effect field sits at index
/// 4 and the p-value field at index 7.
pub fn required_order(effect: EffectField, pval: PValueRepr) -> [&'static str; 8] {
    [
        FIELDS_REQUIRED[0],
        FIELDS_REQUIRED[1],
        FIELDS_REQUIRED[2],
        FIELDS_REQUIRED[3],
        effect.as_str(),
        FIELDS_REQUIRED[4],
        FIELDS_REQUIRED[5],
        pval.as_str(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_field_labels() {
        assert_eq!(EffectField::from_label(Some("beta")), EffectField::Beta);
        assert_eq!(
            EffectField::from_label(Some("odds_ratio")),
            EffectField::OddsRatio
        );
        assert_eq!(
            EffectField::from_label(Some("hazard_ratio")),
            EffectField::HazardRatio
        );
        assert_eq!(EffectField::from_label(Some("mystery")), EffectField::Beta);
        assert_eq!(EffectField::from_label(None), EffectField::Beta);
    }

    #[test]
    fn test_required_order_slots() {
        let order = required_order(EffectField::OddsRatio, PValueRepr::NegLog10);
        assert_eq!(order[4], "odds_ratio");
        assert_eq!(order[7], "neg_log_10_p_value");
        assert_eq!(order[0], "chromosome");
    }
}
