//! Per-file validation rule sets.
//!
//! The schema is assembled by an explicit factory rather than declared
//! statically, because two of the mandatory columns can be defined in
//! multiple ways: the effect-size column (index 4) can be a beta, an
//! odds ratio or a hazard ratio, and the p-value column (index 7) can
//! hold direct probabilities or -log10 values — each with differing
//! constraints.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use super::fields::{EffectField, PValueRepr, P_VALUE_EXPONENT, P_VALUE_MANTISSA};

// =============================================================================
// LAZY STATIC PATTERNS
// =============================================================================

static NUCLEOTIDE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^LONG_STRING$|^[ACTGactg]+$").unwrap());

static RSID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^rs\d+$").unwrap());

static VARIANT_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").unwrap());

/// The type a column's cells are coerced to before range checks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Integer,
    Float,
    String,
}

impl FieldType {
    /// The dtype label used in coercion-failure check descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            FieldType::Integer => "int64",
            FieldType::Float => "float64",
            FieldType::String => "str",
        }
    }
}

/// What a single check tests.
#[derive(Debug, Clone)]
pub enum CheckKind {
    /// Numeric value strictly greater than the bound.
    Gt(f64),
    /// Numeric value greater than or equal to the bound.
    Ge(f64),
    /// Numeric value within a range.
    InRange {
        min: f64,
        max: f64,
        include_min: bool,
        include_max: bool,
    },
    /// Cell matches a pattern.
    Pattern(&'static Regex),
    /// Cell is one of a fixed set of labels.
    IsIn(&'static [&'static str]),
    /// P-value magnitude is at most one, evaluated on the derived
    /// mantissa/exponent pair so that sub-representable values never
    /// underflow to a false failure.
    PValueMagnitude,
}

/// A single validation check plus its failure message.
#[derive(Debug, Clone)]
pub struct Check {
    pub kind: CheckKind,
    pub error: &'static str,
}

impl Check {
    pub fn gt(bound: f64, error: &'static str) -> Self {
        Self {
            kind: CheckKind::Gt(bound),
            error,
        }
    }

    pub fn ge(bound: f64, error: &'static str) -> Self {
        Self {
            kind: CheckKind::Ge(bound),
            error,
        }
    }

    pub fn in_range(
        min: f64,
        max: f64,
        include_min: bool,
        include_max: bool,
        error: &'static str,
    ) -> Self {
        Self {
            kind: CheckKind::InRange {
                min,
                max,
                include_min,
                include_max,
            },
            error,
        }
    }

    pub fn str_matches(pattern: &'static Regex, error: &'static str) -> Self {
        Self {
            kind: CheckKind::Pattern(pattern),
            error,
        }
    }

    pub fn is_in(values: &'static [&'static str], error: &'static str) -> Self {
        Self {
            kind: CheckKind::IsIn(values),
            error,
        }
    }

    pub fn p_value_magnitude(error: &'static str) -> Self {
        Self {
            kind: CheckKind::PValueMagnitude,
            error,
        }
    }

    /// Evaluate a numeric check. Non-numeric checks pass here.
    pub fn passes_numeric(&self, value: f64) -> bool {
        match self.kind {
            CheckKind::Gt(bound) => value > bound,
            CheckKind::Ge(bound) => value >= bound,
            CheckKind::InRange {
                min,
                max,
                include_min,
                include_max,
            } => {
                let above = if include_min { value >= min } else { value > min };
                let below = if include_max { value <= max } else { value < max };
                above && below
            }
            _ => true,
        }
    }

    /// Evaluate a string check. Non-string checks pass here.
    pub fn passes_str(&self, value: &str) -> bool {
        match self.kind {
            CheckKind::Pattern(pattern) => pattern.is_match(value),
            CheckKind::IsIn(values) => values.contains(&value),
            _ => true,
        }
    }
}

/// The validation rule for a single column.
#[derive(Debug, Clone)]
pub struct FieldRule {
    /// Column name the rule applies to.
    pub name: String,
    /// Type cells are coerced to before checks.
    pub dtype: FieldType,
    /// Checks applied to coerced, non-null cells.
    pub checks: Vec<Check>,
    /// Whether null cells are acceptable.
    pub nullable: bool,
    /// Whether the column must be present in the header.
    pub required: bool,
    /// Whether the column is derived by the p-value splitter rather
    /// than read from disk.
    pub derived: bool,
}

impl FieldRule {
    /// A mandatory, non-nullable rule with no checks.
    pub fn new(name: impl Into<String>, dtype: FieldType) -> Self {
        Self {
            name: name.into(),
            dtype,
            checks: Vec::new(),
            nullable: false,
            required: true,
            derived: false,
        }
    }

    /// Attach checks to the rule.
    pub fn with_checks(mut self, checks: Vec<Check>) -> Self {
        self.checks = checks;
        self
    }

    /// Mark the rule optional (and nullable, as optional fields are).
    pub fn optional(mut self) -> Self {
        self.required = false;
        self.nullable = true;
        self
    }

    /// Mark the rule nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Mark the rule as applying to a splitter-derived column.
    pub fn derived(mut self) -> Self {
        self.derived = true;
        self
    }
}

/// The full rule set applied to one sumstats file.
#[derive(Debug, Clone)]
pub struct SumStatsSchema {
    rules: IndexMap<String, FieldRule>,
    effect: EffectField,
    pval_repr: PValueRepr,
    pval_zero: bool,
}

impl SumStatsSchema {
    /// Accepted file extensions (suffix-tails).
    pub const FILE_EXTENSIONS: [&'static str; 2] = [".tsv", ".tsv.gz"];

    /// Assemble the rule set for one file.
    ///
    /// `effect` and `pval_repr` select the variant rules for the two
    /// representation-dependent columns; `pval_zero` relaxes the
    /// lower bound on p-values from exclusive to inclusive zero.
    pub fn build(effect: EffectField, pval_repr: PValueRepr, pval_zero: bool) -> Self {
        let mut rules = IndexMap::new();

        let mut add = |rule: FieldRule| {
            rules.insert(rule.name.clone(), rule);
        };

        add(
            FieldRule::new("chromosome", FieldType::Integer).with_checks(vec![Check::in_range(
                1.0,
                25.0,
                true,
                true,
                "Must be a value between 1 and 25",
            )]),
        );
        add(
            FieldRule::new("base_pair_location", FieldType::Integer).with_checks(vec![Check::ge(
                0.0,
                "Must be greater than or equal to 0",
            )]),
        );
        add(
            FieldRule::new("effect_allele", FieldType::String).with_checks(vec![
                Check::str_matches(&NUCLEOTIDE_RE, "Must be nucleotide sequence"),
            ]),
        );
        add(
            FieldRule::new("other_allele", FieldType::String).with_checks(vec![
                Check::str_matches(&NUCLEOTIDE_RE, "Must be nucleotide sequence"),
            ]),
        );
        add(Self::effect_rule(effect));
        add(FieldRule::new("standard_error", FieldType::Float));
        add(
            FieldRule::new("effect_allele_frequency", FieldType::Float).with_checks(vec![
                Check::in_range(0.0, 1.0, true, true, "Must be a value between 0 and 1, inclusive"),
            ]),
        );
        add(Self::p_value_rule(pval_repr, pval_zero));

        add(
            FieldRule::new("variant_id", FieldType::String)
                .with_checks(vec![Check::str_matches(
                    &VARIANT_ID_RE,
                    "Must be alphanumeric or underscore",
                )])
                .optional(),
        );
        add(
            FieldRule::new("rsid", FieldType::String)
                .with_checks(vec![Check::str_matches(&RSID_RE, "Must match rsID pattern")])
                .optional(),
        );
        add(
            FieldRule::new("ref_allele", FieldType::String)
                .with_checks(vec![Check::is_in(&["OA", "EA"], "Must be one of: OA, EA")])
                .optional(),
        );
        add(FieldRule::new("ci_upper", FieldType::Float).optional());
        add(FieldRule::new("ci_lower", FieldType::Float).optional());
        add(
            FieldRule::new("info", FieldType::Float)
                .with_checks(vec![Check::in_range(
                    0.0,
                    1.0,
                    true,
                    true,
                    "Must be a value between 0 and 1, inclusive",
                )])
                .optional(),
        );
        add(
            FieldRule::new("n", FieldType::Integer)
                .with_checks(vec![Check::ge(0.0, "Must be greater than or equal to 0")])
                .optional(),
        );

        if pval_repr == PValueRepr::PValue {
            let mantissa_check = if pval_zero {
                Check::ge(0.0, "Must be greater than or equal to 0")
            } else {
                Check::gt(0.0, "Must be greater than 0")
            };
            add(
                FieldRule::new(P_VALUE_MANTISSA, FieldType::Float)
                    .with_checks(vec![mantissa_check])
                    .derived(),
            );
            add(
                FieldRule::new(P_VALUE_EXPONENT, FieldType::Integer)
                    .nullable()
                    .derived(),
            );
        }

        Self {
            rules,
            effect,
            pval_repr,
            pval_zero,
        }
    }

    fn effect_rule(effect: EffectField) -> FieldRule {
        match effect {
            EffectField::Beta => FieldRule::new("beta", FieldType::Float),
            EffectField::OddsRatio => FieldRule::new("odds_ratio", FieldType::Float).with_checks(
                vec![Check::ge(0.0, "Must be a value greater than or equal to 0")],
            ),
            EffectField::HazardRatio => FieldRule::new("hazard_ratio", FieldType::Float)
                .with_checks(vec![Check::ge(
                    0.0,
                    "Must be a value greater than or equal to 0",
                )]),
        }
    }

    fn p_value_rule(pval_repr: PValueRepr, pval_zero: bool) -> FieldRule {
        match pval_repr {
            // Direct p-values are kept as strings: the magnitude check
            // runs on the mantissa/exponent pair, and coercion of the
            // significand happens on the derived column.
            PValueRepr::PValue => {
                let error = if pval_zero {
                    "Must be a value between 0 and 1, inclusive"
                } else {
                    "Must be a value > 0 and <= 1"
                };
                FieldRule::new("p_value", FieldType::String)
                    .with_checks(vec![Check::p_value_magnitude(error)])
            }
            PValueRepr::NegLog10 => {
                let check = if pval_zero {
                    Check::ge(0.0, "Must be greater than or equal to 0")
                } else {
                    Check::gt(0.0, "Must be greater than 0")
                };
                FieldRule::new("neg_log_10_p_value", FieldType::Float).with_checks(vec![check])
            }
        }
    }

    /// Iterate the rules in required-column order.
    pub fn rules(&self) -> impl Iterator<Item = &FieldRule> {
        self.rules.values()
    }

    /// Look up the rule for a column.
    pub fn rule(&self, name: &str) -> Option<&FieldRule> {
        self.rules.get(name)
    }

    /// The effect-size representation this schema validates.
    pub fn effect(&self) -> EffectField {
        self.effect
    }

    /// The p-value representation this schema validates.
    pub fn pval_repr(&self) -> PValueRepr {
        self.pval_repr
    }

    /// Whether zero p-values are acceptable.
    pub fn pval_zero(&self) -> bool {
        self.pval_zero
    }

    /// The name of the p-value column this schema validates.
    pub fn p_value_field(&self) -> &'static str {
        self.pval_repr.as_str()
    }
}
