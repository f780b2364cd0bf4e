//! The sumstats data schema: field vocabulary and validation rules.

mod fields;
mod rules;

pub use fields::{
    EffectField, PValueRepr, required_order, FIELDS_OPTIONAL, FIELDS_REQUIRED,
    P_VALUE_EXPONENT, P_VALUE_MANTISSA,
};
pub use rules::{Check, CheckKind, FieldRule, FieldType, SumStatsSchema};
