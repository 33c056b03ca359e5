//! Value formatter: `(type, raw value) -> display token`.

use crate::catalog::ValueType;
use crate::spec::{SpecValue, is_present};

/// Token shown for a missing value. Distinct from `"0"`.
pub const MISSING: &str = "-";

/// Format a single raw value for display.
///
/// Resolution values are formatted one axis at a time here; combining the
/// two axes is the evaluator's job.
pub fn format(value_type: ValueType, unit: Option<&str>, raw: Option<&SpecValue>) -> String {
    let Some(value) = raw.filter(|v| is_present(Some(*v))) else {
        return MISSING.to_string();
    };
    match value_type {
        ValueType::Number => format!("{value}{}", unit.unwrap_or("")),
        ValueType::Currency => format!("${value}"),
        ValueType::Boolean => {
            if value.is_truthy_flag() {
                "YES".to_string()
            } else {
                "NO".to_string()
            }
        }
        ValueType::String | ValueType::Resolution => value.to_string(),
    }
}

/// Combine the two axes of a resolution, or the placeholder if either is missing.
pub fn format_resolution(x: Option<&SpecValue>, y: Option<&SpecValue>) -> String {
    match (x, y) {
        (Some(x), Some(y)) if is_present(Some(x)) && is_present(Some(y)) => format!("{x} x {y}"),
        _ => MISSING.to_string(),
    }
}
