//! Comparison evaluator. Decides visibility and the winner of one metric row.
//!
//! Pure and synchronous. Inputs are assumed well-typed but possibly absent;
//! a value that fails numeric coercion only disables the winner for its own
//! row.

use serde::Serialize;
use tracing::trace;

use crate::catalog::{MetricDefinition, ValueType};
use crate::format::{format, format_resolution};
use crate::spec::{EffectiveSpecification, SpecValue, is_present};

/// Which side holds the better value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Winner {
    A,
    B,
    #[serde(rename = "TIE")]
    Tie,
}

impl std::fmt::Display for Winner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Winner::A => write!(f, "A"),
            Winner::B => write!(f, "B"),
            Winner::Tie => write!(f, "TIE"),
        }
    }
}

/// Result of evaluating one metric for both sides.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub metric: MetricDefinition,
    pub display_a: String,
    pub display_b: String,
    pub winner: Option<Winner>,
    pub visible: bool,
}

/// Evaluate `metric` for sides A and B.
///
/// Rows where neither side has data are hidden regardless of `diff_only`.
/// With `diff_only`, rows whose raw values are strictly equal are hidden;
/// `16` and `"16"` are not equal.
pub fn evaluate(
    metric: &MetricDefinition,
    a: &EffectiveSpecification,
    b: &EffectiveSpecification,
    diff_only: bool,
) -> ComparisonRow {
    let raw_a = a.get(metric.key);
    let raw_b = b.get(metric.key);

    let (display_a, display_b) = match metric.value_type {
        ValueType::Resolution => {
            let pair = metric.key.paired_axis();
            (
                format_resolution(raw_a, pair.and_then(|k| a.get(k))),
                format_resolution(raw_b, pair.and_then(|k| b.get(k))),
            )
        }
        value_type => (
            format(value_type, metric.unit, raw_a),
            format(value_type, metric.unit, raw_b),
        ),
    };

    let present_a = is_present(raw_a);
    let present_b = is_present(raw_b);

    let hidden = (!present_a && !present_b) || (diff_only && raw_a == raw_b);

    let winner = match (raw_a, raw_b) {
        (Some(x), Some(y)) if !hidden && present_a && present_b => decide_winner(metric, x, y),
        _ => None,
    };

    ComparisonRow {
        metric: *metric,
        display_a,
        display_b,
        winner,
        visible: !hidden,
    }
}

/// Winner for two present values under the metric's type rules.
///
/// Equal numeric values produce a tie only when they are greater than zero;
/// two zeros produce no winner at all. Resolution compares the primary axis.
pub fn decide_winner(metric: &MetricDefinition, a: &SpecValue, b: &SpecValue) -> Option<Winner> {
    if metric.value_type.is_numeric() {
        let (Some(x), Some(y)) = (a.to_number(), b.to_number()) else {
            trace!(metric = %metric.key, "Non-numeric value, no winner");
            return None;
        };
        return if x != y {
            let a_wins = if metric.lower_is_better { x < y } else { x > y };
            Some(if a_wins { Winner::A } else { Winner::B })
        } else if x > 0.0 {
            Some(Winner::Tie)
        } else {
            None
        };
    }

    match metric.value_type {
        ValueType::Boolean => match (a.is_truthy_flag(), b.is_truthy_flag()) {
            (true, false) => Some(Winner::A),
            (false, true) => Some(Winner::B),
            _ => Some(Winner::Tie),
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{self, MetricKey};
    use crate::format::MISSING;
    use crate::spec::SpecificationRecord;

    fn side(pairs: &[(MetricKey, SpecValue)]) -> EffectiveSpecification {
        pairs.iter().cloned().collect::<SpecificationRecord>().into()
    }

    fn def(key: MetricKey) -> &'static MetricDefinition {
        catalog::get(key).unwrap()
    }

    #[test]
    fn test_hidden_when_both_absent() {
        let a = side(&[(MetricKey::RamGb, SpecValue::Null)]);
        let b = side(&[(MetricKey::RamGb, SpecValue::Text(String::new()))]);
        for diff_only in [false, true] {
            let row = evaluate(def(MetricKey::RamGb), &a, &b, diff_only);
            assert!(!row.visible);
            assert_eq!(row.winner, None);
        }
    }

    #[test]
    fn test_one_side_present_is_visible_without_winner() {
        let a = side(&[(MetricKey::RamGb, SpecValue::Number(16.0))]);
        let b = side(&[]);
        let row = evaluate(def(MetricKey::RamGb), &a, &b, true);
        assert!(row.visible);
        assert_eq!(row.display_a, "16GB");
        assert_eq!(row.display_b, MISSING);
        assert_eq!(row.winner, None);
    }

    #[test]
    fn test_diff_only_uses_strict_equality() {
        let a = side(&[(MetricKey::RamGb, SpecValue::Number(16.0))]);
        let b = side(&[(MetricKey::RamGb, SpecValue::Text("16".into()))]);
        let row = evaluate(def(MetricKey::RamGb), &a, &b, true);
        assert!(row.visible);
        assert_eq!(row.winner, Some(Winner::Tie));

        let same = side(&[(MetricKey::RamGb, SpecValue::Number(16.0))]);
        let row = evaluate(def(MetricKey::RamGb), &a, &same, true);
        assert!(!row.visible);
        let row = evaluate(def(MetricKey::RamGb), &a, &same, false);
        assert!(row.visible);
    }

    #[test]
    fn test_higher_is_better_by_default() {
        let a = side(&[(MetricKey::BatteryWh, SpecValue::Number(40.0))]);
        let b = side(&[(MetricKey::BatteryWh, SpecValue::Number(50.0))]);
        let row = evaluate(def(MetricKey::BatteryWh), &a, &b, false);
        assert_eq!(row.winner, Some(Winner::B));
    }

    #[test]
    fn test_lower_is_better_currency() {
        let a = side(&[(MetricKey::LaunchPriceUsd, SpecValue::Number(199.0))]);
        let b = side(&[(MetricKey::LaunchPriceUsd, SpecValue::Number(299.0))]);
        let row = evaluate(def(MetricKey::LaunchPriceUsd), &a, &b, false);
        assert_eq!(row.winner, Some(Winner::A));
        assert_eq!(row.display_a, "$199");
        assert_eq!(row.display_b, "$299");
    }

    #[test]
    fn test_equal_zero_is_not_a_tie() {
        let a = side(&[(MetricKey::BackButtons, SpecValue::Number(0.0))]);
        let b = side(&[(MetricKey::BackButtons, SpecValue::Number(0.0))]);
        let row = evaluate(def(MetricKey::BackButtons), &a, &b, false);
        assert!(row.visible);
        assert_eq!(row.winner, None);
    }

    #[test]
    fn test_equal_positive_is_a_tie() {
        let a = side(&[(MetricKey::RefreshRateHz, SpecValue::Number(60.0))]);
        let b = side(&[(MetricKey::RefreshRateHz, SpecValue::Number(60.0))]);
        let row = evaluate(def(MetricKey::RefreshRateHz), &a, &b, false);
        assert_eq!(row.winner, Some(Winner::Tie));
    }

    #[test]
    fn test_non_numeric_value_disables_winner_only() {
        let a = side(&[(MetricKey::RamGb, SpecValue::Text("16GB".into()))]);
        let b = side(&[(MetricKey::RamGb, SpecValue::Number(8.0))]);
        let row = evaluate(def(MetricKey::RamGb), &a, &b, false);
        assert!(row.visible);
        assert_eq!(row.winner, None);
        assert_eq!(row.display_a, "16GBGB");
        assert_eq!(row.display_b, "8GB");
    }

    #[test]
    fn test_boolean_winner() {
        let a = side(&[(MetricKey::Touchscreen, SpecValue::Bool(true))]);
        let b = side(&[(MetricKey::Touchscreen, SpecValue::Bool(false))]);
        let row = evaluate(def(MetricKey::Touchscreen), &a, &b, false);
        assert_eq!(row.winner, Some(Winner::A));
        assert_eq!((row.display_a.as_str(), row.display_b.as_str()), ("YES", "NO"));

        let row = evaluate(def(MetricKey::Touchscreen), &b, &a, false);
        assert_eq!(row.winner, Some(Winner::B));

        let text_true = side(&[(MetricKey::Touchscreen, SpecValue::Text("true".into()))]);
        let row = evaluate(def(MetricKey::Touchscreen), &a, &text_true, false);
        assert_eq!(row.winner, Some(Winner::Tie));
    }

    #[test]
    fn test_string_metric_has_no_winner() {
        let a = side(&[(MetricKey::CpuName, SpecValue::Text("Z1 Extreme".into()))]);
        let b = side(&[(MetricKey::CpuName, SpecValue::Text("Aerith".into()))]);
        let row = evaluate(def(MetricKey::CpuName), &a, &b, false);
        assert!(row.visible);
        assert_eq!(row.winner, None);
        assert_eq!(row.display_a, "Z1 Extreme");
    }

    #[test]
    fn test_resolution_combines_axes_and_uses_x_proxy() {
        let a = side(&[
            (MetricKey::ScreenResolutionX, SpecValue::Number(1280.0)),
            (MetricKey::ScreenResolutionY, SpecValue::Number(720.0)),
        ]);
        let b = side(&[
            (MetricKey::ScreenResolutionX, SpecValue::Number(1920.0)),
            (MetricKey::ScreenResolutionY, SpecValue::Number(1080.0)),
        ]);
        let row = evaluate(def(MetricKey::ScreenResolutionX), &a, &b, false);
        assert_eq!(row.display_a, "1280 x 720");
        assert_eq!(row.display_b, "1920 x 1080");
        assert_eq!(row.winner, Some(Winner::B));
    }

    #[test]
    fn test_resolution_missing_y_shows_placeholder() {
        let a = side(&[(MetricKey::ScreenResolutionX, SpecValue::Number(1280.0))]);
        let b = side(&[
            (MetricKey::ScreenResolutionX, SpecValue::Number(1280.0)),
            (MetricKey::ScreenResolutionY, SpecValue::Number(800.0)),
        ]);
        let row = evaluate(def(MetricKey::ScreenResolutionX), &a, &b, false);
        assert_eq!(row.display_a, MISSING);
        assert_eq!(row.display_b, "1280 x 800");
        // Only the x axis is compared.
        assert_eq!(row.winner, Some(Winner::Tie));
    }

    #[test]
    fn test_winner_serializes_as_tag() {
        assert_eq!(serde_json::to_string(&Winner::Tie).unwrap(), "\"TIE\"");
        assert_eq!(serde_json::to_string(&Winner::A).unwrap(), "\"A\"");
    }
}
