//! Property-based tests for the resolver and evaluator using proptest.

use proptest::prelude::*;

use specdeck_core::catalog;
use specdeck_core::evaluator::{Winner, evaluate};
use specdeck_core::spec::{SpecValue, SpecificationRecord, is_present, resolve};
use specdeck_core::{EffectiveSpecification, MetricKey, ValueType};

fn spec_value() -> impl Strategy<Value = SpecValue> {
    prop_oneof![
        Just(SpecValue::Null),
        any::<bool>().prop_map(SpecValue::Bool),
        (-1000i32..1000).prop_map(|n| SpecValue::Number(f64::from(n))),
        "[a-z0-9 ]{0,6}".prop_map(SpecValue::Text),
    ]
}

fn record() -> impl Strategy<Value = SpecificationRecord> {
    prop::collection::vec(
        (prop::sample::select(MetricKey::ALL.to_vec()), spec_value()),
        0..20,
    )
    .prop_map(|pairs| pairs.into_iter().collect())
}

fn effective() -> impl Strategy<Value = EffectiveSpecification> {
    record().prop_map(EffectiveSpecification::from)
}

// --- Resolver properties ---

proptest! {
    #[test]
    fn resolve_prefers_present_override(base in record(), overrides in record()) {
        let merged = resolve(Some(&base), Some(&overrides));
        for key in MetricKey::ALL {
            let expected = if is_present(overrides.get(*key)) {
                overrides.get(*key)
            } else {
                base.get(*key)
            };
            prop_assert_eq!(merged.get(*key), expected);
        }
    }

    #[test]
    fn resolve_without_override_is_base(base in record()) {
        let merged = resolve(Some(&base), None);
        prop_assert_eq!(merged.record(), &base);
    }
}

// --- Evaluator properties ---

proptest! {
    #[test]
    fn rows_without_data_are_never_visible(
        a in effective(),
        b in effective(),
        diff_only in any::<bool>(),
    ) {
        for metric in catalog::list() {
            let row = evaluate(metric, &a, &b, diff_only);
            if !is_present(a.get(metric.key)) && !is_present(b.get(metric.key)) {
                prop_assert!(!row.visible);
            }
        }
    }

    #[test]
    fn diff_only_hides_exactly_strictly_equal_rows(a in effective(), b in effective()) {
        for metric in catalog::list() {
            let shown = evaluate(metric, &a, &b, false).visible;
            let filtered = evaluate(metric, &a, &b, true).visible;
            let equal = a.get(metric.key) == b.get(metric.key);
            prop_assert_eq!(filtered, shown && !equal);
        }
    }

    #[test]
    fn swapping_sides_swaps_the_winner(a in effective(), b in effective()) {
        for metric in catalog::list() {
            let forward = evaluate(metric, &a, &b, false).winner;
            let backward = evaluate(metric, &b, &a, false).winner;
            let mirrored = forward.map(|w| match w {
                Winner::A => Winner::B,
                Winner::B => Winner::A,
                Winner::Tie => Winner::Tie,
            });
            prop_assert_eq!(backward, mirrored);
        }
    }

    #[test]
    fn string_metrics_never_have_a_winner(a in effective(), b in effective()) {
        for metric in catalog::list().iter().filter(|m| m.value_type == ValueType::String) {
            prop_assert!(evaluate(metric, &a, &b, false).winner.is_none());
        }
    }

    #[test]
    fn numeric_numbers_never_tie_at_or_below_zero(n in -1000i32..=0) {
        let metric = catalog::get(MetricKey::RefreshRateHz).unwrap();
        let side: EffectiveSpecification = std::iter::once((
            MetricKey::RefreshRateHz,
            SpecValue::Number(f64::from(n)),
        ))
        .collect::<SpecificationRecord>()
        .into();
        prop_assert_eq!(evaluate(metric, &side, &side, false).winner, None);
    }
}
