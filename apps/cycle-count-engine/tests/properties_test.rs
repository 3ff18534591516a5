//! Property tests for the pure domain services.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use cycle_count_engine::Money;
use cycle_count_engine::domain::cycle_count::{SamplingEngine, SamplingPolicy, VarianceCalculator};
use proptest::prelude::*;
use rust_decimal::Decimal;

proptest! {
    #[test]
    fn variance_is_deterministic(expected in 0i64..100_000, counted in 0i64..100_000, cents in 0i64..1_000_000) {
        let cost = Money::new(Decimal::new(cents, 2));
        let a = VarianceCalculator::compute(expected, counted, cost).unwrap();
        let b = VarianceCalculator::compute(expected, counted, cost).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn variance_quantity_and_value_follow_the_difference(expected in 0i64..100_000, counted in 0i64..100_000, cents in 0i64..1_000_000) {
        let cost = Money::new(Decimal::new(cents, 2));
        let v = VarianceCalculator::compute(expected, counted, cost).unwrap();
        prop_assert_eq!(v.quantity, counted - expected);
        prop_assert_eq!(v.value.amount(), Decimal::new(cents, 2) * Decimal::from(counted - expected));
        prop_assert_eq!(v.is_zero(), expected == counted);
    }

    #[test]
    fn variance_percent_sign_follows_quantity(expected in 1i64..100_000, counted in 0i64..100_000) {
        let v = VarianceCalculator::compute(expected, counted, Money::ZERO).unwrap();
        if counted < expected {
            prop_assert!(v.percent <= Decimal::ZERO);
        } else {
            prop_assert!(v.percent >= Decimal::ZERO);
        }
        prop_assert!(v.percent >= Decimal::from(-100));
    }

    #[test]
    fn variance_over_any_quantities_never_panics(expected in any::<i64>(), counted in any::<i64>()) {
        let result = VarianceCalculator::compute(expected, counted, Money::ZERO);
        prop_assert_eq!(result.is_ok(), counted.checked_sub(expected).is_some());
    }

    #[test]
    fn sample_size_is_within_population(population in 0usize..5_000, ratio_pct in 1i64..=100, min in 1usize..50) {
        let engine = SamplingEngine::new(SamplingPolicy {
            random_sample_ratio: Decimal::new(ratio_pct, 2),
            min_sample_size: min,
        });
        let size = engine.sample_size(population);
        if population == 0 {
            prop_assert_eq!(size, 0);
        } else {
            prop_assert!(size >= 1);
            prop_assert!(size <= population);
            prop_assert!(size >= min.min(population));
        }
    }
}
