use proptest::prelude::*;
use steady_core::{StabilityStatus, Stabilizer, StabilizerCfg};

// A sample stream: (value, gap to the previous sample in ms).
prop_compose! {
    fn samples_strategy()(
        len in 1usize..200,
    )(
        samples in prop::collection::vec((-20i32..140, 0u64..400), len)
    ) -> Vec<(i32, u64)> {
        samples
    }
}

fn filter() -> Stabilizer<i32> {
    Stabilizer::new(
        StabilizerCfg::new(3, 1000, 100)
            .with_valid_range(0, 120)
            .with_sentinel(-1),
    )
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn state_flags_stay_consistent(samples in samples_strategy()) {
        let mut f = filter();
        let mut t = 0u64;
        for (v, gap) in samples {
            t += gap;
            f.update(v, t);

            prop_assert!(!f.is_stable() || f.has_any_reading());
            if f.is_stable() {
                prop_assert!(f.settled_for_ms(t) >= 1000);
                prop_assert!((0..=120).contains(&f.stable_value()));
            } else {
                prop_assert_eq!(f.stable_value(), -1);
            }
            if !f.has_any_reading() {
                prop_assert_eq!(f.last_value(), -1);
                prop_assert_eq!(f.status(), StabilityStatus::Empty);
            }
        }
    }

    #[test]
    fn out_of_range_sample_always_empties_filter(
        samples in samples_strategy(),
        bad in prop_oneof![-1000i32..0, 121i32..1000],
    ) {
        let mut f = filter();
        let mut t = 0u64;
        for (v, gap) in samples {
            t += gap;
            f.update(v, t);
        }
        // Spaced past the sample interval so the gate cannot swallow it.
        f.update(bad, t + 100);
        prop_assert!(!f.has_any_reading());
        prop_assert!(!f.is_stable());
        prop_assert!(!f.was_last_reading_valid());
    }

    #[test]
    fn constant_in_range_input_always_stabilizes(v in 0i32..=120, gap in 100u64..400) {
        let mut f = filter();
        let mut t = 0u64;
        while t < 1000 {
            f.update(v, t);
            t += gap;
        }
        f.update(v, t);
        prop_assert!(f.is_stable());
        prop_assert_eq!(f.stable_value(), v);
    }

    #[test]
    fn float_filter_never_panics_on_arbitrary_input(
        samples in prop::collection::vec((any::<f64>(), 0u64..500), 1..100)
    ) {
        let mut f = Stabilizer::new(
            StabilizerCfg::new(0.5f64, 300, 50).with_valid_range(-10.0, 10.0),
        );
        let mut t = 0u64;
        for (v, gap) in samples {
            t = t.saturating_add(gap);
            f.update(v, t);
            if f.is_stable() {
                prop_assert!(f.stable_value().is_finite());
            }
        }
    }
}
