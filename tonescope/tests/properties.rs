use core::ops::RangeInclusive;
use proptest::prelude::*;
use tonescope::signal::filter::apply;
use tonescope::signal::filter::design::{design, FilterFamily, FilterSpec};
use tonescope::signal::resample::resample;
use tonescope::ErrorKind;

/// Every family succeeds up to this order anywhere in `0.05..0.95`.
const ALWAYS_REALIZABLE_ORDER: usize = 6;

fn family() -> impl Strategy<Value = FilterFamily> {
    prop_oneof![
        Just(FilterFamily::Butterworth),
        Just(FilterFamily::ChebyshevI),
        Just(FilterFamily::ChebyshevII),
        Just(FilterFamily::Elliptic),
        Just(FilterFamily::Fir),
    ]
}

fn filter_spec(orders: RangeInclusive<usize>) -> impl Strategy<Value = FilterSpec> {
    (family(), orders, 0.05f64..0.95, 0.1f64..3.0, 20.0f64..80.0).prop_map(
        |(family, order, wn, ripple_db, attenuation_db)| FilterSpec {
            family,
            order,
            cutoff_hz: wn * 22_050.0,
            ripple_db,
            attenuation_db,
            sample_rate: 44_100.0,
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn designs_are_stable_or_refused(spec in filter_spec(1..=20)) {
        let design = match design(&spec) {
            Ok(design) => design,
            Err(err) => {
                prop_assert_eq!(err.kind(), ErrorKind::Numerical, "{:?}", spec);
                prop_assert!(spec.family.is_recursive());
                prop_assert!(spec.order > ALWAYS_REALIZABLE_ORDER, "refused {:?}", spec);
                return Ok(());
            }
        };
        prop_assert!(!design.coefficients.b.is_empty());
        prop_assert!(design.coefficients.b.iter().all(|v| v.is_finite()));
        prop_assert!(design.is_stable(), "unstable {:?}", spec);
        if spec.family.is_recursive() {
            prop_assert_eq!(design.coefficients.a.len(), spec.order + 1);
        } else {
            prop_assert_eq!(&design.coefficients.a, &vec![1.0]);
        }
    }

    #[test]
    fn filtering_preserves_length(
        spec in filter_spec(1..=ALWAYS_REALIZABLE_ORDER),
        signal in prop::collection::vec(-1.0f64..1.0, 40..600),
    ) {
        let design = design(&spec).unwrap();
        let filtered = apply(&design.coefficients, &signal).unwrap();
        prop_assert_eq!(filtered.len(), signal.len());
    }

    #[test]
    fn resampling_hits_the_target_length(
        signal in prop::collection::vec(-1.0f64..1.0, 1..300),
        target in 1usize..600,
    ) {
        prop_assert_eq!(resample(&signal, target).unwrap().len(), target);
    }
}
