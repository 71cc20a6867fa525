use rstest::rstest;
use steady_core::error::BuildError;
use steady_core::{Stabilizer, StabilizerBuilder, ThrottlePolicy};

#[rstest]
fn missing_tolerance_yields_typed_build_error() {
    let err = StabilizerBuilder::<i32, _>::new()
        .stability_ms(1000)
        .try_build()
        .expect_err("should fail with MissingTolerance");

    match err.downcast_ref::<BuildError>() {
        Some(BuildError::MissingTolerance) => {}
        other => panic!("expected MissingTolerance, got: {other:?}"),
    }
}

#[rstest]
#[case(-1)]
#[case(i32::MIN)]
fn negative_tolerance_is_rejected(#[case] tol: i32) {
    let err = Stabilizer::builder().tolerance(tol).build().unwrap_err();
    assert_eq!(
        err.downcast_ref::<BuildError>(),
        Some(&BuildError::NegativeTolerance)
    );
}

#[rstest]
fn inverted_range_is_rejected() {
    let err = Stabilizer::builder()
        .tolerance(2)
        .valid_range(100, 50)
        .build()
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<BuildError>(),
        Some(&BuildError::InvertedRange)
    );
}

#[rstest]
fn nan_tolerance_is_rejected() {
    let err = Stabilizer::builder().tolerance(f32::NAN).build().unwrap_err();
    assert!(matches!(
        err.downcast_ref::<BuildError>(),
        Some(BuildError::InvalidConfig(_))
    ));
}

#[rstest]
fn degenerate_range_and_zero_durations_are_accepted() {
    let f = Stabilizer::builder()
        .tolerance(0)
        .valid_range(7, 7)
        .stability_ms(0)
        .sample_interval_ms(0)
        .build()
        .expect("single-point range is valid");
    assert_eq!(f.config().valid_range.map(|r| (r.min, r.max)), Some((7, 7)));
}

#[rstest]
fn builder_carries_every_option_into_config() {
    let f = Stabilizer::builder()
        .tolerance(5.0f32)
        .stability_ms(3000)
        .sample_interval_ms(100)
        .maybe_valid_range(Some((40.0, 200.0)))
        .throttle(ThrottlePolicy::TrackValidity)
        .sentinel(-1.0)
        .build()
        .unwrap();
    let cfg = f.config();
    assert_eq!(cfg.tolerance, 5.0);
    assert_eq!(cfg.stability_ms, 3000);
    assert_eq!(cfg.sample_interval_ms, 100);
    assert_eq!(cfg.throttle, ThrottlePolicy::TrackValidity);
    assert_eq!(f.stable_value(), -1.0);
}

#[rstest]
fn from_cfg_round_trips_through_builder() {
    let cfg = steady_core::StabilizerCfg::new(2, 1000, 100).with_valid_range(50, 100);
    let f = StabilizerBuilder::from_cfg(cfg)
        .maybe_valid_range(None)
        .build()
        .unwrap();
    assert!(f.config().valid_range.is_none());
    assert_eq!(f.config().tolerance, 2);
}
