use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rstest::rstest;
use steady_core::mocks::{ScriptedDistance, ScriptedPulse};
use steady_core::{HeightCfg, HeightMeter, PulseCfg, PulseMeter, RunParams, run};
use steady_traits::ManualClock;

fn height_meter() -> HeightMeter<ScriptedDistance> {
    HeightMeter::new(ScriptedDistance::new([150]), &HeightCfg::default()).unwrap()
}

#[rstest]
fn stops_after_max_reports_on_sim_clock() {
    let clock = ManualClock::new();
    let mut m = height_meter();
    let params = RunParams {
        max_reports: Some(31),
        ..RunParams::default()
    };
    let mut seen = Vec::new();
    let summary = run(&mut m, &clock, &params, |r| {
        seen.push(r.t_ms);
        Ok(())
    })
    .unwrap();

    assert_eq!(summary.polls, 31);
    assert_eq!(summary.reports, 31);
    assert!(!summary.interrupted);
    assert_eq!(seen.first(), Some(&0));
    assert_eq!(seen.last(), Some(&3000));
    let last = summary.last_report.unwrap();
    assert_eq!(last.stable_cm(), Some(150));
    // The loop slept once per poll.
    assert_eq!(clock.elapsed_ms(), 3100);
}

#[rstest]
fn pulse_polls_faster_than_it_reports() {
    let clock = ManualClock::new();
    let mut m = PulseMeter::new(ScriptedPulse::new([(64.0, 98)]), &PulseCfg::default()).unwrap();
    let params = RunParams {
        max_polls: Some(401),
        ..RunParams::default()
    };
    let summary = run(&mut m, &clock, &params, |_| Ok(())).unwrap();
    assert_eq!(summary.polls, 401);
    assert_eq!(summary.reports, 4);
    assert!(summary.last_report.unwrap().all_stable());
}

#[rstest]
fn preset_shutdown_flag_stops_before_first_poll() {
    let clock = ManualClock::new();
    let mut m = height_meter();
    let params = RunParams {
        shutdown: Some(Arc::new(AtomicBool::new(true))),
        ..RunParams::default()
    };
    let summary = run(&mut m, &clock, &params, |_| Ok(())).unwrap();
    assert_eq!(summary.polls, 0);
    assert!(summary.interrupted);
    assert!(summary.last_report.is_none());
}

#[rstest]
fn shutdown_from_sink_is_honored_on_next_iteration() {
    let clock = ManualClock::new();
    let mut m = height_meter();
    let flag = Arc::new(AtomicBool::new(false));
    let params = RunParams {
        shutdown: Some(flag.clone()),
        ..RunParams::default()
    };
    let summary = run(&mut m, &clock, &params, |r| {
        if r.t_ms >= 400 {
            flag.store(true, Ordering::Relaxed);
        }
        Ok(())
    })
    .unwrap();
    assert_eq!(summary.reports, 5);
    assert!(summary.interrupted);
}

#[rstest]
fn sink_error_aborts_loop() {
    let clock = ManualClock::new();
    let mut m = height_meter();
    let params = RunParams {
        max_reports: Some(100),
        ..RunParams::default()
    };
    let err = run(&mut m, &clock, &params, |r| {
        if r.t_ms == 200 {
            eyre::bail!("display unplugged");
        }
        Ok(())
    })
    .unwrap_err();
    assert!(err.to_string().contains("display unplugged"));
}
