//! Quick Start Example
//!
//! Runs a height meter against a simulated ultrasonic sensor on a simulated
//! clock and prints every report until the reading is stable.

use steady_core::{HeightCfg, HeightMeter, RunParams, run};
use steady_hardware::SimulatedUltrasonic;
use steady_traits::ManualClock;

/// Usage: `cargo run -p steady_core --example quick_start`
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the sensor fails,
/// surfaced as an `eyre::Report`.
fn main() -> Result<(), eyre::Report> {
    // Simulated time: the loop runs as fast as the CPU allows.
    let clock = ManualClock::new();

    // 120 cm with +-1 cm of jitter, inside the default 2 cm tolerance
    let sensor = SimulatedUltrasonic::new(120, 1);
    let mut meter = HeightMeter::new(sensor, &HeightCfg::default())?;

    let params = RunParams {
        max_reports: Some(100),
        ..RunParams::default()
    };
    let summary = run(&mut meter, &clock, &params, |r| {
        match r.stable_cm() {
            Some(cm) => println!("t={:>5} ms  raw={:>3} cm  stable={cm} cm", r.t_ms, r.raw_cm),
            None => println!("t={:>5} ms  raw={:>3} cm  settling", r.t_ms, r.raw_cm),
        }
        Ok(())
    })?;

    match summary.last_report.and_then(|r| r.stable_cm()) {
        Some(cm) => println!("Height stable at {cm} cm"),
        None => println!("Height did not settle"),
    }
    Ok(())
}
