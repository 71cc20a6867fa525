//! Command implementations: instrument loops, trace replay and self-check.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use eyre::Result;
use serde_json::json;
use steady_core::{
    ChannelReport, HeightCfg, HeightMeter, HeightReport, Instrument, PulseCfg, PulseMeter,
    PulseReport, Reading, RunParams, Stabilizer, SteadyError, ThrottlePolicy, run,
};
use steady_hardware::{ConsoleDisplay, SimulatedOximeter};
use steady_traits::{Clock, DistanceSensor, TextDisplay};
use steady_ui::{Frame, Layout, height_frame, height_trace_line, pulse_frame, pulse_trace_line};

#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
}

/// Parameters of the simulated ultrasonic sensor.
#[derive(Debug, Clone, Copy)]
pub struct SimDistance {
    pub distance_cm: u32,
    pub jitter_cm: u32,
    pub dropout_every: u32,
}

#[derive(Debug, Clone)]
pub struct ReplayArgs {
    pub tolerance: f64,
    pub stability_ms: u64,
    pub interval_ms: u64,
    pub range: Option<(f64, f64)>,
    pub track_validity: bool,
}

// ── Shared helpers ───────────────────────────────────────────────────────────

fn height_layout(d: &steady_config::DisplayCfg) -> Layout {
    match d.kind {
        steady_config::DisplayKind::Oled => {
            Layout::oled(u32::from(d.oled_width), u32::from(d.oled_height))
        }
        steady_config::DisplayKind::Auto | steady_config::DisplayKind::Lcd => {
            Layout::lcd(d.lcd_cols, d.lcd_rows)
        }
    }
}

fn pulse_layout(d: &steady_config::DisplayCfg) -> Layout {
    match d.kind {
        steady_config::DisplayKind::Lcd => Layout::lcd(d.lcd_cols, d.lcd_rows),
        steady_config::DisplayKind::Auto | steady_config::DisplayKind::Oled => {
            Layout::oled(u32::from(d.oled_width), u32::from(d.oled_height))
        }
    }
}

fn show(display: &mut impl TextDisplay, frame: &Frame) -> Result<()> {
    display
        .show(frame.lines())
        .map_err(|e| SteadyError::Display(e.to_string()).into())
}

fn run_params(cycles: Option<u64>, shutdown: Arc<AtomicBool>) -> RunParams {
    RunParams {
        max_reports: cycles,
        shutdown: Some(shutdown),
        ..RunParams::default()
    }
}

fn channel_json<T: Reading + serde::Serialize>(c: &ChannelReport<T>) -> serde_json::Value {
    json!({
        "raw": c.raw,
        "status": c.status.label(),
        "stable": c.status.stable_value(),
    })
}

#[cfg(all(feature = "hardware", target_os = "linux"))]
fn distance_sensor(
    cfg: &steady_config::Config,
    _sim: SimDistance,
) -> Result<Box<dyn DistanceSensor>> {
    let sensor = steady_hardware::Hcsr04::new(
        cfg.pins.trig,
        cfg.pins.echo,
        cfg.height.max_distance_cm,
        std::time::Duration::from_millis(cfg.hardware.echo_timeout_ms),
    )
    .map_err(|e| SteadyError::Sensor(format!("open HC-SR04 pins: {e}")))?;
    tracing::info!(trig = cfg.pins.trig, echo = cfg.pins.echo, "HC-SR04 ready");
    Ok(Box::new(sensor))
}

#[cfg(not(all(feature = "hardware", target_os = "linux")))]
fn distance_sensor(
    _cfg: &steady_config::Config,
    sim: SimDistance,
) -> Result<Box<dyn DistanceSensor>> {
    Ok(Box::new(
        steady_hardware::SimulatedUltrasonic::new(sim.distance_cm, sim.jitter_cm)
            .with_dropout_every(sim.dropout_every),
    ))
}

// ── Height ───────────────────────────────────────────────────────────────────

fn height_json(r: &HeightReport) -> serde_json::Value {
    json!({
        "t_ms": r.t_ms,
        "raw_cm": r.raw_cm,
        "no_echo": r.no_echo(),
        "status": r.status.label(),
        "stable_cm": r.stable_cm(),
    })
}

pub fn run_height(
    cfg: &steady_config::Config,
    sim: SimDistance,
    cycles: Option<u64>,
    clock: &dyn Clock,
    shutdown: Arc<AtomicBool>,
    out: Output,
) -> Result<()> {
    let hcfg = HeightCfg::from(cfg);
    let mut meter = HeightMeter::new(distance_sensor(cfg, sim)?, &hcfg)?;
    let layout = height_layout(&cfg.display);
    let mut display = ConsoleDisplay::stdout();
    tracing::info!(
        tolerance_cm = hcfg.tolerance_cm,
        stability_ms = hcfg.stability_ms,
        sample_interval_ms = hcfg.sample_interval_ms,
        "height meter start"
    );

    let summary = run(&mut meter, clock, &run_params(cycles, shutdown), |r| {
        tracing::debug!("{}", height_trace_line(r));
        if out.json {
            println!("{}", height_json(r));
            Ok(())
        } else {
            show(&mut display, &height_frame(&layout, r))
        }
    })?;

    let stable = summary.last_report.as_ref().and_then(HeightReport::stable_cm);
    if out.json {
        println!(
            "{}",
            json!({
                "summary": "height",
                "polls": summary.polls,
                "reports": summary.reports,
                "interrupted": summary.interrupted,
                "stable_cm": stable,
            })
        );
    } else {
        match stable {
            Some(cm) => println!("height stable at {cm} cm"),
            None => println!("height not stable after {} reports", summary.reports),
        }
    }
    Ok(())
}

// ── Pulse ────────────────────────────────────────────────────────────────────

fn pulse_json(r: &PulseReport) -> serde_json::Value {
    json!({
        "t_ms": r.t_ms,
        "finger": r.finger_detected,
        "beats": r.beats,
        "bpm": channel_json(&r.bpm),
        "spo2": channel_json(&r.spo2),
        "stable": r.all_stable(),
    })
}

pub fn run_pulse(
    cfg: &steady_config::Config,
    finger_after: u32,
    cycles: Option<u64>,
    clock: &dyn Clock,
    shutdown: Arc<AtomicBool>,
    out: Output,
) -> Result<()> {
    #[cfg(feature = "hardware")]
    tracing::warn!("no pulse oximeter driver for this board; using the simulator");

    let pcfg = PulseCfg::from(cfg);
    let sensor = SimulatedOximeter::new().finger_after(finger_after);
    let mut meter = PulseMeter::new(sensor, &pcfg)?;
    let layout = pulse_layout(&cfg.display);
    let mut display = ConsoleDisplay::stdout();
    tracing::info!(
        report_period_ms = pcfg.report_period_ms,
        poll_ms = pcfg.poll_ms,
        "pulse meter start"
    );

    let summary = run(&mut meter, clock, &run_params(cycles, shutdown), |r| {
        if r.beats > 0 {
            tracing::debug!(beats = r.beats, "beat");
        }
        tracing::debug!("{}", pulse_trace_line(r));
        if out.json {
            println!("{}", pulse_json(r));
            Ok(())
        } else {
            show(&mut display, &pulse_frame(&layout, r))
        }
    })?;

    let last = summary.last_report.as_ref();
    let bpm = last.and_then(|r| r.bpm.status.stable_value());
    let spo2 = last.and_then(|r| r.spo2.status.stable_value());
    if out.json {
        println!(
            "{}",
            json!({
                "summary": "pulse",
                "polls": summary.polls,
                "reports": summary.reports,
                "interrupted": summary.interrupted,
                "bpm": bpm,
                "spo2": spo2,
            })
        );
    } else {
        match (bpm, spo2) {
            (Some(bpm), Some(spo2)) => println!("pulse stable at {bpm:.0} bpm, SpO2 {spo2}%"),
            _ => println!("pulse not stable after {} reports", summary.reports),
        }
    }
    Ok(())
}

// ── Replay ───────────────────────────────────────────────────────────────────

pub fn run_replay(trace: &Path, args: &ReplayArgs, out: Output) -> Result<()> {
    let rows = steady_config::load_trace_csv(trace)?;
    let throttle = if args.track_validity {
        ThrottlePolicy::TrackValidity
    } else {
        ThrottlePolicy::Ignore
    };
    let mut filter = Stabilizer::builder()
        .tolerance(args.tolerance)
        .stability_ms(args.stability_ms)
        .sample_interval_ms(args.interval_ms)
        .maybe_valid_range(args.range)
        .throttle(throttle)
        .build()?;
    tracing::info!(rows = rows.len(), path = %trace.display(), "replay start");

    let mut first_stable_ms = None;
    for row in &rows {
        filter.update(row.value, row.t_ms);
        let status = filter.status();
        if status.is_stable() && first_stable_ms.is_none() {
            first_stable_ms = Some(row.t_ms);
        }
        if out.json {
            println!(
                "{}",
                json!({
                    "t_ms": row.t_ms,
                    "value": row.value,
                    "status": status.label(),
                    "valid": filter.was_last_reading_valid(),
                    "stable_value": status.stable_value(),
                })
            );
        } else {
            println!("{:>8} {:>12.3} {}", row.t_ms, row.value, status.label());
        }
    }

    let stable = filter.status().stable_value();
    if out.json {
        println!(
            "{}",
            json!({
                "summary": "replay",
                "rows": rows.len(),
                "stable_value": stable,
                "first_stable_ms": first_stable_ms,
            })
        );
    } else {
        match stable {
            Some(v) => println!("replay: {} rows, stable at {v}", rows.len()),
            None => println!("replay: {} rows, not stable", rows.len()),
        }
    }
    Ok(())
}

// ── Self-check ───────────────────────────────────────────────────────────────

pub fn self_check(cfg: &steady_config::Config, out: Output) -> Result<()> {
    let hcfg = HeightCfg::from(cfg);
    let pcfg = PulseCfg::from(cfg);

    let sim = SimDistance {
        distance_cm: 100,
        jitter_cm: 0,
        dropout_every: 0,
    };
    let mut height = HeightMeter::new(distance_sensor(cfg, sim)?, &hcfg)?;
    let ping = height
        .poll(0)?
        .map(|r| r.raw_cm)
        .ok_or_else(|| SteadyError::Sensor("height meter produced no report".into()))?;
    let _pulse = PulseMeter::new(SimulatedOximeter::new(), &pcfg)?;

    if out.json {
        println!(
            "{}",
            json!({
                "self_check": "ok",
                "profile": format!("{:?}", cfg.profile).to_ascii_lowercase(),
                "height": {
                    "stability_ms": hcfg.stability_ms,
                    "sample_interval_ms": hcfg.sample_interval_ms,
                    "ping_cm": ping,
                },
                "pulse": {
                    "bpm_stability_ms": pcfg.bpm.stability_ms,
                    "spo2_stability_ms": pcfg.spo2.stability_ms,
                    "report_period_ms": pcfg.report_period_ms,
                },
            })
        );
    } else {
        println!("self-check ok (first ping {ping} cm)");
    }
    Ok(())
}
