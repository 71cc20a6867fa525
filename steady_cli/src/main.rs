mod cli;
mod error_fmt;
mod run;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use eyre::{Result, WrapErr};
use steady_core::SteadyError;
use steady_traits::{Clock, ManualClock, MonotonicClock};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

use crate::cli::{Cli, Commands, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    // Only the panic/report hooks; errors are rendered by error_fmt.
    let _ = color_eyre::install();

    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(e) = real_main(cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            println!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        std::process::exit(exit_code_for_error(&e));
    }
}

fn real_main(cli: Cli) -> Result<()> {
    let cfg = load_config(cli.config.as_deref())?;
    // Dropped on return so the file writer flushes before the process exits.
    let _file_guard = init_tracing(cli.json, cli.log_level.as_deref(), &cfg.logging)?;
    tracing::debug!(profile = ?cfg.profile, "config loaded");

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let flag = shutdown.clone();
        if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::Relaxed)) {
            tracing::warn!(error = %e, "failed to install Ctrl-C handler");
        }
    }

    let clock: Box<dyn Clock> = if cli.sim_clock {
        Box::new(ManualClock::new())
    } else {
        Box::new(MonotonicClock::new())
    };
    let out = run::Output { json: cli.json };

    match cli.cmd {
        Commands::Height {
            cycles,
            distance,
            jitter,
            dropout_every,
        } => {
            let sim = run::SimDistance {
                distance_cm: distance,
                jitter_cm: jitter,
                dropout_every,
            };
            run::run_height(&cfg, sim, cycles, clock.as_ref(), shutdown, out)
        }
        Commands::Pulse {
            cycles,
            finger_after,
        } => run::run_pulse(&cfg, finger_after, cycles, clock.as_ref(), shutdown, out),
        Commands::Replay {
            trace,
            tolerance,
            stability_ms,
            interval_ms,
            min,
            max,
            track_validity,
        } => {
            let args = run::ReplayArgs {
                tolerance,
                stability_ms,
                interval_ms,
                range: min.zip(max),
                track_validity,
            };
            run::run_replay(&trace, &args, out)
        }
        Commands::SelfCheck => run::self_check(&cfg, out),
    }
}

/// Read, parse and validate the config; built-in defaults without a path.
fn load_config(path: Option<&Path>) -> Result<steady_config::Config> {
    let Some(path) = path else {
        return Ok(steady_config::Config::default());
    };
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("read config {}", path.display()))?;
    let cfg = steady_config::load_toml(&text)
        .map_err(|e| SteadyError::Config(format!("{}: {e}", path.display())))?;
    cfg.validate()
        .map_err(|e| SteadyError::Config(e.to_string()))?;
    Ok(cfg)
}

/// Console logs go to stderr so stdout stays clean for frames and JSON lines.
fn init_tracing(
    json: bool,
    level: Option<&str>,
    logging: &steady_config::Logging,
) -> Result<Option<WorkerGuard>> {
    let level = level.or(logging.level.as_deref()).unwrap_or("info");
    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.is_empty() => EnvFilter::try_new(v)?,
        _ => EnvFilter::try_new(level)?,
    };

    let mut layers = Vec::new();
    let mut file_guard = None;
    let console = fmt::layer().with_writer(std::io::stderr).with_target(false);
    if json {
        layers.push(console.json().boxed());
    } else {
        layers.push(console.boxed());
    }

    if let Some(file) = logging.file.as_deref() {
        let path = Path::new(file);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .ok_or_else(|| SteadyError::Config(format!("logging.file must name a file, got {file:?}")))?;
        let appender = match logging.rotation.as_deref() {
            Some("daily") => tracing_appender::rolling::daily(dir, name),
            Some("hourly") => tracing_appender::rolling::hourly(dir, name),
            _ => tracing_appender::rolling::never(dir, name),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        file_guard = Some(guard);
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()?;
    Ok(file_guard)
}
