//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "steady", version, about = "Stabilized height and pulse readings")]
pub struct Cli {
    /// Path to config TOML (typed); built-in defaults when omitted
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Emit reports and errors as JSON lines; logs become JSON too
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); overrides [logging] level
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Run on a simulated clock: no real sleeping between polls
    #[arg(long, action = ArgAction::SetTrue)]
    pub sim_clock: bool,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Measure height with the ultrasonic sensor
    Height {
        /// Stop after this many reports (runs until Ctrl-C when omitted)
        #[arg(long, value_name = "N")]
        cycles: Option<u64>,
        /// Simulated target distance in cm (ignored with real hardware)
        #[arg(long, value_name = "CM", default_value_t = 120)]
        distance: u32,
        /// Simulated ping jitter in cm
        #[arg(long, value_name = "CM", default_value_t = 1)]
        jitter: u32,
        /// Simulate a lost echo every N pings (0 = never)
        #[arg(long, value_name = "N", default_value_t = 0)]
        dropout_every: u32,
    },
    /// Measure heart rate and SpO2 with the pulse oximeter
    Pulse {
        /// Stop after this many reports (runs until Ctrl-C when omitted)
        #[arg(long, value_name = "N")]
        cycles: Option<u64>,
        /// Simulated sensor updates before a finger is detected
        #[arg(long, value_name = "N", default_value_t = 0)]
        finger_after: u32,
    },
    /// Feed a recorded `t_ms,value` trace through a stabilizer
    Replay {
        /// Trace CSV with headers `t_ms,value`
        #[arg(long, value_name = "FILE")]
        trace: PathBuf,
        /// Readings within this distance of the previous one are equivalent
        #[arg(long)]
        tolerance: f64,
        /// How long a run must last to be stable
        #[arg(long, value_name = "MS")]
        stability_ms: u64,
        /// Minimum spacing between accepted samples
        #[arg(long, value_name = "MS", default_value_t = 0)]
        interval_ms: u64,
        /// Lower bound of the valid range (inclusive)
        #[arg(long, requires = "max", allow_hyphen_values = true)]
        min: Option<f64>,
        /// Upper bound of the valid range (inclusive)
        #[arg(long, requires = "min", allow_hyphen_values = true)]
        max: Option<f64>,
        /// Record validity of samples dropped by the interval gate
        #[arg(long, action = ArgAction::SetTrue)]
        track_validity: bool,
    },
    /// Validate the configuration and probe the sensors
    SelfCheck,
}
