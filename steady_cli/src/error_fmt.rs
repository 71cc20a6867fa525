//! Human-readable error descriptions and structured JSON error formatting.

use steady_core::error::{BuildError, SteadyError};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingTolerance => {
                "What happened: No tolerance was given to the stabilizer.\nLikely causes: The filter was built without tolerance(...).\nHow to fix: Set a tolerance in the config or pass --tolerance.".to_string()
            }
            BuildError::NegativeTolerance => {
                "What happened: Tolerance is negative.\nLikely causes: A typo in the config or on the command line.\nHow to fix: Use a tolerance of 0 or more.".to_string()
            }
            BuildError::InvertedRange => {
                "What happened: The valid range is inverted (min > max).\nLikely causes: min and max swapped.\nHow to fix: Make sure min <= max.".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid stabilizer configuration ({msg}).\nLikely causes: NaN or out-of-range values.\nHow to fix: Edit the config or arguments, then rerun."
            ),
        };
    }

    if let Some(se) = err.downcast_ref::<SteadyError>() {
        return match se {
            SteadyError::Sensor(msg) => format!(
                "What happened: Sensor read failed ({msg}).\nLikely causes: Wrong pins, loose wiring, or missing GPIO permissions.\nHow to fix: Check [pins] in the config and the sensor's power, then rerun."
            ),
            SteadyError::Display(msg) => format!(
                "What happened: Display update failed ({msg}).\nLikely causes: Wrong I2C address or the display is unplugged.\nHow to fix: Check [display] in the config."
            ),
            SteadyError::Config(msg) => format!(
                "What happened: Configuration is invalid ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun."
            ),
        };
    }

    // String-based heuristics for errors coming from the trace reader
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("trace csv must have headers") {
        return "Invalid headers in trace CSV. Expected 't_ms,value'.".to_string();
    }
    if lower.contains("trace timestamps must be non-decreasing") {
        return format!(
            "What happened: Trace timestamps go backwards.\nHow to fix: Sort the trace by t_ms. Original: {msg}"
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes per error class; anything unclassified returns 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if let Some(se) = err.downcast_ref::<SteadyError>() {
        return match se {
            SteadyError::Sensor(_) => 3,
            SteadyError::Display(_) => 4,
            SteadyError::Config(_) => 5,
        };
    }
    if err.downcast_ref::<BuildError>().is_some() {
        return 5;
    }
    1
}

fn reason_name(err: &eyre::Report) -> &'static str {
    if let Some(se) = err.downcast_ref::<SteadyError>() {
        return match se {
            SteadyError::Sensor(_) => "Sensor",
            SteadyError::Display(_) => "Display",
            SteadyError::Config(_) => "Config",
        };
    }
    if err.downcast_ref::<BuildError>().is_some() {
        return "Build";
    }
    "Error"
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    json!({
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}
