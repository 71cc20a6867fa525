//! `From` implementations bridging `steady_config` types to `steady_core` types.
//!
//! Profile defaults are resolved here so callers never see optional timings.

use crate::config::{HeightCfg, PulseCfg, StabilizerCfg, ThrottlePolicy};

// ── HeightCfg ────────────────────────────────────────────────────────────────

impl From<&steady_config::Config> for HeightCfg {
    fn from(c: &steady_config::Config) -> Self {
        let (stability_ms, sample_interval_ms) = c.height_timing();
        Self {
            tolerance_cm: c.height.tolerance_cm,
            stability_ms,
            sample_interval_ms,
            max_distance_cm: c.height.max_distance_cm,
            reject_no_echo: c.height.reject_no_echo,
        }
    }
}

// ── PulseCfg ─────────────────────────────────────────────────────────────────

impl From<&steady_config::Config> for PulseCfg {
    fn from(c: &steady_config::Config) -> Self {
        let throttle = if c.pulse.track_validity_while_throttled {
            ThrottlePolicy::TrackValidity
        } else {
            ThrottlePolicy::Ignore
        };

        let (bpm_stability, bpm_interval) = c.bpm_timing();
        let bpm = StabilizerCfg::new(c.pulse.bpm.tolerance, bpm_stability, bpm_interval)
            .with_valid_range(c.pulse.bpm.min, c.pulse.bpm.max)
            .with_throttle(throttle);

        let (spo2_stability, spo2_interval) = c.spo2_timing();
        let spo2 = StabilizerCfg::new(c.pulse.spo2.tolerance, spo2_stability, spo2_interval)
            .with_valid_range(c.pulse.spo2.min, c.pulse.spo2.max)
            .with_throttle(throttle);

        Self {
            bpm,
            spo2,
            report_period_ms: c.pulse.report_period_ms,
            poll_ms: c.pulse.poll_ms,
        }
    }
}
