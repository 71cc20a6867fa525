//! Configuration types for the stabilizer and the instruments built on it.
//!
//! These are the runtime configuration structs used by `steady_core`.
//! They are separate from the TOML-deserialized config in `steady_config`.

use crate::error::BuildError;
use crate::reading::Reading;

/// Inclusive bounds a raw reading must fall within to be accepted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidRange<T> {
    pub min: T,
    pub max: T,
}

impl<T: Reading> ValidRange<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// `min <= value <= max`. NaN is never contained.
    #[inline]
    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }
}

/// What a sample rejected by the sample-interval gate does to the validity flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThrottlePolicy {
    /// Throttled samples are a pure no-op.
    #[default]
    Ignore,
    /// Throttled samples still record whether they were inside the valid
    /// range, so a sensor losing contact shows up before the next accepted
    /// sample. Has no effect without a valid range.
    TrackValidity,
}

/// Immutable configuration of one `Stabilizer`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilizerCfg<T> {
    /// Two readings are equivalent when `|a - b| <= tolerance`.
    pub tolerance: T,
    /// A run of equivalent readings must last this long to be stable.
    pub stability_ms: u64,
    /// Samples closer than this to the last accepted one are ignored.
    pub sample_interval_ms: u64,
    /// Optional range gate; `None` accepts every reading.
    pub valid_range: Option<ValidRange<T>>,
    pub throttle: ThrottlePolicy,
    /// Value reported by accessors when nothing meaningful is available.
    pub sentinel: T,
}

impl<T: Reading> StabilizerCfg<T> {
    pub fn new(tolerance: T, stability_ms: u64, sample_interval_ms: u64) -> Self {
        Self {
            tolerance,
            stability_ms,
            sample_interval_ms,
            valid_range: None,
            throttle: ThrottlePolicy::Ignore,
            sentinel: T::default(),
        }
    }

    pub fn with_valid_range(mut self, min: T, max: T) -> Self {
        self.valid_range = Some(ValidRange::new(min, max));
        self
    }

    pub fn with_throttle(mut self, throttle: ThrottlePolicy) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn with_sentinel(mut self, sentinel: T) -> Self {
        self.sentinel = sentinel;
        self
    }

    /// True when the reading passes the range gate (always, without one).
    #[inline]
    pub fn accepts(&self, value: T) -> bool {
        self.valid_range.is_none_or(|r| r.contains(value))
    }

    #[inline]
    pub fn is_within_tolerance(&self, a: T, b: T) -> bool {
        a.distance(b) <= self.tolerance
    }

    pub fn validate(&self) -> Result<(), BuildError> {
        if !self.tolerance.is_comparable() {
            return Err(BuildError::InvalidConfig("tolerance must be a number"));
        }
        if self.tolerance < T::default() {
            return Err(BuildError::NegativeTolerance);
        }
        if let Some(r) = self.valid_range {
            if !(r.min.is_comparable() && r.max.is_comparable()) {
                return Err(BuildError::InvalidConfig("valid range bounds must be numbers"));
            }
            if r.min > r.max {
                return Err(BuildError::InvertedRange);
            }
        }
        Ok(())
    }
}

/// Height meter configuration (ultrasonic distance, centimeters).
#[derive(Debug, Clone)]
pub struct HeightCfg {
    pub tolerance_cm: i32,
    pub stability_ms: u64,
    /// Also the poll period of the meter.
    pub sample_interval_ms: u64,
    /// Sensor range; pings beyond it come back as "no echo".
    pub max_distance_cm: u32,
    /// Gate the filter with `[1, max_distance_cm]` so a lost echo resets it.
    pub reject_no_echo: bool,
}

impl Default for HeightCfg {
    fn default() -> Self {
        Self {
            tolerance_cm: 2,
            stability_ms: 3000,
            sample_interval_ms: 100,
            max_distance_cm: 200,
            reject_no_echo: false,
        }
    }
}

impl HeightCfg {
    /// Filter configuration for the distance channel; -1 is the "no reading" sentinel.
    pub fn stabilizer_cfg(&self) -> StabilizerCfg<i32> {
        let cfg = StabilizerCfg::new(self.tolerance_cm, self.stability_ms, self.sample_interval_ms)
            .with_sentinel(-1);
        if self.reject_no_echo {
            let max = i32::try_from(self.max_distance_cm).unwrap_or(i32::MAX);
            cfg.with_valid_range(1, max)
        } else {
            cfg
        }
    }
}

/// Pulse oximeter configuration: one filter per channel plus report pacing.
#[derive(Debug, Clone)]
pub struct PulseCfg {
    pub bpm: StabilizerCfg<f32>,
    pub spo2: StabilizerCfg<i32>,
    /// Filters are fed and a report is produced at most this often.
    pub report_period_ms: u64,
    /// How often the sensor is pumped between reports.
    pub poll_ms: u64,
}

impl Default for PulseCfg {
    fn default() -> Self {
        Self {
            bpm: StabilizerCfg::new(5.0, 3000, 100).with_valid_range(40.0, 200.0),
            spo2: StabilizerCfg::new(2, 3000, 100).with_valid_range(50, 100),
            report_period_ms: 1000,
            poll_ms: 10,
        }
    }
}
