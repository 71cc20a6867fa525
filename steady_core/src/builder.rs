//! Type-state builder for `Stabilizer`.
//!
//! The builder enforces at compile time that a tolerance is provided before
//! `build()` is available. `try_build()` is always available for dynamic checks.

use std::marker::PhantomData;

use crate::config::{StabilizerCfg, ThrottlePolicy, ValidRange};
use crate::error::{BuildError, Result};
use crate::reading::Reading;
use crate::stabilizer::Stabilizer;

// ── Type-state markers ───────────────────────────────────────────────────────

pub struct Missing;
pub struct Set;

/// Builder for `Stabilizer`. All fields are validated on `build()`.
pub struct StabilizerBuilder<T, Tol> {
    tolerance: Option<T>,
    stability_ms: u64,
    sample_interval_ms: u64,
    valid_range: Option<ValidRange<T>>,
    throttle: ThrottlePolicy,
    sentinel: Option<T>,
    _tol: PhantomData<Tol>,
}

impl<T: Reading> Default for StabilizerBuilder<T, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Reading> StabilizerBuilder<T, Missing> {
    pub fn new() -> Self {
        Self {
            tolerance: None,
            stability_ms: 0,
            sample_interval_ms: 0,
            valid_range: None,
            throttle: ThrottlePolicy::Ignore,
            sentinel: None,
            _tol: PhantomData,
        }
    }

    /// Start from an existing configuration.
    pub fn from_cfg(cfg: StabilizerCfg<T>) -> StabilizerBuilder<T, Set> {
        StabilizerBuilder {
            tolerance: Some(cfg.tolerance),
            stability_ms: cfg.stability_ms,
            sample_interval_ms: cfg.sample_interval_ms,
            valid_range: cfg.valid_range,
            throttle: cfg.throttle,
            sentinel: Some(cfg.sentinel),
            _tol: PhantomData,
        }
    }
}

impl<T: Reading, Tol> StabilizerBuilder<T, Tol> {
    pub fn tolerance(self, tolerance: T) -> StabilizerBuilder<T, Set> {
        StabilizerBuilder {
            tolerance: Some(tolerance),
            stability_ms: self.stability_ms,
            sample_interval_ms: self.sample_interval_ms,
            valid_range: self.valid_range,
            throttle: self.throttle,
            sentinel: self.sentinel,
            _tol: PhantomData,
        }
    }

    pub fn stability_ms(mut self, ms: u64) -> Self {
        self.stability_ms = ms;
        self
    }

    pub fn sample_interval_ms(mut self, ms: u64) -> Self {
        self.sample_interval_ms = ms;
        self
    }

    pub fn valid_range(mut self, min: T, max: T) -> Self {
        self.valid_range = Some(ValidRange::new(min, max));
        self
    }

    /// Set or clear the range gate.
    pub fn maybe_valid_range(mut self, range: Option<(T, T)>) -> Self {
        self.valid_range = range.map(|(min, max)| ValidRange::new(min, max));
        self
    }

    pub fn throttle(mut self, policy: ThrottlePolicy) -> Self {
        self.throttle = policy;
        self
    }

    pub fn sentinel(mut self, sentinel: T) -> Self {
        self.sentinel = Some(sentinel);
        self
    }

    /// Validate and build, regardless of type-state.
    pub fn try_build(self) -> Result<Stabilizer<T>> {
        let tolerance = self.tolerance.ok_or(BuildError::MissingTolerance)?;
        let cfg = StabilizerCfg {
            tolerance,
            stability_ms: self.stability_ms,
            sample_interval_ms: self.sample_interval_ms,
            valid_range: self.valid_range,
            throttle: self.throttle,
            sentinel: self.sentinel.unwrap_or_default(),
        };
        Stabilizer::try_from_cfg(cfg)
    }
}

impl<T: Reading> StabilizerBuilder<T, Set> {
    pub fn build(self) -> Result<Stabilizer<T>> {
        self.try_build()
    }
}
