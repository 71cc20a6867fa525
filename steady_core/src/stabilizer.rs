//! Tolerance-window reading stabilizer.
//!
//! Feeds of raw samples are reduced to a "stable" value once consecutive
//! accepted readings have stayed within `tolerance` of each other for at
//! least `stability_ms`. Samples arriving sooner than `sample_interval_ms`
//! after the last accepted one are ignored; with a valid range configured,
//! an out-of-range sample resets the whole filter.
//!
//! Timestamps are supplied by the caller and must be non-decreasing. The
//! filter does no timekeeping of its own; elapsed-time math saturates, so a
//! timestamp going backwards never panics but yields unspecified timing.

use crate::builder::{Missing, StabilizerBuilder};
use crate::config::{StabilizerCfg, ThrottlePolicy};
use crate::reading::Reading;
use crate::status::StabilityStatus;

#[derive(Debug, Clone)]
pub struct Stabilizer<T: Reading> {
    cfg: StabilizerCfg<T>,
    last_reading: T,
    stable_reading: T,
    window_start_ms: u64,
    last_sample_ms: u64,
    is_stable: bool,
    has_reading: bool,
    last_reading_valid: bool,
}

impl<T: Reading> Stabilizer<T> {
    /// Create a filter without validating `cfg`; prefer [`Stabilizer::builder`].
    pub fn new(cfg: StabilizerCfg<T>) -> Self {
        Self {
            last_reading: cfg.sentinel,
            stable_reading: cfg.sentinel,
            cfg,
            window_start_ms: 0,
            last_sample_ms: 0,
            is_stable: false,
            has_reading: false,
            last_reading_valid: false,
        }
    }

    /// Start building a Stabilizer.
    pub fn builder() -> StabilizerBuilder<T, Missing> {
        StabilizerBuilder::new()
    }

    /// Validate `cfg` and build a filter from it.
    pub fn try_from_cfg(cfg: StabilizerCfg<T>) -> crate::error::Result<Self> {
        cfg.validate()?;
        Ok(Self::new(cfg))
    }

    /// Submit one raw sample taken at `now_ms`.
    pub fn update(&mut self, raw: T, now_ms: u64) {
        if self.has_reading && now_ms.saturating_sub(self.last_sample_ms) < self.cfg.sample_interval_ms
        {
            if self.cfg.throttle == ThrottlePolicy::TrackValidity
                && let Some(range) = self.cfg.valid_range
            {
                self.last_reading_valid = range.contains(raw);
            }
            tracing::trace!(?raw, now_ms, "sample throttled");
            return;
        }

        self.last_sample_ms = now_ms;

        if !self.cfg.accepts(raw) {
            if self.has_reading {
                tracing::debug!(?raw, now_ms, "reading out of range; filter reset");
            }
            self.reset();
            self.last_sample_ms = now_ms;
            self.last_reading_valid = false;
            return;
        }
        self.last_reading_valid = true;

        if !self.has_reading {
            self.last_reading = raw;
            self.window_start_ms = now_ms;
            self.has_reading = true;
            self.is_stable = false;
            tracing::trace!(?raw, now_ms, "first reading");
            return;
        }

        if self.cfg.is_within_tolerance(raw, self.last_reading) {
            let elapsed = now_ms.saturating_sub(self.window_start_ms);
            if elapsed >= self.cfg.stability_ms {
                if !self.is_stable {
                    tracing::debug!(?raw, elapsed_ms = elapsed, "reading stable");
                }
                self.is_stable = true;
                self.stable_reading = raw;
            }
        } else {
            if self.is_stable {
                tracing::debug!(?raw, last = ?self.last_reading, "stability lost");
            }
            self.window_start_ms = now_ms;
            self.is_stable = false;
        }

        self.last_reading = raw;
    }

    /// Return to the initial, no-reading state.
    pub fn reset(&mut self) {
        self.last_reading = self.cfg.sentinel;
        self.stable_reading = self.cfg.sentinel;
        self.window_start_ms = 0;
        self.last_sample_ms = 0;
        self.is_stable = false;
        self.has_reading = false;
        self.last_reading_valid = false;
    }

    #[inline]
    pub fn is_stable(&self) -> bool {
        self.is_stable
    }

    /// The latest reading of the stable run, or the sentinel when not stable.
    #[inline]
    pub fn stable_value(&self) -> T {
        if self.is_stable {
            self.stable_reading
        } else {
            self.cfg.sentinel
        }
    }

    /// The most recently accepted reading, or the sentinel.
    #[inline]
    pub fn last_value(&self) -> T {
        self.last_reading
    }

    #[inline]
    pub fn was_last_reading_valid(&self) -> bool {
        self.last_reading_valid
    }

    #[inline]
    pub fn has_any_reading(&self) -> bool {
        self.has_reading
    }

    pub fn config(&self) -> &StabilizerCfg<T> {
        &self.cfg
    }

    /// How long the current run of equivalent readings has lasted at `now_ms`.
    pub fn settled_for_ms(&self, now_ms: u64) -> u64 {
        if self.has_reading {
            now_ms.saturating_sub(self.window_start_ms)
        } else {
            0
        }
    }

    pub fn status(&self) -> StabilityStatus<T> {
        if self.is_stable {
            StabilityStatus::Stable {
                value: self.stable_reading,
            }
        } else if self.has_reading {
            StabilityStatus::Settling {
                last: self.last_reading,
            }
        } else {
            StabilityStatus::Empty
        }
    }
}
