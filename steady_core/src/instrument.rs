//! Instruments: a sensor paired with one stabilizer per measured channel.
//!
//! Each `poll` reads the sensor, feeds the filters and, when there is
//! something new to show, returns a report for the display and log sinks.

use steady_traits::{DistanceSensor, PulseSensor};

use crate::config::{HeightCfg, PulseCfg};
use crate::error::{Result, SteadyError};
use crate::reading::Reading;
use crate::stabilizer::Stabilizer;
use crate::status::StabilityStatus;

/// A polled measurement device.
pub trait Instrument {
    type Report;

    /// One iteration of the poll loop at `now_ms`.
    fn poll(&mut self, now_ms: u64) -> Result<Option<Self::Report>>;

    /// Delay between polls.
    fn poll_period_ms(&self) -> u64;

    /// Drop all filter state (e.g. after the sensor was disconnected).
    fn reset(&mut self);
}

// ── Height meter ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct HeightReport {
    pub t_ms: u64,
    /// Raw distance from the sensor; 0 when no echo came back.
    pub raw_cm: u32,
    pub status: StabilityStatus<i32>,
}

impl HeightReport {
    pub fn no_echo(&self) -> bool {
        self.raw_cm == 0
    }

    pub fn stable_cm(&self) -> Option<i32> {
        self.status.stable_value()
    }
}

pub struct HeightMeter<S> {
    sensor: S,
    filter: Stabilizer<i32>,
    period_ms: u64,
}

impl<S: DistanceSensor> HeightMeter<S> {
    pub fn new(sensor: S, cfg: &HeightCfg) -> Result<Self> {
        let filter = Stabilizer::try_from_cfg(cfg.stabilizer_cfg())?;
        Ok(Self {
            sensor,
            filter,
            period_ms: cfg.sample_interval_ms,
        })
    }

    pub fn filter(&self) -> &Stabilizer<i32> {
        &self.filter
    }
}

impl<S: DistanceSensor> Instrument for HeightMeter<S> {
    type Report = HeightReport;

    fn poll(&mut self, now_ms: u64) -> Result<Option<HeightReport>> {
        let raw_cm = match self.sensor.ping_cm() {
            Ok(cm) => cm,
            Err(e) => {
                self.filter.reset();
                tracing::error!(error = %e, "distance sensor read failed");
                return Err(SteadyError::Sensor(e.to_string()).into());
            }
        };
        let raw = i32::try_from(raw_cm).unwrap_or(i32::MAX);
        self.filter.update(raw, now_ms);
        let status = self.filter.status();
        tracing::trace!(t_ms = now_ms, raw_cm, status = status.label(), "height sample");
        Ok(Some(HeightReport {
            t_ms: now_ms,
            raw_cm,
            status,
        }))
    }

    fn poll_period_ms(&self) -> u64 {
        self.period_ms
    }

    fn reset(&mut self) {
        self.filter.reset();
    }
}

// ── Pulse oximeter ───────────────────────────────────────────────────────────

/// One filtered channel of a pulse report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelReport<T> {
    pub raw: T,
    pub status: StabilityStatus<T>,
}

impl<T: Reading> ChannelReport<T> {
    fn from_filter(raw: T, filter: &Stabilizer<T>) -> Self {
        Self {
            raw,
            status: filter.status(),
        }
    }

    pub fn has_reading(&self) -> bool {
        !matches!(self.status, StabilityStatus::Empty)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PulseReport {
    pub t_ms: u64,
    pub bpm: ChannelReport<f32>,
    pub spo2: ChannelReport<i32>,
    /// False only while both channels are empty and the sensor reads zero.
    pub finger_detected: bool,
    /// Beats detected since the previous report.
    pub beats: u32,
}

impl PulseReport {
    pub fn all_stable(&self) -> bool {
        self.bpm.status.is_stable() && self.spo2.status.is_stable()
    }
}

pub struct PulseMeter<P> {
    sensor: P,
    bpm: Stabilizer<f32>,
    spo2: Stabilizer<i32>,
    report_period_ms: u64,
    poll_ms: u64,
    last_report_ms: u64,
    beats: u32,
}

impl<P: PulseSensor> PulseMeter<P> {
    pub fn new(sensor: P, cfg: &PulseCfg) -> Result<Self> {
        Ok(Self {
            sensor,
            bpm: Stabilizer::try_from_cfg(cfg.bpm)?,
            spo2: Stabilizer::try_from_cfg(cfg.spo2)?,
            report_period_ms: cfg.report_period_ms,
            poll_ms: cfg.poll_ms,
            last_report_ms: 0,
            beats: 0,
        })
    }

    pub fn bpm_filter(&self) -> &Stabilizer<f32> {
        &self.bpm
    }

    pub fn spo2_filter(&self) -> &Stabilizer<i32> {
        &self.spo2
    }
}

impl<P: PulseSensor> Instrument for PulseMeter<P> {
    type Report = PulseReport;

    fn poll(&mut self, now_ms: u64) -> Result<Option<PulseReport>> {
        if let Err(e) = self.sensor.update() {
            self.reset();
            tracing::error!(error = %e, "pulse sensor update failed");
            return Err(SteadyError::Sensor(e.to_string()).into());
        }
        let beats = self.sensor.take_beats();
        if beats > 0 {
            tracing::debug!(beats, t_ms = now_ms, "beat detected");
            self.beats = self.beats.saturating_add(beats);
        }

        if now_ms.saturating_sub(self.last_report_ms) < self.report_period_ms {
            return Ok(None);
        }
        self.last_report_ms = now_ms;

        let raw_bpm = self.sensor.heart_rate();
        let raw_spo2 = i32::from(self.sensor.spo2());
        self.bpm.update(raw_bpm, now_ms);
        self.spo2.update(raw_spo2, now_ms);

        let finger_detected = self.bpm.has_any_reading()
            || self.spo2.has_any_reading()
            || raw_bpm != 0.0
            || raw_spo2 != 0;
        let report = PulseReport {
            t_ms: now_ms,
            bpm: ChannelReport::from_filter(raw_bpm, &self.bpm),
            spo2: ChannelReport::from_filter(raw_spo2, &self.spo2),
            finger_detected,
            beats: std::mem::take(&mut self.beats),
        };
        tracing::trace!(
            t_ms = now_ms,
            raw_bpm,
            raw_spo2,
            bpm = report.bpm.status.label(),
            spo2 = report.spo2.status.label(),
            "pulse report"
        );
        Ok(Some(report))
    }

    fn poll_period_ms(&self) -> u64 {
        self.poll_ms
    }

    fn reset(&mut self) {
        self.bpm.reset();
        self.spo2.reset();
        self.last_report_ms = 0;
        self.beats = 0;
    }
}
