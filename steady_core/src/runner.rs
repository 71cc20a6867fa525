use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use steady_traits::clock::Clock;

use crate::error::Result;
use crate::instrument::Instrument;

/// Stop conditions for [`run`]. With neither limit nor shutdown flag the loop
/// runs until the instrument or the sink returns an error.
#[derive(Debug, Clone, Default)]
pub struct RunParams {
    /// Stop after this many polls.
    pub max_polls: Option<u64>,
    /// Stop after this many reports were handed to the sink.
    pub max_reports: Option<u64>,
    /// Checked once per poll; set from a signal handler.
    pub shutdown: Option<Arc<AtomicBool>>,
}

#[derive(Debug, Clone)]
pub struct RunSummary<R> {
    pub polls: u64,
    pub reports: u64,
    pub last_report: Option<R>,
    /// True when the loop ended because the shutdown flag was set.
    pub interrupted: bool,
}

/// Poll `instrument` once per `poll_period_ms()` on `clock`, handing every
/// report to `sink`. Timestamps are milliseconds since the loop started.
pub fn run<I, C, F>(
    instrument: &mut I,
    clock: &C,
    params: &RunParams,
    mut sink: F,
) -> Result<RunSummary<I::Report>>
where
    I: Instrument,
    I::Report: Clone,
    C: Clock + ?Sized,
    F: FnMut(&I::Report) -> Result<()>,
{
    let epoch = clock.now();
    let period = Duration::from_millis(instrument.poll_period_ms().max(1));
    let mut summary = RunSummary {
        polls: 0,
        reports: 0,
        last_report: None,
        interrupted: false,
    };

    tracing::info!(period_ms = period.as_millis() as u64, "poll loop start");
    loop {
        if params
            .shutdown
            .as_ref()
            .is_some_and(|s| s.load(Ordering::Relaxed))
        {
            tracing::info!("shutdown requested");
            summary.interrupted = true;
            break;
        }
        if params.max_polls.is_some_and(|max| summary.polls >= max)
            || params.max_reports.is_some_and(|max| summary.reports >= max)
        {
            break;
        }

        let now_ms = clock.ms_since(epoch);
        let report = instrument.poll(now_ms)?;
        summary.polls += 1;
        if let Some(report) = report {
            sink(&report)?;
            summary.reports += 1;
            summary.last_report = Some(report);
        }
        clock.sleep(period);
    }
    tracing::info!(
        polls = summary.polls,
        reports = summary.reports,
        "poll loop end"
    );
    Ok(summary)
}
