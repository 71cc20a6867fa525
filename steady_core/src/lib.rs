#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Reading stabilization and instrument logic (hardware-agnostic).
//!
//! This crate turns noisy periodic sensor samples into validated "stable"
//! values. All hardware interactions go through `steady_traits` sensor and
//! clock traits.
//!
//! ## Architecture
//!
//! - **Reading**: numeric trait the filter is generic over (`reading` module)
//! - **Stabilizer**: tolerance-window debouncer with interval and range gates
//! - **Configuration**: filter and instrument config structs (`config` module)
//! - **Instruments**: height meter and pulse oximeter poll logic
//! - **Runner**: cooperative single-threaded poll loop
//!
//! ## Example
//!
//! ```
//! use steady_core::Stabilizer;
//!
//! let mut f = Stabilizer::builder()
//!     .tolerance(2)
//!     .stability_ms(1000)
//!     .sample_interval_ms(100)
//!     .build()
//!     .unwrap();
//! for t in (0..=1000).step_by(200) {
//!     f.update(100, t);
//! }
//! assert!(f.is_stable());
//! assert_eq!(f.stable_value(), 100);
//! ```

pub mod builder;
pub mod config;
pub mod conversions;
pub mod error;
pub mod instrument;
pub mod mocks;
pub mod reading;
pub mod runner;
pub mod stabilizer;
pub mod status;

pub use builder::StabilizerBuilder;
pub use config::{HeightCfg, PulseCfg, StabilizerCfg, ThrottlePolicy, ValidRange};
pub use error::{BuildError, SteadyError};
pub use instrument::{ChannelReport, HeightMeter, HeightReport, Instrument, PulseMeter, PulseReport};
pub use reading::Reading;
pub use runner::{RunParams, RunSummary, run};
pub use stabilizer::Stabilizer;
pub use status::StabilityStatus;
