#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and trace parsing for the steady instruments.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//!   Every section is optional; an empty file yields the board defaults.
//! - Trace CSV loader enforces headers and non-decreasing timestamps so a
//!   recorded session can be replayed through the stabilizer.
use serde::Deserialize;

/// Board family the instruments are tuned for. Selects default stability
/// timing for every channel that does not override it.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// AVR boards: slower loop, shorter stability window.
    Uno,
    /// ESP32/ESP8266.
    #[default]
    Esp,
}

impl Profile {
    /// Default stability duration in milliseconds.
    pub fn stability_ms(self) -> u64 {
        match self {
            Profile::Uno => 2000,
            Profile::Esp => 3000,
        }
    }

    /// Default minimum spacing between accepted samples in milliseconds.
    pub fn sample_interval_ms(self) -> u64 {
        match self {
            Profile::Uno => 200,
            Profile::Esp => 100,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HeightCfg {
    /// Readings within this many centimeters are considered equal
    pub tolerance_cm: i32,
    /// Overrides the profile stability duration
    pub stability_ms: Option<u64>,
    /// Overrides the profile sample interval; also the ping period
    pub sample_interval_ms: Option<u64>,
    /// Maximum distance measured by the ultrasonic sensor
    pub max_distance_cm: u32,
    /// Treat "no echo" (0 cm) as out of range and reset the filter
    pub reject_no_echo: bool,
}

impl Default for HeightCfg {
    fn default() -> Self {
        Self {
            tolerance_cm: 2,
            stability_ms: None,
            sample_interval_ms: None,
            max_distance_cm: 200,
            reject_no_echo: false,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BpmCfg {
    pub tolerance: f32,
    pub min: f32,
    pub max: f32,
    pub stability_ms: Option<u64>,
    pub sample_interval_ms: Option<u64>,
}

impl Default for BpmCfg {
    fn default() -> Self {
        Self {
            tolerance: 5.0,
            min: 40.0,
            max: 200.0,
            stability_ms: None,
            sample_interval_ms: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Spo2Cfg {
    pub tolerance: i32,
    pub min: i32,
    pub max: i32,
    pub stability_ms: Option<u64>,
    pub sample_interval_ms: Option<u64>,
}

impl Default for Spo2Cfg {
    fn default() -> Self {
        Self {
            tolerance: 2,
            min: 50,
            max: 100,
            stability_ms: None,
            sample_interval_ms: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PulseCfg {
    /// Period between reports (filter updates + display refresh)
    pub report_period_ms: u64,
    /// How often the sensor is pumped between reports
    pub poll_ms: u64,
    /// Record out-of-range samples that arrive inside the sample interval
    pub track_validity_while_throttled: bool,
    pub bpm: BpmCfg,
    pub spo2: Spo2Cfg,
}

impl Default for PulseCfg {
    fn default() -> Self {
        Self {
            report_period_ms: 1000,
            poll_ms: 10,
            track_validity_while_throttled: false,
            bpm: BpmCfg::default(),
            spo2: Spo2Cfg::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Pins {
    /// Ultrasonic trigger output
    pub trig: u8,
    /// Ultrasonic echo input
    pub echo: u8,
    pub i2c_sda: u8,
    pub i2c_scl: u8,
}

impl Default for Pins {
    fn default() -> Self {
        Self {
            trig: 3,
            echo: 2,
            i2c_sda: 4,
            i2c_scl: 5,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DisplayKind {
    /// Pick the display each instrument shipped with (LCD for height, OLED for pulse)
    #[default]
    Auto,
    Lcd,
    Oled,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DisplayCfg {
    pub kind: DisplayKind,
    pub lcd_address: u8,
    pub lcd_cols: u8,
    pub lcd_rows: u8,
    pub oled_address: u8,
    pub oled_width: u16,
    pub oled_height: u16,
}

impl Default for DisplayCfg {
    fn default() -> Self {
        Self {
            kind: DisplayKind::Auto,
            lcd_address: 0x27,
            lcd_cols: 16,
            lcd_rows: 2,
            oled_address: 0x3C,
            oled_width: 128,
            oled_height: 64,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Hardware {
    /// Max time to wait for the echo line to rise after a trigger pulse
    pub echo_timeout_ms: u64,
}

impl Default for Hardware {
    fn default() -> Self {
        Self {
            echo_timeout_ms: 30,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub profile: Profile,
    pub height: HeightCfg,
    pub pulse: PulseCfg,
    pub pins: Pins,
    pub display: DisplayCfg,
    pub hardware: Hardware,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Timing after applying profile defaults: `(stability_ms, sample_interval_ms)`.
fn resolve(profile: Profile, stability_ms: Option<u64>, interval_ms: Option<u64>) -> (u64, u64) {
    (
        stability_ms.unwrap_or(profile.stability_ms()),
        interval_ms.unwrap_or(profile.sample_interval_ms()),
    )
}

impl Config {
    pub fn height_timing(&self) -> (u64, u64) {
        resolve(
            self.profile,
            self.height.stability_ms,
            self.height.sample_interval_ms,
        )
    }

    pub fn bpm_timing(&self) -> (u64, u64) {
        resolve(
            self.profile,
            self.pulse.bpm.stability_ms,
            self.pulse.bpm.sample_interval_ms,
        )
    }

    pub fn spo2_timing(&self) -> (u64, u64) {
        resolve(
            self.profile,
            self.pulse.spo2.stability_ms,
            self.pulse.spo2.sample_interval_ms,
        )
    }

    pub fn validate(&self) -> eyre::Result<()> {
        const MAX_STABILITY_MS: u64 = 5 * 60 * 1000;

        // Height
        let (stability_ms, interval_ms) = self.height_timing();
        if self.height.tolerance_cm < 0 {
            eyre::bail!("height.tolerance_cm must be >= 0");
        }
        if interval_ms == 0 {
            eyre::bail!("height.sample_interval_ms must be >= 1");
        }
        if stability_ms > MAX_STABILITY_MS {
            eyre::bail!("height.stability_ms is unreasonably large (>5min)");
        }
        if !(2..=500).contains(&self.height.max_distance_cm) {
            eyre::bail!("height.max_distance_cm must be in [2, 500]");
        }

        // Pulse
        if self.pulse.report_period_ms == 0 {
            eyre::bail!("pulse.report_period_ms must be >= 1");
        }
        if self.pulse.poll_ms == 0 {
            eyre::bail!("pulse.poll_ms must be >= 1");
        }
        if self.pulse.poll_ms > self.pulse.report_period_ms {
            eyre::bail!("pulse.poll_ms must be <= pulse.report_period_ms");
        }
        let bpm = &self.pulse.bpm;
        if !bpm.tolerance.is_finite() || bpm.tolerance < 0.0 {
            eyre::bail!("pulse.bpm.tolerance must be a finite value >= 0");
        }
        if !(bpm.min.is_finite() && bpm.max.is_finite()) || bpm.min > bpm.max {
            eyre::bail!("pulse.bpm.min must be <= pulse.bpm.max");
        }
        if bpm.min < 0.0 {
            eyre::bail!("pulse.bpm.min must be >= 0");
        }
        if self.bpm_timing().0 > MAX_STABILITY_MS {
            eyre::bail!("pulse.bpm.stability_ms is unreasonably large (>5min)");
        }
        let spo2 = &self.pulse.spo2;
        if spo2.tolerance < 0 {
            eyre::bail!("pulse.spo2.tolerance must be >= 0");
        }
        if spo2.min > spo2.max {
            eyre::bail!("pulse.spo2.min must be <= pulse.spo2.max");
        }
        if spo2.min < 0 || spo2.max > 100 {
            eyre::bail!("pulse.spo2 range must lie within [0, 100]");
        }
        if self.spo2_timing().0 > MAX_STABILITY_MS {
            eyre::bail!("pulse.spo2.stability_ms is unreasonably large (>5min)");
        }

        // Display
        if self.display.lcd_cols == 0 || self.display.lcd_rows == 0 {
            eyre::bail!("display.lcd_cols and display.lcd_rows must be >= 1");
        }
        if self.display.oled_width < 6 || self.display.oled_height < 8 {
            eyre::bail!("display.oled_width/oled_height too small for one character");
        }

        // Hardware
        if self.hardware.echo_timeout_ms == 0 {
            eyre::bail!("hardware.echo_timeout_ms must be >= 1");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        Ok(())
    }
}

/// Recorded sensor trace schema.
///
/// Expected headers:
/// t_ms,value
///
/// Example:
/// t_ms,value
/// 0,72.0
/// 200,73.5
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct TraceRow {
    pub t_ms: u64,
    pub value: f64,
}

/// Parse a trace from any reader. Rows must have non-decreasing `t_ms`.
pub fn read_trace<R: std::io::Read>(reader: R) -> eyre::Result<Vec<TraceRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read trace CSV headers: {}", e))?
        .clone();
    let expected = ["t_ms", "value"];
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != expected {
        eyre::bail!(
            "trace CSV must have headers 't_ms,value', got: {}",
            actual.join(",")
        );
    }

    let mut rows: Vec<TraceRow> = Vec::new();
    for (idx, rec) in rdr.deserialize::<TraceRow>().enumerate() {
        let row = match rec {
            Ok(row) => row,
            Err(e) => eyre::bail!("invalid CSV row {}: {}", idx + 2, e),
        };
        if let Some(prev) = rows.last()
            && row.t_ms < prev.t_ms
        {
            eyre::bail!(
                "trace timestamps must be non-decreasing: row {} has t_ms={} after t_ms={}",
                idx + 2,
                row.t_ms,
                prev.t_ms
            );
        }
        rows.push(row);
    }

    if rows.is_empty() {
        eyre::bail!("trace CSV contains no rows");
    }
    Ok(rows)
}

pub fn load_trace_csv(path: &std::path::Path) -> eyre::Result<Vec<TraceRow>> {
    let file = std::fs::File::open(path)
        .map_err(|e| eyre::eyre!("open trace CSV {:?}: {}", path, e))?;
    read_trace(file)
}
