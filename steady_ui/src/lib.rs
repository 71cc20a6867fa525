#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Text layout for the instrument displays and the serial-style trace lines.
//!
//! Frames are plain strings; drawing them is up to a `TextDisplay`.

use steady_core::{ChannelReport, HeightReport, PulseReport, StabilityStatus};

/// Pixel size of one glyph of the OLED's default font.
const OLED_GLYPH_W: u32 = 6;
const OLED_GLYPH_H: u32 = 8;
/// Pixel column the OLED pulse layout starts the SpO2 field at.
const OLED_O2_X: u32 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayKind {
    Lcd,
    Oled,
}

/// Character grid of a concrete display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub kind: DisplayKind,
    pub cols: usize,
    pub rows: usize,
}

impl Layout {
    pub fn lcd(cols: u8, rows: u8) -> Self {
        Self {
            kind: DisplayKind::Lcd,
            cols: usize::from(cols),
            rows: usize::from(rows),
        }
    }

    pub fn oled(width_px: u32, height_px: u32) -> Self {
        Self {
            kind: DisplayKind::Oled,
            cols: (width_px / OLED_GLYPH_W) as usize,
            rows: (height_px / OLED_GLYPH_H) as usize,
        }
    }

    /// Column the SpO2 field starts at on the first pulse line.
    fn o2_col(&self) -> usize {
        match self.kind {
            DisplayKind::Lcd => self.cols / 2,
            DisplayKind::Oled => (OLED_O2_X / OLED_GLYPH_W) as usize,
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::lcd(16, 2)
    }
}

/// One screenful of text, already fitted to its layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    lines: Vec<String>,
}

impl Frame {
    fn fit(layout: &Layout, lines: Vec<String>) -> Self {
        let pad = layout.kind == DisplayKind::Lcd;
        let lines = lines
            .into_iter()
            .take(layout.rows)
            .map(|l| {
                let mut l: String = l.chars().take(layout.cols).collect();
                // An LCD keeps stale characters unless they are overwritten.
                if pad {
                    let n = l.chars().count();
                    l.extend(std::iter::repeat_n(' ', layout.cols - n));
                }
                l
            })
            .collect();
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

// ── Height meter ─────────────────────────────────────────────────────────────

pub fn height_frame(layout: &Layout, r: &HeightReport) -> Frame {
    let second = if r.no_echo() {
        "No object".to_string()
    } else {
        let mark = if r.status.is_stable() { "OK" } else { "..." };
        format!("{} cm {mark}", r.raw_cm)
    };
    Frame::fit(layout, vec!["Height:".to_string(), second])
}

/// `Raw: 120 cm | Stable: YES (120 cm)`
pub fn height_trace_line(r: &HeightReport) -> String {
    match r.stable_cm() {
        Some(cm) => format!("Raw: {} cm | Stable: YES ({cm} cm)", r.raw_cm),
        None => format!("Raw: {} cm | Stable: NO", r.raw_cm),
    }
}

// ── Pulse oximeter ───────────────────────────────────────────────────────────

/// `72*` when stable, `72?` while settling, `--` without a reading.
fn channel_field<T: Copy>(c: &ChannelReport<T>, show: impl Fn(T) -> String) -> String {
    match c.status {
        StabilityStatus::Stable { value } => format!("{}*", show(value)),
        StabilityStatus::Settling { .. } => format!("{}?", show(c.raw)),
        StabilityStatus::Empty => "--".to_string(),
    }
}

pub fn pulse_frame(layout: &Layout, r: &PulseReport) -> Frame {
    if !r.finger_detected {
        return Frame::fit(layout, vec!["Place finger".to_string()]);
    }
    // Heart rate is shown truncated to whole beats.
    let bpm = channel_field(&r.bpm, |v: f32| format!("{}", v as i32));
    let o2 = channel_field(&r.spo2, |v: i32| v.to_string());
    let first = format!("{:<width$}O2:{o2}", format!("BPM:{bpm}"), width = layout.o2_col());
    let second = if r.all_stable() { "STABLE" } else { "Stabilizing" };
    Frame::fit(layout, vec![first, second.to_string()])
}

/// `BPM:72.00(OK) O2:97(...)`
pub fn pulse_trace_line(r: &PulseReport) -> String {
    let mark = |stable: bool| if stable { "OK" } else { "..." };
    format!(
        "BPM:{:.2}({}) O2:{}({})",
        r.bpm.raw,
        mark(r.bpm.status.is_stable()),
        r.spo2.raw,
        mark(r.spo2.status.is_stable())
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn height(raw_cm: u32, status: StabilityStatus<i32>) -> HeightReport {
        HeightReport {
            t_ms: 0,
            raw_cm,
            status,
        }
    }

    fn pulse(
        bpm: (f32, StabilityStatus<f32>),
        spo2: (i32, StabilityStatus<i32>),
        finger: bool,
    ) -> PulseReport {
        PulseReport {
            t_ms: 0,
            bpm: ChannelReport {
                raw: bpm.0,
                status: bpm.1,
            },
            spo2: ChannelReport {
                raw: spo2.0,
                status: spo2.1,
            },
            finger_detected: finger,
            beats: 0,
        }
    }

    #[rstest]
    #[case(0, StabilityStatus::Empty, "No object       ")]
    #[case(120, StabilityStatus::Settling { last: 120 }, "120 cm ...      ")]
    #[case(120, StabilityStatus::Stable { value: 119 }, "120 cm OK       ")]
    fn height_lcd_second_line(
        #[case] raw: u32,
        #[case] status: StabilityStatus<i32>,
        #[case] expected: &str,
    ) {
        let f = height_frame(&Layout::default(), &height(raw, status));
        assert_eq!(f.lines()[0], "Height:         ");
        assert_eq!(f.lines()[1], expected);
    }

    #[test]
    fn oled_lines_are_not_padded() {
        let f = height_frame(&Layout::oled(128, 64), &height(0, StabilityStatus::Empty));
        assert_eq!(f.lines(), ["Height:", "No object"]);
    }

    #[test]
    fn height_trace_lines() {
        assert_eq!(
            height_trace_line(&height(121, StabilityStatus::Stable { value: 120 })),
            "Raw: 121 cm | Stable: YES (120 cm)"
        );
        assert_eq!(
            height_trace_line(&height(0, StabilityStatus::Empty)),
            "Raw: 0 cm | Stable: NO"
        );
    }

    #[test]
    fn pulse_place_finger() {
        let r = pulse(
            (0.0, StabilityStatus::Empty),
            (0, StabilityStatus::Empty),
            false,
        );
        let f = pulse_frame(&Layout::oled(128, 64), &r);
        assert_eq!(f.lines(), ["Place finger"]);
    }

    #[test]
    fn pulse_oled_fields() {
        let r = pulse(
            (72.6, StabilityStatus::Stable { value: 72.6 }),
            (97, StabilityStatus::Settling { last: 97 }),
            true,
        );
        let f = pulse_frame(&Layout::oled(128, 64), &r);
        assert_eq!(f.lines(), ["BPM:72*    O2:97?", "Stabilizing"]);
    }

    #[test]
    fn pulse_lcd_fits_sixteen_columns() {
        let r = pulse(
            (120.0, StabilityStatus::Stable { value: 120.0 }),
            (100, StabilityStatus::Stable { value: 100 }),
            true,
        );
        let f = pulse_frame(&Layout::lcd(16, 2), &r);
        assert_eq!(f.lines(), ["BPM:120*O2:100* ", "STABLE          "]);
    }

    #[test]
    fn pulse_empty_channel_shows_dashes() {
        let r = pulse(
            (30.0, StabilityStatus::Empty),
            (96, StabilityStatus::Settling { last: 96 }),
            true,
        );
        let f = pulse_frame(&Layout::oled(128, 64), &r);
        assert_eq!(f.lines()[0], "BPM:--     O2:96?");
        assert_eq!(
            pulse_trace_line(&r),
            "BPM:30.00(...) O2:96(...)"
        );
    }
}
