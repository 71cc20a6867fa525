#[cfg(all(feature = "hardware", target_os = "linux"))]
pub mod hcsr04;

pub mod error;
pub mod util;

use std::io::Write;

use steady_traits::{BoxError, DistanceSensor, PulseSensor, TextDisplay};

#[cfg(all(feature = "hardware", target_os = "linux"))]
pub use hcsr04::Hcsr04;

// Tiny xorshift PRNG shared by the simulators; deterministic per seed.
#[derive(Debug, Clone)]
struct XorShift(u32);

impl XorShift {
    fn new(seed: u32) -> Self {
        Self(seed.max(1))
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }

    /// Uniform in `[-amp, amp]`.
    fn jitter(&mut self, amp: u32) -> i64 {
        if amp == 0 {
            return 0;
        }
        let span = u64::from(amp) * 2 + 1;
        (u64::from(self.next_u32()) % span) as i64 - i64::from(amp)
    }

    /// Uniform in `[-amp, amp)`.
    fn jitter_f32(&mut self, amp: f32) -> f32 {
        let unit = self.next_u32() as f32 / (u32::MAX as f32 + 1.0);
        (unit * 2.0 - 1.0) * amp
    }
}

/// Simulated ultrasonic distance sensor
#[derive(Debug, Clone)]
pub struct SimulatedUltrasonic {
    base_cm: u32,
    jitter_cm: u32,
    dropout_every: u32,
    pings: u32,
    rng: XorShift,
}

impl SimulatedUltrasonic {
    /// A target at `base_cm`, each ping off by up to `jitter_cm`.
    pub fn new(base_cm: u32, jitter_cm: u32) -> Self {
        Self {
            base_cm,
            jitter_cm,
            dropout_every: 0,
            pings: 0,
            rng: XorShift::new(0x5EED),
        }
    }

    /// Every `n`th ping returns no echo; 0 disables dropouts.
    pub fn with_dropout_every(mut self, n: u32) -> Self {
        self.dropout_every = n;
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.rng = XorShift::new(seed);
        self
    }

    /// Move the simulated target.
    pub fn set_base_cm(&mut self, cm: u32) {
        self.base_cm = cm;
    }
}

impl DistanceSensor for SimulatedUltrasonic {
    fn ping_cm(&mut self) -> Result<u32, BoxError> {
        self.pings = self.pings.wrapping_add(1);
        if self.base_cm == 0 || (self.dropout_every > 0 && self.pings % self.dropout_every == 0) {
            return Ok(0);
        }
        let cm = i64::from(self.base_cm) + self.rng.jitter(self.jitter_cm);
        Ok(u32::try_from(cm.max(1)).unwrap_or(u32::MAX))
    }
}

/// Simulated pulse oximeter: reads zero until a finger is "placed", then
/// reports a resting heart rate and saturation with a little jitter.
#[derive(Debug, Clone)]
pub struct SimulatedOximeter {
    finger_after: u32,
    updates: u32,
    bpm: f32,
    spo2: u8,
    bpm_jitter: f32,
    spo2_jitter: u32,
    beat_every: u32,
    beats: u32,
    current: (f32, u8),
    rng: XorShift,
}

impl Default for SimulatedOximeter {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedOximeter {
    pub fn new() -> Self {
        Self {
            finger_after: 0,
            updates: 0,
            bpm: 72.0,
            spo2: 97,
            bpm_jitter: 1.5,
            spo2_jitter: 1,
            // one beat per ~830 ms at a 10 ms update rate
            beat_every: 83,
            beats: 0,
            current: (0.0, 0),
            rng: XorShift::new(0xBEA7),
        }
    }

    /// The finger is detected after this many `update()` calls.
    pub fn finger_after(mut self, updates: u32) -> Self {
        self.finger_after = updates;
        self
    }

    pub fn with_vitals(mut self, bpm: f32, spo2: u8) -> Self {
        self.bpm = bpm;
        self.spo2 = spo2;
        self
    }

    pub fn with_jitter(mut self, bpm: f32, spo2: u32) -> Self {
        self.bpm_jitter = bpm;
        self.spo2_jitter = spo2;
        self
    }

    /// A beat is detected every `n` updates once the finger is on; 0 disables beats.
    pub fn with_beat_every(mut self, n: u32) -> Self {
        self.beat_every = n;
        self
    }

    /// Take the finger off; it comes back after `updates` more calls.
    pub fn lift_finger(&mut self, updates: u32) {
        self.finger_after = self.updates.saturating_add(updates);
    }

    fn finger_on(&self) -> bool {
        self.updates > self.finger_after
    }
}

impl PulseSensor for SimulatedOximeter {
    fn update(&mut self) -> Result<(), BoxError> {
        self.updates = self.updates.saturating_add(1);
        if !self.finger_on() {
            self.current = (0.0, 0);
            return Ok(());
        }
        let bpm = (self.bpm + self.rng.jitter_f32(self.bpm_jitter)).max(0.0);
        let spo2 = (i64::from(self.spo2) + self.rng.jitter(self.spo2_jitter)).clamp(0, 100);
        self.current = (bpm, u8::try_from(spo2).unwrap_or(100));
        if self.beat_every > 0 && (self.updates - self.finger_after) % self.beat_every == 0 {
            self.beats += 1;
        }
        Ok(())
    }

    fn heart_rate(&self) -> f32 {
        self.current.0
    }

    fn spo2(&self) -> u8 {
        self.current.1
    }

    fn take_beats(&mut self) -> u32 {
        std::mem::take(&mut self.beats)
    }
}

/// Text display printing each frame once, when it changes.
pub struct ConsoleDisplay<W: Write> {
    out: W,
    last: Vec<String>,
}

impl ConsoleDisplay<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ConsoleDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TextDisplay for ConsoleDisplay<W> {
    fn show(&mut self, lines: &[String]) -> Result<(), BoxError> {
        if self.last == lines {
            return Ok(());
        }
        let width = lines.iter().map(String::len).max().unwrap_or(0);
        writeln!(self.out, "+{}+", "-".repeat(width))?;
        for line in lines {
            writeln!(self.out, "|{line:<width$}|")?;
        }
        writeln!(self.out, "+{}+", "-".repeat(width))?;
        self.out.flush()?;
        self.last = lines.to_vec();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_ultrasonic_jitter_stays_in_band() {
        let mut s = SimulatedUltrasonic::new(120, 2);
        for _ in 0..500 {
            let cm = s.ping_cm().unwrap();
            assert!((118..=122).contains(&cm), "got {cm}");
        }
    }

    #[test]
    fn test_simulated_ultrasonic_dropouts() {
        let mut s = SimulatedUltrasonic::new(50, 0).with_dropout_every(3);
        let got: Vec<u32> = (0..6).map(|_| s.ping_cm().unwrap()).collect();
        assert_eq!(got, vec![50, 50, 0, 50, 50, 0]);
    }

    #[test]
    fn test_simulated_oximeter_finger_and_beats() {
        let mut s = SimulatedOximeter::new()
            .finger_after(2)
            .with_jitter(0.0, 0)
            .with_beat_every(2);
        s.update().unwrap();
        s.update().unwrap();
        assert_eq!(s.heart_rate(), 0.0);
        assert_eq!(s.spo2(), 0);
        for _ in 0..4 {
            s.update().unwrap();
        }
        assert_eq!(s.heart_rate(), 72.0);
        assert_eq!(s.spo2(), 97);
        assert_eq!(s.take_beats(), 2);
        assert_eq!(s.take_beats(), 0);

        s.lift_finger(1);
        s.update().unwrap();
        assert_eq!(s.spo2(), 0);
    }

    #[test]
    fn test_console_display_prints_only_changes() {
        let mut d = ConsoleDisplay::new(Vec::new());
        let frame = vec!["Height:".to_string(), "120 cm OK".to_string()];
        d.show(&frame).unwrap();
        d.show(&frame).unwrap();
        let out = String::from_utf8(d.into_inner()).unwrap();
        assert_eq!(out.matches("|Height:  |").count(), 1);
    }
}
