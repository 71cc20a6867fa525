//! Test and helper mocks for steady_core

use steady_traits::{BoxError, DistanceSensor, PulseSensor};

/// A distance sensor that always errors; useful to exercise the
/// sensor-failure path of the poll loop.
pub struct NoopDistance;

impl DistanceSensor for NoopDistance {
    fn ping_cm(&mut self) -> Result<u32, BoxError> {
        Err(Box::new(std::io::Error::other("noop distance sensor")))
    }
}

/// Distance sensor that returns a fixed sequence, then repeats the last value.
pub struct ScriptedDistance {
    seq: Vec<u32>,
    idx: usize,
}

impl ScriptedDistance {
    pub fn new(seq: impl Into<Vec<u32>>) -> Self {
        Self {
            seq: seq.into(),
            idx: 0,
        }
    }
}

impl DistanceSensor for ScriptedDistance {
    fn ping_cm(&mut self) -> Result<u32, BoxError> {
        let v = if self.idx < self.seq.len() {
            let x = self.seq[self.idx];
            self.idx += 1;
            x
        } else {
            self.seq.last().copied().unwrap_or(0)
        };
        Ok(v)
    }
}

/// Pulse sensor stepping through `(bpm, spo2)` frames, one per `update()`;
/// the last frame repeats. Every frame with a non-zero BPM counts one beat.
pub struct ScriptedPulse {
    frames: Vec<(f32, u8)>,
    idx: usize,
    current: (f32, u8),
    beats: u32,
}

impl ScriptedPulse {
    pub fn new(frames: impl Into<Vec<(f32, u8)>>) -> Self {
        Self {
            frames: frames.into(),
            idx: 0,
            current: (0.0, 0),
            beats: 0,
        }
    }
}

impl PulseSensor for ScriptedPulse {
    fn update(&mut self) -> Result<(), BoxError> {
        if self.idx < self.frames.len() {
            self.current = self.frames[self.idx];
            self.idx += 1;
        } else if let Some(last) = self.frames.last() {
            self.current = *last;
        }
        if self.current.0 > 0.0 {
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
