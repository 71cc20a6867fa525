pub mod clock;

pub use clock::{Clock, ManualClock, MonotonicClock};

/// Boxed error returned by sensor and display implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Ultrasonic (echo-timed) distance sensor.
pub trait DistanceSensor {
    /// One ping. Returns the distance in whole centimeters, or `0` when no
    /// echo came back within range.
    fn ping_cm(&mut self) -> Result<u32, BoxError>;
}

/// Pulse oximeter that is pumped continuously and queried for its latest
/// computed values.
pub trait PulseSensor {
    /// Drive the sensor's internal sampling; call as often as possible.
    fn update(&mut self) -> Result<(), BoxError>;
    /// Latest heart rate in beats per minute (0.0 when no finger).
    fn heart_rate(&self) -> f32;
    /// Latest SpO2 in percent (0 when no finger).
    fn spo2(&self) -> u8;
    /// Number of beats detected since the last call; resets the counter.
    fn take_beats(&mut self) -> u32 {
        0
    }
}

/// Character display that shows a few lines of text.
pub trait TextDisplay {
    fn show(&mut self, lines: &[String]) -> Result<(), BoxError>;
    fn clear(&mut self) -> Result<(), BoxError> {
        self.show(&[])
    }
}

impl<D: TextDisplay + ?Sized> TextDisplay for Box<D> {
    fn show(&mut self, lines: &[String]) -> Result<(), BoxError> {
        (**self).show(lines)
    }
    fn clear(&mut self) -> Result<(), BoxError> {
        (**self).clear()
    }
}

impl<S: DistanceSensor + ?Sized> DistanceSensor for Box<S> {
    fn ping_cm(&mut self) -> Result<u32, BoxError> {
        (**self).ping_cm()
    }
}

impl<P: PulseSensor + ?Sized> PulseSensor for Box<P> {
    fn update(&mut self) -> Result<(), BoxError> {
        (**self).update()
    }
    fn heart_rate(&self) -> f32 {
        (**self).heart_rate()
    }
    fn spo2(&self) -> u8 {
        (**self).spo2()
    }
    fn take_beats(&mut self) -> u32 {
        (**self).take_beats()
    }
}
