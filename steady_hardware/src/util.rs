use std::time::{Duration, Instant};

use crate::error::{HwError, Result};

/// Round-trip time of sound per centimeter, in microseconds.
pub const US_ROUNDTRIP_CM: u64 = 57;

/// Wait until `read()` returns `level`, or a timeout expires. Returns the
/// instant the level was observed. A zero `poll_interval` spins, which is
/// what echo timing needs; anything else sleeps between reads.
pub fn wait_for_level(
    mut read: impl FnMut() -> bool,
    level: bool,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<Instant> {
    let deadline = Instant::now() + timeout;
    loop {
        if read() == level {
            return Ok(Instant::now());
        }
        if Instant::now() >= deadline {
            return Err(HwError::EchoTimeout);
        }
        if poll_interval.is_zero() {
            std::hint::spin_loop();
        } else {
            std::thread::sleep(poll_interval);
        }
    }
}

/// Convert an echo pulse width to centimeters, rounded to nearest. Any
/// non-zero echo is at least 1 cm so it cannot be mistaken for "no echo".
pub fn us_to_cm(echo_us: u64) -> u32 {
    if echo_us == 0 {
        return 0;
    }
    let cm = (echo_us + US_ROUNDTRIP_CM / 2) / US_ROUNDTRIP_CM;
    u32::try_from(cm.max(1)).unwrap_or(u32::MAX)
}
