//! HC-SR04 ultrasonic ranger on Raspberry Pi GPIO.

use std::thread::sleep;
use std::time::Duration;

use rppal::gpio::{Gpio, InputPin, OutputPin};
use steady_traits::{BoxError, DistanceSensor};
use tracing::trace;

use crate::error::{HwError, Result};
use crate::util::{US_ROUNDTRIP_CM, us_to_cm, wait_for_level};

pub struct Hcsr04 {
    trig: OutputPin,
    echo: InputPin,
    max_distance_cm: u32,
    echo_timeout: Duration,
}

impl Hcsr04 {
    pub fn new(
        trig_pin: u8,
        echo_pin: u8,
        max_distance_cm: u32,
        echo_timeout: Duration,
    ) -> Result<Self> {
        let gpio = Gpio::new().map_err(|e| HwError::Gpio(e.to_string()))?;
        let mut trig = gpio
            .get(trig_pin)
            .map_err(|e| HwError::Gpio(e.to_string()))?
            .into_output();
        let echo = gpio
            .get(echo_pin)
            .map_err(|e| HwError::Gpio(e.to_string()))?
            .into_input();
        trig.set_low();
        Ok(Self {
            trig,
            echo,
            max_distance_cm,
            echo_timeout,
        })
    }

    /// Longest echo worth waiting for at the configured range.
    fn max_echo(&self) -> Duration {
        let us = u64::from(self.max_distance_cm + 1) * US_ROUNDTRIP_CM;
        Duration::from_micros(us)
    }

    /// Echo pulse width, or `None` when no echo came back in time.
    fn ping_us(&mut self) -> Option<u64> {
        self.trig.set_low();
        sleep(Duration::from_micros(2));
        self.trig.set_high();
        sleep(Duration::from_micros(10));
        self.trig.set_low();

        let echo = &self.echo;
        let start = wait_for_level(|| echo.is_high(), true, self.echo_timeout, Duration::ZERO).ok()?;
        let end = wait_for_level(|| echo.is_high(), false, self.max_echo(), Duration::ZERO).ok()?;
        u64::try_from(end.duration_since(start).as_micros()).ok()
    }
}

impl DistanceSensor for Hcsr04 {
    fn ping_cm(&mut self) -> std::result::Result<u32, BoxError> {
        let cm = self.ping_us().map_or(0, us_to_cm);
        trace!(cm, "hc-sr04 ping");
        // Out of range reads the same as no echo.
        Ok(if cm > self.max_distance_cm { 0 } else { cm })
    }
}
