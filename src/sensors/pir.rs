//! PIR motion sensor.
//!
//! HC-SR501-style passive infrared module with a digital output: HIGH
//! while motion is detected.  The module needs a few seconds after power-up
//! before its output is meaningful.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use log::info;

use crate::error::SensorError;

pub struct MotionSensor<P> {
    pin: P,
}

impl<P: InputPin> MotionSensor<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Block for `warmup_ms` while the sensor settles.
    pub fn warm_up(&mut self, delay: &mut impl DelayNs, warmup_ms: u32) {
        info!("PIR motion sensor initialising ({} ms)...", warmup_ms);
        delay.delay_ms(warmup_ms);
        info!("PIR motion sensor activated");
    }

    /// Single-sample presence reading.
    pub fn detect(&mut self) -> Result<bool, SensorError> {
        self.pin.is_high().map_err(|_| SensorError::GpioReadFailed)
    }
}
