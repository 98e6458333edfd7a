//! HC-SR04 ultrasonic ranger.
//!
//! A 10 µs HIGH pulse on TRIG starts a measurement; the module then holds
//! ECHO HIGH for as long as the sound took to travel out and back.  The
//! driver busy-polls ECHO to timestamp both edges.
//!
//! There is no timeout: if ECHO never changes level, `measure` never
//! returns.

use std::time::{Duration, Instant};

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use log::info;

use crate::error::SensorError;

/// Half the speed of sound at ~20 °C, in cm/s (out and back).
pub const CM_PER_ECHO_SECOND: f32 = 17_150.0;

/// Trigger pulse width.
pub const TRIGGER_PULSE_US: u32 = 10;

/// Convert an echo pulse width into centimetres, rounded to 0.01 cm.
pub fn echo_to_cm(echo: Duration) -> f32 {
    let cm = echo.as_secs_f32() * CM_PER_ECHO_SECOND;
    (cm * 100.0).round() / 100.0
}

pub struct Hcsr04<T, E, D> {
    trigger: T,
    echo: E,
    delay: D,
}

impl<T, E, D> Hcsr04<T, E, D>
where
    T: OutputPin,
    E: InputPin,
    D: DelayNs,
{
    pub fn new(trigger: T, echo: E, delay: D) -> Self {
        Self {
            trigger,
            echo,
            delay,
        }
    }

    /// Hold TRIG low for `settle_ms` so the module starts from a quiet line.
    pub fn settle(&mut self, settle_ms: u32) -> Result<(), SensorError> {
        info!("Initialising distance sensor ({} ms)...", settle_ms);
        self.trigger.set_low().map_err(|_| SensorError::TriggerFailed)?;
        self.delay.delay_ms(settle_ms);
        info!("Distance sensor initialised");
        Ok(())
    }

    /// One distance sample in centimetres.
    pub fn measure(&mut self) -> Result<f32, SensorError> {
        self.pulse_trigger()?;
        let echo = self.time_echo()?;
        Ok(echo_to_cm(echo))
    }

    fn pulse_trigger(&mut self) -> Result<(), SensorError> {
        self.trigger.set_high().map_err(|_| SensorError::TriggerFailed)?;
        self.delay.delay_us(TRIGGER_PULSE_US);
        self.trigger.set_low().map_err(|_| SensorError::TriggerFailed)
    }

    fn time_echo(&mut self) -> Result<Duration, SensorError> {
        let mut rise = Instant::now();
        while self.echo_low()? {
            rise = Instant::now();
        }
        let mut fall = rise;
        while !self.echo_low()? {
            fall = Instant::now();
        }
        Ok(fall.saturating_duration_since(rise))
    }

    fn echo_low(&mut self) -> Result<bool, SensorError> {
        self.echo.is_low().map_err(|_| SensorError::GpioReadFailed)
    }
}
