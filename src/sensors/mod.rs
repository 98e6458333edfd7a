//! Sensor subsystem: individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns the PIR and the ranger and answers the control loop's
//! [`ProximityPort`] queries.

pub mod pir;
pub mod ultrasonic;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::app::ports::ProximityPort;
use crate::error::SensorError;
use pir::MotionSensor;
use ultrasonic::Hcsr04;

/// Aggregates the motion and distance sensors.
pub struct SensorHub<P, T, E, D> {
    pub motion: MotionSensor<P>,
    pub ranger: Hcsr04<T, E, D>,
}

impl<P, T, E, D> SensorHub<P, T, E, D>
where
    P: InputPin,
    T: OutputPin,
    E: InputPin,
    D: DelayNs,
{
    /// Pass in pre-built drivers (built where pin ownership is established).
    pub fn new(motion: MotionSensor<P>, ranger: Hcsr04<T, E, D>) -> Self {
        Self { motion, ranger }
    }
}

impl<P, T, E, D> ProximityPort for SensorHub<P, T, E, D>
where
    P: InputPin,
    T: OutputPin,
    E: InputPin,
    D: DelayNs,
{
    fn detect_motion(&mut self) -> Result<bool, SensorError> {
        self.motion.detect()
    }

    fn measure_distance(&mut self) -> Result<f32, SensorError> {
        self.ranger.measure()
    }
}
