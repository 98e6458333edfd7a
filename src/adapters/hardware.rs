//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the stoplight and the sensor hub, exposing them through
//! [`IndicatorPort`] and [`ProximityPort`] as a single value the control
//! loop can borrow.

use crate::app::ports::{IndicatorPort, ProximityPort};
use crate::error::{ActuatorError, SensorError};
use crate::indicator::ColourSet;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<L, S> {
    light: L,
    sensors: S,
}

impl<L, S> HardwareAdapter<L, S>
where
    L: IndicatorPort,
    S: ProximityPort,
{
    pub fn new(light: L, sensors: S) -> Self {
        Self { light, sensors }
    }

    pub fn into_parts(self) -> (L, S) {
        (self.light, self.sensors)
    }
}

// ── ProximityPort implementation ──────────────────────────────

impl<L, S: ProximityPort> ProximityPort for HardwareAdapter<L, S> {
    fn detect_motion(&mut self) -> Result<bool, SensorError> {
        self.sensors.detect_motion()
    }

    fn measure_distance(&mut self) -> Result<f32, SensorError> {
        self.sensors.measure_distance()
    }
}

// ── IndicatorPort implementation ──────────────────────────────

impl<L: IndicatorPort, S> IndicatorPort for HardwareAdapter<L, S> {
    fn set(&mut self, colours: ColourSet, on: bool) -> Result<(), ActuatorError> {
        self.light.set(colours, on)
    }

    fn blink(
        &mut self,
        colours: ColourSet,
        times: u32,
        on_ms: u32,
        off_ms: u32,
    ) -> Result<(), ActuatorError> {
        self.light.blink(colours, times, on_ms, off_ms)
    }
}
