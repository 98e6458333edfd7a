//! Port traits: the hexagonal boundary between the control loop and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlLoop (domain)
//! ```
//!
//! Driven adapters (sensors, the stoplight, event sinks) implement these
//! traits.  The [`ControlLoop`](super::service::ControlLoop) consumes them
//! via generics, so the domain core never touches GPIO directly.
//!
//! Every port call may block for as long as the hardware takes.  None of
//! them has a timeout.

use crate::error::{ActuatorError, SensorError};
use crate::indicator::ColourSet;

// ───────────────────────────────────────────────────────────────
// Proximity port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: motion and distance, one sample per call.
pub trait ProximityPort {
    /// Whether the motion sensor currently reports presence.
    fn detect_motion(&mut self) -> Result<bool, SensorError>;

    /// One distance sample, in centimetres.
    fn measure_distance(&mut self) -> Result<f32, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the tri-colour stoplight.
pub trait IndicatorPort {
    /// Drive every lamp in `colours` on or off.  Lamps outside the set are
    /// left as they are.
    fn set(&mut self, colours: ColourSet, on: bool) -> Result<(), ActuatorError>;

    /// Clear all lamps, then flash `colours` `times` times: on for `on_ms`,
    /// all off for `off_ms`.  Returns once the sequence is complete.
    fn blink(
        &mut self,
        colours: ColourSet,
        times: u32,
        on_ms: u32,
        off_ms: u32,
    ) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
