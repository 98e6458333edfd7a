//! Outbound application events.
//!
//! The [`ControlLoop`](super::service::ControlLoop) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Individual readings are not
//! events; only changes are.

use crate::bands::Band;
use crate::fsm::Phase;

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The shutdown signal was raised.
    Cancelled,
    /// A sensor or the light failed.
    Fault,
}

/// Structured events emitted by the control loop.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The loop has started (carries initial phase).
    Started(Phase),

    /// The startup blink sequence finished.
    Ready { blinks: u32 },

    /// The motion sensor reported presence while idle.
    MotionDetected,

    /// The loop moved between phases.
    PhaseChanged { from: Phase, to: Phase },

    /// A distance sample landed in a different band than the previous one.
    BandChanged {
        from: Option<Band>,
        to: Band,
        distance_cm: f32,
    },

    /// The lights are off and the loop has returned.
    Stopped(StopReason),
}
