//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events through the `log`
//! facade (stderr via `env_logger` in the binary).

use log::{info, warn};

use crate::app::events::{AppEvent, StopReason};
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(phase) => {
                info!("START | initial_phase={:?}", phase);
            }
            AppEvent::Ready { blinks } => {
                info!("READY | signalled with {} blinks", blinks);
            }
            AppEvent::MotionDetected => {
                info!("MOTION | vehicle detected, ranging");
            }
            AppEvent::PhaseChanged { from, to } => {
                info!("PHASE | {:?} -> {:?}", from, to);
            }
            AppEvent::BandChanged {
                from,
                to,
                distance_cm,
            } => match from {
                Some(from) => info!("BAND | {} -> {} at {:.2} cm", from, to, distance_cm),
                None => info!("BAND | {} at {:.2} cm", to, distance_cm),
            },
            AppEvent::Stopped(StopReason::Cancelled) => {
                info!("STOP | cancelled, lights off");
            }
            AppEvent::Stopped(StopReason::Fault) => {
                warn!("STOP | hardware fault, lights off");
            }
        }
    }
}
