//! Shared mutable context threaded through every phase handler.
//!
//! `LoopContext` is the single struct that phase handlers read from and
//! write to: the latest sensor readings, the pending indicator command,
//! the current band and the configuration.

use crate::bands::Band;
use crate::config::SystemConfig;
use crate::indicator::IndicatorCommand;

// ---------------------------------------------------------------------------
// Readings (read-only to phase handlers; written by the control loop)
// ---------------------------------------------------------------------------

/// The samples taken during the current tick.  Only the reading relevant to
/// the current phase is refreshed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Readings {
    /// Latest motion sample (Idle only).
    pub motion: bool,
    /// Latest distance sample in centimetres (Ranging only).
    pub distance_cm: Option<f32>,
}

// ---------------------------------------------------------------------------
// LoopContext
// ---------------------------------------------------------------------------

/// The shared context passed to every phase handler function.
pub struct LoopContext {
    // -- Sensor data --
    pub readings: Readings,

    // -- Indicator output --
    /// Command for the control loop to execute after the tick.  Handlers
    /// overwrite it; the loop takes it.
    pub command: Option<IndicatorCommand>,

    // -- Ranging --
    /// Band of the latest distance sample, `None` outside Ranging.
    pub band: Option<Band>,
    /// Consecutive far samples.
    pub clear_streak: u32,

    // -- Configuration --
    pub config: SystemConfig,
}

impl LoopContext {
    pub fn new(config: SystemConfig) -> Self {
        Self {
            readings: Readings::default(),
            command: None,
            band: None,
            clear_streak: 0,
            config,
        }
    }

    /// Queue `cmd` for the loop, replacing anything queued earlier this tick.
    pub fn command(&mut self, cmd: IndicatorCommand) {
        self.command = Some(cmd);
    }
}
