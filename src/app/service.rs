//! Control loop service: the hexagonal core.
//!
//! [`ControlLoop`] owns the phase FSM, the shared context and the indicator
//! state.  All I/O flows through port traits injected at call sites, making
//! the whole loop testable with mock adapters.
//!
//! ```text
//!  ProximityPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                    │      ControlLoop       │
//!  IndicatorPort ◀── │  FSM · bands · pacing  │
//!                    └────────────────────────┘
//! ```
//!
//! One tick is one blocking read (motion while Idle, distance while
//! Ranging), one FSM step, and at most one indicator command.  The shutdown
//! signal is checked around every blocking call; a sample that arrives
//! after shutdown was requested is dropped.

use embedded_hal::delay::DelayNs;
use log::{debug, error, info, warn};

use crate::bands::Band;
use crate::config::SystemConfig;
use crate::error::{Result, SensorError};
use crate::fsm::context::LoopContext;
use crate::fsm::states::build_phase_table;
use crate::fsm::{Fsm, Phase};
use crate::indicator::{self, ColourSet, IndicatorCommand, IndicatorState};
use crate::shutdown::ShutdownSignal;

use super::events::{AppEvent, StopReason};
use super::ports::{EventSink, IndicatorPort, ProximityPort};

// ───────────────────────────────────────────────────────────────
// ControlLoop
// ───────────────────────────────────────────────────────────────

pub struct ControlLoop {
    fsm: Fsm,
    ctx: LoopContext,
    indicator: IndicatorState,
    tick_count: u64,
}

impl ControlLoop {
    /// Construct the loop from a validated configuration.
    ///
    /// Does **not** touch hardware: call [`run`](Self::run), or
    /// [`start`](Self::start) and [`tick`](Self::tick) directly.
    pub fn new(config: SystemConfig) -> Self {
        let ctx = LoopContext::new(config);
        let fsm = Fsm::new(build_phase_table(), Phase::Idle);

        Self {
            fsm,
            ctx,
            indicator: IndicatorState::Off,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Run until `shutdown` is requested or a port fails.
    ///
    /// The lights are switched off exactly once before returning, on every
    /// path.  Returns `Ok(())` when cancelled.
    pub fn run(
        &mut self,
        hw: &mut (impl ProximityPort + IndicatorPort),
        sink: &mut impl EventSink,
        delay: &mut impl DelayNs,
        shutdown: &ShutdownSignal,
    ) -> Result<()> {
        let outcome = self.run_until_cancelled(hw, sink, delay, shutdown);

        let reason = match &outcome {
            Ok(()) => StopReason::Cancelled,
            Err(e) => {
                error!("Control loop aborted in {:?}: {}", self.phase(), e);
                StopReason::Fault
            }
        };
        self.shutdown(hw, sink, reason);
        outcome
    }

    /// Emit the readiness blink, then enter Idle.
    pub fn start(
        &mut self,
        hw: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let blinks = self.ctx.config.init_blinks;
        info!("Parking assistant initialised, signalling with {} blinks", blinks);
        self.indicate(
            hw,
            IndicatorCommand::Blink {
                colours: ColourSet::ALL,
                times: blinks,
            },
        )?;
        sink.emit(&AppEvent::Ready { blinks });

        self.fsm.start(&mut self.ctx);
        sink.emit(&AppEvent::Started(self.fsm.current_phase()));
        Ok(())
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one cycle: read the phase's sensor → FSM → indicator.
    pub fn tick(
        &mut self,
        hw: &mut (impl ProximityPort + IndicatorPort),
        sink: &mut impl EventSink,
        shutdown: &ShutdownSignal,
    ) -> Result<()> {
        self.tick_count += 1;
        let prev_phase = self.fsm.current_phase();
        let prev_band = self.ctx.band;
        let mut sample = None;

        // 1. Blocking read for the current phase
        match prev_phase {
            Phase::Idle => {
                self.ctx.readings.motion = hw.detect_motion()?;
            }
            Phase::Ranging => {
                let distance = hw.measure_distance()?;
                if !distance.is_finite() {
                    return Err(SensorError::InvalidReading.into());
                }
                self.ctx.readings.distance_cm = Some(distance);
                sample = Some(distance);
            }
            Phase::Alerting => {}
        }

        // 2. Shutdown arrived while we were blocked: drop the sample
        if shutdown.is_requested() {
            debug!("Shutdown requested during read, sample discarded");
            return Ok(());
        }

        // 3. FSM tick (pure phase logic)
        self.fsm.tick(&mut self.ctx);

        // 4. Events
        let new_phase = self.fsm.current_phase();
        if prev_phase == Phase::Idle && new_phase == Phase::Alerting {
            sink.emit(&AppEvent::MotionDetected);
        }
        if new_phase != prev_phase {
            sink.emit(&AppEvent::PhaseChanged {
                from: prev_phase,
                to: new_phase,
            });
        }
        if let (Some(band), Some(distance_cm)) = (self.ctx.band, sample) {
            if prev_band != Some(band) {
                sink.emit(&AppEvent::BandChanged {
                    from: prev_band,
                    to: band,
                    distance_cm,
                });
            }
        }

        // 5. Drive the light
        if let Some(cmd) = self.ctx.command.take() {
            self.indicate(hw, cmd)?;
        }

        Ok(())
    }

    /// Switch every lamp off and report why the loop stopped.  Failures
    /// are logged; there is nothing left to propagate them to.
    pub fn shutdown(
        &mut self,
        hw: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
        reason: StopReason,
    ) {
        match hw.set(ColourSet::ALL, false) {
            Ok(()) => self.indicator = IndicatorState::Off,
            Err(e) => warn!("Failed to switch lights off on shutdown: {}", e),
        }
        sink.emit(&AppEvent::Stopped(reason));
        info!("Control loop stopped ({:?}) after {} ticks", reason, self.tick_count);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.fsm.current_phase()
    }

    /// Band of the latest distance sample while ranging.
    pub fn band(&self) -> Option<Band> {
        self.ctx.band
    }

    /// Last state commanded on the light.
    pub fn indicator_state(&self) -> IndicatorState {
        self.indicator
    }

    /// Total ticks executed since construction.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn config(&self) -> &SystemConfig {
        &self.ctx.config
    }

    // ── Internal ──────────────────────────────────────────────

    fn run_until_cancelled(
        &mut self,
        hw: &mut (impl ProximityPort + IndicatorPort),
        sink: &mut impl EventSink,
        delay: &mut impl DelayNs,
        shutdown: &ShutdownSignal,
    ) -> Result<()> {
        if shutdown.is_requested() {
            return Ok(());
        }
        self.start(hw, sink)?;

        while !shutdown.is_requested() {
            self.tick(hw, sink, shutdown)?;

            let pause_ms = match self.fsm.current_phase() {
                Phase::Idle => self.ctx.config.motion_poll_interval_ms,
                Phase::Ranging => self.ctx.config.ranging_interval_ms,
                Phase::Alerting => 0,
            };
            if pause_ms > 0 && !shutdown.is_requested() {
                delay.delay_ms(pause_ms);
            }
        }
        info!("Shutdown requested, leaving {:?}", self.fsm.current_phase());
        Ok(())
    }

    fn indicate(&mut self, hw: &mut impl IndicatorPort, cmd: IndicatorCommand) -> Result<()> {
        if self.indicator.already_shows(cmd) {
            return Ok(());
        }
        self.indicator = indicator::execute(hw, cmd)?;
        Ok(())
    }
}
