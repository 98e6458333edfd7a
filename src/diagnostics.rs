//! Hardware self-test.
//!
//! Walks the fixture through a fixed bench sequence so an installer can
//! check the wiring without driving a car at the wall:
//!
//! 1. **Lights**: all on, then each lamp alone, then a single and a triple
//!    blink of every lamp and of all three together.
//! 2. **Motion**: a triple all-lamp blink to announce the stage, then the
//!    PIR is polled for `motion_window_ms`; every detection flashes all
//!    lamps five times.  A shutdown request ends the stage early.
//! 3. **Distance**: one reading, logged.
//!
//! The lamps are switched off once at the end, also when a stage fails.

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use crate::app::ports::{IndicatorPort, ProximityPort};
use crate::config::SystemConfig;
use crate::error::{Result, SensorError};
use crate::indicator::{self, BLINK_HALF_PERIOD_MS, Colour, ColourSet, IndicatorCommand};
use crate::shutdown::ShutdownSignal;

/// How long each steady light is held.
pub const STEADY_HOLD_MS: u32 = 1000;

/// Blinks used for the "multi" light checks and the motion stage banner.
pub const MULTI_BLINKS: u32 = 3;

/// Blinks shown for each detected motion.
pub const MOTION_BLINKS: u32 = 5;

/// Default length of the motion stage.
pub const DEFAULT_MOTION_WINDOW_MS: u32 = 10_000;

/// What the self-test observed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelfTestReport {
    /// Motion polls that read HIGH.
    pub motion_detections: u32,
    /// The single distance reading, in centimetres.
    pub distance_cm: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelfTest {
    pub motion_window_ms: u32,
    pub poll_interval_ms: u32,
}

impl SelfTest {
    pub fn new(config: &SystemConfig, motion_window_ms: u32) -> Self {
        Self {
            motion_window_ms,
            poll_interval_ms: config.motion_poll_interval_ms,
        }
    }

    /// Motion polls in the window; at least one.
    pub fn motion_polls(&self) -> u32 {
        (self.motion_window_ms / self.poll_interval_ms.max(1)).max(1)
    }

    pub fn run(
        &self,
        hw: &mut (impl ProximityPort + IndicatorPort),
        delay: &mut impl DelayNs,
        shutdown: &ShutdownSignal,
    ) -> Result<SelfTestReport> {
        let outcome = self.run_stages(hw, delay, shutdown);
        if let Err(e) = hw.set(ColourSet::ALL, false) {
            warn!("Failed to switch lights off after self-test: {}", e);
        }
        match &outcome {
            Ok(report) => info!(
                "SELFTEST | passed: {} motion detections, distance {:.2} cm",
                report.motion_detections, report.distance_cm
            ),
            Err(e) => warn!("SELFTEST | failed: {}", e),
        }
        outcome
    }

    fn run_stages(
        &self,
        hw: &mut (impl ProximityPort + IndicatorPort),
        delay: &mut impl DelayNs,
        shutdown: &ShutdownSignal,
    ) -> Result<SelfTestReport> {
        check_lights(hw, delay)?;
        let motion_detections = self.check_motion(hw, delay, shutdown)?;

        let distance_cm = hw.measure_distance()?;
        if !distance_cm.is_finite() {
            return Err(SensorError::InvalidReading.into());
        }
        info!("SELFTEST | distance: {:.2} cm", distance_cm);

        Ok(SelfTestReport {
            motion_detections,
            distance_cm,
        })
    }

    fn check_motion(
        &self,
        hw: &mut (impl ProximityPort + IndicatorPort),
        delay: &mut impl DelayNs,
        shutdown: &ShutdownSignal,
    ) -> Result<u32> {
        info!("SELFTEST | motion: watching for {} ms", self.motion_window_ms);
        blink(hw, ColourSet::ALL, MULTI_BLINKS)?;

        let mut detections = 0;
        for _ in 0..self.motion_polls() {
            if shutdown.is_requested() {
                info!("SELFTEST | motion stage cut short");
                break;
            }
            if hw.detect_motion()? {
                info!("SELFTEST | motion detected");
                detections += 1;
                blink(hw, ColourSet::ALL, MOTION_BLINKS)?;
            }
            if !shutdown.is_requested() {
                delay.delay_ms(self.poll_interval_ms);
            }
        }
        Ok(detections)
    }
}

fn check_lights(hw: &mut impl IndicatorPort, delay: &mut impl DelayNs) -> Result<()> {
    info!("SELFTEST | lights: all on");
    hw.set(ColourSet::ALL, true)?;
    delay.delay_ms(STEADY_HOLD_MS);

    for colour in Colour::ALL {
        info!("SELFTEST | lights: {:?} on", colour);
        indicator::execute(hw, IndicatorCommand::Steady(colour))?;
        delay.delay_ms(STEADY_HOLD_MS);
    }

    let singles = Colour::ALL.map(ColourSet::from);
    for times in [1, MULTI_BLINKS] {
        for colours in singles.into_iter().chain([ColourSet::ALL]) {
            info!("SELFTEST | lights: blink {:?} x{}", colours, times);
            blink(hw, colours, times)?;
        }
    }
    Ok(())
}

fn blink(hw: &mut impl IndicatorPort, colours: ColourSet, times: u32) -> Result<()> {
    hw.blink(colours, times, BLINK_HALF_PERIOD_MS, BLINK_HALF_PERIOD_MS)?;
    Ok(())
}
