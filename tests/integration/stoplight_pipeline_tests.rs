//! ControlLoop driving the real `StopLight` driver through the
//! `HardwareAdapter`, with mock GPIO lines underneath.
//!
//! Asserts on pin levels and rising edges rather than port calls.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::OutputPin;
use parkassist::adapters::hardware::HardwareAdapter;
use parkassist::app::ports::ProximityPort;
use parkassist::app::service::ControlLoop;
use parkassist::config::SystemConfig;
use parkassist::drivers::stoplight::StopLight;
use parkassist::error::SensorError;
use parkassist::indicator::ColourSet;
use parkassist::shutdown::ShutdownSignal;

use super::mock_hw::{LogSink, NoopDelay};

// ── Mock GPIO line ────────────────────────────────────────────

#[derive(Default)]
struct Line {
    high: bool,
    rising_edges: u32,
}

#[derive(Clone, Default)]
struct LinePin(Rc<RefCell<Line>>);

impl embedded_hal::digital::ErrorType for LinePin {
    type Error = Infallible;
}

impl OutputPin for LinePin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        let mut line = self.0.borrow_mut();
        if !line.high {
            line.rising_edges += 1;
        }
        line.high = true;
        Ok(())
    }
}

impl LinePin {
    fn high(&self) -> bool {
        self.0.borrow().high
    }

    fn edges(&self) -> u32 {
        self.0.borrow().rising_edges
    }
}

// ── Scripted sensors ──────────────────────────────────────────

struct Script {
    motion: VecDeque<bool>,
    distances: VecDeque<f32>,
    shutdown: ShutdownSignal,
}

impl ProximityPort for Script {
    fn detect_motion(&mut self) -> Result<bool, SensorError> {
        Ok(self.motion.pop_front().unwrap_or_else(|| {
            self.shutdown.request();
            false
        }))
    }

    fn measure_distance(&mut self) -> Result<f32, SensorError> {
        Ok(self.distances.pop_front().unwrap_or_else(|| {
            self.shutdown.request();
            500.0
        }))
    }
}

struct Rig {
    red: LinePin,
    yellow: LinePin,
    green: LinePin,
    hw: HardwareAdapter<StopLight<LinePin, LinePin, LinePin, NoopDelay>, Script>,
    shutdown: ShutdownSignal,
}

fn rig(motion: &[bool], distances: &[f32]) -> Rig {
    let shutdown = ShutdownSignal::new();
    let (red, yellow, green) = (LinePin::default(), LinePin::default(), LinePin::default());
    let light = StopLight::new(red.clone(), yellow.clone(), green.clone(), NoopDelay::default());
    let script = Script {
        motion: motion.iter().copied().collect(),
        distances: distances.iter().copied().collect(),
        shutdown: shutdown.clone(),
    };
    Rig {
        red,
        yellow,
        green,
        hw: HardwareAdapter::new(light, script),
        shutdown,
    }
}

fn run(rig: &mut Rig, config: SystemConfig) {
    let mut control = ControlLoop::new(config);
    control
        .run(&mut rig.hw, &mut LogSink::new(), &mut NoopDelay::default(), &rig.shutdown)
        .unwrap();
}

// ── Tests ─────────────────────────────────────────────────────

#[test]
fn init_blink_pulses_every_lamp_n_times() {
    for n in [0, 3, 5] {
        let mut rig = rig(&[], &[]);
        let config = SystemConfig {
            init_blinks: n,
            ..SystemConfig::default()
        };
        run(&mut rig, config);

        assert_eq!(rig.red.edges(), n);
        assert_eq!(rig.yellow.edges(), n);
        assert_eq!(rig.green.edges(), n);
    }
}

#[test]
fn lamps_are_dark_after_shutdown() {
    let mut rig = rig(&[true], &[70.0]);
    run(&mut rig, SystemConfig::default());

    assert!(!rig.red.high() && !rig.yellow.high() && !rig.green.high());
    let (light, _) = rig.hw.into_parts();
    assert_eq!(light.lit(), ColourSet::NONE);
}

#[test]
fn critical_sample_flashes_red_only() {
    let mut rig = rig(&[true], &[8.0]);
    let config = SystemConfig {
        init_blinks: 0,
        critical_blinks: 4,
        ..SystemConfig::default()
    };
    run(&mut rig, config);

    // one motion acknowledgement blink on every lamp, then four red flashes
    assert_eq!(rig.red.edges(), 1 + 4);
    assert_eq!(rig.yellow.edges(), 1);
    assert_eq!(rig.green.edges(), 1);
}
