//! Integration tests for the ControlLoop → FSM → indicator pipeline.
//!
//! These run on the host and drive the full loop (`run`) against scripted
//! sensor readings, asserting on the exact indicator call history.

use super::mock_hw::{ALL_OFF, IndicatorCall, LogSink, MockHardware, NoopDelay};

use parkassist::app::events::{AppEvent, StopReason};
use parkassist::app::service::ControlLoop;
use parkassist::bands::Band;
use parkassist::config::{RangingExit, SystemConfig};
use parkassist::error::{Error, SensorError};
use parkassist::fsm::Phase;
use parkassist::indicator::{ColourSet, IndicatorState};
use parkassist::shutdown::ShutdownSignal;

fn steady(lit: ColourSet) -> [IndicatorCall; 2] {
    [
        IndicatorCall::Set {
            colours: lit.complement(),
            on: false,
        },
        IndicatorCall::Set {
            colours: lit,
            on: true,
        },
    ]
}

fn blink(colours: ColourSet, times: u32) -> IndicatorCall {
    IndicatorCall::Blink { colours, times }
}

fn run(
    config: SystemConfig,
    hw: &mut MockHardware,
    shutdown: &ShutdownSignal,
) -> (ControlLoop, LogSink, Result<(), Error>) {
    let mut control = ControlLoop::new(config);
    let mut sink = LogSink::new();
    let outcome = control.run(hw, &mut sink, &mut NoopDelay::default(), shutdown);
    (control, sink, outcome)
}

fn stops(sink: &LogSink) -> Vec<StopReason> {
    sink.events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Stopped(reason) => Some(*reason),
            _ => None,
        })
        .collect()
}

// ── End to end: approach the wall ────────────────────────────

#[test]
fn approach_sequence_walks_through_every_band() {
    let shutdown = ShutdownSignal::new();
    let mut hw = MockHardware::new(&shutdown)
        .with_motion(&[true])
        .with_distances(&[90.0, 72.0, 45.0, 15.0]);

    let (control, sink, outcome) = run(SystemConfig::default(), &mut hw, &shutdown);
    assert_eq!(outcome, Ok(()));

    let mut expected = vec![blink(ColourSet::ALL, 5), blink(ColourSet::ALL, 1)];
    expected.extend(steady(ColourSet::GREEN));
    expected.extend(steady(ColourSet::YELLOW));
    expected.extend(steady(ColourSet::RED));
    expected.push(blink(ColourSet::RED, 5));
    expected.push(ALL_OFF);
    assert_eq!(hw.calls, expected);

    assert_eq!(control.phase(), Phase::Ranging);
    assert_eq!(control.band(), Some(Band::Critical));
    assert_eq!(control.indicator_state(), IndicatorState::Off);
    assert_eq!(stops(&sink), vec![StopReason::Cancelled]);
}

#[test]
fn band_changes_are_reported_once_per_change() {
    let shutdown = ShutdownSignal::new();
    let mut hw = MockHardware::new(&shutdown)
        .with_motion(&[true])
        .with_distances(&[90.0, 85.0, 70.0, 65.0, 40.0]);

    let (_, sink, _) = run(SystemConfig::default(), &mut hw, &shutdown);

    let bands: Vec<(Option<Band>, Band)> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::BandChanged { from, to, .. } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        bands,
        vec![
            (None, Band::Far),
            (Some(Band::Far), Band::Caution),
            (Some(Band::Caution), Band::Near),
        ]
    );
}

#[test]
fn steady_colour_is_not_rewritten_for_the_same_band() {
    let shutdown = ShutdownSignal::new();
    let mut hw = MockHardware::new(&shutdown)
        .with_motion(&[true])
        .with_distances(&[90.0, 95.0, 120.0]);

    let _ = run(SystemConfig::default(), &mut hw, &shutdown);

    let green_on = IndicatorCall::Set {
        colours: ColourSet::GREEN,
        on: true,
    };
    assert_eq!(hw.count(green_on), 1);
}

#[test]
fn critical_blinks_repeat_for_every_sample() {
    let shutdown = ShutdownSignal::new();
    let mut hw = MockHardware::new(&shutdown)
        .with_motion(&[true])
        .with_distances(&[10.0, 12.0, 5.0]);

    let _ = run(SystemConfig::default(), &mut hw, &shutdown);
    assert_eq!(hw.count(blink(ColourSet::RED, 5)), 3);
}

// ── Readiness blink ──────────────────────────────────────────

#[test]
fn init_blink_count_follows_config() {
    for n in [0, 1, 5, 7] {
        let shutdown = ShutdownSignal::new();
        let mut hw = MockHardware::new(&shutdown);
        let config = SystemConfig {
            init_blinks: n,
            ..SystemConfig::default()
        };

        let (_, sink, outcome) = run(config, &mut hw, &shutdown);
        assert_eq!(outcome, Ok(()));
        assert_eq!(hw.calls, vec![blink(ColourSet::ALL, n), ALL_OFF], "n = {}", n);
        assert!(sink.events.contains(&AppEvent::Ready { blinks: n }));
    }
}

#[test]
fn readiness_blink_runs_before_idle_is_entered() {
    let shutdown = ShutdownSignal::new();
    let mut hw = MockHardware::new(&shutdown);

    let (_, sink, _) = run(SystemConfig::default(), &mut hw, &shutdown);
    assert_eq!(
        sink.events[..2],
        [AppEvent::Ready { blinks: 5 }, AppEvent::Started(Phase::Idle)]
    );
}

// ── Phase policy ─────────────────────────────────────────────

#[test]
fn never_returns_to_idle_after_motion() {
    let shutdown = ShutdownSignal::new();
    let mut hw = MockHardware::new(&shutdown)
        .with_motion(&[false, false, true, false, true])
        .with_distances(&[300.0; 12]);

    let (control, sink, _) = run(SystemConfig::default(), &mut hw, &shutdown);

    assert_eq!(control.phase(), Phase::Ranging);
    assert_eq!(hw.motion_remaining(), 2, "motion is not sampled while ranging");
    assert!(!sink.events.iter().any(|e| matches!(
        e,
        AppEvent::PhaseChanged {
            to: Phase::Idle,
            ..
        }
    )));
    assert_eq!(
        sink.events
            .iter()
            .filter(|e| **e == AppEvent::MotionDetected)
            .count(),
        1
    );
}

#[test]
fn idle_after_clear_switches_off_and_waits_again() {
    let shutdown = ShutdownSignal::new();
    let mut hw = MockHardware::new(&shutdown)
        .with_motion(&[true])
        .with_distances(&[90.0, 95.0]);
    let config = SystemConfig {
        ranging_exit: RangingExit::IdleAfterClear { readings: 2 },
        ..SystemConfig::default()
    };

    let (control, sink, outcome) = run(config, &mut hw, &shutdown);
    assert_eq!(outcome, Ok(()));
    assert_eq!(control.phase(), Phase::Idle);
    assert_eq!(control.band(), None);

    let mut expected = vec![blink(ColourSet::ALL, 5), blink(ColourSet::ALL, 1)];
    expected.extend(steady(ColourSet::GREEN));
    expected.push(ALL_OFF);
    expected.push(ALL_OFF);
    assert_eq!(hw.calls, expected);
    assert!(sink.events.contains(&AppEvent::PhaseChanged {
        from: Phase::Ranging,
        to: Phase::Idle,
    }));
}

#[test]
fn near_sample_resets_the_clear_streak() {
    let shutdown = ShutdownSignal::new();
    let mut hw = MockHardware::new(&shutdown)
        .with_motion(&[true])
        .with_distances(&[90.0, 40.0, 90.0]);
    let config = SystemConfig {
        ranging_exit: RangingExit::IdleAfterClear { readings: 2 },
        ..SystemConfig::default()
    };

    let (control, _, _) = run(config, &mut hw, &shutdown);
    assert_eq!(control.phase(), Phase::Ranging);
}

// ── Cancellation and faults ──────────────────────────────────

#[test]
fn cancel_during_distance_read_drops_the_sample() {
    let shutdown = ShutdownSignal::new();
    let mut hw = MockHardware::new(&shutdown)
        .with_motion(&[true])
        .with_distances(&[90.0, 45.0, 10.0])
        .cancel_on_distance(2);

    let (control, sink, outcome) = run(SystemConfig::default(), &mut hw, &shutdown);
    assert_eq!(outcome, Ok(()));

    let red_on = IndicatorCall::Set {
        colours: ColourSet::RED,
        on: true,
    };
    assert_eq!(hw.count(red_on), 0, "45 cm sample must not reach the light");
    assert_eq!(hw.count(ALL_OFF), 1);
    assert_eq!(hw.calls.last(), Some(&ALL_OFF));
    assert_eq!(control.band(), Some(Band::Far));
    assert_eq!(stops(&sink), vec![StopReason::Cancelled]);
}

#[test]
fn cancel_before_start_only_switches_off() {
    let shutdown = ShutdownSignal::new();
    shutdown.request();
    let mut hw = MockHardware::new(&shutdown).with_motion(&[true]);

    let (control, sink, outcome) = run(SystemConfig::default(), &mut hw, &shutdown);
    assert_eq!(outcome, Ok(()));
    assert_eq!(hw.calls, vec![ALL_OFF]);
    assert_eq!(control.tick_count(), 0);
    assert_eq!(stops(&sink), vec![StopReason::Cancelled]);
}

#[test]
fn read_failure_aborts_but_still_switches_off() {
    let shutdown = ShutdownSignal::new();
    let mut hw = MockHardware::new(&shutdown)
        .with_motion(&[true])
        .with_distances(&[30.0])
        .then_distance_error(SensorError::GpioReadFailed);

    let (_, sink, outcome) = run(SystemConfig::default(), &mut hw, &shutdown);
    assert_eq!(outcome, Err(Error::Sensor(SensorError::GpioReadFailed)));
    assert_eq!(hw.count(ALL_OFF), 1);
    assert_eq!(hw.calls.last(), Some(&ALL_OFF));
    assert_eq!(stops(&sink), vec![StopReason::Fault]);
}

#[test]
fn non_finite_distance_is_rejected() {
    let shutdown = ShutdownSignal::new();
    let mut hw = MockHardware::new(&shutdown)
        .with_motion(&[true])
        .with_distances(&[f32::NAN]);

    let (_, _, outcome) = run(SystemConfig::default(), &mut hw, &shutdown);
    assert_eq!(outcome, Err(Error::Sensor(SensorError::InvalidReading)));
    assert_eq!(hw.calls.last(), Some(&ALL_OFF));
}

// ── Pacing ───────────────────────────────────────────────────

#[test]
fn idle_polls_are_paced_by_config() {
    let shutdown = ShutdownSignal::new();
    let mut hw = MockHardware::new(&shutdown).with_motion(&[false, false, false]);
    let mut control = ControlLoop::new(SystemConfig::default());
    let mut delay = NoopDelay::default();

    control
        .run(&mut hw, &mut LogSink::new(), &mut delay, &shutdown)
        .unwrap();
    assert_eq!(delay.total_ms, 3 * 50);
}
