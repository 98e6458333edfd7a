//! Integration tests for the hardware self-test sequence.

use super::mock_hw::{ALL_OFF, IndicatorCall, MockHardware, NoopDelay};

use parkassist::config::SystemConfig;
use parkassist::diagnostics::{SelfTest, SelfTestReport};
use parkassist::error::{Error, SensorError};
use parkassist::indicator::ColourSet;
use parkassist::shutdown::ShutdownSignal;

fn set(colours: ColourSet, on: bool) -> IndicatorCall {
    IndicatorCall::Set { colours, on }
}

fn blink(colours: ColourSet, times: u32) -> IndicatorCall {
    IndicatorCall::Blink { colours, times }
}

/// The light stage, identical on every run.
fn light_stage() -> Vec<IndicatorCall> {
    let (r, y, g, all) = (
        ColourSet::RED,
        ColourSet::YELLOW,
        ColourSet::GREEN,
        ColourSet::ALL,
    );
    vec![
        set(all, true),
        set(y | g, false),
        set(r, true),
        set(r | g, false),
        set(y, true),
        set(r | y, false),
        set(g, true),
        blink(r, 1),
        blink(y, 1),
        blink(g, 1),
        blink(all, 1),
        blink(r, 3),
        blink(y, 3),
        blink(g, 3),
        blink(all, 3),
    ]
}

/// Three 50 ms polls with the default config.
fn three_polls() -> SelfTest {
    SelfTest::new(&SystemConfig::default(), 150)
}

#[test]
fn full_sequence_drives_lights_motion_and_distance() {
    let shutdown = ShutdownSignal::new();
    let mut hw = MockHardware::new(&shutdown)
        .with_motion(&[false, true, false])
        .with_distances(&[42.5]);
    let mut delay = NoopDelay::default();

    let report = three_polls().run(&mut hw, &mut delay, &shutdown).unwrap();
    assert_eq!(
        report,
        SelfTestReport {
            motion_detections: 1,
            distance_cm: 42.5,
        }
    );

    let mut expected = light_stage();
    expected.push(blink(ColourSet::ALL, 3));
    expected.push(blink(ColourSet::ALL, 5));
    expected.push(ALL_OFF);
    assert_eq!(hw.calls, expected);

    // four one-second steady holds, then three poll pauses
    assert_eq!(delay.total_ms, 4 * 1000 + 3 * 50);
    assert!(!shutdown.is_requested());
}

#[test]
fn every_detection_gets_its_own_flash() {
    let shutdown = ShutdownSignal::new();
    let mut hw = MockHardware::new(&shutdown)
        .with_motion(&[true, true, true])
        .with_distances(&[100.0]);

    let report = three_polls()
        .run(&mut hw, &mut NoopDelay::default(), &shutdown)
        .unwrap();
    assert_eq!(report.motion_detections, 3);
    assert_eq!(hw.count(blink(ColourSet::ALL, 5)), 3);
}

#[test]
fn shutdown_ends_motion_stage_but_still_reads_distance() {
    let shutdown = ShutdownSignal::new();
    // motion script runs dry on the first poll, which raises shutdown
    let mut hw = MockHardware::new(&shutdown).with_distances(&[12.0]);
    let self_test = SelfTest::new(&SystemConfig::default(), 10_000);
    assert_eq!(self_test.motion_polls(), 200);

    let report = self_test
        .run(&mut hw, &mut NoopDelay::default(), &shutdown)
        .unwrap();
    assert_eq!(report.motion_detections, 0);
    assert!((report.distance_cm - 12.0).abs() < f32::EPSILON);
    assert_eq!(hw.motion_remaining(), 0);
    assert_eq!(hw.calls.last(), Some(&ALL_OFF));
}

#[test]
fn sensor_failure_still_switches_lights_off() {
    let shutdown = ShutdownSignal::new();
    let mut hw = MockHardware::new(&shutdown)
        .with_motion(&[false, false, false])
        .then_distance_error(SensorError::GpioReadFailed);

    let outcome = three_polls().run(&mut hw, &mut NoopDelay::default(), &shutdown);
    assert_eq!(outcome, Err(Error::Sensor(SensorError::GpioReadFailed)));
    assert_eq!(hw.count(ALL_OFF), 1);
    assert_eq!(hw.calls.last(), Some(&ALL_OFF));
}

#[test]
fn zero_window_still_polls_once() {
    let self_test = SelfTest::new(&SystemConfig::default(), 0);
    assert_eq!(self_test.motion_polls(), 1);
}
