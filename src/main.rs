//! ParkAssist: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 Adapters (outer ring)                    │
//! │                                                          │
//! │  HardwareAdapter<StopLight, SensorHub>    LogEventSink   │
//! │  (Indicator + Proximity, rppal GPIO)      (EventSink)    │
//! │                                                          │
//! │  ──────────────── Port Trait Boundary ──────────────     │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │            ControlLoop (pure logic)                │  │
//! │  │  FSM · bands · indicator pacing                    │  │
//! │  └────────────────────────────────────────────────────┘  │
//! │                                                          │
//! │  Session (pin numbering) · ShutdownSignal (SIGINT/TERM)  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! With `--self-test` the same hardware adapter is handed to
//! `diagnostics::SelfTest` instead of the control loop.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use rppal::hal::Delay;

use parkassist::adapters::log_sink::LogEventSink;
use parkassist::adapters::rpi::open_hardware;
use parkassist::app::service::ControlLoop;
use parkassist::config::SystemConfig;
use parkassist::diagnostics::{DEFAULT_MOTION_WINDOW_MS, SelfTest};
use parkassist::session::{PinMode, Session};
use parkassist::shutdown::ShutdownSignal;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Bcm,
    Board,
}

impl From<ModeArg> for PinMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Bcm => PinMode::Bcm,
            ModeArg::Board => PinMode::Board,
        }
    }
}

/// Garage parking assistant: PIR wake-up, ultrasonic ranging, stoplight.
#[derive(Parser, Debug)]
#[command(name = "parkassist")]
#[command(version, long_about = None)]
struct Cli {
    /// JSON configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Pin numbering scheme, overrides `pins.mode` from the config
    #[arg(long, value_enum, value_name = "MODE")]
    pin_mode: Option<ModeArg>,

    /// Validate the configuration and exit
    #[arg(long)]
    check: bool,

    /// Run the hardware self-test instead of the parking assistant
    #[arg(long, conflicts_with = "check")]
    self_test: bool,

    /// How long the self-test watches the motion sensor
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_MOTION_WINDOW_MS / 1000)]
    motion_window: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("ParkAssist v{}", env!("CARGO_PKG_VERSION"));

    let mut config = SystemConfig::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(mode) = cli.pin_mode {
        config.pins.mode = mode.into();
        config.validate().context("validating pin assignment")?;
    }
    if cli.check {
        info!("Configuration OK");
        return Ok(());
    }

    let shutdown = ShutdownSignal::new();
    let handler_signal = shutdown.clone();
    ctrlc::set_handler(move || {
        info!("Signal received, stopping");
        handler_signal.request();
    })
    .context("installing signal handler")?;

    let mut session = Session::open(config.pins.mode).context("opening GPIO session")?;
    let outcome = if cli.self_test {
        let self_test = SelfTest::new(&config, cli.motion_window.saturating_mul(1000));
        run_self_test(&mut session, &config, &self_test, &shutdown)
    } else {
        run_session(&mut session, &config, &shutdown)
    };
    session.close();
    outcome
}

fn run_session(
    session: &mut Session,
    config: &SystemConfig,
    shutdown: &ShutdownSignal,
) -> Result<()> {
    let mut hw = open_hardware(session, config).context("initialising hardware")?;
    let mut sink = LogEventSink::new();
    let mut control = ControlLoop::new(config.clone());

    control
        .run(&mut hw, &mut sink, &mut Delay::new(), shutdown)
        .context("control loop aborted")
}

fn run_self_test(
    session: &mut Session,
    config: &SystemConfig,
    self_test: &SelfTest,
    shutdown: &ShutdownSignal,
) -> Result<()> {
    let mut hw = open_hardware(session, config).context("initialising hardware")?;
    self_test
        .run(&mut hw, &mut Delay::new(), shutdown)
        .context("self-test failed")?;
    Ok(())
}
