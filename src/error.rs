//! Unified error types for the parking assistant.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! control loop's error handling uniform.  Sensor and actuator errors are
//! `Copy` so drivers can return them without allocation; configuration
//! errors carry a message because they are reported to the operator once,
//! at startup.

use core::fmt;

use crate::session::PinMode;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A sensor could not be read or returned unusable data.
    Sensor(SensorError),
    /// The indicator light could not be driven.
    Actuator(ActuatorError),
    /// Configuration is invalid or could not be loaded.
    Config(ConfigError),
    /// The pin-numbering session rejected a request.
    Session(SessionError),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Session(e) => write!(f, "session: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// GPIO read returned an error.
    GpioReadFailed,
    /// GPIO write (ultrasonic trigger) returned an error.
    TriggerFailed,
    /// Reading is not a finite number.
    InvalidReading,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioReadFailed => write!(f, "GPIO read failed"),
            Self::TriggerFailed => write!(f, "trigger pulse failed"),
            Self::InvalidReading => write!(f, "reading is not a finite number"),
        }
    }
}

impl std::error::Error for SensorError {}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// GPIO set failed.
    GpioWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
        }
    }
}

impl std::error::Error for ActuatorError {}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from loading or validating [`SystemConfig`](crate::config::SystemConfig).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The config file could not be read.
    Io(String),
    /// The config file is not valid JSON for the config schema.
    Malformed(String),
    /// A config field failed validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "cannot read config: {}", msg),
            Self::Malformed(msg) => write!(f, "malformed config: {}", msg),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Session errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// The process already runs with a different pin-numbering mode.
    ModeConflict { active: PinMode, requested: PinMode },
    /// The pin number does not name a GPIO line in the session's mode.
    InvalidPin { mode: PinMode, pin: u8 },
    /// The pin was already claimed by another peripheral.
    PinInUse(u8),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModeConflict { active, requested } => write!(
                f,
                "pin mode already set to {}, cannot set to {}",
                active, requested
            ),
            Self::InvalidPin { mode, pin } => {
                write!(f, "pin {} is not a GPIO in {} mode", pin, mode)
            }
            Self::PinInUse(bcm) => write!(f, "GPIO {} is already claimed", bcm),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<SessionError> for Error {
    fn from(e: SessionError) -> Self {
        Self::Session(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
