//! System configuration parameters
//!
//! All tunable parameters for the parking assistant.  Values come from an
//! optional JSON file; every field is optional and falls back to the
//! defaults below.  The configuration is validated once at startup and is
//! immutable for the rest of the run.

use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::bands::BandConfig;
use crate::error::ConfigError;
use crate::pins;
use crate::session::PinMode;

/// Largest accepted blink count.  At 1 s per cycle this blocks the loop for
/// about a minute.
pub const MAX_BLINKS: u32 = 60;

/// What happens once ranging has started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangingExit {
    /// Keep ranging for the rest of the run.
    #[default]
    Never,
    /// Go back to waiting for motion after `readings` consecutive far
    /// samples, with the lights off.
    IdleAfterClear { readings: u32 },
}

/// Pin assignment, in the numbering of [`PinConfig::mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinConfig {
    pub mode: PinMode,
    pub red: u8,
    pub yellow: u8,
    pub green: u8,
    pub motion: u8,
    pub trigger: u8,
    pub echo: u8,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            mode: PinMode::Bcm,
            red: pins::RED_GPIO,
            yellow: pins::YELLOW_GPIO,
            green: pins::GREEN_GPIO,
            motion: pins::MOTION_GPIO,
            trigger: pins::TRIGGER_GPIO,
            echo: pins::ECHO_GPIO,
        }
    }
}

impl PinConfig {
    /// Every configured pin, in claim order.
    pub fn all(&self) -> [u8; 6] {
        [
            self.red,
            self.yellow,
            self.green,
            self.motion,
            self.trigger,
            self.echo,
        ]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let all = self.all();
        for (i, pin) in all.iter().enumerate() {
            if all[..i].contains(pin) {
                return Err(ConfigError::ValidationFailed(
                    "pins must be distinct",
                ));
            }
            let valid = match self.mode {
                PinMode::Bcm => pins::is_header_gpio(*pin),
                PinMode::Board => pins::board_to_bcm(*pin).is_some(),
            };
            if !valid {
                return Err(ConfigError::ValidationFailed(
                    "pin is not a GPIO line in the configured mode",
                ));
            }
        }
        Ok(())
    }
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Bands ---
    /// Distance band boundaries (cm).
    pub bands: BandConfig,

    // --- Indicator ---
    /// All-lamp blinks at startup, signalling readiness.
    pub init_blinks: u32,
    /// Red blinks for each critical-band reading.
    pub critical_blinks: u32,

    // --- Timing ---
    /// Pause between motion polls while idle (milliseconds).
    pub motion_poll_interval_ms: u32,
    /// Pause between distance samples while ranging (milliseconds).
    pub ranging_interval_ms: u32,
    /// PIR settling time after power-up (milliseconds).
    pub motion_warmup_ms: u32,
    /// Ultrasonic trigger settle time after power-up (milliseconds).
    pub ranger_settle_ms: u32,

    // --- Phase policy ---
    pub ranging_exit: RangingExit,

    // --- Hardware ---
    pub pins: PinConfig,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            bands: BandConfig::default(),

            init_blinks: 5,
            critical_blinks: 5,

            motion_poll_interval_ms: 50,
            ranging_interval_ms: 0, // continuous
            motion_warmup_ms: 5_000,
            ranger_settle_ms: 2_000,

            ranging_exit: RangingExit::Never,

            pins: PinConfig::default(),
        }
    }
}

impl SystemConfig {
    /// Load from `path` if given, otherwise use the defaults.  The result
    /// is validated either way.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
                let config = Self::from_json(&text)?;
                info!("Config loaded from {}", path.display());
                config
            }
            None => {
                info!("No config file given, using defaults");
                Self::default()
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document.  Does not validate.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::Malformed(e.to_string()))
    }

    /// Reject values the control loop cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bands.validate()?;
        self.pins.validate()?;

        if self.init_blinks > MAX_BLINKS {
            return Err(ConfigError::ValidationFailed("init_blinks is too large"));
        }
        if self.critical_blinks == 0 {
            return Err(ConfigError::ValidationFailed(
                "critical_blinks must be at least 1",
            ));
        }
        if self.critical_blinks > MAX_BLINKS {
            return Err(ConfigError::ValidationFailed("critical_blinks is too large"));
        }
        if let RangingExit::IdleAfterClear { readings: 0 } = self.ranging_exit {
            return Err(ConfigError::ValidationFailed(
                "ranging_exit readings must be at least 1",
            ));
        }
        Ok(())
    }
}
