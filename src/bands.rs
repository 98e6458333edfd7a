//! Distance bands and threshold classification.
//!
//! Four contiguous half-open bands partition the distance axis:
//!
//! ```text
//!   critical        near             caution            far
//! ─────────────┼──────────────────┼──────────────────┼──────────────▶ cm
//!  (-inf, 20)     [20, 60)           [60, 80)           [80, +inf)
//! ```
//!
//! A reading that lands exactly on a bound belongs to the farther band.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::indicator::{Colour, ColourSet, IndicatorCommand};

/// One of the four proximity bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    /// Plenty of room: steady green.
    Far,
    /// Slow down: steady yellow.
    Caution,
    /// Stop: steady red.
    Near,
    /// Too close: flashing red.
    Critical,
}

impl Band {
    /// Indicator command for this band.  `critical_blinks` is the flash count
    /// used for [`Band::Critical`].
    pub fn command(self, critical_blinks: u32) -> IndicatorCommand {
        match self {
            Self::Far => IndicatorCommand::Steady(Colour::Green),
            Self::Caution => IndicatorCommand::Steady(Colour::Yellow),
            Self::Near => IndicatorCommand::Steady(Colour::Red),
            Self::Critical => IndicatorCommand::Blink {
                colours: ColourSet::RED,
                times: critical_blinks,
            },
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Far => write!(f, "far"),
            Self::Caution => write!(f, "caution"),
            Self::Near => write!(f, "near"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Closed description of a band's span in centimetres; classification treats
/// it as `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }
}

/// Band boundaries, in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandConfig {
    /// Readings at or above this are [`Band::Far`].
    pub far_threshold: f32,
    /// Span of [`Band::Caution`].
    pub caution_range: Range,
    /// Span of [`Band::Near`].
    pub near_range: Range,
    /// Readings below this are [`Band::Critical`].
    pub critical_threshold: f32,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            far_threshold: 80.0,
            caution_range: Range::new(60.0, 80.0),
            near_range: Range::new(20.0, 60.0),
            critical_threshold: 20.0,
        }
    }
}

impl BandConfig {
    /// Check that the bounds are finite, positive, ordered and leave no gap
    /// or overlap between neighbouring bands.
    #[allow(clippy::float_cmp)]
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bounds = [
            self.critical_threshold,
            self.near_range.min,
            self.near_range.max,
            self.caution_range.min,
            self.caution_range.max,
            self.far_threshold,
        ];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(ConfigError::ValidationFailed("band bounds must be finite"));
        }
        if self.critical_threshold <= 0.0 {
            return Err(ConfigError::ValidationFailed(
                "critical_threshold must be positive",
            ));
        }
        if self.near_range.min >= self.near_range.max {
            return Err(ConfigError::ValidationFailed("near_range min must be below max"));
        }
        if self.caution_range.min >= self.caution_range.max {
            return Err(ConfigError::ValidationFailed(
                "caution_range min must be below max",
            ));
        }
        if self.critical_threshold != self.near_range.min {
            return Err(ConfigError::ValidationFailed(
                "near_range must start at critical_threshold",
            ));
        }
        if self.near_range.max != self.caution_range.min {
            return Err(ConfigError::ValidationFailed(
                "caution_range must start where near_range ends",
            ));
        }
        if self.caution_range.max != self.far_threshold {
            return Err(ConfigError::ValidationFailed(
                "caution_range must end at far_threshold",
            ));
        }
        Ok(())
    }

    /// Classify a distance.  Bands are tested nearest first; the first
    /// match wins.
    pub fn classify(&self, distance_cm: f32) -> Band {
        if distance_cm < self.critical_threshold {
            Band::Critical
        } else if distance_cm < self.near_range.max {
            Band::Near
        } else if distance_cm < self.caution_range.max {
            Band::Caution
        } else {
            Band::Far
        }
    }
}
