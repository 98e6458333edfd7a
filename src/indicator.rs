//! Stoplight colours, commands and pattern sequencing.
//!
//! The control loop decides *what* the light should show as an
//! [`IndicatorCommand`]; [`execute`] turns that into calls on an
//! [`IndicatorPort`] and reports the resulting [`IndicatorState`].
//!
//! | Command            | Port calls                                     |
//! |--------------------|------------------------------------------------|
//! | `Off`              | `set(ALL, false)`                              |
//! | `Steady(c)`        | `set(ALL - c, false)`, `set(c, true)`          |
//! | `Blink { cs, n }`  | `blink(cs, n, 500ms, 500ms)`                   |

use core::ops::BitOr;

use crate::app::ports::IndicatorPort;
use crate::error::ActuatorError;

/// Half-period of every blink, on and off alike.
pub const BLINK_HALF_PERIOD_MS: u32 = 500;

/// A single lamp on the stoplight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Colour {
    Red,
    Yellow,
    Green,
}

impl Colour {
    pub const ALL: [Colour; 3] = [Colour::Red, Colour::Yellow, Colour::Green];

    const fn bit(self) -> u8 {
        match self {
            Self::Red => 0b001,
            Self::Yellow => 0b010,
            Self::Green => 0b100,
        }
    }
}

/// A set of lamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColourSet(u8);

impl ColourSet {
    pub const NONE: Self = Self(0);
    pub const RED: Self = Self(Colour::Red.bit());
    pub const YELLOW: Self = Self(Colour::Yellow.bit());
    pub const GREEN: Self = Self(Colour::Green.bit());
    pub const ALL: Self = Self(0b111);

    pub const fn contains(self, colour: Colour) -> bool {
        self.0 & colour.bit() != 0
    }

    /// Every lamp not in `self`.
    pub const fn complement(self) -> Self {
        Self(!self.0 & Self::ALL.0)
    }

    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    pub fn iter(self) -> impl Iterator<Item = Colour> {
        Colour::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

impl From<Colour> for ColourSet {
    fn from(colour: Colour) -> Self {
        Self(colour.bit())
    }
}

impl BitOr for ColourSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.with(rhs)
    }
}

/// What the control loop asks the light to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorCommand {
    /// All lamps dark.
    Off,
    /// One lamp lit, the others dark.
    Steady(Colour),
    /// Flash `colours` together `times` times, then leave all dark.
    Blink { colours: ColourSet, times: u32 },
}

/// The last state commanded on the light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndicatorState {
    #[default]
    Off,
    Steady(Colour),
    /// A blink sequence ran to completion; the lamps are dark again.
    Blinking { colours: ColourSet, times: u32 },
}

impl IndicatorState {
    /// Whether issuing `cmd` would leave the light exactly as it is now.
    pub fn already_shows(self, cmd: IndicatorCommand) -> bool {
        matches!((self, cmd), (Self::Steady(a), IndicatorCommand::Steady(b)) if a == b)
    }
}

/// Execute `cmd` on `port`, blocking until any blink sequence finishes.
pub fn execute(
    port: &mut impl IndicatorPort,
    cmd: IndicatorCommand,
) -> Result<IndicatorState, ActuatorError> {
    match cmd {
        IndicatorCommand::Off => {
            port.set(ColourSet::ALL, false)?;
            Ok(IndicatorState::Off)
        }
        IndicatorCommand::Steady(colour) => {
            let lit = ColourSet::from(colour);
            port.set(lit.complement(), false)?;
            port.set(lit, true)?;
            Ok(IndicatorState::Steady(colour))
        }
        IndicatorCommand::Blink { colours, times } => {
            port.blink(colours, times, BLINK_HALF_PERIOD_MS, BLINK_HALF_PERIOD_MS)?;
            Ok(IndicatorState::Blinking { colours, times })
        }
    }
}
